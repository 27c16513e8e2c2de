// =============================================================================
// SERIAL DRIVER - ZERO OVERHEAD
// =============================================================================
//
// Driver de Porta Serial (COM1) para logging de kernel.
//
// ARQUITETURA:
// - SEM Mutex/Spinlock - Escrita direta via I/O ports
// - SEM core::fmt - números são convertidos à mão para ASCII
// - SEM alocação - buffers na stack
//
// BACKENDS:
// - bare metal x86_64: COM1 (0x3F8) via in/out
// - host (std):        stderr, capturado pelo harness de testes
// - outros bare metal: descartado
//
// FUNÇÕES DISPONÍVEIS:
// - emit(byte)       : Envia um byte
// - emit_str(s)      : Envia string
// - emit_hex(v)      : Envia u64 em hexadecimal
// - emit_dec(v)      : Envia i64 em decimal
// - emit_nl()        : Envia newline
//
// O trait `Emit` é o que os macros de log usam para cada parte da mensagem.
//
// =============================================================================

use crate::sys::Pid;

// =============================================================================
// BACKEND: COM1 (bare metal x86_64)
// =============================================================================

#[cfg(all(target_os = "none", target_arch = "x86_64"))]
mod backend {
    // Porta de dados da COM1
    const COM1_DATA: u16 = 0x3F8;

    // Porta de status da COM1 (Line Status Register)
    const COM1_STATUS: u16 = 0x3FD;

    #[inline(always)]
    unsafe fn port_out(port: u16, value: u8) {
        core::arch::asm!(
            "out dx, al",
            in("dx") port,
            in("al") value,
            options(nostack, nomem, preserves_flags)
        );
    }

    #[inline(always)]
    unsafe fn port_in(port: u16) -> u8 {
        let value: u8;
        core::arch::asm!(
            "in al, dx",
            out("al") value,
            in("dx") port,
            options(nostack, nomem, preserves_flags)
        );
        value
    }

    /// Configura: 38400 baud, 8N1, FIFO habilitado.
    pub fn init() {
        unsafe {
            port_out(COM1_DATA + 1, 0x00); // Desabilita IRQs da UART
            port_out(COM1_DATA + 3, 0x80); // DLAB
            port_out(COM1_DATA, 0x03); // Divisor 3 = 38400 baud
            port_out(COM1_DATA + 1, 0x00);
            port_out(COM1_DATA + 3, 0x03); // 8N1
            port_out(COM1_DATA + 2, 0xC7); // FIFO, limpa, limiar 14 bytes
            port_out(COM1_DATA + 4, 0x0B);
        }
    }

    pub fn write_bytes(bytes: &[u8]) {
        for &byte in bytes {
            unsafe {
                // Espera o buffer de transmissão estar vazio (bit 5 do LSR)
                while port_in(COM1_STATUS) & 0x20 == 0 {
                    core::hint::spin_loop();
                }
                port_out(COM1_DATA, byte);
            }
        }
    }

    pub const NEWLINE: &[u8] = b"\r\n";
}

// =============================================================================
// BACKEND: stderr (host)
// =============================================================================

#[cfg(not(target_os = "none"))]
mod backend {
    pub fn init() {}

    pub fn write_bytes(bytes: &[u8]) {
        // eprint! passa pela captura de saída do harness de testes
        if let Ok(text) = core::str::from_utf8(bytes) {
            std::eprint!("{}", text);
        }
    }

    pub const NEWLINE: &[u8] = b"\n";
}

// =============================================================================
// BACKEND: descarte (bare metal sem UART conhecida)
// =============================================================================

#[cfg(all(target_os = "none", not(target_arch = "x86_64")))]
mod backend {
    pub fn init() {}

    pub fn write_bytes(_bytes: &[u8]) {}

    pub const NEWLINE: &[u8] = b"\n";
}

// =============================================================================
// FUNÇÕES DE ESCRITA
// =============================================================================

/// Inicializa a porta serial. Deve ser chamada uma vez durante o early-boot.
pub fn init() {
    backend::init();
}

/// Envia um único byte.
#[inline(always)]
pub fn emit(byte: u8) {
    backend::write_bytes(&[byte]);
}

/// Envia uma string.
#[inline(never)]
pub fn emit_str(s: &str) {
    backend::write_bytes(s.as_bytes());
}

/// Envia uma nova linha.
#[inline(never)]
pub fn emit_nl() {
    backend::write_bytes(backend::NEWLINE);
}

/// Envia um valor u64 em formato hexadecimal.
///
/// Formato de saída: 0x0123456789ABCDEF (sempre 18 caracteres)
#[inline(never)]
pub fn emit_hex(value: u64) {
    backend::write_bytes(&format_hex(value));
}

/// Envia um inteiro com sinal em decimal.
#[inline(never)]
pub fn emit_dec(value: i64) {
    let mut buf = [0u8; 20];
    let len = format_dec(value, &mut buf);
    backend::write_bytes(&buf[..len]);
}

pub(crate) fn format_hex(value: u64) -> [u8; 18] {
    const DIGITS: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = [0u8; 18];
    out[0] = b'0';
    out[1] = b'x';
    for i in 0..16 {
        let nibble = (value >> ((15 - i) * 4)) & 0xF;
        out[2 + i] = DIGITS[nibble as usize];
    }
    out
}

/// Escreve `value` em `buf` e devolve quantos bytes foram usados.
pub(crate) fn format_dec(value: i64, buf: &mut [u8; 20]) -> usize {
    let mut digits = [0u8; 20];
    let mut n = value.unsigned_abs();
    let mut count = 0;
    loop {
        digits[count] = b'0' + (n % 10) as u8;
        count += 1;
        n /= 10;
        if n == 0 {
            break;
        }
    }

    let mut len = 0;
    if value < 0 {
        buf[0] = b'-';
        len = 1;
    }
    while count > 0 {
        count -= 1;
        buf[len] = digits[count];
        len += 1;
    }
    len
}

// =============================================================================
// PARTES DE MENSAGEM
// =============================================================================

/// Valor emitido em hexadecimal pelos macros de log.
#[derive(Debug, Clone, Copy)]
pub struct Hex(pub u64);

/// Algo que sabe se escrever na serial sem core::fmt.
pub trait Emit {
    fn emit(&self);
}

impl Emit for &str {
    fn emit(&self) {
        emit_str(self);
    }
}

impl Emit for alloc::string::String {
    fn emit(&self) {
        emit_str(self.as_str());
    }
}

impl Emit for Hex {
    fn emit(&self) {
        emit_hex(self.0);
    }
}

impl Emit for bool {
    fn emit(&self) {
        emit_str(if *self { "true" } else { "false" });
    }
}

impl Emit for Pid {
    fn emit(&self) {
        emit_dec(self.as_u32() as i64);
    }
}

macro_rules! emit_as_dec {
    ($($t:ty),*) => {
        $(
            impl Emit for $t {
                fn emit(&self) {
                    emit_dec(*self as i64);
                }
            }
        )*
    };
}

emit_as_dec!(u8, u16, u32, i32, i64);

/// Decimal quando cabe em i64; valores acima de i64::MAX saem em hex.
pub(crate) fn unsigned_as_dec(value: u64) -> Option<i64> {
    i64::try_from(value).ok()
}

fn emit_unsigned(value: u64) {
    match unsigned_as_dec(value) {
        Some(dec) => emit_dec(dec),
        None => emit_hex(value),
    }
}

impl Emit for u64 {
    fn emit(&self) {
        emit_unsigned(*self);
    }
}

impl Emit for usize {
    fn emit(&self) {
        emit_unsigned(*self as u64);
    }
}
