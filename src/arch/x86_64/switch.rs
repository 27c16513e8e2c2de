//! Troca de contexto x86_64 (System V).
//!
//! Só os registradores callee-saved são guardados: a troca é uma chamada de
//! função comum do ponto de vista do compilador, então todo o resto já foi
//! salvo pelo chamador. O endereço de retorno fica na própria stack.

use crate::arch::traits::ThreadStart;

/// Estado de máquina de uma thread suspensa.
///
/// Offsets usados pelo assembly:
/// 0x00:rsp, 0x08:rbx, 0x10:rbp, 0x18:r12, 0x20:r13, 0x28:r14, 0x30:r15
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MachineState {
    pub rsp: u64,
    pub rbx: u64,
    pub rbp: u64,
    pub r12: u64,
    pub r13: u64,
    pub r14: u64,
    pub r15: u64,
}

impl MachineState {
    /// Estado zerado. É o que a thread de boot carrega até a primeira troca.
    pub const fn new() -> Self {
        Self {
            rsp: 0,
            rbx: 0,
            rbp: 0,
            r12: 0,
            r13: 0,
            r14: 0,
            r15: 0,
        }
    }

    /// Monta o estado inicial de uma thread nova no topo de `stack_top`.
    ///
    /// O primeiro `ret` da troca de contexto cai em `bobina_thread_root` com
    /// RSP alinhado em 16, como se o trampolim tivesse sido chamado.
    /// Slots: rbx=context, r12=startup, r13=initial_pc, r14=initial_arg,
    /// r15=when_done.
    ///
    /// # Safety
    /// `stack_top` deve ser o fim de uma região gravável de pelo menos 32 bytes
    /// que ninguém mais usa.
    pub unsafe fn synthesize(stack_top: usize, start: &ThreadStart) -> Self {
        let top = stack_top & !0xF;
        let slot = top - 24;
        (slot as *mut usize).write(thread_root());

        Self {
            rsp: slot as u64,
            rbx: start.context as u64,
            rbp: 0,
            r12: start.startup_pc as u64,
            r13: start.initial_pc as u64,
            r14: start.initial_arg as u64,
            r15: start.when_done_pc as u64,
        }
    }

    pub fn stack_pointer(&self) -> usize {
        self.rsp as usize
    }
}

/// Endereço do trampolim que inicia toda thread nova.
pub fn thread_root() -> usize {
    bobina_thread_root as unsafe extern "C" fn() as usize
}

/// Salva o contexto atual em `old` e carrega `new`.
///
/// Retorna quando alguém trocar de volta para `old`.
///
/// # Safety
/// - Interrupções devem estar desabilitadas
/// - `old` e `new` devem apontar para estados válidos e estáveis
/// - `new` deve ter sido salvo por esta função ou montado por `synthesize`
pub unsafe fn switch(old: *mut MachineState, new: *const MachineState) {
    bobina_switch_context(old, new);
}

// RDI = old, RSI = new
core::arch::global_asm!(
    r#"
.p2align 4
.global bobina_switch_context
bobina_switch_context:
    mov [rdi + 0x00], rsp
    mov [rdi + 0x08], rbx
    mov [rdi + 0x10], rbp
    mov [rdi + 0x18], r12
    mov [rdi + 0x20], r13
    mov [rdi + 0x28], r14
    mov [rdi + 0x30], r15

    // --- Switch Point ---

    mov rsp, [rsi + 0x00]
    mov rbx, [rsi + 0x08]
    mov rbp, [rsi + 0x10]
    mov r12, [rsi + 0x18]
    mov r13, [rsi + 0x20]
    mov r14, [rsi + 0x28]
    mov r15, [rsi + 0x30]
    ret

.p2align 4
.global bobina_thread_root
bobina_thread_root:
    mov rdi, rbx
    call r12

    mov rdi, rbx
    mov rsi, r14
    call r13

    mov rdi, rbx
    call r15
    ud2
"#
);

extern "C" {
    fn bobina_switch_context(old: *mut MachineState, new: *const MachineState);
    fn bobina_thread_root();
}
