//! Flags de trace por subsistema
//!
//! Filtro em runtime para `kdbg!`. Cada flag tem a letra usada na linha de
//! comando de debug (`-d ts` liga THREAD e SCHED).

use bitflags::bitflags;
use core::sync::atomic::{AtomicU32, Ordering};

bitflags! {
    /// Subsistemas que podem ser rastreados individualmente.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TraceFlags: u32 {
        /// 't' - ciclo de vida das threads (fork, yield, sleep, finish)
        const THREAD = 1 << 0;
        /// 's' - filas do escalonador
        const SCHED = 1 << 1;
        /// 'c' - troca de contexto
        const SWITCH = 1 << 2;
        /// 'i' - interrupções e idle
        const INTERRUPT = 1 << 3;
        /// 'p' - protocolo join/exit entre pai e filho
        const PROCESS = 1 << 4;
        /// 'u' - estado de usuário e espaço de endereçamento
        const USER = 1 << 5;
    }
}

impl TraceFlags {
    /// Converte a string de letras de debug em flags. `+` liga todas.
    /// Letras desconhecidas são ignoradas.
    pub fn from_letters(letters: &str) -> Self {
        let mut flags = Self::empty();
        for c in letters.chars() {
            flags |= match c {
                '+' => Self::all(),
                't' => Self::THREAD,
                's' => Self::SCHED,
                'c' => Self::SWITCH,
                'i' => Self::INTERRUPT,
                'p' => Self::PROCESS,
                'u' => Self::USER,
                _ => Self::empty(),
            };
        }
        flags
    }
}

/// Flags ativas (global: o trace é um recurso da máquina, não do escalonador)
static ENABLED: AtomicU32 = AtomicU32::new(0);

/// Liga as flags dadas, mantendo as já ativas.
pub fn enable(flags: TraceFlags) {
    ENABLED.fetch_or(flags.bits(), Ordering::Relaxed);
}

/// Desliga as flags dadas.
pub fn disable(flags: TraceFlags) {
    ENABLED.fetch_and(!flags.bits(), Ordering::Relaxed);
}

/// Flags ativas no momento.
pub fn enabled() -> TraceFlags {
    TraceFlags::from_bits_truncate(ENABLED.load(Ordering::Relaxed))
}

/// Verdadeiro se alguma das flags pedidas está ativa.
#[inline]
pub fn is_enabled(flags: TraceFlags) -> bool {
    enabled().intersects(flags)
}
