//! Implementação x86_64 do controle de interrupções (bare metal).
//!
//! # Segurança
//! Assume modo longo e Ring 0: cli/sti/hlt são privilegiadas.

use crate::arch::traits::{IntLevel, InterruptController};
use crate::sched::Kernel;
use core::arch::asm;

pub struct X64Interrupts;

impl X64Interrupts {
    pub const fn new() -> Self {
        Self
    }

    /// Verifica se as interrupções estão habilitadas (RFLAGS.IF).
    #[inline]
    fn are_enabled() -> bool {
        let rflags: u64;
        unsafe {
            asm!("pushfq; pop {}", out(reg) rflags, options(nomem, preserves_flags));
        }
        // Bit 9 é IF (Interrupt Flag)
        (rflags & (1 << 9)) != 0
    }
}

impl Default for X64Interrupts {
    fn default() -> Self {
        Self::new()
    }
}

impl InterruptController for X64Interrupts {
    fn set_level(&self, level: IntLevel) -> IntLevel {
        let previous = self.level();
        unsafe {
            match level {
                IntLevel::Off => asm!("cli", options(nomem, nostack, preserves_flags)),
                IntLevel::On => asm!("sti", options(nomem, nostack, preserves_flags)),
            }
        }
        previous
    }

    fn level(&self) -> IntLevel {
        if Self::are_enabled() {
            IntLevel::On
        } else {
            IntLevel::Off
        }
    }

    fn idle(&self, _kernel: &Kernel) {
        // sti;hlt é atômico: a interrupção não se perde entre as duas instruções
        unsafe {
            asm!("sti", "hlt", "cli");
        }
    }

    fn halt(&self) -> ! {
        crate::kinfo!("(Arch) Machine halting");
        unsafe {
            asm!("cli", options(nomem, nostack, preserves_flags));
        }
        loop {
            unsafe {
                asm!("hlt", options(nomem, nostack, preserves_flags));
            }
        }
    }
}
