//! Contabilidade por thread
//!
//! Contadores simples mantidos pelo escalonador e pelo simulador de
//! instruções.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Accounting {
    /// Instruções de usuário executadas (incrementado pela máquina)
    pub instruction_count: u64,

    /// Quantas vezes a thread ganhou a CPU por troca de contexto
    pub dispatches: u64,
}

impl Accounting {
    pub const fn new() -> Self {
        Self {
            instruction_count: 0,
            dispatches: 0,
        }
    }

    pub fn tick_instruction(&mut self) {
        self.instruction_count = self.instruction_count.wrapping_add(1);
    }

    /// Registra que a thread acabou de ganhar a CPU
    pub fn dispatched(&mut self) {
        self.dispatches += 1;
    }
}
