//! Quadro de partida de uma thread nova.
//!
//! Toda arquitetura sintetiza, a partir deste quadro, um estado de máquina
//! que ao ser carregado pela troca de contexto cai no trampolim
//! `thread_root`. O trampolim executa, nesta ordem:
//!
//! 1. `startup_pc(context)`
//! 2. `initial_pc(context, initial_arg)`
//! 3. `when_done_pc(context)` (não retorna)
//!
//! Os três são endereços de funções `extern "C"`.

/// Slots lidos pelo trampolim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadStart {
    /// Primeiro argumento passado aos três procedimentos.
    pub context: usize,
    pub startup_pc: usize,
    pub initial_pc: usize,
    pub initial_arg: usize,
    pub when_done_pc: usize,
}
