//! Interface Abstrata do controle de interrupções (HAL).
//!
//! O escalonador só conhece dois níveis: ligadas ou desligadas. Toda seção
//! crítica do núcleo de threads roda com `IntLevel::Off`; é a única forma de
//! exclusão mútua numa CPU lógica sem preempção.

use crate::sched::Kernel;
use alloc::sync::Arc;

/// Nível de interrupção da CPU lógica.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntLevel {
    Off,
    On,
}

pub trait InterruptController: Send + Sync {
    /// Define o nível e devolve o anterior.
    fn set_level(&self, level: IntLevel) -> IntLevel;

    /// Nível atual.
    fn level(&self) -> IntLevel;

    /// Habilita interrupções (STI).
    fn enable(&self) {
        self.set_level(IntLevel::On);
    }

    /// Espera a próxima interrupção quando não há thread pronta.
    ///
    /// Chamado com interrupções desligadas e retorna com elas desligadas.
    /// O tratador que rodar aqui pode acordar threads via `Kernel`.
    fn idle(&self, kernel: &Kernel);

    /// Para a máquina. Nunca retorna.
    fn halt(&self) -> !;
}

pub type SharedInterrupts = Arc<dyn InterruptController>;

/// Desliga interrupções e restaura o nível anterior no drop.
#[must_use = "o nível anterior é restaurado quando o guard sai de escopo"]
pub struct InterruptGuard<'a> {
    controller: &'a dyn InterruptController,
    previous: IntLevel,
}

impl<'a> InterruptGuard<'a> {
    pub fn disable(controller: &'a dyn InterruptController) -> Self {
        let previous = controller.set_level(IntLevel::Off);
        Self {
            controller,
            previous,
        }
    }

    /// Nível que estava ativo antes do guard.
    pub fn previous(&self) -> IntLevel {
        self.previous
    }
}

impl Drop for InterruptGuard<'_> {
    fn drop(&mut self) {
        self.controller.set_level(self.previous);
    }
}
