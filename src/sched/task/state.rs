//! Estados de thread

use crate::drivers::serial::{emit_str, Emit};

/// Estado de uma thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadState {
    /// Recém criada, ainda sem stack
    Created,
    /// Na fila de prontas (ou acabou de sair dela)
    Ready,
    /// Executando na CPU. No máximo uma por vez.
    Running,
    /// Esperando algo (join, lista de dormentes, interrupção)
    Blocked,
}

impl ThreadState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "JUST_CREATED",
            Self::Ready => "READY",
            Self::Running => "RUNNING",
            Self::Blocked => "BLOCKED",
        }
    }
}

impl Emit for ThreadState {
    fn emit(&self) {
        emit_str(self.as_str());
    }
}
