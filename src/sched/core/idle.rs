//! Ociosidade
//!
//! Sem thread pronta, a CPU espera interrupções até que algum tratador
//! coloque alguém na fila de prontas.

use crate::core::trace::TraceFlags;
use crate::sched::Kernel;
use crate::sys::Pid;

impl Kernel {
    /// Próxima thread pronta, esperando interrupções enquanto não houver.
    pub(crate) fn next_or_idle(&self) -> Pid {
        loop {
            if let Some(next) = self.select_next() {
                return next;
            }
            crate::kdbg!(
                TraceFlags::INTERRUPT,
                "(Idle) Nenhuma thread pronta. Aguardando interrupção"
            );
            self.interrupts().idle(self);
        }
    }
}
