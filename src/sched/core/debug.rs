//! Ferramentas de Debug para o Scheduler

use crate::sched::Kernel;

impl Kernel {
    /// Lista o conteúdo da fila de prontas.
    pub fn print(&self) {
        let sched = self.lock();
        crate::klog!("Ready list contents:");
        crate::knl!();
        for pid in sched.ready.iter() {
            if let Some(thread) = sched.thread(pid) {
                crate::klog!(thread.name(), ", ");
            }
        }
        crate::knl!();
    }

    /// Imprime o estado de todas as threads conhecidas.
    pub fn dump_threads(&self) {
        let sched = self.lock();
        crate::ktrace!("--- [TRACE] ESCALONADOR: LISTA COMPLETA ---");
        crate::ktrace!("  - Running PID: ", sched.current);

        for (pid, thread) in sched.threads.iter() {
            crate::ktrace!(
                "    -> PID: ",
                *pid,
                " ",
                thread.name(),
                " ",
                thread.state(),
                " filhos=",
                thread.children().len()
            );
        }

        crate::ktrace!("  - READY count: ", sched.ready.len());
        for pid in sched.ready.iter() {
            crate::ktrace!("    -> PID: ", pid);
        }

        crate::ktrace!("  - SLEEPING count: ", sched.sleeping.len());
        for (pid, key) in sched.sleeping.iter() {
            crate::ktrace!("    -> PID: ", pid, " chave=", key);
        }

        if let Some(dead) = &sched.to_be_destroyed {
            crate::ktrace!("  - Destruição pendente: ", dead.pid());
        }
        crate::ktrace!("--- [TRACE] FIM DO DUMP ---");
    }
}
