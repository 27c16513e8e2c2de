//! Troca de contexto entre threads
//!
//! `schedule_thread` entrega a CPU a outra thread e só retorna quando alguém
//! devolver a CPU para quem chamou. `land` é o que toda thread executa logo
//! depois de ganhar a CPU: destrói a thread pendente e restaura o estado de
//! usuário.

use crate::arch::{self, MachineState};
use crate::core::trace::TraceFlags;
use crate::sched::task::ThreadState;
use crate::sched::Kernel;
use crate::sys::Pid;

impl Kernel {
    /// Despacha `next`, que já saiu da fila de prontas.
    ///
    /// Exige interrupções desligadas. A thread atual precisa já ter deixado
    /// `Running` (pronta, bloqueada ou terminando). Se `next` é a própria
    /// thread atual, só volta a marcá-la como `Running`.
    pub fn schedule_thread(&self, next: Pid) {
        self.assert_interrupts_off("schedule_thread");

        let (old_ctx, new_ctx, prev) = {
            let mut sched = self.lock();
            let prev = sched.current;

            if prev == next {
                sched.current_thread_mut().set_state(ThreadState::Running);
                return;
            }

            #[cfg(feature = "user_program")]
            let machine = self.platform().machine.clone();

            let outgoing = sched.current_thread_mut();
            assert_ne!(
                outgoing.state(),
                ThreadState::Running,
                "a thread que sai ainda está Running"
            );
            #[cfg(feature = "user_program")]
            outgoing.save_on_switch(machine.as_ref());
            let old_ctx = outgoing.context_mut() as *mut MachineState;

            let Some(incoming) = sched.threads.get_mut(&next) else {
                panic!("escalonando thread {} que não existe", next);
            };
            incoming.set_state(ThreadState::Running);
            incoming.accounting_mut().dispatched();
            let new_ctx = incoming.context() as *const MachineState;

            sched.current = next;
            sched.switches += 1;
            (old_ctx, new_ctx, prev)
        };

        crate::kdbg!(
            TraceFlags::SWITCH,
            "(Switch) ",
            prev,
            " -> ",
            next
        );

        // SAFETY: os TCBs estão em Pin<Box> e nenhum dos dois pode ser
        // destruído antes de a próxima thread pousar. O lock já foi solto.
        unsafe { arch::switch(old_ctx, new_ctx) };

        self.land();
    }

    /// Executado por toda thread ao ganhar a CPU, com interrupções
    /// desligadas.
    pub(crate) fn land(&self) {
        let dead = {
            let mut sched = self.lock();
            let dead = sched.to_be_destroyed.take();
            if let Some(thread) = &dead {
                assert_ne!(
                    thread.pid(),
                    sched.current,
                    "destruindo a thread em execução"
                );
            }
            dead
        };

        if let Some(thread) = dead {
            crate::kdbg!(TraceFlags::THREAD, "(Thread) Deleting thread ", thread.name());
            drop(thread);
        }

        #[cfg(feature = "user_program")]
        self.restore_after_switch();
    }
}
