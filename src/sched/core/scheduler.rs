//! Estado do escalonador e operações sobre as filas.
//!
//! Todas as operações públicas aqui exigem interrupções desligadas: numa CPU
//! lógica sem preempção é isso que garante que ninguém mais mexe nas filas.

use super::runqueue::RunQueue;
use super::sleep_queue::SleepQueue;
use crate::core::trace::TraceFlags;
use crate::sched::task::{Thread, ThreadState};
use crate::sched::Kernel;
use crate::sys::Pid;
use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::pin::Pin;

pub(crate) type PinnedThread = Pin<Box<Thread>>;

pub(crate) struct Scheduler {
    /// Todas as threads vivas, exceto a que aguarda destruição.
    pub(crate) threads: BTreeMap<Pid, PinnedThread>,
    pub(crate) ready: RunQueue,
    pub(crate) sleeping: SleepQueue,
    /// Thread em execução
    pub(crate) current: Pid,
    /// Thread que terminou e ainda executa (ou executou por último) na
    /// própria stack. Quem pousar na CPU depois a destrói.
    pub(crate) to_be_destroyed: Option<PinnedThread>,
    pub(crate) switches: u64,
}

impl Scheduler {
    pub(crate) fn new(threads: BTreeMap<Pid, PinnedThread>, current: Pid) -> Self {
        Self {
            threads,
            ready: RunQueue::new(),
            sleeping: SleepQueue::new(),
            current,
            to_be_destroyed: None,
            switches: 0,
        }
    }

    /// TCB de `pid`, incluindo a thread aguardando destruição.
    pub(crate) fn thread(&self, pid: Pid) -> Option<&Thread> {
        match self.threads.get(&pid) {
            Some(thread) => Some(&**thread),
            None => self
                .to_be_destroyed
                .as_deref()
                .filter(|thread| thread.pid() == pid),
        }
    }

    pub(crate) fn thread_mut(&mut self, pid: Pid) -> Option<&mut Thread> {
        let Scheduler {
            threads,
            to_be_destroyed,
            ..
        } = self;
        match threads.get_mut(&pid) {
            Some(thread) => Some(&mut **thread),
            None => to_be_destroyed
                .as_deref_mut()
                .filter(|thread| thread.pid() == pid),
        }
    }

    pub(crate) fn current_thread(&self) -> &Thread {
        let current = self.current;
        match self.thread(current) {
            Some(thread) => thread,
            None => panic!("thread atual {} não existe", current),
        }
    }

    pub(crate) fn current_thread_mut(&mut self) -> &mut Thread {
        let current = self.current;
        match self.thread_mut(current) {
            Some(thread) => thread,
            None => panic!("thread atual {} não existe", current),
        }
    }

    /// Marca `pid` como pronta e a põe no fim da fila.
    ///
    /// Só entram threads recém-criadas, bloqueadas ou a própria thread atual
    /// (yield). Acordar direto também tira a thread da lista de dormentes.
    pub(crate) fn make_ready(&mut self, pid: Pid) {
        let current = self.current;
        let Some(thread) = self.threads.get_mut(&pid) else {
            panic!("thread {} não existe para ir à fila de prontas", pid);
        };
        let state = thread.state();
        assert!(
            matches!(state, ThreadState::Created | ThreadState::Blocked)
                || (state == ThreadState::Running && pid == current),
            "thread {} no estado {} não pode ir à fila de prontas",
            pid,
            state.as_str()
        );
        crate::kdbg!(
            TraceFlags::SCHED,
            "(Sched) Putting thread on ready list: ",
            thread.name()
        );
        thread.set_state(ThreadState::Ready);

        if self.sleeping.remove(pid) > 0 {
            crate::kdbg!(TraceFlags::SCHED, "(Sched) Tirando ", pid, " da lista de dormentes");
        }
        self.ready.push(pid);
    }
}

// =============================================================================
// FILAS
// =============================================================================

impl Kernel {
    /// Marca `pid` como `Ready` e a coloca no fim da fila de prontas.
    pub fn move_to_ready(&self, pid: Pid) {
        self.assert_interrupts_off("move_to_ready");
        self.lock().make_ready(pid);
    }

    /// Remove e devolve a próxima thread pronta (FIFO).
    pub fn select_next(&self) -> Option<Pid> {
        self.assert_interrupts_off("select_next");
        let next = self.lock().ready.pop();
        if let Some(pid) = next {
            crate::kdbg!(TraceFlags::SCHED, "(Sched) Próxima thread: ", pid);
        }
        next
    }

    /// Registra `pid` na lista de dormentes sob `key`. Não bloqueia.
    pub fn add_to_sleeping(&self, pid: Pid, key: u64) {
        self.assert_interrupts_off("add_to_sleeping");
        crate::kdbg!(TraceFlags::SCHED, "(Sched) Dormente ", pid, " chave=", key);
        self.lock().sleeping.insert(pid, key);
    }

    /// Acorda todas as threads dormindo sob `key`, na ordem em que dormiram.
    /// Devolve quantas acordou.
    pub fn wake_sleeping(&self, key: u64) -> usize {
        self.assert_interrupts_off("wake_sleeping");
        let mut sched = self.lock();
        let woken = sched.sleeping.take_matching(key);
        let mut count = 0;
        for pid in woken {
            if sched.threads.contains_key(&pid) {
                sched.make_ready(pid);
                count += 1;
            } else {
                crate::kwarn!("(Sched) Dormente ", pid, " não existe mais");
            }
        }
        count
    }

    /// Pids na fila de prontas, na ordem de execução.
    pub fn ready_pids(&self) -> Vec<Pid> {
        self.lock().ready.iter().collect()
    }

    /// Entradas da lista de dormentes `(pid, chave)`.
    pub fn sleeping(&self) -> Vec<(Pid, u64)> {
        self.lock().sleeping.iter().collect()
    }
}
