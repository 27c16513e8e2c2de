//! Protocolo pai/filho: tabela de filhos, exit e join.
//!
//! Cada thread guarda uma tabela de tamanho limitado com os filhos que criou.
//! O filho publica o código de saída no slot dele (`exit`); o pai espera por
//! um slot (`join_child`). Quem chegar primeiro não perde nada: o código fica
//! guardado no slot até o pai ler, e o pai bloqueado é acordado pelo filho.

use super::entity::Thread;
use crate::core::trace::TraceFlags;
use crate::sched::config::HaltPolicy;
use crate::sched::core::Scheduler;
use crate::sched::Kernel;
use crate::sys::{Pid, ThreadError};
use alloc::vec::Vec;

/// Registro de um filho na tabela do pai.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildSlot {
    pub pid: Pid,
    pub exit_code: i32,
    /// O filho já publicou o código de saída.
    pub completed: bool,
}

/// Tabela de filhos de uma thread.
#[derive(Debug, Clone)]
pub struct ChildTable {
    slots: Vec<ChildSlot>,
    capacity: usize,
    /// Índice do slot pelo qual o dono está bloqueado em join.
    waiting_on: Option<usize>,
}

impl ChildTable {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::new(),
            capacity,
            waiting_on: None,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.capacity
    }

    /// Registra um filho novo e devolve o índice do slot.
    pub(crate) fn register(&mut self, pid: Pid) -> Result<usize, ThreadError> {
        if self.is_full() {
            return Err(ThreadError::ChildTableFull {
                capacity: self.capacity,
            });
        }
        self.slots.push(ChildSlot {
            pid,
            exit_code: 0,
            completed: false,
        });
        Ok(self.slots.len() - 1)
    }

    /// Busca linear pelo pid.
    pub fn search(&self, pid: Pid) -> Option<usize> {
        self.slots.iter().position(|slot| slot.pid == pid)
    }

    pub fn get(&self, index: usize) -> Option<&ChildSlot> {
        self.slots.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChildSlot> {
        self.slots.iter()
    }

    /// Grava o código de saída no slot do filho.
    pub(crate) fn record_exit(&mut self, pid: Pid, code: i32) -> Result<usize, ThreadError> {
        let index = self.search(pid).ok_or(ThreadError::NoSuchChild(pid))?;
        let slot = &mut self.slots[index];
        slot.exit_code = code;
        slot.completed = true;
        Ok(index)
    }

    /// Marca o slot do filho como concluído sem mexer no código de saída
    /// (0 se o filho não chamou `exit`).
    pub(crate) fn mark_finished(&mut self, pid: Pid) -> Option<usize> {
        let index = self.search(pid)?;
        self.slots[index].completed = true;
        Some(index)
    }

    pub fn waiting_on(&self) -> Option<usize> {
        self.waiting_on
    }

    pub(crate) fn wait_for(&mut self, index: usize) {
        self.waiting_on = Some(index);
    }

    /// Limpa o marcador se ele aponta para `index`. Devolve se limpou.
    pub(crate) fn release_wait(&mut self, index: usize) -> bool {
        if self.waiting_on == Some(index) {
            self.waiting_on = None;
            true
        } else {
            false
        }
    }

    /// Remove o slot de um filho que nunca chegou a executar.
    pub(crate) fn forget(&mut self, pid: Pid) {
        if let Some(index) = self.search(pid) {
            self.slots.remove(index);
        }
    }
}

/// Decide se a máquina para quando `thread` termina.
///
/// `live_threads` conta as threads vivas incluindo a que está terminando.
pub fn halts_on_finish(policy: HaltPolicy, thread: &Thread, live_threads: usize) -> bool {
    match policy {
        HaltPolicy::WhenChildless => thread.children().is_empty() || thread.ppid().is_none(),
        HaltPolicy::WhenLastThreadExits => live_threads <= 1,
        HaltPolicy::Never => false,
    }
}

impl Scheduler {
    /// Conclui o slot de `child` na tabela do pai e acorda o pai se ele está
    /// bloqueado em join nesse slot.
    pub(crate) fn wake_joining_parent(&mut self, child: Pid) -> bool {
        let Some(ppid) = self.thread(child).and_then(Thread::ppid) else {
            return false;
        };
        let Some(parent) = self.thread_mut(ppid) else {
            return false;
        };
        let Some(index) = parent.children_mut().mark_finished(child) else {
            return false;
        };
        if !parent.children_mut().release_wait(index) {
            return false;
        }
        crate::kdbg!(
            TraceFlags::PROCESS,
            "(Process) Acordando pai ",
            ppid,
            " que esperava por ",
            child
        );
        self.make_ready(ppid);
        true
    }
}

// =============================================================================
// EXIT / JOIN
// =============================================================================

impl Kernel {
    /// Publica `code` no slot de `child` dentro da tabela de `parent`.
    ///
    /// Se o pai estava bloqueado justamente nesse slot, volta para a fila de
    /// prontas.
    pub fn set_child_exit_code(
        &self,
        parent: Pid,
        child: Pid,
        code: i32,
    ) -> Result<(), ThreadError> {
        let mut sched = self.lock();
        let owner = sched
            .thread_mut(parent)
            .ok_or(ThreadError::NoSuchThread(parent))?;
        let index = owner.children_mut().record_exit(child, code)?;
        crate::kdbg!(
            TraceFlags::PROCESS,
            "(Process) Filho ",
            child,
            " de ",
            parent,
            " saiu com ",
            code
        );
        if owner.children_mut().release_wait(index) {
            sched.make_ready(parent);
        }
        Ok(())
    }

    /// Espera o filho no slot `index` da thread atual e devolve o código de
    /// saída. Retorna na hora se o filho já terminou.
    pub fn join_child(&self, index: usize) -> Result<i32, ThreadError> {
        let _irq = self.interrupts_off();

        let completed = {
            let mut sched = self.lock();
            let me = sched.current_thread_mut();
            let slot = *me
                .children()
                .get(index)
                .ok_or(ThreadError::InvalidChildIndex(index))?;
            if !slot.completed {
                me.children_mut().wait_for(index);
            }
            slot.completed
        };

        if !completed {
            crate::kdbg!(
                TraceFlags::PROCESS,
                "(Process) Join bloqueando no slot ",
                index
            );
            self.sleep();
        }

        let sched = self.lock();
        let slot = sched
            .current_thread()
            .children()
            .get(index)
            .copied()
            .ok_or(ThreadError::InvalidChildIndex(index))?;
        Ok(slot.exit_code)
    }

    /// Índice de `child` na tabela de filhos da thread atual.
    pub fn search_child(&self, child: Pid) -> Option<usize> {
        self.lock().current_thread().children().search(child)
    }

    /// `join_child` por pid.
    pub fn join(&self, child: Pid) -> Result<i32, ThreadError> {
        let index = self
            .search_child(child)
            .ok_or(ThreadError::NoSuchChild(child))?;
        self.join_child(index)
    }

    /// Publica o código de saída para o pai e termina a thread atual.
    pub fn exit(&self, code: i32) -> ! {
        let (me, parent) = {
            let sched = self.lock();
            let thread = sched.current_thread();
            (thread.pid(), thread.ppid())
        };
        crate::kdbg!(TraceFlags::PROCESS, "(Process) Exit ", me, " code=", code);

        if let Some(ppid) = parent {
            match self.set_child_exit_code(ppid, me, code) {
                Ok(()) => {}
                Err(ThreadError::NoSuchThread(_)) => {
                    crate::kdbg!(TraceFlags::PROCESS, "(Process) Pai ", ppid, " já terminou");
                }
                Err(_) => {
                    crate::kwarn!("(Process) Pai ", ppid, " não tem slot para ", me);
                }
            }
        }
        self.finish()
    }
}
