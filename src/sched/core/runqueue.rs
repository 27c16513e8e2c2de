//! Fila de threads prontas

use crate::sys::Pid;
use alloc::collections::VecDeque;

/// Fila de execução FIFO. Guarda pids; os TCBs ficam na tabela do
/// escalonador.
#[derive(Debug, Default)]
pub struct RunQueue {
    queue: VecDeque<Pid>,
}

impl RunQueue {
    pub const fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Adiciona no fim
    pub fn push(&mut self, pid: Pid) {
        self.queue.push_back(pid);
    }

    /// Remove a próxima (FIFO)
    pub fn pop(&mut self) -> Option<Pid> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn contains(&self, pid: Pid) -> bool {
        self.queue.contains(&pid)
    }

    pub fn iter(&self) -> impl Iterator<Item = Pid> + '_ {
        self.queue.iter().copied()
    }
}
