//! Lista de dormentes
//!
//! Threads bloqueadas esperando por uma chave. Acordar uma chave move todas
//! as threads com essa chave para a fila de prontas, na ordem em que
//! dormiram.

use crate::sys::Pid;
use alloc::vec::Vec;

#[derive(Debug, Default)]
pub struct SleepQueue {
    entries: Vec<(Pid, u64)>,
}

impl SleepQueue {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn insert(&mut self, pid: Pid, key: u64) {
        self.entries.push((pid, key));
    }

    /// Remove e devolve, em ordem de inserção, todas as entradas de `key`.
    pub fn take_matching(&mut self, key: u64) -> Vec<Pid> {
        let mut woken = Vec::new();
        self.entries.retain(|&(pid, entry_key)| {
            if entry_key == key {
                woken.push(pid);
                false
            } else {
                true
            }
        });
        woken
    }

    /// Tira `pid` da lista, qualquer que seja a chave. Devolve quantas
    /// entradas removeu.
    pub fn remove(&mut self, pid: Pid) -> usize {
        let before = self.entries.len();
        self.entries.retain(|&(p, _)| p != pid);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, pid: Pid) -> bool {
        self.entries.iter().any(|&(p, _)| p == pid)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Pid, u64)> + '_ {
        self.entries.iter().copied()
    }
}
