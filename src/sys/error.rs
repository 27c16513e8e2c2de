//! # Erros do núcleo de threads
//!
//! Violações de invariantes do escalonador são fatais (`panic!`): indicam uso
//! incorreto do protocolo e um estado de timeshare já corrompido. Apenas os
//! erros de chamadores externos viram `ThreadError`, que pode ser convertido
//! para `Errno` na fronteira de syscall.
//!
//! Segue o padrão POSIX/Linux. Valores negativos são usados em retornos de
//! syscalls (isize).

use core::fmt;

use super::types::Pid;

/// Subconjunto POSIX usado pelo núcleo de threads.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Errno {
    Success = 0,
    ESRCH = 3,   // No such process
    ECHILD = 10, // No child processes
    EAGAIN = 11, // Try again
    ENOMEM = 12, // Out of memory
    EINVAL = 22, // Invalid argument
}

impl Errno {
    pub fn as_usize(self) -> usize {
        self as usize
    }

    pub fn as_isize(self) -> isize {
        -(self as i32) as isize
    }
}

/// Erros recuperáveis das operações de thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadError {
    /// Nenhuma thread viva com esse pid.
    NoSuchThread(Pid),
    /// A busca linear na tabela de filhos não encontrou o pid.
    NoSuchChild(Pid),
    /// Índice fora da tabela de filhos.
    InvalidChildIndex(usize),
    /// A tabela de filhos do criador está cheia. A criação é rejeitada.
    ChildTableFull { capacity: usize },
    /// O alocador de stacks recusou o pedido.
    StackExhausted { words: usize },
}

impl ThreadError {
    /// Código POSIX equivalente, para devolver ao userspace.
    pub const fn errno(self) -> Errno {
        match self {
            Self::NoSuchThread(_) => Errno::ESRCH,
            Self::NoSuchChild(_) => Errno::ECHILD,
            Self::InvalidChildIndex(_) => Errno::EINVAL,
            Self::ChildTableFull { .. } => Errno::EAGAIN,
            Self::StackExhausted { .. } => Errno::ENOMEM,
        }
    }
}

impl fmt::Display for ThreadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSuchThread(pid) => write!(f, "thread {} não existe", pid),
            Self::NoSuchChild(pid) => write!(f, "pid {} não é filho desta thread", pid),
            Self::InvalidChildIndex(index) => {
                write!(f, "índice {} fora da tabela de filhos", index)
            }
            Self::ChildTableFull { capacity } => {
                write!(f, "tabela de filhos cheia (capacidade {})", capacity)
            }
            Self::StackExhausted { words } => {
                write!(f, "sem memória para stack de {} palavras", words)
            }
        }
    }
}
