//! Bobina - núcleo de threads do kernel.
//!
//! Ponto central de exportação dos módulos.
//! Uma CPU lógica, escalonamento FIFO não-preemptivo, troca de contexto
//! síncrona e destruição adiada de threads.

#![cfg_attr(target_os = "none", no_std)]

// Habilitar alocação dinâmica (necessário para Vec/Box/Arc)
extern crate alloc;

// --- Módulos de Baixo Nível (Hardware) ---
pub mod arch; // HAL (Interrupções, Troca de Contexto, Simulador)
pub mod drivers; // Saída serial dos logs

// --- Módulos Centrais ---
pub mod core; // Logging e trace
pub mod mm; // Stacks de kernel
pub mod sys; // Tipos e Erros

// --- Subsistemas ---
pub mod sched; // Escalonador, TCB e protocolo join/exit

pub use crate::sched::{HaltPolicy, Kernel, Platform, SchedConfig, ThreadState};
pub use crate::sys::{Pid, ThreadError};
