//! Traits do Hardware Abstraction Layer (HAL).
//! Interfaces que o escalonador usa para falar com o controlador de interrupções.

pub mod context;
pub mod cpu;

pub use context::ThreadStart;
pub use cpu::{IntLevel, InterruptController, InterruptGuard, SharedInterrupts};
