//! Implementação x86_64

#[cfg(target_os = "none")]
pub mod cpu;
pub mod switch;

#[cfg(target_os = "none")]
pub use cpu::X64Interrupts;
pub use switch::{switch, thread_root, MachineState};
