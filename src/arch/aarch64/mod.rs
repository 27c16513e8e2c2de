//! Implementação aarch64 (AAPCS64)

pub mod switch;

pub use switch::{switch, thread_root, MachineState};
