//! Definições de Sistema.
//!
//! Tipos de identidade e códigos de erro compartilhados pelo núcleo de threads.

pub mod error;
pub mod types;

pub use error::{Errno, ThreadError};
pub use types::Pid;

#[cfg(test)]
mod test;
