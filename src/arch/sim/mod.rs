//! Plataforma simulada para execução hospedada (testes e demo).
//!
//! A troca de contexto é a real da arquitetura; só o controlador de
//! interrupções e a máquina de usuário são simulados.

pub mod interrupts;
#[cfg(feature = "user_program")]
pub mod machine;

pub use interrupts::SimulatedInterrupts;
#[cfg(feature = "user_program")]
pub use machine::SimulatedMachine;
