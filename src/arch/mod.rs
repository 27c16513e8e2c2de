//! # Hardware Abstraction Layer (HAL)
//!
//! O módulo `arch` é a única ponte entre o escalonador e o hardware.
//! Duas coisas moram aqui:
//!
//! - **Troca de contexto:** `MachineState`, `switch` e o trampolim
//!   `thread_root`, em assembly por arquitetura (`x86_64/`, `aarch64/`).
//! - **Controle de interrupções:** a trait `InterruptController`
//!   (em `traits/`), implementada pela CPU real em bare metal e pelo
//!   simulador (`sim/`) quando hospedado.
//!
//! Alvos suportados: x86_64 e aarch64, ELF (bare metal ou Linux).

pub mod traits;

// Seleção de Arquitetura
#[cfg(target_arch = "x86_64")]
pub mod x86_64;

#[cfg(target_arch = "x86_64")]
pub use self::x86_64 as platform;

#[cfg(target_arch = "aarch64")]
pub mod aarch64;

#[cfg(target_arch = "aarch64")]
pub use self::aarch64 as platform;

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
compile_error!("bobina: arquitetura sem troca de contexto (suportadas: x86_64, aarch64)");

#[cfg(not(any(target_os = "none", target_os = "linux")))]
compile_error!("bobina: apenas alvos ELF (bare metal ou linux)");

// Plataforma simulada (hospedado)
#[cfg(not(target_os = "none"))]
pub mod sim;

pub use platform::{switch, thread_root, MachineState};
pub use traits::*;

#[cfg(test)]
mod test;
