//! # Escalonador e Threads de Kernel
//!
//! Uma CPU lógica, escalonamento FIFO sem preempção e troca de contexto
//! síncrona. Toda thread executa sobre uma stack alocada pelo escalonador (a
//! de boot usa a stack do boot) e termina em `finish`, que a deixa no slot de
//! destruição pendente até outra thread pousar na CPU.
//!
//! ## Organização
//! - `core/`: `Kernel`, fila de prontas, lista de dormentes, troca de
//!   contexto e ociosidade.
//! - `task/`: TCB, ciclo de vida (`create`, `fork`, `yield_cpu`, `sleep`,
//!   `finish`), protocolo pai/filho (`exit`, `join`) e estado de usuário.
//! - `config`: constantes e `SchedConfig`.
//!
//! ## Exclusão mútua
//! Não há preempção: a única concorrência vem dos tratadores de interrupção.
//! Toda seção crítica roda com interrupções desligadas, e o lock interno do
//! `Kernel` nunca é segurado durante uma troca de contexto ou durante o idle.

pub mod config;
pub mod core;
pub mod task;

pub use self::config::{HaltPolicy, SchedConfig};
pub use self::core::{Kernel, Platform};
pub use self::task::{Thread, ThreadEntry, ThreadState};
