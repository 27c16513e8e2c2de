//! # Memory Management (MM)
//!
//! O núcleo de threads só precisa de uma coisa da memória: stacks de kernel.
//!
//! | Módulo  | Responsabilidade |
//! |---------|------------------|
//! | `stack` | Contrato do alocador de stacks, alocador sobre o heap e `KernelStack` (RAII + fencepost). |
//!
//! O alocador é externo ao escalonador: quem faz o boot escolhe a implementação
//! e a entrega em `Platform`.

pub mod stack;

pub use stack::{HeapStackAllocator, KernelStack, SharedStackAllocator, StackAllocator};

#[cfg(test)]
mod test;
