//! Core Module
//!
//! Infraestrutura de diagnóstico independente de arquitetura: macros de log
//! com filtro em tempo de compilação e flags de trace por subsistema.

pub mod logging;
pub mod trace;

#[cfg(test)]
mod test;
