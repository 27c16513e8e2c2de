//! # Drivers
//!
//! Apenas o necessário para diagnóstico: a porta serial que recebe os logs.
//! Em bare metal x86_64 é a COM1; no host os bytes vão para stderr.

pub mod serial; // UART 16550 - Logs
