// =============================================================================
// KERNEL LOGGING SYSTEM - ZERO OVERHEAD
// =============================================================================
//
// ARQUITETURA:
// - Usa features do Cargo para compile-time filtering
// - Com feature "no_logs", TODOS os macros viram expressões vazias
// - SEM core::fmt - cada parte da mensagem implementa `serial::Emit`
// - Escreve APENAS na serial (stderr quando hospedado)
//
// NÍVEIS DE LOG (do mais crítico ao menos):
// - ERROR: Erros fatais ou críticos
// - WARN:  Situações suspeitas mas recuperáveis
// - INFO:  Fluxo normal de execução
// - DEBUG: Informações de debugging
// - TRACE: Detalhes extremos (cada operação)
//
// COMO USAR:
//   kinfo!("(Sched) Inicializando...");            // Apenas string
//   kinfo!("(Sched) PID=", pid);                    // String + valor (decimal)
//   ktrace!("(Switch) RSP=", Hex(rsp));             // Hex explícito
//   kdbg!(TraceFlags::THREAD, "(Thread) Fork ", name, " PID=", pid);
//
// Strings saem como estão, inteiros em decimal, `Hex(v)` em hexadecimal.
//
// =============================================================================

// =============================================================================
// PREFIXOS COM CORES ANSI
// =============================================================================

pub const P_ERROR: &str = "\x1b[1;31m[ERRO]\x1b[0m ";
pub const P_WARN: &str = "\x1b[1;33m[WARN]\x1b[0m ";
pub const P_INFO: &str = "\x1b[32m[INFO]\x1b[0m ";
pub const P_DEBUG: &str = "\x1b[36m[DEBG]\x1b[0m ";
pub const P_TRACE: &str = "\x1b[35m[TRAC]\x1b[0m ";

// =============================================================================
// MACROS DE LOG - NÍVEL ERROR
// =============================================================================
//
// kerror! - Sempre ativo (exceto com no_logs)
// Usado para erros críticos que podem causar crash.
//

#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kerror {
    ($($part:expr),+ $(,)?) => {{
        $crate::drivers::serial::emit_str($crate::core::logging::P_ERROR);
        $($crate::drivers::serial::Emit::emit(&$part);)+
        $crate::drivers::serial::emit_nl();
    }};
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kerror {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE LOG - NÍVEL WARN
// =============================================================================
//
// kwarn! - Ativo exceto com no_logs
// Usado para situações suspeitas mas recuperáveis.
//

#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kwarn {
    ($($part:expr),+ $(,)?) => {{
        $crate::drivers::serial::emit_str($crate::core::logging::P_WARN);
        $($crate::drivers::serial::Emit::emit(&$part);)+
        $crate::drivers::serial::emit_nl();
    }};
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kwarn {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE LOG - NÍVEL INFO
// =============================================================================
//
// kinfo! - Ativo com log_info, log_debug ou log_trace
// Usado para eventos importantes do fluxo normal.
//

#[cfg(all(
    not(feature = "no_logs"),
    any(feature = "log_info", feature = "log_debug", feature = "log_trace")
))]
#[macro_export]
macro_rules! kinfo {
    ($($part:expr),+ $(,)?) => {{
        $crate::drivers::serial::emit_str($crate::core::logging::P_INFO);
        $($crate::drivers::serial::Emit::emit(&$part);)+
        $crate::drivers::serial::emit_nl();
    }};
}

#[cfg(not(all(
    not(feature = "no_logs"),
    any(feature = "log_info", feature = "log_debug", feature = "log_trace")
)))]
#[macro_export]
macro_rules! kinfo {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE LOG - NÍVEL DEBUG
// =============================================================================
//
// kdebug! - Ativo com log_debug ou log_trace
// Usado para informações de debugging.
//

#[cfg(all(
    not(feature = "no_logs"),
    any(feature = "log_debug", feature = "log_trace")
))]
#[macro_export]
macro_rules! kdebug {
    ($($part:expr),+ $(,)?) => {{
        $crate::drivers::serial::emit_str($crate::core::logging::P_DEBUG);
        $($crate::drivers::serial::Emit::emit(&$part);)+
        $crate::drivers::serial::emit_nl();
    }};
}

#[cfg(not(all(
    not(feature = "no_logs"),
    any(feature = "log_debug", feature = "log_trace")
)))]
#[macro_export]
macro_rules! kdebug {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE LOG - NÍVEL TRACE
// =============================================================================
//
// ktrace! - Ativo apenas com log_trace
// Usado para detalhes extremos de cada operação.
//

#[cfg(all(not(feature = "no_logs"), feature = "log_trace"))]
#[macro_export]
macro_rules! ktrace {
    ($($part:expr),+ $(,)?) => {{
        $crate::drivers::serial::emit_str($crate::core::logging::P_TRACE);
        $($crate::drivers::serial::Emit::emit(&$part);)+
        $crate::drivers::serial::emit_nl();
    }};
}

#[cfg(not(all(not(feature = "no_logs"), feature = "log_trace")))]
#[macro_export]
macro_rules! ktrace {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// TRACE FILTRADO POR SUBSISTEMA
// =============================================================================
//
// kdbg! - Compilado com log_debug ou log_trace e filtrado em runtime pelas
// flags ativas em `core::trace` (equivalente às flags de DEBUG por letra).
//

#[cfg(all(
    not(feature = "no_logs"),
    any(feature = "log_debug", feature = "log_trace")
))]
#[macro_export]
macro_rules! kdbg {
    ($flags:expr, $($part:expr),+ $(,)?) => {{
        if $crate::core::trace::is_enabled($flags) {
            $crate::drivers::serial::emit_str($crate::core::logging::P_DEBUG);
            $($crate::drivers::serial::Emit::emit(&$part);)+
            $crate::drivers::serial::emit_nl();
        }
    }};
}

#[cfg(not(all(
    not(feature = "no_logs"),
    any(feature = "log_debug", feature = "log_trace")
)))]
#[macro_export]
macro_rules! kdbg {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS AUXILIARES
// =============================================================================

/// klog! - Log genérico sem prefixo de nível e sem newline.
#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! klog {
    ($($part:expr),+ $(,)?) => {{
        $($crate::drivers::serial::Emit::emit(&$part);)+
    }};
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! klog {
    ($($t:tt)*) => {{}};
}

/// knl! - Emite apenas newline.
#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! knl {
    () => {{
        $crate::drivers::serial::emit_nl();
    }};
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! knl {
    () => {{}};
}

// =============================================================================
// MACROS DE STATUS (OK/FAIL)
// =============================================================================

/// kok! - Log de sucesso (prefixo verde [OK]).
#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kok {
    ($($part:expr),+ $(,)?) => {{
        $crate::drivers::serial::emit_str("\x1b[32m[OK]\x1b[0m ");
        $($crate::drivers::serial::Emit::emit(&$part);)+
        $crate::drivers::serial::emit_nl();
    }};
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kok {
    ($($t:tt)*) => {{}};
}

/// kfail! - Log de falha (prefixo vermelho [FAIL]).
#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kfail {
    ($($part:expr),+ $(,)?) => {{
        $crate::drivers::serial::emit_str("\x1b[1;31m[FAIL]\x1b[0m ");
        $($crate::drivers::serial::Emit::emit(&$part);)+
        $crate::drivers::serial::emit_nl();
    }};
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kfail {
    ($($t:tt)*) => {{}};
}
