//! Testes de logging e trace

use super::trace::{self, TraceFlags};
use crate::drivers::serial::{format_dec, format_hex, unsigned_as_dec, Hex};

#[test]
fn letras_de_debug_viram_flags() {
    assert_eq!(
        TraceFlags::from_letters("ts"),
        TraceFlags::THREAD | TraceFlags::SCHED
    );
    assert_eq!(TraceFlags::from_letters("+"), TraceFlags::all());
    assert_eq!(TraceFlags::from_letters("xyz"), TraceFlags::empty());
}

#[test]
fn enable_e_disable_controlam_o_filtro() {
    // USER é usada só por este teste; as demais flags podem estar ligadas
    // por testes paralelos.
    trace::disable(TraceFlags::USER);
    assert!(!trace::is_enabled(TraceFlags::USER));
    trace::enable(TraceFlags::USER);
    assert!(trace::is_enabled(TraceFlags::USER));
    assert!(trace::enabled().contains(TraceFlags::USER));
    trace::disable(TraceFlags::USER);
    assert!(!trace::is_enabled(TraceFlags::USER));
}

#[test]
fn hex_sempre_com_18_caracteres() {
    assert_eq!(&format_hex(0xdead_beef), b"0x00000000DEADBEEF");
    assert_eq!(&format_hex(0), b"0x0000000000000000");
}

#[test]
fn decimal_com_sinal() {
    let mut buf = [0u8; 20];
    let len = format_dec(-1234, &mut buf);
    assert_eq!(&buf[..len], b"-1234");
    let len = format_dec(0, &mut buf);
    assert_eq!(&buf[..len], b"0");
    let len = format_dec(i64::MIN, &mut buf);
    assert_eq!(&buf[..len], b"-9223372036854775808");
}

#[test]
fn macros_aceitam_partes_mistas() {
    let name = alloc::string::String::from("worker");
    crate::kinfo!("(Test) thread ", name, " pid=", 7u32, " sp=", Hex(0x1000));
    crate::kdbg!(TraceFlags::THREAD, "(Test) filtrado ", 3);
    crate::kok!("(Test) macros de log");
}

#[test]
fn usize_acima_de_i64_max_sai_em_hex() {
    assert_eq!(unsigned_as_dec(42), Some(42));
    assert_eq!(unsigned_as_dec(i64::MAX as u64), Some(i64::MAX));
    assert_eq!(unsigned_as_dec(usize::MAX as u64), None);
    crate::kinfo!("(Test) usize máximo ", usize::MAX);
}
