//! Testes dos tipos e erros do sistema

use super::*;
use alloc::string::ToString;

#[test]
fn errno_vira_retorno_negativo_de_syscall() {
    assert_eq!(Errno::ECHILD.as_isize(), -10);
    assert_eq!(Errno::ESRCH.as_usize(), 3);
    assert_eq!(Errno::Success.as_isize(), 0);
}

#[test]
fn cada_erro_tem_errno_proprio() {
    assert_eq!(ThreadError::NoSuchThread(Pid(9)).errno(), Errno::ESRCH);
    assert_eq!(ThreadError::NoSuchChild(Pid(9)).errno(), Errno::ECHILD);
    assert_eq!(ThreadError::InvalidChildIndex(4).errno(), Errno::EINVAL);
    assert_eq!(
        ThreadError::ChildTableFull { capacity: 2 }.errno(),
        Errno::EAGAIN
    );
    assert_eq!(
        ThreadError::StackExhausted { words: 64 }.errno(),
        Errno::ENOMEM
    );
}

#[test]
fn mensagens_de_erro_citam_o_pid() {
    let msg = ThreadError::NoSuchChild(Pid(42)).to_string();
    assert!(msg.contains("42"));
}

#[test]
fn pid_raiz_e_o_primeiro() {
    assert!(Pid::ROOT.is_root());
    assert!(!Pid::new(2).is_root());
    assert_eq!(Pid::ROOT.as_u32(), 1);
}
