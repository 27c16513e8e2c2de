//! Fila de prontas e lista de dormentes

use super::{log, rig, take};
use crate::sched::{Kernel, ThreadState};
use crate::sys::Pid;

#[test]
fn fila_de_prontas_e_fifo() {
    let rig = rig();
    let k: &Kernel = &rig.kernel;
    let a = k.create("a").unwrap();
    let b = k.create("b").unwrap();
    let c = k.create("c").unwrap();

    let _irq = k.interrupts_off();
    k.move_to_ready(a);
    k.move_to_ready(b);
    k.move_to_ready(c);
    assert_eq!(k.ready_pids(), vec![a, b, c]);
    assert_eq!(k.state_of(b), Some(ThreadState::Ready));

    assert_eq!(k.select_next(), Some(a));
    assert_eq!(k.select_next(), Some(b));
    assert_eq!(k.select_next(), Some(c));
    assert_eq!(k.select_next(), None);
}

#[test]
fn dormente_so_acorda_com_a_propria_chave() {
    let rig = rig();
    let k: &Kernel = &rig.kernel;
    let seen = log();

    let s = seen.clone();
    let sleeper = k
        .spawn("sleeper", move |k| {
            s.lock().push("dormindo");
            k.sleep_on(7);
            s.lock().push("acordou");
        })
        .unwrap();

    k.yield_cpu();
    assert_eq!(k.sleeping(), vec![(sleeper, 7)]);
    assert_eq!(k.state_of(sleeper), Some(ThreadState::Blocked));

    {
        let _irq = k.interrupts_off();
        assert_eq!(k.wake_sleeping(99), 0);
        assert_eq!(k.sleeping().len(), 1);
        assert_eq!(k.wake_sleeping(7), 1);
    }
    assert!(k.sleeping().is_empty());
    assert_eq!(k.state_of(sleeper), Some(ThreadState::Ready));
    assert_eq!(k.ready_pids(), vec![sleeper]);

    k.yield_cpu();
    assert_eq!(take(&seen), vec!["dormindo", "acordou"]);
    assert_eq!(k.state_of(sleeper), None);
    assert_eq!(rig.stacks.live(), 0);
}

#[test]
fn acordar_preserva_a_ordem_em_que_dormiram() {
    let rig = rig();
    let k: &Kernel = &rig.kernel;
    let a = k.create("a").unwrap();
    let b = k.create("b").unwrap();
    let c = k.create("c").unwrap();

    let _irq = k.interrupts_off();
    k.add_to_sleeping(b, 1);
    k.add_to_sleeping(c, 2);
    k.add_to_sleeping(a, 1);
    assert_eq!(k.wake_sleeping(1), 2);
    assert_eq!(k.ready_pids(), vec![b, a]);
    assert_eq!(k.sleeping(), vec![(c, 2)]);
}

#[test]
#[should_panic(expected = "interrupções desligadas")]
fn mover_para_prontas_com_interrupcoes_ligadas_e_fatal() {
    let rig = rig();
    let pid = rig.kernel.create("a").unwrap();
    rig.kernel.move_to_ready(pid);
}

#[test]
#[should_panic(expected = "interrupções desligadas")]
fn selecionar_com_interrupcoes_ligadas_e_fatal() {
    let rig = rig();
    rig.kernel.select_next();
}

#[test]
fn dump_com_todas_as_filas_ocupadas() {
    let rig = rig();
    let k: &Kernel = &rig.kernel;
    let a = k.create("a").unwrap();
    let b = k.create("b").unwrap();
    {
        let _irq = k.interrupts_off();
        k.move_to_ready(a);
        k.add_to_sleeping(b, 3);
    }
    k.print();
    k.dump_threads();
    assert_eq!(k.current(), Pid::ROOT);
}

#[test]
fn acordar_direto_tira_da_lista_de_dormentes() {
    let rig = rig();
    let k: &Kernel = &rig.kernel;
    let seen = log();

    let s = seen.clone();
    let sleeper = k
        .spawn("sleeper", move |k| {
            k.sleep_on(5);
            s.lock().push("acordou");
        })
        .unwrap();

    k.yield_cpu();
    assert_eq!(k.sleeping(), vec![(sleeper, 5)]);

    {
        let _irq = k.interrupts_off();
        k.move_to_ready(sleeper);
        assert!(k.sleeping().is_empty());
        assert_eq!(k.wake_sleeping(5), 0);
        assert_eq!(k.ready_pids(), vec![sleeper]);
    }

    k.yield_cpu();
    assert_eq!(take(&seen), vec!["acordou"]);
    assert_eq!(k.state_of(sleeper), None);
    assert!(k.ready_pids().is_empty());
    assert_eq!(rig.stacks.live(), 0);
}

#[test]
#[should_panic(expected = "não pode ir à fila de prontas")]
fn thread_pronta_nao_entra_duas_vezes_na_fila() {
    let rig = rig();
    let k: &Kernel = &rig.kernel;
    let a = k.create("a").unwrap();

    let _irq = k.interrupts_off();
    k.move_to_ready(a);
    k.move_to_ready(a);
}
