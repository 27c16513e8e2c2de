//! Boot, create/fork, yield, sleep e finish

use super::{log, rig, rig_with, take, test_config, Log};
use crate::arch::{IntLevel, InterruptController};
use crate::mm::HeapStackAllocator;
use crate::sched::{HaltPolicy, Kernel, SchedConfig, ThreadState};
use crate::sys::{Pid, ThreadError};
use alloc::sync::Arc;
use spin::Mutex;

extern "C" fn noop(_kernel: &Kernel, _arg: usize) {}

extern "C" fn observe_state(kernel: &Kernel, arg: usize) {
    // SAFETY: arg veio de Arc::into_raw no teste
    let seen = unsafe { Arc::from_raw(arg as *const Mutex<Vec<Option<ThreadState>>>) };
    seen.lock().push(kernel.state_of(kernel.current()));
}

#[test]
fn boot_adota_a_thread_raiz() {
    let rig = rig();
    let k: &Kernel = &rig.kernel;
    assert_eq!(k.current(), Pid::ROOT);
    assert_eq!(k.current_ppid(), None);
    assert_eq!(k.state_of(Pid::ROOT), Some(ThreadState::Running));
    assert_eq!(k.thread_count(), 1);
    assert_eq!(rig.irq.level(), IntLevel::On);
    assert_eq!(
        k.with_thread(Pid::ROOT, |t| t.name().to_string()),
        Some("main".to_string())
    );
    assert_eq!(k.with_thread(Pid::ROOT, |t| t.owns_stack()), Some(false));
}

#[test]
#[should_panic(expected = "abaixo do mínimo")]
fn boot_recusa_stack_pequena() {
    rig_with(
        test_config().with_stack_words(16),
        HeapStackAllocator::new(),
    );
}

#[test]
fn create_atribui_pids_e_pai() {
    let rig = rig();
    let k: &Kernel = &rig.kernel;
    let a = k.create("a").unwrap();
    let b = k.create("b").unwrap();

    assert_eq!(a, Pid::new(2));
    assert_eq!(b, Pid::new(3));
    assert_eq!(k.with_thread(a, |t| t.ppid()), Some(Some(Pid::ROOT)));
    assert_eq!(k.state_of(a), Some(ThreadState::Created));
    assert_eq!(k.with_thread(Pid::ROOT, |t| t.children().len()), Some(2));
    assert_eq!(k.search_child(b), Some(1));
    assert_eq!(rig.stacks.live(), 0);
}

#[test]
fn thread_que_retorna_na_hora_e_destruida() {
    let rig = rig();
    let k: &Kernel = &rig.kernel;
    let seen: Log<Option<ThreadState>> = log();

    let pid = k.create("curta").unwrap();
    assert_eq!(k.state_of(pid), Some(ThreadState::Created));

    k.fork(pid, observe_state, Arc::into_raw(seen.clone()) as usize)
        .unwrap();
    assert_eq!(k.state_of(pid), Some(ThreadState::Ready));
    assert_eq!(rig.stacks.live(), 1);

    let local = core::hint::black_box(0x5eed_u64);
    k.yield_cpu();

    assert_eq!(take(&seen), vec![Some(ThreadState::Running)]);
    assert_eq!(k.state_of(pid), None);
    assert_eq!(k.pending_destruction(), None);
    assert_eq!(rig.stacks.live(), 0);
    assert_eq!(rig.stacks.released(), 1);
    assert_eq!(k.current(), Pid::ROOT);
    assert_eq!(k.state_of(Pid::ROOT), Some(ThreadState::Running));
    assert_eq!(k.context_switches(), 2);
    assert_eq!(local, 0x5eed);
    assert_eq!(rig.irq.level(), IntLevel::On);
}

#[test]
fn yield_sem_prontas_retorna_na_hora() {
    let rig = rig();
    let k: &Kernel = &rig.kernel;

    k.yield_cpu();
    assert_eq!(k.context_switches(), 0);
    assert_eq!(rig.irq.level(), IntLevel::On);

    {
        let _irq = k.interrupts_off();
        k.yield_cpu();
        assert_eq!(rig.irq.level(), IntLevel::Off);
    }
    assert_eq!(rig.irq.level(), IntLevel::On);
}

#[test]
fn yield_intercala_em_ordem_fifo() {
    let rig = rig();
    let k: &Kernel = &rig.kernel;
    let trail: Log<(u32, usize)> = log();
    let running: Log<usize> = log();

    for id in 1..=2 {
        let t = trail.clone();
        let r = running.clone();
        k.spawn("worker", move |k| {
            for round in 0..3 {
                t.lock().push((id, round));
                r.lock().push(k.running_count());
                k.yield_cpu();
            }
        })
        .unwrap();
    }

    for round in 0..3 {
        trail.lock().push((0, round));
        running.lock().push(k.running_count());
        k.yield_cpu();
    }
    // Os dois workers ainda precisam sair do último yield
    k.yield_cpu();

    assert_eq!(
        take(&trail),
        vec![
            (0, 0),
            (1, 0),
            (2, 0),
            (0, 1),
            (1, 1),
            (2, 1),
            (0, 2),
            (1, 2),
            (2, 2)
        ]
    );
    assert!(take(&running).iter().all(|&n| n == 1));
    assert_eq!(k.thread_count(), 1);
    assert_eq!(rig.stacks.live(), 0);
    assert_eq!(rig.stacks.released(), 2);
    assert_eq!(
        k.with_thread(Pid::ROOT, |t| t.accounting().dispatches),
        Some(4)
    );
}

#[test]
fn sleep_sem_prontas_espera_interrupcao() {
    let rig = rig();
    let k: &Kernel = &rig.kernel;
    rig.irq
        .schedule(50, "timer", |k| k.move_to_ready(Pid::ROOT));

    {
        let _irq = k.interrupts_off();
        k.sleep();
    }

    assert!(rig.irq.ticks() >= 50);
    assert_eq!(rig.irq.serviced(), 1);
    assert_eq!(rig.irq.idle_count(), 1);
    assert_eq!(k.state_of(Pid::ROOT), Some(ThreadState::Running));
    assert_eq!(k.context_switches(), 0);
    assert_eq!(rig.irq.level(), IntLevel::On);
}

#[test]
fn interrupcao_durante_idle_acorda_outra_thread() {
    let rig = rig();
    let k: &Kernel = &rig.kernel;
    let order = log();

    let o = order.clone();
    let a = k
        .spawn("a", move |k| {
            o.lock().push("a dorme");
            k.sleep_on(1);
            o.lock().push("a acordou");
            let _irq = k.interrupts_off();
            k.move_to_ready(Pid::ROOT);
        })
        .unwrap();
    k.yield_cpu();

    let o = order.clone();
    rig.irq.schedule(10, "disco", move |k| {
        o.lock().push("interrupção");
        k.wake_sleeping(1);
    });

    {
        let _irq = k.interrupts_off();
        order.lock().push("raiz dorme");
        k.sleep();
    }
    order.lock().push("raiz acordou");

    assert_eq!(
        take(&order),
        vec!["a dorme", "raiz dorme", "interrupção", "a acordou", "raiz acordou"]
    );
    assert_eq!(k.state_of(a), None);
    assert_eq!(rig.stacks.live(), 0);
}

#[test]
#[should_panic(expected = "sleep exige interrupções desligadas")]
fn sleep_com_interrupcoes_ligadas_e_fatal() {
    let rig = rig();
    rig.kernel.sleep();
}

#[test]
#[should_panic(expected = "halt")]
fn finish_sem_filhos_para_a_maquina() {
    let rig = rig_with(
        SchedConfig::new().with_stack_words(8 * 1024),
        HeapStackAllocator::new(),
    );
    assert_eq!(rig.kernel.config().halt_policy, HaltPolicy::WhenChildless);
    rig.kernel.finish();
}

#[test]
fn fork_sem_memoria_para_stack() {
    let rig = rig_with(test_config(), HeapStackAllocator::with_limit(0));
    let k: &Kernel = &rig.kernel;
    let words = k.config().stack_words;

    let pid = k.create("sem stack").unwrap();
    assert_eq!(
        k.fork(pid, noop, 0),
        Err(ThreadError::StackExhausted { words })
    );
    assert_eq!(k.state_of(pid), Some(ThreadState::Created));

    assert_eq!(
        k.spawn("closure", |_| {}).err(),
        Some(ThreadError::StackExhausted { words })
    );
    assert_eq!(k.thread_count(), 2);
    assert_eq!(k.with_thread(Pid::ROOT, |t| t.children().len()), Some(1));
}

#[test]
fn fork_de_thread_inexistente_devolve_a_stack() {
    let rig = rig();
    let k: &Kernel = &rig.kernel;
    let ghost = Pid::new(99);
    assert_eq!(k.fork(ghost, noop, 0), Err(ThreadError::NoSuchThread(ghost)));
    assert_eq!(rig.stacks.live(), 0);
    assert_eq!(rig.stacks.released(), 1);
}

#[test]
#[should_panic(expected = "fencepost")]
fn overflow_na_stack_de_thread_e_fatal() {
    let rig = rig();
    let k: &Kernel = &rig.kernel;
    let pid = k.create("x").unwrap();
    k.fork(pid, noop, 0).unwrap();
    k.with_thread(pid, |t| {
        if let Some(stack) = t.stack() {
            // SAFETY: a thread nunca executou; a região é só nossa
            unsafe { stack.base().as_ptr().write(0) };
        }
    });
    k.with_thread(pid, |t| t.check_overflow());
}

#[test]
fn thread_raiz_passa_na_verificacao_de_stack() {
    let rig = rig();
    rig.kernel.check_stack_overflow();
}

#[test]
fn contagem_de_instrucoes_e_por_thread() {
    let rig = rig();
    let k: &Kernel = &rig.kernel;
    let counts = log();

    for _ in 0..3 {
        k.inc_instruction_count();
    }
    let c = counts.clone();
    k.spawn("contador", move |k| {
        c.lock().push(k.instruction_count());
        k.inc_instruction_count();
        c.lock().push(k.instruction_count());
    })
    .unwrap();
    k.yield_cpu();

    assert_eq!(k.instruction_count(), 3);
    assert_eq!(take(&counts), vec![0, 1]);
}
