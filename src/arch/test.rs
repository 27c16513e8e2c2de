//! Testes da HAL: troca de contexto crua e controlador simulado

use super::sim::SimulatedInterrupts;
use super::{switch, thread_root, IntLevel, InterruptController, InterruptGuard, MachineState};
use super::ThreadStart;
use crate::mm::{HeapStackAllocator, KernelStack, SharedStackAllocator};
use crate::sched::{HaltPolicy, Kernel, Platform, SchedConfig};
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::pin::Pin;
use core::ptr::{addr_of, addr_of_mut};

/// Par de contextos para exercitar `switch` sem escalonador.
struct Fiber {
    main: MachineState,
    fiber: MachineState,
    steps: Vec<&'static str>,
    arg: usize,
    resumes: usize,
}

extern "C" fn fiber_startup(ctx: usize) {
    // SAFETY: ctx aponta para o Fiber do teste, suspenso em switch
    let fiber = unsafe { &mut *(ctx as *mut Fiber) };
    fiber.steps.push("startup");
}

extern "C" fn fiber_body(ctx: usize, arg: usize) {
    let fiber = ctx as *mut Fiber;
    // SAFETY: idem; o acesso é sempre exclusivo porque só um lado executa
    unsafe {
        (*fiber).steps.push("body");
        (*fiber).arg = arg;
        loop {
            (*fiber).resumes += 1;
            switch(addr_of_mut!((*fiber).fiber), addr_of!((*fiber).main));
        }
    }
}

extern "C" fn fiber_done(_ctx: usize) -> ! {
    std::process::abort()
}

fn frame(ctx: usize, arg: usize) -> ThreadStart {
    ThreadStart {
        context: ctx,
        startup_pc: fiber_startup as extern "C" fn(usize) as usize,
        initial_pc: fiber_body as extern "C" fn(usize, usize) as usize,
        initial_arg: arg,
        when_done_pc: fiber_done as extern "C" fn(usize) -> ! as usize,
    }
}

fn stack() -> KernelStack {
    let shared: SharedStackAllocator = Arc::new(HeapStackAllocator::new());
    KernelStack::allocate(&shared, 4096).unwrap()
}

#[test]
fn contexto_novo_passa_pelo_trampolim() {
    let stack = stack();
    let ctx = Box::into_raw(Box::new(Fiber {
        main: MachineState::new(),
        fiber: MachineState::new(),
        steps: Vec::new(),
        arg: 0,
        resumes: 0,
    }));
    let start = frame(ctx as usize, 0xabcd);

    let fiber = unsafe {
        (*ctx).fiber = MachineState::synthesize(stack.top(), &start);
        for _ in 0..3 {
            switch(addr_of_mut!((*ctx).main), addr_of!((*ctx).fiber));
        }
        Box::from_raw(ctx)
    };

    assert_eq!(fiber.steps, vec!["startup", "body"]);
    assert_eq!(fiber.arg, 0xabcd);
    assert_eq!(fiber.resumes, 3);
    assert!(stack.fencepost_intact());
}

#[test]
fn estado_sintetizado_respeita_o_abi() {
    let stack = stack();
    let start = frame(0x1000, 7);
    let state = unsafe { MachineState::synthesize(stack.top(), &start) };
    let sp = state.stack_pointer();

    assert!(sp < stack.top());
    assert!(sp > stack.base().as_ptr() as usize);

    #[cfg(target_arch = "x86_64")]
    {
        // Depois do `ret`, RSP fica alinhado em 16
        assert_eq!((sp + 8) % 16, 0);
        assert_eq!(unsafe { *(sp as *const usize) }, thread_root());
        assert_eq!(state.rbx, 0x1000);
        assert_eq!(state.r13 as usize, start.initial_pc);
        assert_eq!(state.r14, 7);
        assert_eq!(state.rbp, 0);
    }

    #[cfg(target_arch = "aarch64")]
    {
        assert_eq!(sp % 16, 0);
        assert_eq!(state.link_register(), thread_root());
        assert_eq!(state.x[0], 0x1000);
        assert_eq!(state.x[3], 7);
    }
}

fn kernel_with(irq: &Arc<SimulatedInterrupts>) -> Pin<Box<Kernel>> {
    let platform = Platform::new(irq.clone(), Arc::new(HeapStackAllocator::new()));
    Kernel::boot(
        SchedConfig::new().with_halt_policy(HaltPolicy::Never),
        platform,
    )
}

#[test]
fn guard_restaura_o_nivel_anterior() {
    let irq = SimulatedInterrupts::new();
    assert_eq!(irq.level(), IntLevel::Off);
    irq.enable();
    {
        let guard = InterruptGuard::disable(&irq);
        assert_eq!(guard.previous(), IntLevel::On);
        assert_eq!(irq.level(), IntLevel::Off);
        {
            let inner = InterruptGuard::disable(&irq);
            assert_eq!(inner.previous(), IntLevel::Off);
        }
        assert_eq!(irq.level(), IntLevel::Off);
    }
    assert_eq!(irq.level(), IntLevel::On);
}

#[test]
fn interrupcoes_sao_atendidas_em_ordem_de_tempo() {
    let irq = Arc::new(SimulatedInterrupts::new());
    let kernel = kernel_with(&irq);
    let order = Arc::new(spin::Mutex::new(Vec::new()));

    for (delay, name) in [(30, "c"), (10, "a"), (30, "d"), (20, "b")] {
        let o = order.clone();
        irq.schedule(delay, name, move |_| o.lock().push(name));
    }
    assert_eq!(irq.pending(), 4);

    irq.advance(&kernel, 25);
    assert_eq!(*order.lock(), vec!["a", "b"]);
    assert_eq!(irq.ticks(), 25);

    irq.advance(&kernel, 100);
    assert_eq!(*order.lock(), vec!["a", "b", "c", "d"]);
    assert_eq!(irq.serviced(), 4);
    assert_eq!(irq.pending(), 0);
    assert_eq!(irq.ticks(), 125);
}

#[test]
fn tratador_executa_com_interrupcoes_desligadas() {
    let irq = Arc::new(SimulatedInterrupts::new());
    let kernel = kernel_with(&irq);
    let levels = Arc::new(spin::Mutex::new(Vec::new()));

    let l = levels.clone();
    let probe = irq.clone();
    irq.schedule(1, "probe", move |_| l.lock().push(probe.level()));
    irq.advance(&kernel, 1);

    assert_eq!(*levels.lock(), vec![IntLevel::Off]);
    assert_eq!(irq.level(), IntLevel::On);
}

#[test]
#[should_panic(expected = "halt")]
fn idle_sem_nada_pendente_para_a_maquina() {
    let irq = Arc::new(SimulatedInterrupts::new());
    let kernel = kernel_with(&irq);
    let _off = kernel.interrupts_off();
    irq.idle(&kernel);
}
