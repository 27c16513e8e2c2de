//! Núcleo do escalonador
//!
//! `Kernel` é o contexto de escalonamento: a tabela de threads, a fila de
//! prontas, a lista de dormentes, a thread atual e o slot de destruição
//! pendente, tudo atrás de um único lock. Quem segura o lock também está com
//! interrupções desligadas, e o lock nunca atravessa uma troca de contexto.

pub mod debug;
pub mod idle;
pub mod runqueue;
pub mod scheduler;
pub mod sleep_queue;
pub mod switch;

pub use runqueue::RunQueue;
pub(crate) use scheduler::Scheduler;
pub use sleep_queue::SleepQueue;

use crate::arch::{IntLevel, InterruptController, InterruptGuard, SharedInterrupts};
use crate::core::trace::TraceFlags;
use crate::mm::SharedStackAllocator;
#[cfg(feature = "user_program")]
use crate::sched::task::SharedMachine;
use crate::sched::config::{SchedConfig, MIN_STACK_WORDS};
use crate::sched::task::{Thread, ThreadState};
use crate::sys::Pid;
use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use core::marker::PhantomPinned;
use core::ops::{Deref, DerefMut};
use core::pin::Pin;
use core::sync::atomic::{AtomicU32, Ordering};
use spin::{Mutex, MutexGuard};

/// Serviços da máquina que o escalonador usa.
pub struct Platform {
    pub interrupts: SharedInterrupts,
    pub stacks: SharedStackAllocator,
    /// Máquina de usuário, quando há programas de usuário.
    #[cfg(feature = "user_program")]
    pub machine: Option<SharedMachine>,
}

impl Platform {
    pub fn new(interrupts: SharedInterrupts, stacks: SharedStackAllocator) -> Self {
        Self {
            interrupts,
            stacks,
            #[cfg(feature = "user_program")]
            machine: None,
        }
    }

    #[cfg(feature = "user_program")]
    pub fn with_machine(mut self, machine: SharedMachine) -> Self {
        self.machine = Some(machine);
        self
    }
}

/// Contexto de escalonamento de uma CPU lógica.
///
/// Criado por `Kernel::boot` já fixado na memória: as threads guardam o
/// endereço dele nos slots do trampolim.
pub struct Kernel {
    config: SchedConfig,
    platform: Platform,
    next_pid: AtomicU32,
    sched: Mutex<Scheduler>,
    _pin: PhantomPinned,
}

/// Lock do escalonador com interrupções desligadas.
///
/// Ordem dos campos importa: o lock é solto antes de o nível de interrupção
/// ser restaurado.
pub(crate) struct SchedGuard<'a> {
    inner: MutexGuard<'a, Scheduler>,
    _irq: InterruptGuard<'a>,
}

impl Deref for SchedGuard<'_> {
    type Target = Scheduler;

    fn deref(&self) -> &Scheduler {
        &self.inner
    }
}

impl DerefMut for SchedGuard<'_> {
    fn deref_mut(&mut self) -> &mut Scheduler {
        &mut self.inner
    }
}

impl Kernel {
    /// Inicializa o escalonador e adota o fluxo atual como a thread "main"
    /// (PID 1, sem pai). Habilita interrupções ao final.
    pub fn boot(config: SchedConfig, platform: Platform) -> Pin<Box<Kernel>> {
        crate::kinfo!("(Sched) Inicializando escalonador...");
        assert!(
            config.stack_words >= MIN_STACK_WORDS,
            "stack de {} palavras abaixo do mínimo {}",
            config.stack_words,
            MIN_STACK_WORDS
        );

        let root = Thread::adopt_boot("main", Pid::ROOT, config.max_children);
        let mut threads = BTreeMap::new();
        threads.insert(Pid::ROOT, Box::pin(root));

        let kernel = Box::pin(Kernel {
            config,
            platform,
            next_pid: AtomicU32::new(Pid::ROOT.as_u32() + 1),
            sched: Mutex::new(Scheduler::new(threads, Pid::ROOT)),
            _pin: PhantomPinned,
        });

        crate::kinfo!(
            "(Sched) Escalonador pronto. Thread raiz PID=",
            Pid::ROOT,
            " stack=",
            config.stack_words,
            " palavras"
        );
        kernel.interrupts().enable();
        kernel
    }

    /// Desliga o escalonador. Precisa executar numa thread sem stack própria
    /// (a thread de boot).
    pub fn shutdown(self: Pin<Box<Self>>) {
        let (current, owns_stack, live) = {
            let sched = self.lock();
            let thread = sched.current_thread();
            (thread.pid(), thread.owns_stack(), sched.threads.len())
        };
        assert!(
            !owns_stack,
            "shutdown chamado pela thread {} que executa numa stack do escalonador",
            current
        );
        crate::kinfo!(
            "(Sched) Shutdown. Threads vivas=",
            live,
            " trocas=",
            self.context_switches()
        );
        drop(self);
    }

    pub(crate) fn lock(&self) -> SchedGuard<'_> {
        let irq = InterruptGuard::disable(self.interrupts());
        SchedGuard {
            inner: self.sched.lock(),
            _irq: irq,
        }
    }

    pub(crate) fn allocate_pid(&self) -> Pid {
        Pid::new(self.next_pid.fetch_add(1, Ordering::Relaxed))
    }

    pub(crate) fn assert_interrupts_off(&self, op: &str) {
        assert_eq!(
            self.interrupts().level(),
            IntLevel::Off,
            "{} exige interrupções desligadas",
            op
        );
    }

    pub fn config(&self) -> &SchedConfig {
        &self.config
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    pub fn interrupts(&self) -> &dyn InterruptController {
        self.platform.interrupts.as_ref()
    }

    pub fn stacks(&self) -> &SharedStackAllocator {
        &self.platform.stacks
    }

    /// Desliga interrupções até o guard sair de escopo.
    pub fn interrupts_off(&self) -> InterruptGuard<'_> {
        InterruptGuard::disable(self.interrupts())
    }

    /// Pid da thread em execução.
    pub fn current(&self) -> Pid {
        self.lock().current
    }

    pub fn current_ppid(&self) -> Option<Pid> {
        self.lock().current_thread().ppid()
    }

    /// Estado de `pid`, ou `None` se a thread não existe mais.
    pub fn state_of(&self, pid: Pid) -> Option<ThreadState> {
        self.lock().thread(pid).map(Thread::state)
    }

    /// Executa `f` sobre o TCB de `pid` com o lock do escalonador.
    ///
    /// `f` não pode chamar operações do `Kernel`.
    pub fn with_thread<R>(&self, pid: Pid, f: impl FnOnce(&Thread) -> R) -> Option<R> {
        let sched = self.lock();
        sched.thread(pid).map(f)
    }

    /// Versão mutável de `with_thread`.
    pub fn with_thread_mut<R>(&self, pid: Pid, f: impl FnOnce(&mut Thread) -> R) -> Option<R> {
        let mut sched = self.lock();
        sched.thread_mut(pid).map(f)
    }

    pub fn thread_count(&self) -> usize {
        self.lock().threads.len()
    }

    /// Threads em `Running`. Fora de uma troca de contexto, sempre 1.
    pub fn running_count(&self) -> usize {
        self.lock()
            .threads
            .values()
            .filter(|t| t.state() == ThreadState::Running)
            .count()
    }

    /// Trocas de contexto efetivas desde o boot.
    pub fn context_switches(&self) -> u64 {
        self.lock().switches
    }

    /// Pid da thread aguardando destruição, se houver.
    pub fn pending_destruction(&self) -> Option<Pid> {
        self.lock().to_be_destroyed.as_ref().map(|t| t.pid())
    }
}

impl Drop for Kernel {
    fn drop(&mut self) {
        let sched = self.sched.get_mut();
        let current = sched.current;
        if let Some(thread) = sched.threads.remove(&current) {
            if thread.owns_stack() {
                // Estamos executando nessa stack
                crate::kerror!("(Sched) Kernel destruído pela thread ", current, ". Stack vazada");
                core::mem::forget(thread);
            }
        }
        crate::kdbg!(
            TraceFlags::SCHED,
            "(Sched) Liberando ",
            sched.threads.len(),
            " threads"
        );
    }
}
