//! Controlador de interrupções simulado.
//!
//! Guarda o nível como um flag e mantém uma agenda de interrupções futuras,
//! cada uma com um instante (em ticks) e um tratador. Quando o escalonador
//! fica sem threads prontas, `idle` avança o relógio até a interrupção mais
//! próxima e a executa com interrupções desligadas.

use crate::arch::traits::{IntLevel, InterruptController};
use crate::core::trace::TraceFlags;
use crate::sched::Kernel;
use alloc::boxed::Box;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use spin::Mutex;

type Handler = Box<dyn FnOnce(&Kernel) + Send>;

struct PendingInterrupt {
    when: u64,
    seq: u64,
    name: &'static str,
    handler: Handler,
}

pub struct SimulatedInterrupts {
    enabled: AtomicBool,
    ticks: AtomicU64,
    next_seq: AtomicU64,
    serviced: AtomicU64,
    idles: AtomicU64,
    pending: Mutex<Vec<PendingInterrupt>>,
}

impl SimulatedInterrupts {
    /// Começa com interrupções desligadas, como a CPU no boot.
    pub const fn new() -> Self {
        Self {
            enabled: AtomicBool::new(false),
            ticks: AtomicU64::new(0),
            next_seq: AtomicU64::new(0),
            serviced: AtomicU64::new(0),
            idles: AtomicU64::new(0),
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Agenda `handler` para daqui a `delay` ticks.
    ///
    /// Interrupções com o mesmo instante são atendidas na ordem de agendamento.
    pub fn schedule<F>(&self, delay: u64, name: &'static str, handler: F)
    where
        F: FnOnce(&Kernel) + Send + 'static,
    {
        let when = self.ticks().saturating_add(delay);
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        crate::kdbg!(
            TraceFlags::INTERRUPT,
            "(Sim) Agendando ",
            name,
            " para tick ",
            when
        );
        self.pending.lock().push(PendingInterrupt {
            when,
            seq,
            name,
            handler: Box::new(handler),
        });
    }

    /// Relógio simulado.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    pub fn pending(&self) -> usize {
        self.pending.lock().len()
    }

    /// Quantas interrupções já foram atendidas.
    pub fn serviced(&self) -> u64 {
        self.serviced.load(Ordering::Relaxed)
    }

    /// Quantas vezes o escalonador ficou ocioso.
    pub fn idle_count(&self) -> u64 {
        self.idles.load(Ordering::Relaxed)
    }

    /// Avança o relógio em `ticks`, atendendo tudo que vencer no caminho.
    pub fn advance(&self, kernel: &Kernel, ticks: u64) {
        let target = self.ticks().saturating_add(ticks);
        while let Some(next) = self.take_next(Some(target)) {
            self.service(kernel, next);
        }
        self.ticks.fetch_max(target, Ordering::Relaxed);
    }

    /// Remove a interrupção mais próxima (instante, depois ordem de chegada).
    fn take_next(&self, due_by: Option<u64>) -> Option<PendingInterrupt> {
        let mut pending = self.pending.lock();
        let index = pending
            .iter()
            .enumerate()
            .filter(|(_, p)| due_by.map_or(true, |limit| p.when <= limit))
            .min_by_key(|(_, p)| (p.when, p.seq))
            .map(|(i, _)| i)?;
        Some(pending.remove(index))
    }

    /// Executa o tratador fora do lock da agenda, com interrupções desligadas.
    fn service(&self, kernel: &Kernel, interrupt: PendingInterrupt) {
        self.ticks.fetch_max(interrupt.when, Ordering::Relaxed);
        crate::kdbg!(
            TraceFlags::INTERRUPT,
            "(Sim) Interrupção ",
            interrupt.name,
            " no tick ",
            interrupt.when
        );
        let previous = self.set_level(IntLevel::Off);
        (interrupt.handler)(kernel);
        self.set_level(previous);
        self.serviced.fetch_add(1, Ordering::Relaxed);
    }
}

impl Default for SimulatedInterrupts {
    fn default() -> Self {
        Self::new()
    }
}

impl InterruptController for SimulatedInterrupts {
    fn set_level(&self, level: IntLevel) -> IntLevel {
        let was = self.enabled.swap(level == IntLevel::On, Ordering::SeqCst);
        if was {
            IntLevel::On
        } else {
            IntLevel::Off
        }
    }

    fn level(&self) -> IntLevel {
        if self.enabled.load(Ordering::SeqCst) {
            IntLevel::On
        } else {
            IntLevel::Off
        }
    }

    fn idle(&self, kernel: &Kernel) {
        self.idles.fetch_add(1, Ordering::Relaxed);
        match self.take_next(None) {
            Some(next) => self.service(kernel, next),
            None => {
                crate::kerror!("(Sim) Nenhuma thread pronta e nenhuma interrupção pendente");
                self.halt()
            }
        }
    }

    fn halt(&self) -> ! {
        crate::kinfo!("(Sim) Machine halting! Ticks: ", self.ticks());
        panic!("máquina parada (halt) no tick {}", self.ticks());
    }
}
