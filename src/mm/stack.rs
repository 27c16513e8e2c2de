//! Stacks de kernel
//!
//! Cada thread criada por `fork` possui exclusivamente uma região de stack.
//! A palavra mais baixa (a ponta que a stack nunca deveria alcançar, já que
//! ela cresce para baixo) guarda `STACK_FENCEPOST`. Se o valor mudar, houve
//! overflow.

use alloc::alloc::{alloc_zeroed, dealloc, Layout};
use alloc::sync::Arc;
use core::mem::size_of;
use core::ptr::NonNull;
use core::sync::atomic::{AtomicUsize, Ordering};

use volatile::VolatilePtr;

use crate::sched::config::STACK_FENCEPOST;
use crate::sys::ThreadError;

/// Alinhamento exigido pelas ABIs suportadas (SysV x86_64 e AAPCS64)
pub const STACK_ALIGN: usize = 16;

/// Capacidade externa de alocação de stacks, em palavras de máquina.
pub trait StackAllocator: Send + Sync {
    /// Reserva `words` palavras. `None` se não houver memória.
    fn acquire(&self, words: usize) -> Option<NonNull<usize>>;

    /// Devolve um bloco.
    ///
    /// # Safety
    /// `base` precisa ter vindo de `acquire(words)` neste mesmo alocador e
    /// ninguém pode estar executando sobre ele.
    unsafe fn release(&self, base: NonNull<usize>, words: usize);
}

pub type SharedStackAllocator = Arc<dyn StackAllocator>;

/// Alocador de stacks sobre o heap global, com limite opcional de stacks vivas.
pub struct HeapStackAllocator {
    limit: Option<usize>,
    live: AtomicUsize,
    acquired: AtomicUsize,
    released: AtomicUsize,
}

impl HeapStackAllocator {
    pub const fn new() -> Self {
        Self {
            limit: None,
            live: AtomicUsize::new(0),
            acquired: AtomicUsize::new(0),
            released: AtomicUsize::new(0),
        }
    }

    /// Recusa pedidos quando já existem `max_live` stacks vivas.
    pub const fn with_limit(max_live: usize) -> Self {
        Self {
            limit: Some(max_live),
            live: AtomicUsize::new(0),
            acquired: AtomicUsize::new(0),
            released: AtomicUsize::new(0),
        }
    }

    /// Stacks entregues e ainda não devolvidas.
    pub fn live(&self) -> usize {
        self.live.load(Ordering::Acquire)
    }

    /// Total de stacks entregues desde a criação.
    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::Acquire)
    }

    /// Total de stacks devolvidas desde a criação.
    pub fn released(&self) -> usize {
        self.released.load(Ordering::Acquire)
    }

    fn layout(words: usize) -> Option<Layout> {
        let bytes = words.checked_mul(size_of::<usize>())?;
        Layout::from_size_align(bytes, STACK_ALIGN).ok()
    }
}

impl Default for HeapStackAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl StackAllocator for HeapStackAllocator {
    fn acquire(&self, words: usize) -> Option<NonNull<usize>> {
        if words == 0 {
            return None;
        }
        if let Some(limit) = self.limit {
            if self.live() >= limit {
                crate::kwarn!("(Stack) Limite de stacks vivas atingido: ", limit);
                return None;
            }
        }

        let layout = Self::layout(words)?;
        // SAFETY: layout tem tamanho não-nulo
        let ptr = unsafe { alloc_zeroed(layout) } as *mut usize;
        let base = NonNull::new(ptr)?;

        self.live.fetch_add(1, Ordering::AcqRel);
        self.acquired.fetch_add(1, Ordering::AcqRel);
        Some(base)
    }

    unsafe fn release(&self, base: NonNull<usize>, words: usize) {
        // acquire nunca entrega um bloco sem layout válido
        let Some(layout) = Self::layout(words) else {
            panic!("devolvendo stack de {} palavras que não veio deste alocador", words);
        };
        dealloc(base.as_ptr() as *mut u8, layout);
        self.live.fetch_sub(1, Ordering::AcqRel);
        self.released.fetch_add(1, Ordering::AcqRel);
    }
}

/// Região de stack de uma thread. Devolvida ao alocador no drop.
pub struct KernelStack {
    base: NonNull<usize>,
    words: usize,
    allocator: SharedStackAllocator,
}

// SAFETY: a região pertence exclusivamente a esta KernelStack; o ponteiro
// não é compartilhado fora do TCB que a possui.
unsafe impl Send for KernelStack {}
unsafe impl Sync for KernelStack {}

impl KernelStack {
    /// Reserva a região e escreve o fencepost.
    pub fn allocate(allocator: &SharedStackAllocator, words: usize) -> Result<Self, ThreadError> {
        let base = allocator
            .acquire(words)
            .ok_or(ThreadError::StackExhausted { words })?;

        let stack = Self {
            base,
            words,
            allocator: Arc::clone(allocator),
        };
        stack.fencepost().write(STACK_FENCEPOST);

        crate::ktrace!(
            "(Stack) Alocada base=",
            crate::drivers::serial::Hex(base.as_ptr() as u64),
            " palavras=",
            words
        );
        Ok(stack)
    }

    fn fencepost(&self) -> VolatilePtr<'_, usize> {
        // SAFETY: base aponta para a primeira palavra da região viva
        unsafe { VolatilePtr::new(self.base) }
    }

    /// Endereço da palavra mais baixa (onde fica o fencepost).
    pub fn base(&self) -> NonNull<usize> {
        self.base
    }

    pub fn words(&self) -> usize {
        self.words
    }

    /// Topo da região (um byte após a última palavra), alinhado a 16.
    pub fn top(&self) -> usize {
        let end = self.base.as_ptr() as usize + self.words * size_of::<usize>();
        end & !(STACK_ALIGN - 1)
    }

    /// Verdadeiro se o fencepost está intacto.
    pub fn fencepost_intact(&self) -> bool {
        self.fencepost().read() == STACK_FENCEPOST
    }

    /// Fatal se o fencepost foi sobrescrito.
    pub fn check_overflow(&self) {
        if !self.fencepost_intact() {
            crate::kerror!(
                "(Stack) Fencepost corrompido em ",
                crate::drivers::serial::Hex(self.base.as_ptr() as u64)
            );
            panic!("stack overflow: fencepost corrompido");
        }
    }
}

impl Drop for KernelStack {
    fn drop(&mut self) {
        // SAFETY: base/words vieram de acquire neste alocador, e o dono da
        // stack já não executa sobre ela (destruição adiada).
        unsafe { self.allocator.release(self.base, self.words) };
    }
}
