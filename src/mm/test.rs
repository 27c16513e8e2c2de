//! Testes das stacks de kernel

use super::stack::*;
use crate::sched::config::STACK_FENCEPOST;
use crate::sys::ThreadError;
use alloc::sync::Arc;

fn heap() -> (Arc<HeapStackAllocator>, SharedStackAllocator) {
    let concrete = Arc::new(HeapStackAllocator::new());
    let shared: SharedStackAllocator = concrete.clone();
    (concrete, shared)
}

#[test]
fn fencepost_escrito_na_palavra_mais_baixa() {
    let (_, shared) = heap();
    let stack = KernelStack::allocate(&shared, 256).unwrap();
    let word = unsafe { stack.base().as_ptr().read() };
    assert_eq!(word, STACK_FENCEPOST);
    assert!(stack.fencepost_intact());
    stack.check_overflow();
}

#[test]
fn topo_alinhado_dentro_da_regiao() {
    let (_, shared) = heap();
    let stack = KernelStack::allocate(&shared, 257).unwrap();
    let base = stack.base().as_ptr() as usize;
    let end = base + 257 * core::mem::size_of::<usize>();
    assert_eq!(stack.top() % STACK_ALIGN, 0);
    assert!(stack.top() <= end);
    assert!(stack.top() > base);
}

#[test]
#[should_panic(expected = "fencepost")]
fn overflow_detectado_quando_fencepost_muda() {
    let (_, shared) = heap();
    let stack = KernelStack::allocate(&shared, 128).unwrap();
    unsafe { stack.base().as_ptr().write(0) };
    stack.check_overflow();
}

#[test]
fn drop_devolve_a_regiao() {
    let (concrete, shared) = heap();
    {
        let _a = KernelStack::allocate(&shared, 64).unwrap();
        let _b = KernelStack::allocate(&shared, 64).unwrap();
        assert_eq!(concrete.live(), 2);
    }
    assert_eq!(concrete.live(), 0);
    assert_eq!(concrete.acquired(), 2);
    assert_eq!(concrete.released(), 2);
}

#[test]
fn limite_de_stacks_vivas_e_respeitado() {
    let concrete = Arc::new(HeapStackAllocator::with_limit(1));
    let shared: SharedStackAllocator = concrete.clone();
    let first = KernelStack::allocate(&shared, 64).unwrap();
    let err = KernelStack::allocate(&shared, 64).err();
    assert_eq!(err, Some(ThreadError::StackExhausted { words: 64 }));
    drop(first);
    assert!(KernelStack::allocate(&shared, 64).is_ok());
}

#[test]
fn pedido_vazio_e_recusado() {
    let (_, shared) = heap();
    assert!(KernelStack::allocate(&shared, 0).is_err());
}

#[test]
#[should_panic(expected = "não veio deste alocador")]
fn devolver_bloco_sem_layout_e_fatal() {
    let allocator = HeapStackAllocator::new();
    // SAFETY: o layout é rejeitado antes de qualquer dealloc
    unsafe { allocator.release(core::ptr::NonNull::dangling(), usize::MAX) };
}
