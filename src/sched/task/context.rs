//! Ponto de entrada das threads novas.
//!
//! `fork` preenche o `ThreadStart` com estes procedimentos; o trampolim da
//! arquitetura os chama com o endereço do `Kernel` como primeiro argumento.

use crate::arch::ThreadStart;
use crate::sched::Kernel;
use alloc::boxed::Box;

/// Procedimento que uma thread executa.
///
/// Recebe o kernel e o argumento passado a `fork`. Retornar equivale a
/// chamar `Kernel::finish`.
pub type ThreadEntry = extern "C" fn(&Kernel, usize);

/// Corpo de thread criado por `Kernel::spawn`.
pub(crate) type BoxedEntry = Box<dyn FnOnce(&Kernel)>;

pub(crate) fn start_frame(kernel: &Kernel, entry: ThreadEntry, arg: usize) -> ThreadStart {
    ThreadStart {
        context: kernel as *const Kernel as usize,
        startup_pc: thread_startup as extern "C" fn(&Kernel) as usize,
        initial_pc: entry as usize,
        initial_arg: arg,
        when_done_pc: thread_when_done as extern "C" fn(&Kernel) -> ! as usize,
    }
}

/// Primeira coisa que uma thread nova executa: termina a troca de contexto
/// que a colocou na CPU e liga as interrupções.
extern "C" fn thread_startup(kernel: &Kernel) {
    kernel.land();
    kernel.interrupts().enable();
}

extern "C" fn thread_when_done(kernel: &Kernel) -> ! {
    kernel.finish()
}

/// Entrada usada por `spawn`: `arg` é um `Box<BoxedEntry>` vazado.
pub(crate) extern "C" fn run_boxed(kernel: &Kernel, arg: usize) {
    // SAFETY: arg veio de Box::into_raw em spawn e é consumido uma única vez
    let body = unsafe { Box::from_raw(arg as *mut BoxedEntry) };
    body(kernel);
}
