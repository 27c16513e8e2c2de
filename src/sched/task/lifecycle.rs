//! Ciclo de vida das threads: create, fork, yield, sleep, finish.
//!
//! Toda thread passa por `Created -> Ready -> Running`, alterna entre
//! `Running`, `Ready` e `Blocked`, e termina em `finish`. A thread que
//! termina não pode liberar a stack em que ainda executa: ela se coloca no
//! slot de destruição pendente e quem pousar na CPU depois dela a destrói.

use super::context::{self, BoxedEntry, ThreadEntry};
use super::entity::Thread;
use super::process::halts_on_finish;
use super::state::ThreadState;
use crate::arch::{IntLevel, MachineState};
use crate::core::trace::TraceFlags;
use crate::mm::KernelStack;
use crate::sched::Kernel;
use crate::sys::{Pid, ThreadError};
use alloc::boxed::Box;

impl Kernel {
    /// Cria o TCB de uma thread filha da thread atual, sem stack.
    ///
    /// Falha se a tabela de filhos do criador está cheia; nesse caso nenhum
    /// pid é consumido.
    pub fn create(&self, name: &str) -> Result<Pid, ThreadError> {
        let mut sched = self.lock();
        let parent = sched.current;
        let creator = sched.current_thread_mut();

        if creator.children().is_full() {
            let capacity = creator.children().capacity();
            crate::kwarn!("(Thread) Tabela de filhos de ", parent, " cheia. Rejeitando ", name);
            return Err(ThreadError::ChildTableFull { capacity });
        }

        let pid = self.allocate_pid();
        creator.children_mut().register(pid)?;

        let thread = Thread::new(name, pid, Some(parent), self.config().max_children);
        sched.threads.insert(pid, Box::pin(thread));

        crate::kdbg!(
            TraceFlags::THREAD,
            "(Thread) Criada ",
            name,
            " PID=",
            pid,
            " PPID=",
            parent
        );
        Ok(pid)
    }

    /// Dá uma stack à thread `pid` e a coloca na fila de prontas.
    ///
    /// Quando escalonada, a thread executa `entry(kernel, arg)` e, ao
    /// retornar, `finish`. A thread precisa estar em `Created`.
    pub fn fork(&self, pid: Pid, entry: ThreadEntry, arg: usize) -> Result<(), ThreadError> {
        let stack = KernelStack::allocate(self.stacks(), self.config().stack_words)?;
        let start = context::start_frame(self, entry, arg);
        // SAFETY: a stack acabou de ser alocada e ninguém executa sobre ela
        let machine = unsafe { MachineState::synthesize(stack.top(), &start) };

        let mut sched = self.lock();
        let thread = sched.thread_mut(pid).ok_or(ThreadError::NoSuchThread(pid))?;
        assert_eq!(
            thread.state(),
            ThreadState::Created,
            "fork de uma thread que já recebeu stack"
        );

        crate::kdbg!(
            TraceFlags::THREAD,
            "(Thread) Forking thread ",
            thread.name(),
            " entry=",
            crate::drivers::serial::Hex(entry as usize as u64),
            " arg=",
            arg
        );
        thread.install(stack, machine);
        sched.make_ready(pid);
        Ok(())
    }

    /// `create` + `fork` com um closure como corpo.
    pub fn spawn<F>(&self, name: &str, body: F) -> Result<Pid, ThreadError>
    where
        F: FnOnce(&Kernel) + 'static,
    {
        let pid = self.create(name)?;
        let boxed: Box<BoxedEntry> = Box::new(Box::new(body));
        let arg = Box::into_raw(boxed) as usize;

        if let Err(err) = self.fork(pid, context::run_boxed, arg) {
            // SAFETY: fork falhou antes de a thread existir; o box não foi consumido
            drop(unsafe { Box::from_raw(arg as *mut BoxedEntry) });
            self.forget_created(pid);
            return Err(err);
        }
        Ok(pid)
    }

    /// Desfaz um `create` cuja thread nunca recebeu stack.
    fn forget_created(&self, pid: Pid) {
        let mut sched = self.lock();
        let Some(thread) = sched.threads.remove(&pid) else {
            return;
        };
        if let Some(parent) = thread.ppid().and_then(|ppid| sched.thread_mut(ppid)) {
            parent.children_mut().forget(pid);
        }
    }

    /// Cede a CPU se houver outra thread pronta.
    ///
    /// A thread atual vai para o fim da fila. Sem ninguém pronto, retorna na
    /// hora. O nível de interrupção de quem chamou é restaurado.
    pub fn yield_cpu(&self) {
        let _irq = self.interrupts_off();
        crate::kdbg!(TraceFlags::THREAD, "(Thread) Yielding thread ", self.current());

        if let Some(next) = self.select_next() {
            let me = self.current();
            self.move_to_ready(me);
            self.schedule_thread(next);
        }
    }

    /// Bloqueia a thread atual até alguém a colocar na fila de prontas.
    ///
    /// Exige interrupções desligadas. Sem threads prontas, a CPU fica ociosa
    /// esperando interrupções até aparecer trabalho.
    pub fn sleep(&self) {
        self.assert_interrupts_off("sleep");
        {
            let mut sched = self.lock();
            let me = sched.current_thread_mut();
            crate::kdbg!(TraceFlags::THREAD, "(Thread) Sleeping thread ", me.name());
            me.set_state(ThreadState::Blocked);
        }
        let next = self.next_or_idle();
        self.schedule_thread(next);
    }

    /// Coloca a thread atual na lista de dormentes sob `key` e dorme.
    pub fn sleep_on(&self, key: u64) {
        let _irq = self.interrupts_off();
        let me = self.current();
        self.add_to_sleeping(me, key);
        self.sleep();
    }

    /// Termina a thread atual. Nunca retorna.
    ///
    /// Acorda o pai se ele espera em join por esta thread, aplica a política
    /// de parada e se coloca no slot de destruição pendente antes de dormir.
    pub fn finish(&self) -> ! {
        self.interrupts().set_level(IntLevel::Off);

        let halt = {
            let mut sched = self.lock();
            let me = sched.current;
            crate::kdbg!(
                TraceFlags::THREAD,
                "(Thread) Finishing thread ",
                sched.current_thread().name()
            );

            sched.wake_joining_parent(me);

            let live = sched.threads.len();
            let halt = halts_on_finish(self.config().halt_policy, sched.current_thread(), live);

            assert!(
                sched.to_be_destroyed.is_none(),
                "duas threads aguardando destruição"
            );
            let Some(dead) = sched.threads.remove(&me) else {
                panic!("thread atual {} fora da tabela", me);
            };
            sched.to_be_destroyed = Some(dead);
            halt
        };

        if halt {
            crate::kinfo!("(Thread) Última thread relevante terminou. Parando a máquina");
            self.interrupts().halt();
        }

        self.sleep();
        unreachable!("thread finalizada voltou a executar");
    }

    /// Verifica o fencepost da stack da thread atual.
    pub fn check_stack_overflow(&self) {
        self.lock().current_thread().check_overflow();
    }

    /// Conta uma instrução de usuário para a thread atual.
    pub fn inc_instruction_count(&self) {
        self.lock()
            .current_thread_mut()
            .accounting_mut()
            .tick_instruction();
    }

    /// Instruções contadas para a thread atual.
    pub fn instruction_count(&self) -> u64 {
        self.lock().current_thread().accounting().instruction_count
    }
}
