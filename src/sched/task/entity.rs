//! Thread Control Block

use super::accounting::Accounting;
use super::process::ChildTable;
use super::state::ThreadState;
#[cfg(feature = "user_program")]
use super::user::UserState;
use crate::arch::MachineState;
use crate::mm::KernelStack;
use crate::sys::Pid;
use alloc::string::String;

/// Thread Control Block
///
/// Vive em `Pin<Box<Thread>>` dentro da tabela do escalonador: o
/// `MachineState` é lido e escrito por ponteiro durante a troca de contexto.
pub struct Thread {
    name: String,
    pid: Pid,
    /// Quem criou esta thread. `None` só para a thread de boot.
    ppid: Option<Pid>,
    state: ThreadState,
    /// Contexto de CPU salvo
    context: MachineState,
    /// `None` para a thread de boot, que roda na stack do boot.
    stack: Option<KernelStack>,
    accounting: Accounting,
    children: ChildTable,
    #[cfg(feature = "user_program")]
    user: UserState,
}

impl Thread {
    /// Cria o TCB de uma thread nova, ainda sem stack.
    pub(crate) fn new(name: &str, pid: Pid, ppid: Option<Pid>, max_children: usize) -> Self {
        Self {
            name: String::from(name),
            pid,
            ppid,
            state: ThreadState::Created,
            context: MachineState::new(),
            stack: None,
            accounting: Accounting::new(),
            children: ChildTable::with_capacity(max_children),
            #[cfg(feature = "user_program")]
            user: UserState::new(),
        }
    }

    /// Adota o fluxo de execução do boot como thread.
    pub(crate) fn adopt_boot(name: &str, pid: Pid, max_children: usize) -> Self {
        let mut thread = Self::new(name, pid, None, max_children);
        thread.state = ThreadState::Running;
        thread
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn ppid(&self) -> Option<Pid> {
        self.ppid
    }

    pub fn state(&self) -> ThreadState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: ThreadState) {
        self.state = state;
    }

    pub fn stack(&self) -> Option<&KernelStack> {
        self.stack.as_ref()
    }

    /// A thread executa numa stack alocada por `fork`.
    pub fn owns_stack(&self) -> bool {
        self.stack.is_some()
    }

    /// Fatal se a stack da thread transbordou. A thread de boot não tem
    /// fencepost e passa sempre.
    pub fn check_overflow(&self) {
        if let Some(stack) = &self.stack {
            stack.check_overflow();
        }
    }

    /// Instala a stack e o estado inicial montado por `fork`.
    pub(crate) fn install(&mut self, stack: KernelStack, context: MachineState) {
        self.stack = Some(stack);
        self.context = context;
    }

    pub(crate) fn context(&self) -> &MachineState {
        &self.context
    }

    pub(crate) fn context_mut(&mut self) -> &mut MachineState {
        &mut self.context
    }

    pub fn accounting(&self) -> &Accounting {
        &self.accounting
    }

    pub(crate) fn accounting_mut(&mut self) -> &mut Accounting {
        &mut self.accounting
    }

    pub fn children(&self) -> &ChildTable {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut ChildTable {
        &mut self.children
    }

    #[cfg(feature = "user_program")]
    pub fn user(&self) -> &UserState {
        &self.user
    }

    #[cfg(feature = "user_program")]
    pub fn user_mut(&mut self) -> &mut UserState {
        &mut self.user
    }
}
