//! Estado de usuário das threads que executam programas de usuário.
//!
//! A CPU simulada de usuário tem um banco próprio de registradores. Ao trocar
//! de contexto, o banco da thread que sai é copiado para o TCB dela e o da
//! thread que entra é escrito de volta na máquina.

use super::entity::Thread;
use crate::core::trace::TraceFlags;
use crate::sched::config::NUM_TOTAL_REGS;
use crate::sched::Kernel;
use crate::sys::{Pid, ThreadError};
use alloc::sync::Arc;

/// Banco de registradores da máquina de usuário.
pub trait UserMachine: Send + Sync {
    fn read_register(&self, index: usize) -> i32;
    fn write_register(&self, index: usize, value: i32);
}

pub type SharedMachine = Arc<dyn UserMachine>;

/// Espaço de endereçamento de um programa. Pertence a quem o criou; a
/// thread só guarda uma referência.
pub trait AddressSpace: Send + Sync {
    /// Chamado quando uma thread com este espaço volta a executar.
    fn restore_context_on_switch(&self);
}

pub type SharedAddressSpace = Arc<dyn AddressSpace>;

pub struct UserState {
    registers: [i32; NUM_TOTAL_REGS],
    /// A máquina tem o estado desta thread; o TCB não.
    state_restored: bool,
    space: Option<SharedAddressSpace>,
}

impl UserState {
    pub const fn new() -> Self {
        Self {
            registers: [0; NUM_TOTAL_REGS],
            state_restored: true,
            space: None,
        }
    }

    /// Copia os registradores da máquina para o TCB.
    ///
    /// Só copia se o último passo foi um `restore`: uma segunda chamada
    /// seguida não sobrescreve o que foi salvo. Devolve se copiou.
    pub fn save(&mut self, machine: &dyn UserMachine) -> bool {
        if !self.state_restored {
            return false;
        }
        for (index, reg) in self.registers.iter_mut().enumerate() {
            *reg = machine.read_register(index);
        }
        self.state_restored = false;
        true
    }

    /// Escreve os registradores do TCB na máquina.
    pub fn restore(&mut self, machine: &dyn UserMachine) {
        for (index, reg) in self.registers.iter().enumerate() {
            machine.write_register(index, *reg);
        }
        self.state_restored = true;
    }

    pub fn registers(&self) -> &[i32; NUM_TOTAL_REGS] {
        &self.registers
    }

    /// O TCB guarda uma cópia que a máquina ainda não recebeu.
    pub fn is_saved(&self) -> bool {
        !self.state_restored
    }

    pub fn space(&self) -> Option<&SharedAddressSpace> {
        self.space.as_ref()
    }

    pub fn set_space(&mut self, space: Option<SharedAddressSpace>) {
        self.space = space;
    }
}

impl Default for UserState {
    fn default() -> Self {
        Self::new()
    }
}

impl Thread {
    /// Salva o banco da máquina se a thread executa um programa de usuário.
    pub(crate) fn save_on_switch(&mut self, machine: Option<&SharedMachine>) {
        if self.user().space().is_none() {
            return;
        }
        if let Some(machine) = machine {
            self.user_mut().save(machine.as_ref());
        }
    }
}

impl Kernel {
    /// Associa um espaço de endereçamento à thread `pid`.
    pub fn attach_address_space(
        &self,
        pid: Pid,
        space: SharedAddressSpace,
    ) -> Result<(), ThreadError> {
        let mut sched = self.lock();
        let thread = sched.thread_mut(pid).ok_or(ThreadError::NoSuchThread(pid))?;
        thread.user_mut().set_space(Some(space));
        crate::kdbg!(TraceFlags::USER, "(User) Espaço associado a ", pid);
        Ok(())
    }

    /// `UserState::save` da thread atual. Falso sem máquina configurada.
    pub fn save_user_state(&self) -> bool {
        let Some(machine) = self.platform().machine.clone() else {
            return false;
        };
        self.lock().current_thread_mut().user_mut().save(machine.as_ref())
    }

    /// `UserState::restore` da thread atual.
    pub fn restore_user_state(&self) {
        if let Some(machine) = self.platform().machine.clone() {
            self.lock()
                .current_thread_mut()
                .user_mut()
                .restore(machine.as_ref());
        }
    }

    /// Depois de pousar numa thread: devolve os registradores dela à máquina
    /// e avisa o espaço de endereçamento.
    pub(crate) fn restore_after_switch(&self) {
        let space = {
            let mut sched = self.lock();
            let thread = sched.current_thread_mut();
            let Some(space) = thread.user().space().cloned() else {
                return;
            };
            match self.platform().machine.as_ref() {
                Some(machine) => thread.user_mut().restore(machine.as_ref()),
                None => crate::kwarn!("(User) Thread ", thread.pid(), " tem espaço mas não há máquina"),
            }
            space
        };
        space.restore_context_on_switch();
    }
}
