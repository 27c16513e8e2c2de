//! Máquina de usuário simulada: só o banco de registradores.

use crate::sched::config::NUM_TOTAL_REGS;
use crate::sched::task::UserMachine;
use spin::Mutex;

pub struct SimulatedMachine {
    registers: Mutex<[i32; NUM_TOTAL_REGS]>,
}

impl SimulatedMachine {
    pub const fn new() -> Self {
        Self {
            registers: Mutex::new([0; NUM_TOTAL_REGS]),
        }
    }

    /// Cópia do banco de registradores.
    pub fn snapshot(&self) -> [i32; NUM_TOTAL_REGS] {
        *self.registers.lock()
    }

    pub fn load(&self, values: [i32; NUM_TOTAL_REGS]) {
        *self.registers.lock() = values;
    }
}

impl Default for SimulatedMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl UserMachine for SimulatedMachine {
    fn read_register(&self, index: usize) -> i32 {
        self.registers.lock()[index]
    }

    fn write_register(&self, index: usize, value: i32) {
        self.registers.lock()[index] = value;
    }
}
