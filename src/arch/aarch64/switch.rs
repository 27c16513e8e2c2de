//! Troca de contexto aarch64.
//!
//! Guarda x19-x28, fp, lr, sp e a metade baixa de v8-v15 (d8-d15), que o
//! AAPCS64 exige preservados entre chamadas.

use crate::arch::traits::ThreadStart;

/// Estado de máquina de uma thread suspensa.
///
/// Offsets usados pelo assembly:
/// 0x00:sp, 0x08..0x50:x19-x28, 0x58:fp, 0x60:lr, 0x68..0xA0:d8-d15
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MachineState {
    pub sp: u64,
    pub x: [u64; 10],
    pub fp: u64,
    pub lr: u64,
    pub d: [u64; 8],
}

impl MachineState {
    pub const fn new() -> Self {
        Self {
            sp: 0,
            x: [0; 10],
            fp: 0,
            lr: 0,
            d: [0; 8],
        }
    }

    /// Monta o estado inicial de uma thread nova no topo de `stack_top`.
    ///
    /// O `ret` da troca de contexto salta para `lr` (o trampolim).
    /// Slots: x19=context, x20=startup, x21=initial_pc, x22=initial_arg,
    /// x23=when_done.
    ///
    /// # Safety
    /// `stack_top` deve ser o fim de uma região gravável que ninguém mais usa.
    pub unsafe fn synthesize(stack_top: usize, start: &ThreadStart) -> Self {
        let mut state = Self::new();
        state.sp = (stack_top & !0xF) as u64;
        state.x[0] = start.context as u64;
        state.x[1] = start.startup_pc as u64;
        state.x[2] = start.initial_pc as u64;
        state.x[3] = start.initial_arg as u64;
        state.x[4] = start.when_done_pc as u64;
        state.lr = thread_root() as u64;
        state
    }

    pub fn stack_pointer(&self) -> usize {
        self.sp as usize
    }

    pub fn link_register(&self) -> usize {
        self.lr as usize
    }
}

/// Endereço do trampolim que inicia toda thread nova.
pub fn thread_root() -> usize {
    bobina_thread_root as unsafe extern "C" fn() as usize
}

/// Salva o contexto atual em `old` e carrega `new`.
///
/// # Safety
/// Mesmas regras da versão x86_64: interrupções desligadas e ambos os
/// ponteiros válidos e estáveis durante a troca.
pub unsafe fn switch(old: *mut MachineState, new: *const MachineState) {
    bobina_switch_context(old, new);
}

// X0 = old, X1 = new
core::arch::global_asm!(
    r#"
.p2align 4
.global bobina_switch_context
bobina_switch_context:
    mov x9, sp
    str x9,       [x0, #0x00]
    stp x19, x20, [x0, #0x08]
    stp x21, x22, [x0, #0x18]
    stp x23, x24, [x0, #0x28]
    stp x25, x26, [x0, #0x38]
    stp x27, x28, [x0, #0x48]
    stp x29, x30, [x0, #0x58]
    stp d8,  d9,  [x0, #0x68]
    stp d10, d11, [x0, #0x78]
    stp d12, d13, [x0, #0x88]
    stp d14, d15, [x0, #0x98]

    ldr x9,       [x1, #0x00]
    mov sp, x9
    ldp x19, x20, [x1, #0x08]
    ldp x21, x22, [x1, #0x18]
    ldp x23, x24, [x1, #0x28]
    ldp x25, x26, [x1, #0x38]
    ldp x27, x28, [x1, #0x48]
    ldp x29, x30, [x1, #0x58]
    ldp d8,  d9,  [x1, #0x68]
    ldp d10, d11, [x1, #0x78]
    ldp d12, d13, [x1, #0x88]
    ldp d14, d15, [x1, #0x98]
    ret

.p2align 4
.global bobina_thread_root
bobina_thread_root:
    mov x0, x19
    blr x20

    mov x0, x19
    mov x1, x22
    blr x21

    mov x0, x19
    blr x23
    brk #0x1
"#
);

extern "C" {
    fn bobina_switch_context(old: *mut MachineState, new: *const MachineState);
    fn bobina_thread_root();
}
