//! Tipos fundamentais do sistema

use core::fmt;

/// Process ID
///
/// Atribuído de forma monotônica a partir de 1 (a thread raiz).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Pid(pub u32);

impl Pid {
    /// Thread raiz, adotada no boot. Não tem pai.
    pub const ROOT: Pid = Pid(1);

    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn as_u32(self) -> u32 {
        self.0
    }

    pub const fn is_root(self) -> bool {
        self.0 == Self::ROOT.0
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
