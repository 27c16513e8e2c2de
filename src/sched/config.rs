//! Constantes de configuração do Scheduler

/// Tamanho padrão da stack de kernel (em palavras de máquina)
pub const STACK_SIZE_WORDS: usize = 16 * 1024;

/// Menor stack aceita no boot (em palavras)
pub const MIN_STACK_WORDS: usize = 1024;

/// Valor gravado na palavra mais baixa de cada stack
pub const STACK_FENCEPOST: usize = 0xdead_beef;

/// Filhos por thread (tamanho da tabela de filhos)
pub const MAX_CHILD_COUNT: usize = 100;

/// Registradores de usuário salvos por thread
pub const NUM_TOTAL_REGS: usize = 40;

/// O que fazer quando uma thread termina.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HaltPolicy {
    /// Para a máquina se quem termina não tem filhos ou não tem pai.
    #[default]
    WhenChildless,
    /// Para a máquina quando a última thread viva termina.
    WhenLastThreadExits,
    /// Nunca para. Sem trabalho, o idle espera interrupções.
    Never,
}

/// Parâmetros do escalonador, fixados no boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedConfig {
    /// Palavras por stack de kernel
    pub stack_words: usize,
    /// Capacidade da tabela de filhos de cada thread
    pub max_children: usize,
    pub halt_policy: HaltPolicy,
}

impl SchedConfig {
    pub const fn new() -> Self {
        Self {
            stack_words: STACK_SIZE_WORDS,
            max_children: MAX_CHILD_COUNT,
            halt_policy: HaltPolicy::WhenChildless,
        }
    }

    pub const fn with_stack_words(mut self, words: usize) -> Self {
        self.stack_words = words;
        self
    }

    pub const fn with_max_children(mut self, count: usize) -> Self {
        self.max_children = count;
        self
    }

    pub const fn with_halt_policy(mut self, policy: HaltPolicy) -> Self {
        self.halt_policy = policy;
        self
    }
}

impl Default for SchedConfig {
    fn default() -> Self {
        Self::new()
    }
}
