//! Threads: TCB, ciclo de vida e protocolo pai/filho.

pub mod accounting;
pub mod context;
pub mod entity;
pub mod lifecycle;
pub mod process;
pub mod state;
#[cfg(feature = "user_program")]
pub mod user;

pub use accounting::Accounting;
pub use context::ThreadEntry;
pub use entity::Thread;
pub use process::{halts_on_finish, ChildSlot, ChildTable};
pub use state::ThreadState;
#[cfg(feature = "user_program")]
pub use user::{AddressSpace, SharedAddressSpace, SharedMachine, UserMachine, UserState};
