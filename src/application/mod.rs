//! Application layer: screen state machines and the commands they emit.
//!
//! Nothing in here performs I/O. The runtime in `infrastructure::dispatch`
//! executes the commands and feeds outcomes back in.

pub mod commands;
pub mod home;
pub mod notifications;
pub mod state;
pub mod verification;

pub use commands::*;
pub use home::*;
pub use notifications::*;
pub use state::*;
pub use verification::*;
