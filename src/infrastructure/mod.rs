//! Infrastructure layer: HTTP, session storage, configuration and the
//! command runtime.

pub mod api;
pub mod config;
pub mod dispatch;
pub mod logging;
pub mod session_store;

pub use api::*;
pub use config::*;
pub use dispatch::*;
pub use session_store::*;
