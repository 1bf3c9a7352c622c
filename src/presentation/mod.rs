//! Presentation layer handling terminal UI and user input.
//!
//! Rendering is a pure function of [`crate::application::App`]; input
//! handlers mutate the app and return the commands to dispatch.

pub mod input;
pub mod ui;

pub use input::*;
pub use ui::*;
