//! fastor - terminal client for the Fastor restaurant pre-order service.
//!
//! Phone number and OTP sign-in, a persisted session, and a home screen
//! listing nearby restaurants.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub use application::*;
pub use domain::*;
