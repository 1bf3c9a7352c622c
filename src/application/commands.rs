//! Messages between the state machines and the runtime.
//!
//! State transitions never perform I/O. They return [`Command`]s; the runtime
//! carries them out and feeds the results back as [`Outcome`]s.

use serde_json::Value;

use super::notifications::Notification;
use super::verification::VerifyEndpoint;
use crate::domain::{OtpCode, PhoneNumber, Session};
use crate::infrastructure::api::{ApiError, ApiResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Register,
    Home,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Register {
        phone: PhoneNumber,
    },
    Verify {
        phone: PhoneNumber,
        otp: OtpCode,
        endpoint: VerifyEndpoint,
    },
    Resend {
        phone: PhoneNumber,
    },
    FetchRestaurants {
        token: Option<String>,
    },
    PersistSession(Session),
    ClearSession,
    Navigate(Screen),
    Notify(Notification),
}

#[derive(Debug, Clone)]
pub enum Outcome {
    Registered(ApiResult),
    Verified(ApiResult),
    Resent(ApiResult),
    Restaurants(Result<Vec<Value>, ApiError>),
}
