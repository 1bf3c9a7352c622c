//! Phone verification flow.
//!
//! Two steps: entering the phone number, then entering the OTP. Every
//! operation takes `&mut self` and returns the [`Command`]s the runtime has
//! to execute; nothing here touches the network or disk.

use std::str::FromStr;
use tracing::{debug, info, warn};

use super::commands::{Command, Screen};
use super::notifications::Notification;
use crate::domain::{OtpInput, PhoneField, PhoneNumber, Session};
use crate::infrastructure::api::ApiResult;

const REGISTER_FAILED: &str = "Failed to send OTP";
const REGISTER_UNREACHABLE: &str = "Server not reachable or API error!";
const VERIFY_FAILED: &str = "OTP verification failed";
const VERIFY_UNREACHABLE: &str = "Failed to verify OTP";
const RESEND_FAILED: &str = "Failed to resend OTP";
const MISSING_TOKEN: &str = "Login failed: no token returned";

pub const OTP_SENT: &str = "OTP sent successfully!";
pub const OTP_RESENT: &str = "OTP resent successfully!";
pub const OTP_VERIFIED: &str = "OTP verified successfully!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    EnteringPhone,
    EnteringOtp,
}

impl FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "phone" => Ok(Step::EnteringPhone),
            "otp" => Ok(Step::EnteringOtp),
            other => Err(format!("expected `phone` or `otp`, got `{}`", other)),
        }
    }
}

/// Which endpoint confirms the OTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyEndpoint {
    /// `/verify-otp`: a truthy status confirms the code. Signing in still
    /// needs a token; without one the flow stays on the OTP step.
    VerifyOtp,
    /// `/login`: a truthy status and a non-empty token, anything less is a
    /// failure.
    Login,
}

impl VerifyEndpoint {
    /// Whether a reply without a token counts as a failed verification.
    pub fn requires_token(self) -> bool {
        matches!(self, VerifyEndpoint::Login)
    }
}

impl FromStr for VerifyEndpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "verify-otp" | "verify_otp" => Ok(VerifyEndpoint::VerifyOtp),
            "login" => Ok(VerifyEndpoint::Login),
            other => Err(format!("expected `verify-otp` or `login`, got `{}`", other)),
        }
    }
}

/// Behaviour that differs between the two known deployments of this flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowPolicy {
    pub initial_step: Step,
    pub verify_endpoint: VerifyEndpoint,
    pub clear_otp_on_back: bool,
}

impl Default for FlowPolicy {
    fn default() -> Self {
        Self {
            initial_step: Step::EnteringPhone,
            verify_endpoint: VerifyEndpoint::VerifyOtp,
            clear_otp_on_back: true,
        }
    }
}

/// The request currently in flight. Only one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingRequest {
    Register,
    Verify,
    Resend,
}

#[derive(Debug, Clone)]
pub struct VerificationFlow {
    pub step: Step,
    pub phone_input: PhoneField,
    /// Set once registration succeeds; used by verify and resend.
    pub phone: Option<PhoneNumber>,
    pub otp: OtpInput,
    pub pending: Option<PendingRequest>,
    /// Inline error text.
    pub error: Option<String>,
    /// Inline confirmation text.
    pub info: Option<String>,
    pub policy: FlowPolicy,
}

impl Default for VerificationFlow {
    fn default() -> Self {
        Self::new(FlowPolicy::default())
    }
}

impl VerificationFlow {
    pub fn new(policy: FlowPolicy) -> Self {
        Self {
            step: policy.initial_step,
            phone_input: PhoneField::default(),
            phone: None,
            otp: OtpInput::default(),
            pending: None,
            error: None,
            info: None,
            policy,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    // The phone field is locked while registration is in flight.
    pub fn input_phone_char(&mut self, c: char) {
        if !self.is_busy() {
            self.phone_input.push(c);
        }
    }

    pub fn backspace_phone(&mut self) {
        if !self.is_busy() {
            self.phone_input.backspace();
        }
    }

    pub fn paste_phone(&mut self, raw: &str) {
        if !self.is_busy() {
            self.phone_input.set(raw);
        }
    }

    // Likewise the code while it is being verified.
    pub fn input_otp_digit(&mut self, c: char) {
        if !self.is_busy() {
            self.otp.input(c);
        }
    }

    pub fn otp_backspace(&mut self) {
        if !self.is_busy() {
            self.otp.backspace();
        }
    }

    /// Validates the phone field and asks for an OTP.
    pub fn submit_phone(&mut self) -> Vec<Command> {
        if self.is_busy() || self.step != Step::EnteringPhone {
            return Vec::new();
        }

        let phone = match self.phone_input.to_phone() {
            Ok(phone) => phone,
            Err(e) => {
                self.error = Some(e.to_string());
                self.info = None;
                return Vec::new();
            }
        };

        self.error = None;
        self.info = None;
        self.pending = Some(PendingRequest::Register);
        info!(phone = %phone.masked(), "requesting OTP");
        vec![Command::Register { phone }]
    }

    pub fn on_register(&mut self, result: ApiResult) -> Vec<Command> {
        if !self.settle(PendingRequest::Register) {
            return Vec::new();
        }

        match result {
            Ok(reply) if reply.status => {
                self.phone = self.phone_input.to_phone().ok();
                self.step = Step::EnteringOtp;
                self.info = Some(OTP_SENT.to_string());
                info!("OTP sent, awaiting code");
                vec![Command::Notify(Notification::success(OTP_SENT))]
            }
            Ok(reply) => {
                let message = reply.message.unwrap_or_else(|| REGISTER_FAILED.to_string());
                self.fail(message, true)
            }
            Err(e) => self.fail(e.user_message(REGISTER_UNREACHABLE), true),
        }
    }

    /// Checks the six slots and submits the code.
    pub fn submit_otp(&mut self) -> Vec<Command> {
        if self.is_busy() || self.step != Step::EnteringOtp {
            return Vec::new();
        }

        let otp = match self.otp.code() {
            Ok(otp) => otp,
            Err(e) => {
                let message = e.to_string();
                self.error = Some(message.clone());
                return vec![Command::Notify(Notification::error(message))];
            }
        };

        let Some(phone) = self.phone.clone() else {
            let message = "Phone number missing, go back and request a new OTP".to_string();
            self.error = Some(message.clone());
            return vec![Command::Notify(Notification::error(message))];
        };

        self.error = None;
        self.pending = Some(PendingRequest::Verify);
        info!(phone = %phone.masked(), endpoint = ?self.policy.verify_endpoint, "verifying OTP");
        vec![Command::Verify {
            phone,
            otp,
            endpoint: self.policy.verify_endpoint,
        }]
    }

    pub fn on_verify(&mut self, result: ApiResult) -> Vec<Command> {
        if !self.settle(PendingRequest::Verify) {
            return Vec::new();
        }

        let reply = match result {
            Ok(reply) if reply.status => reply,
            Ok(reply) => {
                let message = reply.message.unwrap_or_else(|| VERIFY_FAILED.to_string());
                return self.fail(message, true);
            }
            Err(e) => return self.fail(e.user_message(VERIFY_UNREACHABLE), true),
        };

        let Some(token) = reply.token().map(str::to_string) else {
            if self.policy.verify_endpoint.requires_token() {
                return self.fail(MISSING_TOKEN.to_string(), true);
            }
            // confirmed, but there is nothing to sign in with
            self.error = None;
            self.info = Some(OTP_VERIFIED.to_string());
            info!("OTP confirmed without a token, staying signed out");
            return vec![Command::Notify(Notification::success(OTP_VERIFIED))];
        };

        let Some(phone) = self.phone.clone() else {
            warn!("verification succeeded without a registered phone");
            return Vec::new();
        };

        let session = Session {
            token,
            phone,
            user_payload: reply.user_payload(),
        };
        self.error = None;
        info!(phone = %session.phone.masked(), "verified");
        vec![
            Command::Notify(Notification::success(OTP_VERIFIED)),
            Command::PersistSession(session),
            Command::Navigate(Screen::Home),
        ]
    }

    /// Requests a fresh OTP for the registered phone.
    pub fn resend(&mut self) -> Vec<Command> {
        if self.is_busy() {
            return Vec::new();
        }
        let Some(phone) = self.phone.clone() else {
            return Vec::new();
        };

        self.pending = Some(PendingRequest::Resend);
        debug!(phone = %phone.masked(), "resending OTP");
        vec![Command::Resend { phone }]
    }

    pub fn on_resend(&mut self, result: ApiResult) -> Vec<Command> {
        if !self.settle(PendingRequest::Resend) {
            return Vec::new();
        }

        match result {
            Ok(reply) if reply.status => {
                self.otp.clear();
                self.error = None;
                self.info = Some(OTP_RESENT.to_string());
                vec![Command::Notify(Notification::success(OTP_RESENT))]
            }
            Ok(reply) => {
                let message = reply.message.unwrap_or_else(|| RESEND_FAILED.to_string());
                self.fail(message, true)
            }
            Err(e) => self.fail(e.user_message(RESEND_FAILED), true),
        }
    }

    /// Returns to the phone step. A pending request still settles normally.
    pub fn back(&mut self) {
        if self.step != Step::EnteringOtp {
            return;
        }
        self.step = Step::EnteringPhone;
        self.error = None;
        self.info = None;
        if self.policy.clear_otp_on_back {
            self.otp.clear();
        }
    }

    /// Forgets everything, as on logout.
    pub fn reset(&mut self) {
        *self = Self::new(self.policy);
    }

    fn settle(&mut self, expected: PendingRequest) -> bool {
        if self.pending == Some(expected) {
            self.pending = None;
            true
        } else {
            warn!(?expected, pending = ?self.pending, "ignoring stale response");
            false
        }
    }

    fn fail(&mut self, message: String, notify: bool) -> Vec<Command> {
        warn!(%message, step = ?self.step, "verification flow error");
        self.error = Some(message.clone());
        self.info = None;
        if notify {
            vec![Command::Notify(Notification::error(message))]
        } else {
            Vec::new()
        }
    }
}
