//! REST client for the Fastor backend.
//!
//! Registration, verification and resend are form-encoded POSTs; the
//! restaurant listing is a GET with an optional bearer token.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::application::VerifyEndpoint;
use crate::domain::{extract_results, OtpCode, PhoneNumber};
use crate::infrastructure::config::Config;

const REGISTER_PATH: &str = "/v1/pwa/user/register";
const VERIFY_OTP_PATH: &str = "/v1/pwa/user/verify-otp";
const LOGIN_PATH: &str = "/v1/pwa/user/login";
const RESTAURANTS_PATH: &str = "/v1/m/restaurant";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("{0}")]
    Transport(String),
    #[error("Request failed with status code {status}")]
    Rejected { status: u16, message: Option<String> },
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// The text shown to the user: the server's own message if it sent one,
    /// then the transport error, then `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Rejected {
                message: Some(message),
                ..
            } => message.clone(),
            ApiError::Rejected { message: None, .. } => self.to_string(),
            ApiError::Transport(message) if !message.trim().is_empty() => message.clone(),
            ApiError::Transport(_) | ApiError::Decode(_) => fallback.to_string(),
        }
    }
}

/// A decoded 2xx response from one of the user endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiReply {
    pub status: bool,
    pub message: Option<String>,
    pub body: Value,
}

pub type ApiResult = Result<ApiReply, ApiError>;

impl ApiReply {
    pub fn from_body(body: Value) -> Self {
        Self {
            status: body.get("status").is_some_and(is_truthy),
            message: message_of(&body),
            body,
        }
    }

    /// The issued token, if any. Empty strings do not count.
    pub fn token(&self) -> Option<&str> {
        ["/data/token", "/token", "/data/access_token"]
            .iter()
            .filter_map(|p| self.body.pointer(p).and_then(Value::as_str))
            .find(|t| !t.is_empty())
    }

    /// The user object returned on verification: `data` when present,
    /// otherwise the whole body.
    pub fn user_payload(&self) -> Value {
        match self.body.get("data") {
            Some(data) if !data.is_null() => data.clone(),
            _ => self.body.clone(),
        }
    }
}

/// JavaScript-style truthiness for the `status` flag.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn message_of(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .map(str::to_string)
}

/// Everything the client needs from the backend. The HTTP implementation is
/// [`HttpClient`]; tests substitute their own.
#[async_trait]
pub trait FastorApi: Send + Sync {
    async fn register(&self, phone: &PhoneNumber) -> ApiResult;

    async fn verify(
        &self,
        phone: &PhoneNumber,
        otp: &OtpCode,
        endpoint: VerifyEndpoint,
    ) -> ApiResult;

    /// Same wire call as [`FastorApi::register`].
    async fn resend(&self, phone: &PhoneNumber) -> ApiResult {
        self.register(phone).await
    }

    /// Raw restaurant records for the configured city.
    async fn restaurants(&self, token: Option<&str>) -> Result<Vec<Value>, ApiError>;
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    api_base: String,
    listing_base: String,
    dial_code: String,
    city_id: u32,
}

impl HttpClient {
    /// Builds a client for the hosts in `config`.
    ///
    /// # Arguments
    ///
    /// * `config` - Base urls, dial code, city and request timeout
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the TLS backend cannot be
    /// initialised.
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self::with_client(config, client))
    }

    /// Same as [`HttpClient::new`] with a prebuilt `reqwest` client.
    pub fn with_client(config: &Config, client: Client) -> Self {
        Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            listing_base: config.listing_base.trim_end_matches('/').to_string(),
            dial_code: config.dial_code.clone(),
            city_id: config.city_id,
        }
    }

    async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> ApiResult {
        let url = format!("{}{}", self.api_base, path);
        debug!(%url, "POST");

        let response = self
            .client
            .post(&url)
            .form(form)
            .send()
            .await
            .map_err(|e| {
                warn!(%url, error = %e, "request failed");
                ApiError::Transport(e.to_string())
            })?;

        let body = read_json(response).await?;
        Ok(ApiReply::from_body(body))
    }
}

/// Reads a JSON body, turning non-2xx statuses into [`ApiError::Rejected`]
/// with whatever message the server included.
async fn read_json(response: Response) -> Result<Value, ApiError> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    let parsed = serde_json::from_str::<Value>(&text);

    if !status.is_success() {
        let message = parsed.ok().as_ref().and_then(message_of);
        warn!(status = status.as_u16(), ?message, "server rejected request");
        return Err(ApiError::Rejected {
            status: status.as_u16(),
            message,
        });
    }

    parsed.map_err(|e| ApiError::Decode(e.to_string()))
}

pub fn verify_path(endpoint: VerifyEndpoint) -> &'static str {
    match endpoint {
        VerifyEndpoint::VerifyOtp => VERIFY_OTP_PATH,
        VerifyEndpoint::Login => LOGIN_PATH,
    }
}

#[async_trait]
impl FastorApi for HttpClient {
    async fn register(&self, phone: &PhoneNumber) -> ApiResult {
        self.post_form(
            REGISTER_PATH,
            &[("phone", phone.as_str()), ("dial_code", self.dial_code.as_str())],
        )
        .await
    }

    async fn verify(
        &self,
        phone: &PhoneNumber,
        otp: &OtpCode,
        endpoint: VerifyEndpoint,
    ) -> ApiResult {
        self.post_form(
            verify_path(endpoint),
            &[
                ("phone", phone.as_str()),
                ("otp", otp.as_str()),
                ("dial_code", self.dial_code.as_str()),
            ],
        )
        .await
    }

    async fn restaurants(&self, token: Option<&str>) -> Result<Vec<Value>, ApiError> {
        let url = format!("{}{}", self.listing_base, RESTAURANTS_PATH);
        debug!(%url, city_id = self.city_id, "GET");

        let mut request = self.client.get(&url).query(&[("city_id", self.city_id)]);
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            warn!(%url, error = %e, "request failed");
            ApiError::Transport(e.to_string())
        })?;

        let body = read_json(response).await?;
        Ok(extract_results(&body).to_vec())
    }
}
