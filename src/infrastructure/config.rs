//! Client configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is read first if present.
//!
//! # Environment Variables
//!
//! All optional:
//! - `FASTOR_API_BASE` - host for register/verify/resend (default: `https://staging.fastor.in`)
//! - `FASTOR_LISTING_BASE` - host for the restaurant listing (default: `https://staging.fastor.ai`)
//! - `FASTOR_CITY_ID` - listing city (default: 118)
//! - `FASTOR_DIAL_CODE` - dial code sent with the phone (default: `+91`)
//! - `FASTOR_TIMEOUT_SECS` - request timeout (default: 10)
//! - `FASTOR_INITIAL_STEP` - `phone` or `otp` (default: `phone`)
//! - `FASTOR_VERIFY_ENDPOINT` - `verify-otp` or `login` (default: `verify-otp`)
//! - `FASTOR_CLEAR_OTP_ON_BACK` - clear OTP digits when going back (default: true)
//! - `FASTOR_SESSION_PATH` - session file (default: `<data dir>/fastor/session.json`)
//! - `FASTOR_LOG` - tracing filter (default: `info`)
//! - `FASTOR_LOG_FILE` - log file (default: `<data dir>/fastor/fastor.log`)

use std::collections::HashMap;
use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::application::{FlowPolicy, Step, VerifyEndpoint};

const DEFAULT_API_BASE: &str = "https://staging.fastor.in";
const DEFAULT_LISTING_BASE: &str = "https://staging.fastor.ai";
const APP_DIR: &str = "fastor";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("No data directory available; set {0}")]
    NoDataDir(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub listing_base: String,
    pub city_id: u32,
    pub dial_code: String,
    pub timeout_secs: u64,
    pub policy: FlowPolicy,
    pub session_path: PathBuf,
    pub log_filter: String,
    pub log_file: PathBuf,
}

impl Config {
    /// Loads `.env` (if any) and then reads the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvVar`] for a value that does not
    /// parse, and [`ConfigError::NoDataDir`] when a default path is needed
    /// but the platform has no data directory.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_vars(&env::vars().collect())
    }

    /// Builds a config from an explicit variable map.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |key: &str| vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

        let timeout_secs: u64 = parse_or(vars, "FASTOR_TIMEOUT_SECS", 10)?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "FASTOR_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let policy = FlowPolicy {
            initial_step: parse_or(vars, "FASTOR_INITIAL_STEP", Step::EnteringPhone)?,
            verify_endpoint: parse_or(vars, "FASTOR_VERIFY_ENDPOINT", VerifyEndpoint::VerifyOtp)?,
            clear_otp_on_back: parse_or(vars, "FASTOR_CLEAR_OTP_ON_BACK", true)?,
        };

        let session_path = match get("FASTOR_SESSION_PATH") {
            Some(path) => PathBuf::from(path),
            None => data_dir("FASTOR_SESSION_PATH")?.join("session.json"),
        };
        let log_file = match get("FASTOR_LOG_FILE") {
            Some(path) => PathBuf::from(path),
            None => data_dir("FASTOR_LOG_FILE")?.join("fastor.log"),
        };

        Ok(Self {
            api_base: url_or(vars, "FASTOR_API_BASE", DEFAULT_API_BASE)?,
            listing_base: url_or(vars, "FASTOR_LISTING_BASE", DEFAULT_LISTING_BASE)?,
            city_id: parse_or(vars, "FASTOR_CITY_ID", 118)?,
            dial_code: get("FASTOR_DIAL_CODE").unwrap_or("+91").to_string(),
            timeout_secs,
            policy,
            session_path,
            log_filter: get("FASTOR_LOG").unwrap_or("info").to_string(),
            log_file,
        })
    }
}

fn data_dir(override_var: &'static str) -> Result<PathBuf, ConfigError> {
    dirs::data_dir()
        .map(|d| d.join(APP_DIR))
        .ok_or(ConfigError::NoDataDir(override_var))
}

fn parse_or<T>(vars: &HashMap<String, String>, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty()) {
        Some(raw) => raw
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}

fn url_or(vars: &HashMap<String, String>, key: &str, default: &str) -> Result<String, ConfigError> {
    let value = vars
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .unwrap_or(default);
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(value.trim_end_matches('/').to_string())
    } else {
        Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must start with http:// or https://".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        let mut map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        // keep tests independent of the host's data directory
        map.entry("FASTOR_SESSION_PATH".to_string())
            .or_insert_with(|| "/tmp/fastor-test/session.json".to_string());
        map.entry("FASTOR_LOG_FILE".to_string())
            .or_insert_with(|| "/tmp/fastor-test/fastor.log".to_string());
        map
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(&vars(&[])).unwrap();
        assert_eq!(config.api_base, "https://staging.fastor.in");
        assert_eq!(config.listing_base, "https://staging.fastor.ai");
        assert_eq!(config.city_id, 118);
        assert_eq!(config.dial_code, "+91");
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.policy, FlowPolicy::default());
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.session_path, PathBuf::from("/tmp/fastor-test/session.json"));
    }

    #[test]
    fn test_policy_overrides() {
        let config = Config::from_vars(&vars(&[
            ("FASTOR_INITIAL_STEP", "otp"),
            ("FASTOR_VERIFY_ENDPOINT", "login"),
            ("FASTOR_CLEAR_OTP_ON_BACK", "false"),
        ]))
        .unwrap();
        assert_eq!(config.policy.initial_step, Step::EnteringOtp);
        assert_eq!(config.policy.verify_endpoint, VerifyEndpoint::Login);
        assert!(!config.policy.clear_otp_on_back);
    }

    #[test]
    fn test_base_urls_trimmed() {
        let config =
            Config::from_vars(&vars(&[("FASTOR_API_BASE", "http://localhost:8080/")])).unwrap();
        assert_eq!(config.api_base, "http://localhost:8080");
    }

    #[test]
    fn test_invalid_values_name_the_variable() {
        let err = Config::from_vars(&vars(&[("FASTOR_CITY_ID", "delhi")])).unwrap_err();
        assert!(err.to_string().contains("FASTOR_CITY_ID"));

        let err = Config::from_vars(&vars(&[("FASTOR_TIMEOUT_SECS", "0")])).unwrap_err();
        assert!(err.to_string().contains("FASTOR_TIMEOUT_SECS"));

        let err = Config::from_vars(&vars(&[("FASTOR_API_BASE", "staging.fastor.in")])).unwrap_err();
        assert!(err.to_string().contains("FASTOR_API_BASE"));

        let err = Config::from_vars(&vars(&[("FASTOR_VERIFY_ENDPOINT", "sms")])).unwrap_err();
        assert!(err.to_string().contains("verify-otp"));
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = Config::from_vars(&vars(&[("FASTOR_CITY_ID", "  "), ("FASTOR_LOG", "")])).unwrap();
        assert_eq!(config.city_id, 118);
        assert_eq!(config.log_filter, "info");
    }
}
