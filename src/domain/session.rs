use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::phone::PhoneNumber;

/// An authenticated session, persisted across restarts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub phone: PhoneNumber,
    #[serde(rename = "user", default)]
    pub user_payload: Value,
}

impl Session {
    /// Bearer token if one was issued.
    pub fn bearer(&self) -> Option<&str> {
        if self.token.is_empty() {
            None
        } else {
            Some(&self.token)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bearer_only_when_token_present() {
        let phone = PhoneNumber::parse("9876543210").unwrap();
        let mut session = Session {
            token: String::new(),
            phone,
            user_payload: Value::Null,
        };
        assert_eq!(session.bearer(), None);

        session.token = "abc".to_string();
        assert_eq!(session.bearer(), Some("abc"));
    }

    #[test]
    fn test_stored_keys() {
        let session = Session {
            token: "t".to_string(),
            phone: PhoneNumber::parse("9876543210").unwrap(),
            user_payload: json!({"user_id": 7}),
        };
        let stored = serde_json::to_value(&session).unwrap();
        assert_eq!(
            stored,
            json!({"token": "t", "phone": "9876543210", "user": {"user_id": 7}})
        );
    }
}
