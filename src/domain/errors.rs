use thiserror::Error;

/// Client-side validation failures. These never reach the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a valid 10-digit number")]
    InvalidPhone,
    #[error("Please enter a valid 6-digit OTP")]
    IncompleteOtp,
}

pub type ValidationResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_user_facing() {
        assert_eq!(
            ValidationError::InvalidPhone.to_string(),
            "Please enter a valid 10-digit number"
        );
        assert_eq!(
            ValidationError::IncompleteOtp.to_string(),
            "Please enter a valid 6-digit OTP"
        );
    }
}
