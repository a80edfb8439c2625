//! Error taxonomy for biometric sessions
//!
//! A single error enum covers every way a session can end without success.
//! Help and failed-attempt signals are not errors; they are non-terminal
//! events (see [`crate::AuthEvent::is_terminal`]).

use crate::codes;
use serde::{Deserialize, Serialize};

/// Unified error type for biometric operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum BiometricError {
    /// The selected backend cannot authenticate at all
    #[error("Unsupported platform: {message}")]
    UnsupportedPlatform {
        /// Why the platform is unsupported
        message: String,
    },

    /// No verification hardware is present
    #[error("Hardware unavailable: {message}")]
    HardwareUnavailable {
        /// Error message describing the hardware state
        message: String,
    },

    /// Hardware is present but no credentials are enrolled
    #[error("Not enrolled: {message}")]
    NotEnrolled {
        /// Error message describing the enrollment state
        message: String,
    },

    /// Terminal error reported by the platform, code passed through verbatim
    #[error("Platform error {code}: {message}")]
    Platform {
        /// Platform-defined error code
        code: i32,
        /// Localized platform message
        message: String,
    },

    /// The user deliberately cancelled; never shown as an error
    #[error("The authentication has been cancelled")]
    UserCancelled,

    /// A session is already running on this backend instance
    #[error("Session busy: {message}")]
    SessionBusy {
        /// Error message describing the conflicting session
        message: String,
    },

    /// Invalid request
    #[error("Invalid: {message}")]
    Invalid {
        /// Error message describing the invalid input
        message: String,
    },

    /// Configuration could not be loaded or validated
    #[error("Configuration error: {message}")]
    Config {
        /// Error message describing the configuration problem
        message: String,
    },
}

impl BiometricError {
    /// Create an unsupported platform error
    pub fn unsupported_platform(message: impl Into<String>) -> Self {
        Self::UnsupportedPlatform {
            message: message.into(),
        }
    }

    /// Create a hardware unavailable error
    pub fn hardware_unavailable(message: impl Into<String>) -> Self {
        Self::HardwareUnavailable {
            message: message.into(),
        }
    }

    /// Create a not enrolled error
    pub fn not_enrolled(message: impl Into<String>) -> Self {
        Self::NotEnrolled {
            message: message.into(),
        }
    }

    /// Create a platform error
    pub fn platform(code: i32, message: impl Into<String>) -> Self {
        Self::Platform {
            code,
            message: message.into(),
        }
    }

    /// Create a session busy error
    pub fn session_busy(message: impl Into<String>) -> Self {
        Self::SessionBusy {
            message: message.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Platform error code this error surfaces as in `TerminalResult::AuthFailed`.
    pub fn code(&self) -> i32 {
        match self {
            Self::UnsupportedPlatform { .. } | Self::HardwareUnavailable { .. } => {
                codes::error::HW_NOT_PRESENT
            }
            Self::NotEnrolled { .. } => codes::error::NO_BIOMETRICS,
            Self::Platform { code, .. } => *code,
            Self::UserCancelled => codes::error::USER_CANCELED,
            Self::SessionBusy { .. } => codes::error::HW_UNAVAILABLE,
            Self::Invalid { .. } | Self::Config { .. } => codes::error::UNKNOWN,
        }
    }

    /// Rebuild an error from the `(code, text)` pair of an `AuthFailed` result.
    ///
    /// Codes that name a missing precondition map back onto the matching
    /// variant; everything else stays a `Platform` error.
    pub fn from_failure(code: i32, text: impl Into<String>) -> Self {
        let text = text.into();
        match code {
            codes::error::HW_NOT_PRESENT => Self::hardware_unavailable(text),
            codes::error::NO_BIOMETRICS => Self::not_enrolled(text),
            _ => Self::platform(code, text),
        }
    }
}

/// Standard Result type for biometric operations
pub type Result<T> = std::result::Result<T, BiometricError>;

impl From<toml::de::Error> for BiometricError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(err.to_string())
    }
}

impl From<std::io::Error> for BiometricError {
    fn from(err: std::io::Error) -> Self {
        Self::config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = BiometricError::platform(7, "Too many attempts");
        assert!(matches!(err, BiometricError::Platform { code: 7, .. }));
        assert_eq!(err.to_string(), "Platform error 7: Too many attempts");
    }

    #[test]
    fn test_precondition_codes() {
        assert_eq!(
            BiometricError::hardware_unavailable("none").code(),
            codes::error::HW_NOT_PRESENT
        );
        assert_eq!(
            BiometricError::not_enrolled("none").code(),
            codes::error::NO_BIOMETRICS
        );
        assert_eq!(BiometricError::platform(1234, "vendor").code(), 1234);
    }

    #[test]
    fn test_from_failure_round_trips_preconditions() {
        let err = BiometricError::from_failure(codes::error::NO_BIOMETRICS, "nothing enrolled");
        assert_eq!(err, BiometricError::not_enrolled("nothing enrolled"));

        let err = BiometricError::from_failure(99, "vendor specific");
        assert_eq!(err, BiometricError::platform(99, "vendor specific"));
    }
}
