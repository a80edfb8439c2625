//! Normalized session events and terminal results.

use crate::errors::{BiometricError, Result};
use crate::types::CryptoHandle;

/// A platform callback after normalization.
///
/// Produced by the per-backend event normalizers and consumed by the session
/// reducer and the display scheduler. Callers never see these directly.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthEvent {
    /// Guidance for the user (e.g. "move finger slower"), not terminal
    Help {
        /// Platform help code
        code: i32,
        /// Localized guidance text
        message: String,
    },
    /// Terminal platform error
    Error {
        /// Platform error code
        code: i32,
        /// Localized error text
        message: String,
    },
    /// A fingerprint was read but rejected, not terminal
    Failed,
    /// Verification succeeded, carrying the (possibly platform-updated) binding
    Success {
        /// Crypto object the success is bound to
        credential: Option<CryptoHandle>,
    },
}

impl AuthEvent {
    /// Whether this event ends the session.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Error { .. } | Self::Success { .. })
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Help { .. } => "help",
            Self::Error { .. } => "error",
            Self::Failed => "failed",
            Self::Success { .. } => "success",
        }
    }
}

/// The single outcome of a session.
#[derive(Debug, Clone, PartialEq)]
pub enum TerminalResult {
    /// Verified, with the credential binding if one was passed in
    Success(Option<CryptoHandle>),
    /// Verification ended in an error
    AuthFailed {
        /// Platform error code, or the code of a failed precondition
        code: i32,
        /// Text to show the user
        text: String,
    },
    /// The session was cancelled by the user or the caller
    Cancelled,
}

impl TerminalResult {
    /// Turn a session-level error into the result the caller observes.
    pub fn from_error(err: &BiometricError) -> Self {
        match err {
            BiometricError::UserCancelled => Self::Cancelled,
            BiometricError::Platform { code, message } => Self::AuthFailed {
                code: *code,
                text: message.clone(),
            },
            other => Self::AuthFailed {
                code: other.code(),
                text: other.to_string(),
            },
        }
    }

    /// Collapse into a `Result`, keeping cancellation distinguishable.
    pub fn into_outcome(self) -> Result<Option<CryptoHandle>> {
        match self {
            Self::Success(credential) => Ok(credential),
            Self::AuthFailed { code, text } => Err(BiometricError::from_failure(code, text)),
            Self::Cancelled => Err(BiometricError::UserCancelled),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes;
    use assert_matches::assert_matches;

    #[test]
    fn test_terminal_events() {
        assert!(AuthEvent::Success { credential: None }.is_terminal());
        assert!(AuthEvent::Error {
            code: codes::error::LOCKOUT,
            message: "locked".into()
        }
        .is_terminal());
        assert!(!AuthEvent::Failed.is_terminal());
        assert!(!AuthEvent::Help {
            code: codes::help::ACQUIRED_PARTIAL,
            message: "partial".into()
        }
        .is_terminal());
    }

    #[test]
    fn test_from_error_keeps_platform_message() {
        let result = TerminalResult::from_error(&BiometricError::platform(7, "Too many attempts"));
        assert_eq!(
            result,
            TerminalResult::AuthFailed {
                code: 7,
                text: "Too many attempts".into()
            }
        );
        assert_eq!(
            TerminalResult::from_error(&BiometricError::UserCancelled),
            TerminalResult::Cancelled
        );
    }

    #[test]
    fn test_outcome_distinguishes_cancel_from_failure() {
        assert_matches!(
            TerminalResult::Cancelled.into_outcome(),
            Err(BiometricError::UserCancelled)
        );
        assert_matches!(
            TerminalResult::AuthFailed {
                code: codes::error::LOCKOUT,
                text: "locked".into()
            }
            .into_outcome(),
            Err(BiometricError::Platform { code: 7, .. })
        );
        assert_matches!(TerminalResult::Success(None).into_outcome(), Ok(None));
    }
}
