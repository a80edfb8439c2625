//! Fallback backend for platforms without native biometric APIs.
//!
//! Null Object for old platform levels: both probes report `false` and every
//! `authenticate` call fails immediately without emitting events.

use bioprompt_core::effects::{
    AuthEventStream, BackendKind, BiometricBackend, CancelSignal, CapabilityProbe,
};
use bioprompt_core::{AuthRequest, BiometricError, Result};
use tracing::debug;

/// Backend for platforms without fingerprint support.
#[derive(Debug, Clone)]
pub struct UnsupportedBackend {
    reason: String,
}

impl UnsupportedBackend {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for UnsupportedBackend {
    fn default() -> Self {
        Self::new("platform API level predates native fingerprint authentication")
    }
}

impl CapabilityProbe for UnsupportedBackend {
    fn has_hardware(&self) -> bool {
        false
    }

    fn has_enrolled_credentials(&self) -> bool {
        false
    }
}

impl BiometricBackend for UnsupportedBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Unsupported
    }

    fn authenticate(&self, _request: &AuthRequest, _cancel: CancelSignal) -> Result<AuthEventStream> {
        debug!(reason = %self.reason, "authenticate on unsupported backend");
        Err(BiometricError::unsupported_platform(self.reason.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_probes_are_false() {
        let backend = UnsupportedBackend::default();
        assert!(!backend.has_hardware());
        assert!(!backend.has_enrolled_credentials());
        assert_eq!(backend.kind(), BackendKind::Unsupported);
    }

    #[test]
    fn test_authenticate_fails_immediately() {
        let backend = UnsupportedBackend::new("API 21");
        let result = backend.authenticate(&AuthRequest::new("Title", "Cancel"), CancelSignal::new());
        assert_matches!(
            result,
            Err(BiometricError::UnsupportedPlatform { message }) if message == "API 21"
        );
    }
}
