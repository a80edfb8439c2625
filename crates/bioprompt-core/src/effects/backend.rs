//! Backend variant contract
//!
//! # Effect Classification
//!
//! - **Category**: Infrastructure Effect
//! - **Implementation**: `bioprompt-effects`
//! - **Usage**: one variant per process, selected from the platform API level
//!
//! Each variant wraps a different native callback API and exposes it through
//! the same contract: two capability probes and a cancellable `authenticate`
//! that yields a normalized [`AuthEventStream`].

use crate::errors::{BiometricError, Result};
use crate::event::AuthEvent;
use crate::effects::task::CancelSignal;
use crate::types::AuthRequest;
use futures::Stream;
use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

/// Read-only capability queries. No session, no side effects.
pub trait CapabilityProbe: Send + Sync {
    /// Whether verification hardware is present.
    fn has_hardware(&self) -> bool;

    /// Whether the user has enrolled at least one credential.
    fn has_enrolled_credentials(&self) -> bool;
}

/// The closed set of backend variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Platform too old for native verification
    Unsupported,
    /// Older single-callback fingerprint API; the core drives the surface
    LegacyNative,
    /// Consolidated platform prompt; the platform draws its own surface
    ModernNative,
}

impl BackendKind {
    /// Whether the platform renders the confirmation surface itself.
    pub fn renders_own_prompt(&self) -> bool {
        matches!(self, Self::ModernNative)
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unsupported => "unsupported",
            Self::LegacyNative => "legacy-native",
            Self::ModernNative => "modern-native",
        };
        f.write_str(name)
    }
}

/// Biometric backend interface
///
/// `authenticate` starts the platform call before returning. The returned
/// stream carries any number of `Help`/`Failed` events followed by at most
/// one `Success` or `Error`, then closes. A user-initiated cancel closes the
/// stream without an `Error`; the session observes it as `Cancelled`.
///
/// At most one session may be active per backend instance.
pub trait BiometricBackend: CapabilityProbe {
    fn kind(&self) -> BackendKind;

    /// Start verification. Setup failures are returned here, never panicked.
    fn authenticate(&self, request: &AuthRequest, cancel: CancelSignal)
        -> Result<AuthEventStream>;

    /// Check the preconditions a caller should verify before authenticating.
    fn check_preconditions(&self) -> Result<()> {
        if self.kind() == BackendKind::Unsupported {
            return Err(BiometricError::unsupported_platform(
                "native biometric authentication is not available on this platform",
            ));
        }
        if !self.has_hardware() {
            return Err(BiometricError::hardware_unavailable(
                "the device provides no fingerprint hardware",
            ));
        }
        if !self.has_enrolled_credentials() {
            return Err(BiometricError::not_enrolled("no fingerprints enrolled"));
        }
        Ok(())
    }
}

/// Ordered stream of normalized events for one session.
#[derive(Debug)]
pub struct AuthEventStream {
    rx: mpsc::UnboundedReceiver<AuthEvent>,
}

impl AuthEventStream {
    /// Create a stream together with the sender a normalizer pushes into.
    ///
    /// The stream ends once every sender is dropped.
    pub fn channel() -> (mpsc::UnboundedSender<AuthEvent>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self { rx })
    }

    /// Wait for the next event, or `None` once the stream closed.
    pub async fn next_event(&mut self) -> Option<AuthEvent> {
        self.rx.recv().await
    }
}

impl Stream for AuthEventStream {
    type Item = AuthEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use futures::StreamExt;

    struct FixedBackend {
        kind: BackendKind,
        hardware: bool,
        enrolled: bool,
    }

    impl CapabilityProbe for FixedBackend {
        fn has_hardware(&self) -> bool {
            self.hardware
        }

        fn has_enrolled_credentials(&self) -> bool {
            self.enrolled
        }
    }

    impl BiometricBackend for FixedBackend {
        fn kind(&self) -> BackendKind {
            self.kind
        }

        fn authenticate(&self, _request: &AuthRequest, _cancel: CancelSignal) -> Result<AuthEventStream> {
            let (_tx, stream) = AuthEventStream::channel();
            Ok(stream)
        }
    }

    #[test]
    fn test_preconditions_in_order() {
        let backend = FixedBackend {
            kind: BackendKind::LegacyNative,
            hardware: false,
            enrolled: false,
        };
        assert_matches!(
            backend.check_preconditions(),
            Err(BiometricError::HardwareUnavailable { .. })
        );

        let backend = FixedBackend {
            hardware: true,
            ..backend
        };
        assert_matches!(
            backend.check_preconditions(),
            Err(BiometricError::NotEnrolled { .. })
        );

        let backend = FixedBackend {
            enrolled: true,
            ..backend
        };
        assert!(backend.check_preconditions().is_ok());

        let backend = FixedBackend {
            kind: BackendKind::Unsupported,
            ..backend
        };
        assert_matches!(
            backend.check_preconditions(),
            Err(BiometricError::UnsupportedPlatform { .. })
        );
    }

    #[test]
    fn test_only_modern_renders_own_prompt() {
        assert!(BackendKind::ModernNative.renders_own_prompt());
        assert!(!BackendKind::LegacyNative.renders_own_prompt());
        assert_eq!(BackendKind::LegacyNative.to_string(), "legacy-native");
    }

    #[tokio::test]
    async fn test_stream_preserves_order_and_closes() {
        let (tx, mut stream) = AuthEventStream::channel();
        tx.send(AuthEvent::Failed).unwrap();
        tx.send(AuthEvent::Success { credential: None }).unwrap();
        drop(tx);

        assert_eq!(stream.next().await, Some(AuthEvent::Failed));
        assert_eq!(
            stream.next_event().await,
            Some(AuthEvent::Success { credential: None })
        );
        assert_eq!(stream.next().await, None);
    }
}
