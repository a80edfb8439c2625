//! Native API contracts
//!
//! The host binds these traits to the real platform (JNI, FFI, ...). Both
//! APIs are callback based: `authenticate` starts the operation and returns,
//! and results arrive later on whatever thread the platform chooses.

use bioprompt_core::effects::CancelSignal;
use bioprompt_core::{AuthRequest, BiometricError, CryptoHandle};
use std::sync::Arc;

/// Failure raised by native glue while starting an operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("platform fault {code}: {message}")]
pub struct PlatformFault {
    /// Code surfaced in `AuthFailed`
    pub code: i32,
    /// Fault description from the native layer
    pub message: String,
}

impl PlatformFault {
    /// Fault with `code` and `message`.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<PlatformFault> for BiometricError {
    fn from(fault: PlatformFault) -> Self {
        BiometricError::platform(fault.code, fault.message)
    }
}

/// Callbacks of the legacy fingerprint API.
pub trait FingerprintCallback: Send + Sync {
    /// Unrecoverable error; no further callbacks follow.
    fn on_error(&self, code: i32, message: &str);
    /// Recoverable acquisition problem.
    fn on_help(&self, code: i32, message: &str);
    /// Fingerprint recognized.
    fn on_succeeded(&self, crypto: Option<CryptoHandle>);
    /// Fingerprint read but not one of the enrolled ones.
    fn on_failed(&self);
}

/// Legacy single-callback fingerprint API.
///
/// Draws no UI; the core drives the confirmation surface itself.
pub trait FingerprintManagerApi: Send + Sync {
    fn is_hardware_detected(&self) -> bool;

    fn has_enrolled_fingerprints(&self) -> bool;

    /// Start listening for a fingerprint. Honouring `cancel` ends the
    /// operation with an `on_error(CANCELED, ..)` callback.
    fn authenticate(
        &self,
        crypto: Option<CryptoHandle>,
        cancel: CancelSignal,
        callback: Arc<dyn FingerprintCallback>,
    ) -> Result<(), PlatformFault>;
}

/// Texts handed to a platform-rendered prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSpec {
    /// Prompt title
    pub title: String,
    /// Line under the title
    pub subtitle: Option<String>,
    /// Body text
    pub description: Option<String>,
    /// Label of the dismiss button
    pub negative_label: String,
}

impl From<&AuthRequest> for PromptSpec {
    fn from(request: &AuthRequest) -> Self {
        Self {
            title: request.title().to_string(),
            subtitle: request.subtitle().map(str::to_string),
            description: request.description().map(str::to_string),
            negative_label: request.negative_label().to_string(),
        }
    }
}

/// Callbacks of the consolidated prompt API.
pub trait PromptCallback: Send + Sync {
    fn on_error(&self, code: i32, message: &str);
    fn on_help(&self, code: i32, message: &str);
    fn on_succeeded(&self, crypto: Option<CryptoHandle>);
    fn on_failed(&self);
    /// The negative button of the platform prompt was pressed.
    fn on_negative_button(&self);
}

/// Consolidated platform prompt API (also used for compat prompts).
pub trait BiometricPromptApi: Send + Sync {
    fn is_hardware_detected(&self) -> bool;

    fn has_enrolled_fingerprints(&self) -> bool;

    fn authenticate(
        &self,
        spec: PromptSpec,
        crypto: Option<CryptoHandle>,
        cancel: CancelSignal,
        callback: Arc<dyn PromptCallback>,
    ) -> Result<(), PlatformFault>;
}
