//! Request, credential-binding and token types.

use crate::errors::{BiometricError, Result};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Prompt text shown beneath the sensor icon while waiting for a touch.
pub const DEFAULT_IDLE_PROMPT: &str = "Touch the fingerprint sensor";

/// Text shown when a fingerprint was read but not recognized.
pub const DEFAULT_NOT_RECOGNIZED: &str = "Not recognized";

/// Type-erased, caller-owned crypto object.
///
/// The core never inspects the value. It only carries it into the platform
/// call and back out again on success. Equality is identity.
#[derive(Clone)]
pub struct OpaqueHandle(Arc<dyn Any + Send + Sync>);

impl OpaqueHandle {
    /// Wrap a caller-provided object.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Borrow the wrapped object as `T`, if that is what it holds.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// Whether both handles point at the same object.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for OpaqueHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for OpaqueHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OpaqueHandle")
            .field(&Arc::as_ptr(&self.0))
            .finish()
    }
}

/// Credential binding passed into a session.
///
/// Exactly one of signature, cipher or MAC; the enum makes holding more than
/// one unrepresentable.
#[derive(Debug, Clone, PartialEq)]
pub enum CryptoHandle {
    /// A signature object unlocked by the verification
    Signature(OpaqueHandle),
    /// A cipher object unlocked by the verification
    Cipher(OpaqueHandle),
    /// A MAC object unlocked by the verification
    Mac(OpaqueHandle),
}

impl CryptoHandle {
    /// The wrapped object, regardless of kind.
    pub fn handle(&self) -> &OpaqueHandle {
        match self {
            Self::Signature(handle) | Self::Cipher(handle) | Self::Mac(handle) => handle,
        }
    }

    /// Short name of the binding kind, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Signature(_) => "signature",
            Self::Cipher(_) => "cipher",
            Self::Mac(_) => "mac",
        }
    }
}

/// Everything needed to run one verification.
///
/// Immutable once handed to a session; the session only reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthRequest {
    title: String,
    subtitle: Option<String>,
    description: Option<String>,
    negative_label: String,
    idle_prompt: String,
    not_recognized_text: String,
    crypto: Option<CryptoHandle>,
}

impl AuthRequest {
    /// Create a request with the two required texts.
    pub fn new(title: impl Into<String>, negative_label: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            description: None,
            negative_label: negative_label.into(),
            idle_prompt: DEFAULT_IDLE_PROMPT.to_string(),
            not_recognized_text: DEFAULT_NOT_RECOGNIZED.to_string(),
            crypto: None,
        }
    }

    /// Set the subtitle.
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Override the idle prompt text.
    pub fn with_idle_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.idle_prompt = prompt.into();
        self
    }

    /// Override the text shown for a rejected attempt.
    pub fn with_not_recognized_text(mut self, text: impl Into<String>) -> Self {
        self.not_recognized_text = text.into();
        self
    }

    /// Bind the verification to a crypto object.
    pub fn with_crypto(mut self, crypto: CryptoHandle) -> Self {
        self.crypto = Some(crypto);
        self
    }

    /// Prompt title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Optional line under the title.
    pub fn subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }

    /// Optional body text.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Label of the dismiss button.
    pub fn negative_label(&self) -> &str {
        &self.negative_label
    }

    /// Text the surface reverts to once an error message expires.
    pub fn idle_prompt(&self) -> &str {
        &self.idle_prompt
    }

    /// Text shown when a finger is read but not matched.
    pub fn not_recognized_text(&self) -> &str {
        &self.not_recognized_text
    }

    /// Crypto object the success is bound to, if any.
    pub fn crypto(&self) -> Option<&CryptoHandle> {
        self.crypto.as_ref()
    }

    /// Check the required texts are present.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(BiometricError::invalid("title must not be blank"));
        }
        if self.negative_label.trim().is_empty() {
            return Err(BiometricError::invalid(
                "negative button label must not be blank",
            ));
        }
        Ok(())
    }
}

/// Opaque identifier of one running session.
///
/// Serializable so a host can stash it with saved UI state and re-attach to
/// the session after its surface is recreated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionToken(u64);

impl SessionToken {
    /// Rebuild a token from its saved value.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Value to persist and later pass to [`SessionToken::from_raw`].
    pub fn as_raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}
