//! Bioprompt Effects
//!
//! Handlers implementing the `bioprompt-core` effect traits:
//! - the three backend variants (unsupported, legacy-native, modern-native)
//! - the per-backend event normalizers that turn native callbacks into `AuthEvent`s
//! - backend selection from the platform API level
//! - the production time handler

pub mod biometric;
pub mod time;

pub use biometric::native::{
    BiometricPromptApi, FingerprintCallback, FingerprintManagerApi, PlatformFault, PromptCallback,
    PromptSpec,
};
pub use biometric::selection::{
    select_backend, PlatformApis, MIN_FINGERPRINT_API_LEVEL, MIN_PROMPT_API_LEVEL,
};
pub use biometric::{LegacyNativeBackend, ModernNativeBackend, UnsupportedBackend};
pub use time::RealTimeHandler;
