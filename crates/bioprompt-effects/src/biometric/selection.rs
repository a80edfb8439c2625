//! Backend selection
//!
//! Picks exactly one variant per process from the platform API level and the
//! native APIs the host could bind:
//!
//! | API level | available                         | variant         |
//! |-----------|-----------------------------------|-----------------|
//! | >= 28     | platform prompt                   | modern-native   |
//! | >= 23     | compat prompt, preferred          | modern-native   |
//! | >= 23     | fingerprint manager               | legacy-native   |
//! | otherwise |                                   | unsupported     |

use bioprompt_core::effects::BiometricBackend;
use bioprompt_core::PromptConfig;
use std::sync::Arc;
use tracing::{info, warn};

use super::native::{BiometricPromptApi, FingerprintManagerApi};
use super::{LegacyNativeBackend, ModernNativeBackend, UnsupportedBackend};

/// First API level with the legacy fingerprint API.
pub const MIN_FINGERPRINT_API_LEVEL: u32 = 23;

/// First API level with the consolidated platform prompt.
pub const MIN_PROMPT_API_LEVEL: u32 = 28;

/// Native bindings the host managed to provide.
#[derive(Clone, Default)]
pub struct PlatformApis {
    /// Legacy fingerprint API, from [`MIN_FINGERPRINT_API_LEVEL`]
    pub fingerprint_manager: Option<Arc<dyn FingerprintManagerApi>>,
    /// Platform prompt, from [`MIN_PROMPT_API_LEVEL`]
    pub biometric_prompt: Option<Arc<dyn BiometricPromptApi>>,
    /// Support-library prompt usable below [`MIN_PROMPT_API_LEVEL`]
    pub compat_prompt: Option<Arc<dyn BiometricPromptApi>>,
}

impl PlatformApis {
    /// API used below the modern prompt level.
    pub fn with_fingerprint_manager(mut self, api: Arc<dyn FingerprintManagerApi>) -> Self {
        self.fingerprint_manager = Some(api);
        self
    }

    /// Platform prompt API.
    pub fn with_biometric_prompt(mut self, api: Arc<dyn BiometricPromptApi>) -> Self {
        self.biometric_prompt = Some(api);
        self
    }

    /// Compatibility prompt for levels without the platform prompt.
    pub fn with_compat_prompt(mut self, api: Arc<dyn BiometricPromptApi>) -> Self {
        self.compat_prompt = Some(api);
        self
    }
}

/// Select the backend variant for this process.
pub fn select_backend(
    api_level: u32,
    apis: PlatformApis,
    config: &PromptConfig,
) -> Arc<dyn BiometricBackend> {
    let cancel_codes = config.cancel_codes.clone();

    if api_level >= MIN_PROMPT_API_LEVEL {
        if let Some(api) = apis.biometric_prompt.clone() {
            info!(api_level, backend = "modern-native", "selected biometric backend");
            return Arc::new(ModernNativeBackend::new(api, cancel_codes));
        }
        warn!(api_level, "platform prompt not bound; falling back");
    }

    if api_level >= MIN_FINGERPRINT_API_LEVEL {
        if config.prefer_compat_prompt {
            if let Some(api) = apis.compat_prompt {
                info!(api_level, backend = "modern-native", compat = true, "selected biometric backend");
                return Arc::new(ModernNativeBackend::new(api, cancel_codes));
            }
            warn!(api_level, "compat prompt preferred but not bound");
        }
        if let Some(api) = apis.fingerprint_manager {
            info!(api_level, backend = "legacy-native", "selected biometric backend");
            return Arc::new(LegacyNativeBackend::new(api, cancel_codes));
        }
        warn!(api_level, "fingerprint manager not bound");
        return Arc::new(UnsupportedBackend::new(format!(
            "no native biometric API bound at API level {api_level}"
        )));
    }

    info!(api_level, backend = "unsupported", "selected biometric backend");
    Arc::new(UnsupportedBackend::new(format!(
        "API level {api_level} is below {MIN_FINGERPRINT_API_LEVEL}"
    )))
}
