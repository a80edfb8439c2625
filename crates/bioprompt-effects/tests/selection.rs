//! Backend variant selection.

use bioprompt_core::effects::{BackendKind, BiometricBackend, CapabilityProbe};
use bioprompt_core::PromptConfig;
use bioprompt_effects::{
    select_backend, PlatformApis, MIN_FINGERPRINT_API_LEVEL, MIN_PROMPT_API_LEVEL,
};
use bioprompt_testkit::{ScriptedFingerprintManager, ScriptedPromptApi};
use std::sync::Arc;

fn all_apis() -> PlatformApis {
    PlatformApis::default()
        .with_fingerprint_manager(Arc::new(ScriptedFingerprintManager::new()))
        .with_biometric_prompt(Arc::new(ScriptedPromptApi::new()))
        .with_compat_prompt(Arc::new(ScriptedPromptApi::new()))
}

#[test]
fn test_prompt_level_selects_modern() {
    let backend = select_backend(MIN_PROMPT_API_LEVEL, all_apis(), &PromptConfig::default());
    assert_eq!(backend.kind(), BackendKind::ModernNative);
}

#[test]
fn test_fingerprint_level_selects_legacy() {
    let backend = select_backend(
        MIN_FINGERPRINT_API_LEVEL,
        all_apis(),
        &PromptConfig::default(),
    );
    assert_eq!(backend.kind(), BackendKind::LegacyNative);
}

#[test]
fn test_compat_prompt_when_preferred() {
    let config = PromptConfig {
        prefer_compat_prompt: true,
        ..PromptConfig::default()
    };
    let backend = select_backend(26, all_apis(), &config);
    assert_eq!(backend.kind(), BackendKind::ModernNative);
}

#[test]
fn test_missing_prompt_falls_back_to_legacy() {
    let apis = PlatformApis::default()
        .with_fingerprint_manager(Arc::new(ScriptedFingerprintManager::new()));
    let backend = select_backend(30, apis, &PromptConfig::default());
    assert_eq!(backend.kind(), BackendKind::LegacyNative);
}

#[test]
fn test_old_platform_is_unsupported() {
    let backend = select_backend(21, all_apis(), &PromptConfig::default());
    assert_eq!(backend.kind(), BackendKind::Unsupported);
    assert!(!backend.has_hardware());
    assert!(!backend.has_enrolled_credentials());
}

#[test]
fn test_nothing_bound_is_unsupported() {
    let backend = select_backend(29, PlatformApis::default(), &PromptConfig::default());
    assert_eq!(backend.kind(), BackendKind::Unsupported);
}
