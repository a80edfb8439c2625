//! Session configuration
//!
//! Loaded from TOML, then overlaid with `BIOPROMPT_*` environment variables:
//!
//! ```toml
//! dwell_ms = 2000
//! cancel_codes = [5, 10]
//! prefer_compat_prompt = false
//! ```

use crate::codes;
use crate::errors::{BiometricError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Default time a transient message stays visible.
pub const DEFAULT_DWELL_MS: u64 = 2_000;

/// Upper bound accepted for `dwell_ms`.
pub const MAX_DWELL_MS: u64 = 60_000;

const ENV_PREFIX: &str = "BIOPROMPT_";

/// Platform error codes that mean "the user cancelled".
///
/// An error carrying one of these codes ends the session as `Cancelled`
/// instead of surfacing as `AuthFailed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CancelCodeTable(BTreeSet<i32>);

impl CancelCodeTable {
    /// Table holding exactly `codes`.
    pub fn new(codes: impl IntoIterator<Item = i32>) -> Self {
        Self(codes.into_iter().collect())
    }

    /// A table that never maps an error to cancellation.
    pub fn empty() -> Self {
        Self(BTreeSet::new())
    }

    /// Whether `code` means the user dismissed the prompt.
    pub fn contains(&self, code: i32) -> bool {
        self.0.contains(&code)
    }

    pub fn insert(&mut self, code: i32) {
        self.0.insert(code);
    }

    /// Codes in ascending order.
    pub fn codes(&self) -> impl Iterator<Item = i32> + '_ {
        self.0.iter().copied()
    }
}

impl Default for CancelCodeTable {
    fn default() -> Self {
        Self::new([codes::error::CANCELED, codes::error::USER_CANCELED])
    }
}

/// Tunables for prompt sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// How long Help/Error/Failed messages stay visible, and how long a
    /// terminal error is held on a core-driven surface before closing.
    pub dwell_ms: u64,
    /// Error codes treated as user cancellation.
    pub cancel_codes: CancelCodeTable,
    /// Prefer a compat prompt API over the legacy fingerprint API when both exist.
    pub prefer_compat_prompt: bool,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            dwell_ms: DEFAULT_DWELL_MS,
            cancel_codes: CancelCodeTable::default(),
            prefer_compat_prompt: false,
        }
    }
}

impl PromptConfig {
    /// Parse a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BiometricError::config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Merge with `BIOPROMPT_*` environment variables
    pub fn merge_with_env(&mut self) -> Result<()> {
        self.merge_with_vars(std::env::vars())
    }

    /// Merge with an explicit set of `(key, value)` pairs.
    ///
    /// Keys without the `BIOPROMPT_` prefix are ignored, as are unknown keys.
    pub fn merge_with_vars<I, K, V>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            let Some(name) = key.as_ref().strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let value = value.as_ref().trim();
            match name {
                "DWELL_MS" => {
                    self.dwell_ms = value.parse().map_err(|e| {
                        BiometricError::config(format!("Invalid BIOPROMPT_DWELL_MS '{value}': {e}"))
                    })?;
                }
                "CANCEL_CODES" => {
                    self.cancel_codes = parse_code_list(value)?;
                }
                "PREFER_COMPAT_PROMPT" => {
                    self.prefer_compat_prompt = value.parse().map_err(|e| {
                        BiometricError::config(format!(
                            "Invalid BIOPROMPT_PREFER_COMPAT_PROMPT '{value}': {e}"
                        ))
                    })?;
                }
                _ => {}
            }
        }
        self.validate()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.dwell_ms == 0 || self.dwell_ms > MAX_DWELL_MS {
            return Err(BiometricError::config(format!(
                "dwell_ms must be within 1..={MAX_DWELL_MS}, got {}",
                self.dwell_ms
            )));
        }
        Ok(())
    }
}

fn parse_code_list(value: &str) -> Result<CancelCodeTable> {
    let mut table = CancelCodeTable::empty();
    for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let code = part.parse::<i32>().map_err(|e| {
            BiometricError::config(format!("Invalid cancel code '{part}': {e}"))
        })?;
        table.insert(code);
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = PromptConfig::default();
        assert_eq!(config.dwell_ms, 2_000);
        assert!(config.cancel_codes.contains(codes::error::CANCELED));
        assert!(config.cancel_codes.contains(codes::error::USER_CANCELED));
        assert!(!config.cancel_codes.contains(codes::error::LOCKOUT));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = PromptConfig::from_toml_str("dwell_ms = 1500").unwrap();
        assert_eq!(config.dwell_ms, 1500);
        assert_eq!(config.cancel_codes, CancelCodeTable::default());
    }

    #[test]
    fn test_cancel_codes_from_toml() {
        let config = PromptConfig::from_toml_str("cancel_codes = [10, 1001]").unwrap();
        assert!(config.cancel_codes.contains(1001));
        assert!(!config.cancel_codes.contains(codes::error::CANCELED));
    }

    #[test]
    fn test_zero_dwell_rejected() {
        let err = PromptConfig::from_toml_str("dwell_ms = 0").unwrap_err();
        assert!(matches!(err, BiometricError::Config { .. }));
    }

    #[test]
    fn test_env_overlay() {
        let mut config = PromptConfig::default();
        config
            .merge_with_vars([
                ("BIOPROMPT_DWELL_MS", "750"),
                ("BIOPROMPT_CANCEL_CODES", "10, 42"),
                ("BIOPROMPT_PREFER_COMPAT_PROMPT", "true"),
                ("UNRELATED", "ignored"),
            ])
            .unwrap();
        assert_eq!(config.dwell_ms, 750);
        assert_eq!(config.cancel_codes.codes().collect::<Vec<_>>(), vec![10, 42]);
        assert!(config.prefer_compat_prompt);
    }

    #[test]
    fn test_env_overlay_rejects_garbage() {
        let mut config = PromptConfig::default();
        assert!(config
            .merge_with_vars([("BIOPROMPT_CANCEL_CODES", "5,abc")])
            .is_err());
        assert!(config
            .merge_with_vars([("BIOPROMPT_DWELL_MS", "soon")])
            .is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "dwell_ms = 3000\nprefer_compat_prompt = true").unwrap();
        let config = PromptConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.dwell_ms, 3000);
        assert!(config.prefer_compat_prompt);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = PromptConfig::load_from_file(Path::new("/nonexistent/bioprompt.toml"))
            .unwrap_err();
        assert!(matches!(err, BiometricError::Config { .. }));
    }
}
