//! Bioprompt Core
//!
//! Interface layer for biometric (fingerprint) verification sessions.
//!
//! This crate owns everything that is independent of a concrete platform:
//! - the data model (`AuthRequest`, `CryptoHandle`, `SessionToken`, `AuthEvent`, `TerminalResult`)
//! - the error taxonomy (`BiometricError`)
//! - configuration (`PromptConfig`, `CancelCodeTable`)
//! - effect traits implemented by handlers in `bioprompt-effects`
//! - the session reducer that folds an event stream into one terminal result
//!
//! Nothing in here spawns tasks or talks to a platform API.

pub mod codes;
pub mod config;
pub mod effects;
pub mod errors;
pub mod event;
pub mod reducer;
pub mod types;

pub use config::{CancelCodeTable, PromptConfig};
pub use errors::{BiometricError, Result};
pub use event::{AuthEvent, TerminalResult};
pub use reducer::{Reduction, SessionReducer};
pub use types::{AuthRequest, CryptoHandle, OpaqueHandle, SessionToken};
