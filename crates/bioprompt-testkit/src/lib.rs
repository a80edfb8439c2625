//! Bioprompt Testing Infrastructure
//!
//! Scripted stand-ins for the native biometric APIs, a surface that records
//! every call, and tracing setup for tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! bioprompt-testkit = { path = "../bioprompt-testkit" }
//! ```
//!
//! ```rust,no_run
//! use bioprompt_testkit::*;
//! use std::sync::Arc;
//!
//! let platform = Arc::new(ScriptedFingerprintManager::new());
//! let surface = Arc::new(RecordingSurface::new());
//! // hand `platform` to a backend, drive it with `platform.help(..)`, ...
//! ```

pub mod logging;
pub mod platform;
pub mod surface;

pub use logging::init_test_tracing;
pub use platform::{ScriptedFingerprintManager, ScriptedPromptApi};
pub use surface::{RecordingSurface, SurfaceEffect};
