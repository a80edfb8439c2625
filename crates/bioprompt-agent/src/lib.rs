//! Bioprompt Agent
//!
//! Runtime orchestration of biometric verification sessions on top of the
//! `bioprompt-core` traits and the `bioprompt-effects` handlers:
//! - [`EmitterRegistry`]: token → weak result channel, for re-attaching a
//!   recreated UI surface to a running session
//! - [`ErrorDisplayScheduler`]: dwell-timed help/error display on the surface
//! - the session driver folding the backend's event stream into one result
//! - [`BiometricAuth`] / [`AuthHandle`]: the public entry point
//!
//! Sessions run as tokio tasks; `authenticate` never blocks.

pub mod auth;
pub mod channel;
pub mod registry;
pub mod scheduler;
mod session;

pub use auth::{AuthHandle, BiometricAuth};
pub use channel::ResultChannel;
pub use registry::{EmitterRegistry, RegistrationGuard};
pub use scheduler::{ErrorDisplayScheduler, SurfaceSlot};
