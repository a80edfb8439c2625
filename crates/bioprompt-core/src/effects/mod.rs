//! Effect trait definitions
//!
//! Interfaces implemented by handlers in `bioprompt-effects` and by the host
//! application. The orchestration layer only ever talks to these traits.

pub mod backend;
pub mod surface;
pub mod task;
pub mod time;

pub use backend::{AuthEventStream, BackendKind, BiometricBackend, CapabilityProbe};
pub use surface::{HeadlessSurface, PromptSurface};
pub use task::{CancelSignal, CancellationToken};
pub use time::{PhysicalTimeEffects, TimeError};
