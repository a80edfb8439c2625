//! Production time handler backing the dwell timers.

use async_trait::async_trait;
use bioprompt_core::effects::{PhysicalTimeEffects, TimeError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::time;
use tracing::warn;

/// Real time handler for production use
///
/// Stateless; delegates to the tokio timer, so paused test runtimes
/// auto-advance through it as well. Outside a tokio runtime there is no
/// timer to sleep on and `sleep_ms` reports `ServiceUnavailable`.
#[derive(Debug, Clone, Default)]
pub struct RealTimeHandler;

impl RealTimeHandler {
    /// Create a new real time handler
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PhysicalTimeEffects for RealTimeHandler {
    async fn sleep_ms(&self, ms: u64) -> Result<(), TimeError> {
        if Handle::try_current().is_err() {
            warn!(ms, "sleep requested outside a tokio runtime");
            return Err(TimeError::ServiceUnavailable);
        }
        time::sleep(Duration::from_millis(ms)).await;
        Ok(())
    }
}
