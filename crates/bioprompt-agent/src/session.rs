//! Session driver: one spawned task per running session.

use bioprompt_core::effects::{
    AuthEventStream, BackendKind, CancelSignal, CancellationToken, PhysicalTimeEffects,
};
use bioprompt_core::{Reduction, SessionReducer, TerminalResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::registry::RegistrationGuard;
use crate::scheduler::ErrorDisplayScheduler;

/// Marks a backend instance busy for as long as it is held.
#[derive(Debug)]
pub(crate) struct ActiveSession {
    flag: Arc<AtomicBool>,
}

impl ActiveSession {
    /// `None` if another session already holds the flag.
    pub(crate) fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self {
                flag: Arc::clone(flag),
            })
    }
}

impl Drop for ActiveSession {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

pub(crate) struct SessionDriver {
    pub(crate) kind: BackendKind,
    pub(crate) stream: AuthEventStream,
    pub(crate) cancel: CancelSignal,
    pub(crate) scheduler: ErrorDisplayScheduler,
    pub(crate) time: Arc<dyn PhysicalTimeEffects>,
    pub(crate) dwell_ms: u64,
    pub(crate) registration: RegistrationGuard,
    pub(crate) active: ActiveSession,
}

impl SessionDriver {
    /// Fold the event stream into one terminal result and deliver it.
    ///
    /// The channel is sealed as soon as the outcome is decided. The
    /// registration and the busy flag are released before delivery,
    /// whatever the outcome.
    pub(crate) async fn run(mut self) {
        let token = self.registration.token();
        let mut reducer = SessionReducer::new();
        debug!(token = %token, backend = %self.kind, "session started");

        let result = loop {
            let reduction = tokio::select! {
                biased;
                event = self.stream.next_event() => match event {
                    Some(event) => reducer.observe(event),
                    None => reducer.close(),
                },
                _ = self.cancel.cancelled() => reducer.cancel(),
            };
            match reduction {
                Reduction::Transient(event) => self.scheduler.on_event(&event),
                Reduction::Terminal(result) => break result,
                Reduction::Discarded => {}
            }
        };
        info!(
            token = %token,
            backend = %self.kind,
            outcome = outcome_label(&result),
            "session reached terminal result"
        );

        if let Some(channel) = self.registration.registry().lookup(token) {
            channel.seal();
        }

        if let TerminalResult::AuthFailed { text, .. } = &result {
            if !self.kind.renders_own_prompt() {
                self.scheduler.hold_terminal(text);
                if let Err(err) = self.time.sleep_ms(self.dwell_ms).await {
                    warn!(token = %token, error = %err, "terminal hold timer failed");
                }
            }
        }
        self.scheduler.finish();

        // Token and busy flag are released before the caller is woken.
        let channel = self.registration.registry().lookup(token);
        drop(self.registration);
        drop(self.active);
        match channel {
            Some(channel) => {
                channel.deliver(result);
            }
            None => debug!(token = %token, "session owner gone; result dropped"),
        }
    }
}

fn outcome_label(result: &TerminalResult) -> &'static str {
    match result {
        TerminalResult::Success(_) => "success",
        TerminalResult::AuthFailed { .. } => "auth_failed",
        TerminalResult::Cancelled => "cancelled",
    }
}
