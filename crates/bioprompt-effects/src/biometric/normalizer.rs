//! Event normalization
//!
//! Adapters that sit on the native callback side and push [`AuthEvent`]s into
//! the session stream. Callbacks may fire on any platform thread.
//!
//! Rules applied here:
//! - an error whose code is in the [`CancelCodeTable`] closes the stream
//!   without emitting an `Error`, so the session ends as `Cancelled`
//! - every other code passes through verbatim
//! - after the first `Success` or `Error` the stream is closed and later
//!   callbacks are dropped

use bioprompt_core::effects::CancelSignal;
use bioprompt_core::{AuthEvent, CancelCodeTable, CryptoHandle};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, trace};

use super::native::{FingerprintCallback, PromptCallback};

/// Shared sending half of one session's event stream.
#[derive(Debug)]
pub struct EventSink {
    tx: Mutex<Option<mpsc::UnboundedSender<AuthEvent>>>,
    cancel_codes: CancelCodeTable,
    cancel: CancelSignal,
}

impl EventSink {
    /// Sink feeding `tx`. Codes in `cancel_codes` close the stream silently.
    pub fn new(
        tx: mpsc::UnboundedSender<AuthEvent>,
        cancel_codes: CancelCodeTable,
        cancel: CancelSignal,
    ) -> Self {
        Self {
            tx: Mutex::new(Some(tx)),
            cancel_codes,
            cancel,
        }
    }

    /// Forward a transient help message.
    pub fn help(&self, code: i32, message: &str) {
        self.push(AuthEvent::Help {
            code,
            message: message.to_string(),
        });
    }

    /// Forward a read that matched no enrolled finger.
    pub fn failed(&self) {
        self.push(AuthEvent::Failed);
    }

    /// Forward success and close the sink.
    pub fn succeeded(&self, credential: Option<CryptoHandle>) {
        self.push(AuthEvent::Success { credential });
    }

    /// Forward a terminal error and close the sink. Cancel codes close it without an event.
    pub fn error(&self, code: i32, message: &str) {
        if self.cancel_codes.contains(code) {
            debug!(code, "platform reported cancellation; closing stream");
            self.close();
            return;
        }
        self.push(AuthEvent::Error {
            code,
            message: message.to_string(),
        });
    }

    /// The user dismissed the prompt from inside the process.
    pub fn user_cancelled(&self) {
        debug!("negative button pressed; cancelling platform call");
        self.cancel.cancel();
        self.close();
    }

    /// Whether a terminal callback was already seen.
    pub fn is_closed(&self) -> bool {
        self.tx.lock().is_none()
    }

    fn close(&self) {
        self.tx.lock().take();
    }

    fn push(&self, event: AuthEvent) {
        let mut guard = self.tx.lock();
        let Some(tx) = guard.as_ref() else {
            trace!(event = event.label(), "stream closed; dropping platform callback");
            return;
        };
        let terminal = event.is_terminal();
        if tx.send(event).is_err() || terminal {
            *guard = None;
        }
    }
}

/// Adapter for the legacy fingerprint API callback shape.
#[derive(Debug)]
pub struct FingerprintEvents {
    sink: EventSink,
}

impl FingerprintEvents {
    pub fn new(sink: EventSink) -> Self {
        Self { sink }
    }
}

impl FingerprintCallback for FingerprintEvents {
    fn on_error(&self, code: i32, message: &str) {
        self.sink.error(code, message);
    }

    fn on_help(&self, code: i32, message: &str) {
        self.sink.help(code, message);
    }

    fn on_succeeded(&self, crypto: Option<CryptoHandle>) {
        self.sink.succeeded(crypto);
    }

    fn on_failed(&self) {
        self.sink.failed();
    }
}

/// Adapter for the consolidated prompt API callback shape.
#[derive(Debug)]
pub struct PromptEvents {
    sink: EventSink,
}

impl PromptEvents {
    pub fn new(sink: EventSink) -> Self {
        Self { sink }
    }
}

impl PromptCallback for PromptEvents {
    fn on_error(&self, code: i32, message: &str) {
        self.sink.error(code, message);
    }

    fn on_help(&self, code: i32, message: &str) {
        self.sink.help(code, message);
    }

    fn on_succeeded(&self, crypto: Option<CryptoHandle>) {
        self.sink.succeeded(crypto);
    }

    fn on_failed(&self) {
        self.sink.failed();
    }

    fn on_negative_button(&self) {
        self.sink.user_cancelled();
    }
}
