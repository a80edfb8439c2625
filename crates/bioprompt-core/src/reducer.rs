//! Session reducer
//!
//! Folds a normalized event stream into exactly one [`TerminalResult`].
//!
//! States are `Running` and `Terminal`. While running, `Help` and `Failed`
//! pass through as transient display updates and the first `Success` or
//! `Error` ends the session. Closing the stream or cancelling while still
//! running yields `Cancelled`; an empty completion is never a silent success.
//! Once terminal, every further input is discarded.

use crate::event::{AuthEvent, TerminalResult};
use tracing::trace;

/// What the reducer made of one input.
#[derive(Debug, Clone, PartialEq)]
pub enum Reduction {
    /// Non-terminal event to forward to the display scheduler
    Transient(AuthEvent),
    /// The session just ended with this result
    Terminal(TerminalResult),
    /// Input arrived after the session already ended
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReducerState {
    Running,
    Terminal,
}

/// Running → Terminal state machine for one session.
#[derive(Debug)]
pub struct SessionReducer {
    state: ReducerState,
}

impl SessionReducer {
    /// Reducer for a fresh, running session.
    pub fn new() -> Self {
        Self {
            state: ReducerState::Running,
        }
    }

    /// Whether a terminal result has been produced.
    pub fn is_terminal(&self) -> bool {
        self.state == ReducerState::Terminal
    }

    /// Feed one normalized event.
    pub fn observe(&mut self, event: AuthEvent) -> Reduction {
        if self.is_terminal() {
            trace!(event = event.label(), "discarding event after terminal result");
            return Reduction::Discarded;
        }
        match event {
            AuthEvent::Help { .. } | AuthEvent::Failed => Reduction::Transient(event),
            AuthEvent::Success { credential } => {
                self.terminate(TerminalResult::Success(credential))
            }
            AuthEvent::Error { code, message } => {
                self.terminate(TerminalResult::AuthFailed {
                    code,
                    text: message,
                })
            }
        }
    }

    /// The event stream ended.
    pub fn close(&mut self) -> Reduction {
        if self.is_terminal() {
            return Reduction::Discarded;
        }
        self.terminate(TerminalResult::Cancelled)
    }

    /// Cancellation was requested.
    pub fn cancel(&mut self) -> Reduction {
        if self.is_terminal() {
            trace!("cancel after terminal result is a no-op");
            return Reduction::Discarded;
        }
        self.terminate(TerminalResult::Cancelled)
    }

    fn terminate(&mut self, result: TerminalResult) -> Reduction {
        self.state = ReducerState::Terminal;
        Reduction::Terminal(result)
    }
}

impl Default for SessionReducer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes;
    use proptest::prelude::*;

    fn help() -> AuthEvent {
        AuthEvent::Help {
            code: codes::help::ACQUIRED_TOO_FAST,
            message: "Finger moved too fast".into(),
        }
    }

    #[test]
    fn test_transient_events_keep_running() {
        let mut reducer = SessionReducer::new();
        assert_eq!(reducer.observe(help()), Reduction::Transient(help()));
        assert_eq!(
            reducer.observe(AuthEvent::Failed),
            Reduction::Transient(AuthEvent::Failed)
        );
        assert!(!reducer.is_terminal());
    }

    #[test]
    fn test_first_terminal_wins() {
        let mut reducer = SessionReducer::new();
        assert_eq!(
            reducer.observe(AuthEvent::Success { credential: None }),
            Reduction::Terminal(TerminalResult::Success(None))
        );
        assert_eq!(
            reducer.observe(AuthEvent::Error {
                code: codes::error::LOCKOUT,
                message: "locked".into()
            }),
            Reduction::Discarded
        );
        assert_eq!(reducer.cancel(), Reduction::Discarded);
        assert_eq!(reducer.close(), Reduction::Discarded);
    }

    #[test]
    fn test_error_maps_to_auth_failed() {
        let mut reducer = SessionReducer::new();
        assert_eq!(
            reducer.observe(AuthEvent::Error {
                code: 1042,
                message: "vendor failure".into()
            }),
            Reduction::Terminal(TerminalResult::AuthFailed {
                code: 1042,
                text: "vendor failure".into()
            })
        );
    }

    #[test]
    fn test_empty_stream_is_cancelled() {
        let mut reducer = SessionReducer::new();
        assert_eq!(
            reducer.close(),
            Reduction::Terminal(TerminalResult::Cancelled)
        );
    }

    #[test]
    fn test_cancel_before_any_event() {
        let mut reducer = SessionReducer::new();
        assert_eq!(
            reducer.cancel(),
            Reduction::Terminal(TerminalResult::Cancelled)
        );
        assert_eq!(reducer.observe(AuthEvent::Failed), Reduction::Discarded);
    }

    fn arb_event() -> impl Strategy<Value = AuthEvent> {
        prop_oneof![
            any::<i32>().prop_map(|code| AuthEvent::Help {
                code,
                message: "help".into()
            }),
            any::<i32>().prop_map(|code| AuthEvent::Error {
                code,
                message: "error".into()
            }),
            Just(AuthEvent::Failed),
            Just(AuthEvent::Success { credential: None }),
        ]
    }

    proptest! {
        #[test]
        fn test_exactly_one_terminal(
            events in proptest::collection::vec(arb_event(), 0..32),
            cancel_at in proptest::option::of(0usize..32),
        ) {
            let mut reducer = SessionReducer::new();
            let mut terminals = 0usize;

            for (index, event) in events.iter().cloned().enumerate() {
                if cancel_at == Some(index) {
                    if let Reduction::Terminal(_) = reducer.cancel() {
                        terminals += 1;
                    }
                }
                let was_terminal = reducer.is_terminal();
                match reducer.observe(event) {
                    Reduction::Terminal(_) => {
                        terminals += 1;
                    }
                    Reduction::Discarded => prop_assert!(was_terminal),
                    Reduction::Transient(ev) => prop_assert!(!ev.is_terminal()),
                }
            }
            if let Reduction::Terminal(result) = reducer.close() {
                terminals += 1;
                prop_assert_eq!(result, TerminalResult::Cancelled);
            }

            prop_assert_eq!(terminals, 1);
            prop_assert!(reducer.is_terminal());
        }
    }
}
