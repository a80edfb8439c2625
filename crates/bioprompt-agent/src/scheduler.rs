//! Error-display scheduler
//!
//! Drives the [`PromptSurface`] from transient session events. The first
//! message enters the error state; messages arriving while it is shown only
//! re-acknowledge it and restart the dwell timer. When the dwell expires the
//! surface reverts to the idle prompt. Reaching a terminal result cancels any
//! pending timer; the surface is closed right after.
//!
//! The surface is reached through a [`SurfaceSlot`]: held weakly, and
//! swappable when a recreated UI re-attaches to the session. Surface calls
//! are made after the display state lock is released, so a surface may call
//! back into the scheduler.

use bioprompt_core::effects::{PhysicalTimeEffects, PromptSurface};
use bioprompt_core::{AuthEvent, AuthRequest};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tokio::task::JoinHandle;
use tracing::{trace, warn};

struct SlotState {
    surface: Weak<dyn PromptSurface>,
    /// Set by `replace`; the next message enters the error state afresh.
    swapped: bool,
}

/// Weak, swappable handle on the surface a session draws on.
///
/// Never keeps a surface alive: the UI layer owns it. Once it is dropped,
/// display updates are skipped until another surface is attached.
pub struct SurfaceSlot {
    state: Mutex<SlotState>,
}

impl SurfaceSlot {
    /// Create a slot pointing at `surface`.
    pub fn new(surface: &Arc<dyn PromptSurface>) -> Self {
        Self {
            state: Mutex::new(SlotState {
                surface: Arc::downgrade(surface),
                swapped: false,
            }),
        }
    }

    /// Route all further display updates to `surface`.
    pub fn replace(&self, surface: &Arc<dyn PromptSurface>) {
        let mut state = self.state.lock();
        state.surface = Arc::downgrade(surface);
        state.swapped = true;
    }

    /// The current surface, if its owner still holds it.
    pub fn current(&self) -> Option<Arc<dyn PromptSurface>> {
        self.state.lock().surface.upgrade()
    }

    /// Current surface plus whether it was swapped in since the last call.
    fn take_current(&self) -> Option<(Arc<dyn PromptSurface>, bool)> {
        let mut state = self.state.lock();
        let surface = state.surface.upgrade()?;
        let swapped = std::mem::take(&mut state.swapped);
        Some((surface, swapped))
    }
}

#[derive(Debug, Default)]
struct DisplayState {
    showing_error: bool,
    /// Bumped on every message; a timer only reverts its own generation.
    generation: u64,
    revert: Option<JoinHandle<()>>,
    finished: bool,
}

struct SchedulerInner {
    slot: Arc<SurfaceSlot>,
    time: Arc<dyn PhysicalTimeEffects>,
    dwell_ms: u64,
    idle_prompt: String,
    not_recognized: String,
    state: Mutex<DisplayState>,
}

/// Per-session display state machine. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct ErrorDisplayScheduler {
    inner: Arc<SchedulerInner>,
}

impl ErrorDisplayScheduler {
    /// Create a scheduler for one session of `request`.
    pub fn new(
        slot: Arc<SurfaceSlot>,
        time: Arc<dyn PhysicalTimeEffects>,
        dwell_ms: u64,
        request: &AuthRequest,
    ) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                slot,
                time,
                dwell_ms,
                idle_prompt: request.idle_prompt().to_string(),
                not_recognized: request.not_recognized_text().to_string(),
                state: Mutex::new(DisplayState::default()),
            }),
        }
    }

    /// Display a transient event. Must run inside a tokio runtime.
    pub fn on_event(&self, event: &AuthEvent) {
        match event {
            AuthEvent::Help { message, .. } | AuthEvent::Error { message, .. } => {
                self.show(message);
            }
            AuthEvent::Failed => {
                let text = self.inner.not_recognized.clone();
                self.show(&text);
            }
            AuthEvent::Success { .. } => {}
        }
    }

    /// Show a terminal error message and keep it up until [`Self::finish`].
    pub fn hold_terminal(&self, message: &str) {
        let (reacknowledge, timer) = {
            let mut state = self.inner.state.lock();
            if state.finished {
                return;
            }
            let reacknowledge = std::mem::replace(&mut state.showing_error, true);
            state.generation += 1;
            (reacknowledge, state.revert.take())
        };
        if let Some(timer) = timer {
            timer.abort();
        }
        self.inner.display(message, reacknowledge);
    }

    /// Cancel any pending dwell timer and close the surface.
    pub fn finish(&self) {
        let timer = {
            let mut state = self.inner.state.lock();
            if state.finished {
                return;
            }
            state.finished = true;
            state.revert.take()
        };
        if let Some(timer) = timer {
            trace!("terminal result; cancelling dwell timer");
            timer.abort();
        }
        if let Some(surface) = self.inner.slot.current() {
            surface.close();
        }
    }

    /// Whether an error message is currently on screen.
    pub fn is_showing_error(&self) -> bool {
        self.inner.state.lock().showing_error
    }

    fn show(&self, message: &str) {
        let reacknowledge = {
            let mut state = self.inner.state.lock();
            if state.finished {
                return;
            }
            let reacknowledge = std::mem::replace(&mut state.showing_error, true);
            if let Some(timer) = state.revert.take() {
                timer.abort();
            }
            state.generation += 1;
            let generation = state.generation;
            let inner = Arc::clone(&self.inner);
            state.revert = Some(tokio::spawn(async move {
                inner.revert_after_dwell(generation).await;
            }));
            reacknowledge
        };
        self.inner.display(message, reacknowledge);
    }
}

impl SchedulerInner {
    fn display(&self, message: &str, reacknowledge: bool) {
        let Some((surface, swapped)) = self.slot.take_current() else {
            trace!("surface dropped; skipping display update");
            return;
        };
        surface.show_message(message);
        if reacknowledge && !swapped {
            surface.reacknowledge_error();
        } else {
            surface.enter_error();
        }
    }

    async fn revert_after_dwell(&self, generation: u64) {
        if let Err(err) = self.time.sleep_ms(self.dwell_ms).await {
            warn!(error = %err, "dwell timer failed; keeping message on screen");
            return;
        }
        {
            let mut state = self.state.lock();
            if state.finished || state.generation != generation {
                return;
            }
            state.showing_error = false;
            state.revert = None;
        }
        trace!(dwell_ms = self.dwell_ms, "dwell expired; reverting to idle prompt");
        if let Some((surface, _)) = self.slot.take_current() {
            surface.revert_to_idle(&self.idle_prompt);
        }
    }
}
