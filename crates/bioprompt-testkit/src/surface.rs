//! Recording prompt surface

use bioprompt_core::effects::PromptSurface;
use bioprompt_core::AuthRequest;
use parking_lot::Mutex;

/// One call made on a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEffect {
    /// `present`
    Presented {
        /// Title of the presented request
        title: String,
    },
    /// `show_message`
    Message(String),
    /// `enter_error`
    EnterError,
    /// `reacknowledge_error`
    Reacknowledge,
    /// `revert_to_idle`, with the idle prompt
    RevertToIdle(String),
    /// `close`
    Closed,
}

/// Surface that keeps an ordered log of every call it receives.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    effects: Mutex<Vec<SurfaceEffect>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all calls so far.
    pub fn effects(&self) -> Vec<SurfaceEffect> {
        self.effects.lock().clone()
    }

    /// Texts passed to `show_message`, in order.
    pub fn messages(&self) -> Vec<String> {
        self.effects
            .lock()
            .iter()
            .filter_map(|effect| match effect {
                SurfaceEffect::Message(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// How often `effect` was recorded.
    pub fn count(&self, effect: &SurfaceEffect) -> usize {
        self.effects.lock().iter().filter(|e| *e == effect).count()
    }

    pub fn is_closed(&self) -> bool {
        self.count(&SurfaceEffect::Closed) > 0
    }

    fn record(&self, effect: SurfaceEffect) {
        self.effects.lock().push(effect);
    }
}

impl PromptSurface for RecordingSurface {
    fn present(&self, request: &AuthRequest) {
        self.record(SurfaceEffect::Presented {
            title: request.title().to_string(),
        });
    }

    fn show_message(&self, text: &str) {
        self.record(SurfaceEffect::Message(text.to_string()));
    }

    fn enter_error(&self) {
        self.record(SurfaceEffect::EnterError);
    }

    fn reacknowledge_error(&self) {
        self.record(SurfaceEffect::Reacknowledge);
    }

    fn revert_to_idle(&self, prompt: &str) {
        self.record(SurfaceEffect::RevertToIdle(prompt.to_string()));
    }

    fn close(&self) {
        self.record(SurfaceEffect::Closed);
    }
}
