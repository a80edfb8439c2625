//! Confirmation surface contract
//!
//! Rendering (titles, icons, animations) lives outside the core. Whatever
//! draws the prompt implements [`PromptSurface`]; the display scheduler drives
//! it from the normalized event stream. Calls may arrive on the platform's
//! callback thread, so implementations marshal onto their UI context.

use crate::types::AuthRequest;

/// Outbound display effects of one session.
pub trait PromptSurface: Send + Sync {
    /// Show the prompt for a new session.
    fn present(&self, request: &AuthRequest);

    /// Replace the status text with a help, error or not-recognized message.
    fn show_message(&self, text: &str);

    /// Run the transition from the idle icon into the error state.
    fn enter_error(&self);

    /// A new message arrived while an error is already shown.
    fn reacknowledge_error(&self);

    /// Dwell expired: restore the idle prompt and run the reverse transition.
    fn revert_to_idle(&self, prompt: &str);

    /// The session reached its terminal result; dismiss the surface.
    fn close(&self);
}

/// Surface for backends that render their own prompt, or headless hosts.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessSurface;

impl PromptSurface for HeadlessSurface {
    fn present(&self, _request: &AuthRequest) {}

    fn show_message(&self, _text: &str) {}

    fn enter_error(&self) {}

    fn reacknowledge_error(&self) {}

    fn revert_to_idle(&self, _prompt: &str) {}

    fn close(&self) {}
}
