//! Modern-native backend over the consolidated platform prompt.

use bioprompt_core::effects::{
    AuthEventStream, BackendKind, BiometricBackend, CancelSignal, CapabilityProbe,
};
use bioprompt_core::{AuthRequest, CancelCodeTable, Result};
use std::sync::Arc;
use tracing::{debug, warn};

use super::guard_platform_call;
use super::native::{BiometricPromptApi, PromptSpec};
use super::normalizer::{EventSink, PromptEvents};

/// Drives [`BiometricPromptApi`]. The platform renders the prompt; its
/// negative button is reported in-process and ends the session as cancelled.
pub struct ModernNativeBackend {
    api: Arc<dyn BiometricPromptApi>,
    cancel_codes: CancelCodeTable,
}

impl ModernNativeBackend {
    /// Backend over a system-rendered prompt API.
    pub fn new(api: Arc<dyn BiometricPromptApi>, cancel_codes: CancelCodeTable) -> Self {
        Self { api, cancel_codes }
    }
}

impl CapabilityProbe for ModernNativeBackend {
    fn has_hardware(&self) -> bool {
        self.api.is_hardware_detected()
    }

    fn has_enrolled_credentials(&self) -> bool {
        self.api.has_enrolled_fingerprints()
    }
}

impl BiometricBackend for ModernNativeBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::ModernNative
    }

    fn authenticate(&self, request: &AuthRequest, cancel: CancelSignal) -> Result<AuthEventStream> {
        let (tx, stream) = AuthEventStream::channel();
        let events = Arc::new(PromptEvents::new(EventSink::new(
            tx,
            self.cancel_codes.clone(),
            cancel.clone(),
        )));
        let spec = PromptSpec::from(request);
        let crypto = request.crypto().cloned();
        debug!(title = %spec.title, "starting platform prompt");

        guard_platform_call(|| self.api.authenticate(spec, crypto, cancel, events)).map_err(
            |err| {
                warn!(error = %err, "platform prompt setup failed");
                err
            },
        )?;
        Ok(stream)
    }
}
