//! Legacy-native backend over the single-callback fingerprint API.

use bioprompt_core::effects::{
    AuthEventStream, BackendKind, BiometricBackend, CancelSignal, CapabilityProbe,
};
use bioprompt_core::{AuthRequest, CancelCodeTable, Result};
use std::sync::Arc;
use tracing::{debug, warn};

use super::guard_platform_call;
use super::native::FingerprintManagerApi;
use super::normalizer::{EventSink, FingerprintEvents};

/// Drives [`FingerprintManagerApi`] directly.
///
/// The native API draws nothing, so the core-driven surface shows the
/// request texts and messages.
pub struct LegacyNativeBackend {
    api: Arc<dyn FingerprintManagerApi>,
    cancel_codes: CancelCodeTable,
}

impl LegacyNativeBackend {
    /// Backend over the fingerprint-manager API.
    pub fn new(api: Arc<dyn FingerprintManagerApi>, cancel_codes: CancelCodeTable) -> Self {
        Self { api, cancel_codes }
    }
}

impl CapabilityProbe for LegacyNativeBackend {
    fn has_hardware(&self) -> bool {
        self.api.is_hardware_detected()
    }

    fn has_enrolled_credentials(&self) -> bool {
        self.api.has_enrolled_fingerprints()
    }
}

impl BiometricBackend for LegacyNativeBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::LegacyNative
    }

    fn authenticate(&self, request: &AuthRequest, cancel: CancelSignal) -> Result<AuthEventStream> {
        let (tx, stream) = AuthEventStream::channel();
        let events = Arc::new(FingerprintEvents::new(EventSink::new(
            tx,
            self.cancel_codes.clone(),
            cancel.clone(),
        )));
        let crypto = request.crypto().cloned();
        debug!(
            crypto = crypto.as_ref().map(|c| c.kind()),
            "starting legacy fingerprint authentication"
        );

        guard_platform_call(|| self.api.authenticate(crypto, cancel, events)).map_err(|err| {
            warn!(error = %err, "legacy fingerprint setup failed");
            err
        })?;
        Ok(stream)
    }
}
