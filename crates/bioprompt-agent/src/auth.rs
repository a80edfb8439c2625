//! Authentication facade
//!
//! [`BiometricAuth`] owns one backend instance and starts sessions on it.
//! `authenticate` returns an [`AuthHandle`] immediately; the platform call
//! and the display scheduling run on a spawned tokio task.
//!
//! Preconditions are checked before any platform call. A failing check
//! resolves the handle right away with `AuthFailed`:
//! - invalid request texts
//! - unsupported platform, missing hardware, nothing enrolled
//! - another session still running on the same instance (`SessionBusy`)

use bioprompt_core::effects::{
    BackendKind, BiometricBackend, CancelSignal, PhysicalTimeEffects, PromptSurface,
};
use bioprompt_core::{
    codes, AuthRequest, BiometricError, CryptoHandle, PromptConfig, Result, SessionToken,
    TerminalResult,
};
use bioprompt_effects::RealTimeHandler;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::channel::ResultChannel;
use crate::registry::{EmitterRegistry, RegistrationGuard};
use crate::scheduler::{ErrorDisplayScheduler, SurfaceSlot};
use crate::session::{ActiveSession, SessionDriver};

/// Entry point for biometric verification on one backend instance.
pub struct BiometricAuth {
    backend: Arc<dyn BiometricBackend>,
    registry: Arc<EmitterRegistry>,
    time: Arc<dyn PhysicalTimeEffects>,
    config: PromptConfig,
    active: Arc<AtomicBool>,
}

impl BiometricAuth {
    /// Use the process-wide registry, real timers and default configuration.
    pub fn new(backend: Arc<dyn BiometricBackend>) -> Self {
        Self {
            backend,
            registry: EmitterRegistry::global(),
            time: Arc::new(RealTimeHandler::new()),
            config: PromptConfig::default(),
            active: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Use `registry` instead of the process-wide one.
    pub fn with_registry(mut self, registry: Arc<EmitterRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Use `time` for the dwell timers.
    pub fn with_time(mut self, time: Arc<dyn PhysicalTimeEffects>) -> Self {
        self.time = time;
        self
    }

    /// Dwell timing comes from `config`; cancel codes are fixed by the
    /// backend at selection time.
    pub fn with_config(mut self, config: PromptConfig) -> Self {
        self.config = config;
        self
    }

    /// Variant the sessions run on.
    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    pub fn config(&self) -> &PromptConfig {
        &self.config
    }

    /// Forwarded to the backend.
    pub fn has_hardware(&self) -> bool {
        self.backend.has_hardware()
    }

    /// Forwarded to the backend.
    pub fn has_enrolled_credentials(&self) -> bool {
        self.backend.has_enrolled_credentials()
    }

    /// Start a session. Never blocks and never panics on platform failure.
    ///
    /// The returned handle is the only strong owner of the session's result
    /// channel; dropping every clone of it orphans the result, while the
    /// platform call runs on until terminal or cancelled. `surface` is held
    /// weakly; the caller keeps it alive for as long as it should be drawn on.
    pub fn authenticate(
        &self,
        request: AuthRequest,
        surface: Arc<dyn PromptSurface>,
    ) -> AuthHandle {
        let cancel = CancelSignal::new();
        let slot = Arc::new(SurfaceSlot::new(&surface));
        let channel = Arc::new(ResultChannel::new(cancel.clone(), Arc::clone(&slot)));
        let registration = RegistrationGuard::register(Arc::clone(&self.registry), &channel);
        let token = registration.token();
        let handle = AuthHandle { token, channel };

        let active = match self.admit(&request) {
            Ok(active) => active,
            Err(err) => {
                warn!(token = %token, error = %err, "session rejected before platform call");
                handle.resolve(&err);
                return handle;
            }
        };
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(err) => {
                let err = BiometricError::platform(codes::error::UNKNOWN, err.to_string());
                warn!(token = %token, error = %err, "no async runtime to drive the session");
                handle.resolve(&err);
                return handle;
            }
        };

        surface.present(&request);
        let stream = match self.backend.authenticate(&request, cancel.clone()) {
            Ok(stream) => stream,
            Err(err) => {
                warn!(token = %token, error = %err, "platform call setup failed");
                surface.close();
                handle.resolve(&err);
                return handle;
            }
        };

        let kind = self.backend.kind();
        info!(token = %token, backend = %kind, "session running");
        let driver = SessionDriver {
            kind,
            stream,
            cancel,
            scheduler: ErrorDisplayScheduler::new(
                slot,
                Arc::clone(&self.time),
                self.config.dwell_ms,
                &request,
            ),
            time: Arc::clone(&self.time),
            dwell_ms: self.config.dwell_ms,
            registration,
            active,
        };
        runtime.spawn(driver.run());
        handle
    }

    /// Re-attach to a running session, e.g. after the UI surface was
    /// recreated. `None` means the session is gone.
    ///
    /// The remaining display updates of the session, including `close`, go to
    /// `surface` from now on; the previous surface is no longer touched.
    pub fn reattach(
        &self,
        token: SessionToken,
        surface: Arc<dyn PromptSurface>,
    ) -> Option<AuthHandle> {
        let channel = self.registry.lookup(token)?;
        channel.attach_surface(&surface);
        debug!(token = %token, "re-attached to running session");
        Some(AuthHandle { token, channel })
    }

    fn admit(&self, request: &AuthRequest) -> Result<ActiveSession> {
        request.validate()?;
        self.backend.check_preconditions()?;
        ActiveSession::acquire(&self.active).ok_or_else(|| {
            BiometricError::session_busy("another session is already running on this backend")
        })
    }
}

/// Caller's handle on one session.
///
/// Clones share the same session. Awaiting the result is cancel-safe.
#[derive(Debug, Clone)]
pub struct AuthHandle {
    token: SessionToken,
    channel: Arc<ResultChannel>,
}

impl AuthHandle {
    /// Token to stash for [`BiometricAuth::reattach`].
    pub fn token(&self) -> SessionToken {
        self.token
    }

    /// Request cancellation. Returns `false` if the session already ended
    /// or was already cancelled.
    pub fn cancel(&self) -> bool {
        self.channel.cancel()
    }

    /// Whether the outcome is decided; see [`ResultChannel::is_terminal`].
    pub fn is_terminal(&self) -> bool {
        self.channel.is_terminal()
    }

    /// The result, if already delivered.
    pub fn try_result(&self) -> Option<TerminalResult> {
        self.channel.try_result()
    }

    /// Wait for the single terminal result.
    pub async fn result(&self) -> TerminalResult {
        self.channel.wait().await
    }

    /// Wait for the result as a `Result`; cancellation is
    /// `Err(BiometricError::UserCancelled)`.
    pub async fn outcome(&self) -> Result<Option<CryptoHandle>> {
        self.result().await.into_outcome()
    }

    fn resolve(&self, err: &BiometricError) {
        self.channel.cancel_signal().cancel();
        self.channel.deliver(TerminalResult::from_error(err));
    }
}
