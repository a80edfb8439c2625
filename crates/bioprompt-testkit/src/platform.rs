//! Scripted native APIs
//!
//! Both mocks record each `authenticate` call and keep the callback, so a
//! test fires platform callbacks by hand in whatever order it needs. By
//! default they also mimic the platform's cancel acknowledgement: once the
//! session's cancel signal flips, `on_error(CANCELED, ..)` is delivered; the
//! code is configurable.

use bioprompt_core::codes;
use bioprompt_core::effects::{CancelSignal, CancellationToken};
use bioprompt_core::CryptoHandle;
use bioprompt_effects::{
    BiometricPromptApi, FingerprintCallback, FingerprintManagerApi, PlatformFault,
    PromptCallback, PromptSpec,
};
use parking_lot::Mutex;
use std::sync::Arc;

const CANCEL_ACK_MESSAGE: &str = "Fingerprint operation canceled.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SetupBehavior {
    Start,
    Fault,
    Panic,
}

struct ScriptState<C: ?Sized> {
    hardware: bool,
    enrolled: bool,
    ack_code: Option<i32>,
    setup: SetupBehavior,
    fault: Option<PlatformFault>,
    calls: usize,
    callback: Option<Arc<C>>,
    crypto: Option<CryptoHandle>,
    cancel: Option<CancelSignal>,
}

impl<C: ?Sized> ScriptState<C> {
    fn new() -> Self {
        Self {
            hardware: true,
            enrolled: true,
            ack_code: Some(codes::error::CANCELED),
            setup: SetupBehavior::Start,
            fault: None,
            calls: 0,
            callback: None,
            crypto: None,
            cancel: None,
        }
    }

    /// Record a call and decide how setup ends.
    fn begin(
        &mut self,
        crypto: Option<CryptoHandle>,
        cancel: &CancelSignal,
    ) -> Result<(), PlatformFault> {
        self.calls += 1;
        match self.setup {
            SetupBehavior::Start => {
                self.crypto = crypto;
                self.cancel = Some(cancel.clone());
                Ok(())
            }
            SetupBehavior::Fault => Err(self
                .fault
                .clone()
                .unwrap_or_else(|| PlatformFault::new(codes::error::UNKNOWN, "setup failed"))),
            SetupBehavior::Panic => panic!("scripted platform panic during setup"),
        }
    }
}

/// Run `ack` on the current runtime once `cancel` flips.
fn spawn_cancel_ack<F>(cancel: CancelSignal, ack: F)
where
    F: FnOnce() + Send + 'static,
{
    if let Ok(handle) = tokio::runtime::Handle::try_current() {
        handle.spawn(async move {
            cancel.cancelled().await;
            ack();
        });
    }
}

/// Scripted legacy fingerprint API.
pub struct ScriptedFingerprintManager {
    state: Mutex<ScriptState<dyn FingerprintCallback>>,
}

impl ScriptedFingerprintManager {
    /// Hardware present, one fingerprint enrolled, cancel acknowledged.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ScriptState::new()),
        }
    }

    /// What `has_hardware` reports.
    pub fn set_hardware(&self, present: bool) {
        self.state.lock().hardware = present;
    }

    /// What `has_enrolled_credentials` reports.
    pub fn set_enrolled(&self, enrolled: bool) {
        self.state.lock().enrolled = enrolled;
    }

    /// Acknowledge cancellation with `code` instead of `CANCELED`.
    pub fn ack_cancel_with(&self, code: i32) {
        self.state.lock().ack_code = Some(code);
    }

    /// Never acknowledge cancellation.
    pub fn disable_cancel_ack(&self) {
        self.state.lock().ack_code = None;
    }

    /// Make the next `authenticate` fail during setup.
    pub fn fail_setup_with(&self, fault: PlatformFault) {
        let mut state = self.state.lock();
        state.setup = SetupBehavior::Fault;
        state.fault = Some(fault);
    }

    /// Make the next `authenticate` panic during setup.
    pub fn panic_on_setup(&self) {
        self.state.lock().setup = SetupBehavior::Panic;
    }

    /// Number of `authenticate` calls received.
    pub fn call_count(&self) -> usize {
        self.state.lock().calls
    }

    pub fn last_crypto(&self) -> Option<CryptoHandle> {
        self.state.lock().crypto.clone()
    }

    /// Cancel signal passed with the last call.
    pub fn last_cancel(&self) -> Option<CancelSignal> {
        self.state.lock().cancel.clone()
    }

    pub fn help(&self, code: i32, message: &str) {
        if let Some(callback) = self.callback() {
            callback.on_help(code, message);
        }
    }

    pub fn failed(&self) {
        if let Some(callback) = self.callback() {
            callback.on_failed();
        }
    }

    pub fn succeed(&self, crypto: Option<CryptoHandle>) {
        if let Some(callback) = self.callback() {
            callback.on_succeeded(crypto);
        }
    }

    pub fn error(&self, code: i32, message: &str) {
        if let Some(callback) = self.callback() {
            callback.on_error(code, message);
        }
    }

    fn callback(&self) -> Option<Arc<dyn FingerprintCallback>> {
        self.state.lock().callback.clone()
    }
}

impl Default for ScriptedFingerprintManager {
    fn default() -> Self {
        Self::new()
    }
}

impl FingerprintManagerApi for ScriptedFingerprintManager {
    fn is_hardware_detected(&self) -> bool {
        self.state.lock().hardware
    }

    fn has_enrolled_fingerprints(&self) -> bool {
        self.state.lock().enrolled
    }

    fn authenticate(
        &self,
        crypto: Option<CryptoHandle>,
        cancel: CancelSignal,
        callback: Arc<dyn FingerprintCallback>,
    ) -> Result<(), PlatformFault> {
        let ack_code = {
            let mut state = self.state.lock();
            state.begin(crypto, &cancel)?;
            state.callback = Some(callback.clone());
            state.ack_code
        };
        if let Some(code) = ack_code {
            spawn_cancel_ack(cancel, move || callback.on_error(code, CANCEL_ACK_MESSAGE));
        }
        Ok(())
    }
}

/// Scripted platform prompt API.
pub struct ScriptedPromptApi {
    state: Mutex<ScriptState<dyn PromptCallback>>,
    spec: Mutex<Option<PromptSpec>>,
}

impl ScriptedPromptApi {
    /// Hardware present, one fingerprint enrolled, cancel acknowledged.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ScriptState::new()),
            spec: Mutex::new(None),
        }
    }

    /// What `has_hardware` reports.
    pub fn set_hardware(&self, present: bool) {
        self.state.lock().hardware = present;
    }

    /// What `has_enrolled_credentials` reports.
    pub fn set_enrolled(&self, enrolled: bool) {
        self.state.lock().enrolled = enrolled;
    }

    /// Acknowledge cancellation with `code` instead of the default.
    pub fn ack_cancel_with(&self, code: i32) {
        self.state.lock().ack_code = Some(code);
    }

    /// Never acknowledge cancellation.
    pub fn disable_cancel_ack(&self) {
        self.state.lock().ack_code = None;
    }

    /// Make the next `authenticate` fail during setup.
    pub fn fail_setup_with(&self, fault: PlatformFault) {
        let mut state = self.state.lock();
        state.setup = SetupBehavior::Fault;
        state.fault = Some(fault);
    }

    /// Make the next `authenticate` panic during setup.
    pub fn panic_on_setup(&self) {
        self.state.lock().setup = SetupBehavior::Panic;
    }

    /// Number of `authenticate` calls received.
    pub fn call_count(&self) -> usize {
        self.state.lock().calls
    }

    pub fn last_crypto(&self) -> Option<CryptoHandle> {
        self.state.lock().crypto.clone()
    }

    /// Cancel signal passed with the last call.
    pub fn last_cancel(&self) -> Option<CancelSignal> {
        self.state.lock().cancel.clone()
    }

    /// Texts the last prompt was shown with.
    pub fn last_spec(&self) -> Option<PromptSpec> {
        self.spec.lock().clone()
    }

    pub fn help(&self, code: i32, message: &str) {
        if let Some(callback) = self.callback() {
            callback.on_help(code, message);
        }
    }

    pub fn failed(&self) {
        if let Some(callback) = self.callback() {
            callback.on_failed();
        }
    }

    pub fn succeed(&self, crypto: Option<CryptoHandle>) {
        if let Some(callback) = self.callback() {
            callback.on_succeeded(crypto);
        }
    }

    pub fn error(&self, code: i32, message: &str) {
        if let Some(callback) = self.callback() {
            callback.on_error(code, message);
        }
    }

    pub fn press_negative_button(&self) {
        if let Some(callback) = self.callback() {
            callback.on_negative_button();
        }
    }

    fn callback(&self) -> Option<Arc<dyn PromptCallback>> {
        self.state.lock().callback.clone()
    }
}

impl Default for ScriptedPromptApi {
    fn default() -> Self {
        Self::new()
    }
}

impl BiometricPromptApi for ScriptedPromptApi {
    fn is_hardware_detected(&self) -> bool {
        self.state.lock().hardware
    }

    fn has_enrolled_fingerprints(&self) -> bool {
        self.state.lock().enrolled
    }

    fn authenticate(
        &self,
        spec: PromptSpec,
        crypto: Option<CryptoHandle>,
        cancel: CancelSignal,
        callback: Arc<dyn PromptCallback>,
    ) -> Result<(), PlatformFault> {
        let ack_code = {
            let mut state = self.state.lock();
            state.begin(crypto, &cancel)?;
            state.callback = Some(callback.clone());
            state.ack_code
        };
        *self.spec.lock() = Some(spec);
        if let Some(code) = ack_code {
            spawn_cancel_ack(cancel, move || callback.on_error(code, CANCEL_ACK_MESSAGE));
        }
        Ok(())
    }
}
