//! Biometric backend variants
//!
//! Every variant implements [`bioprompt_core::effects::BiometricBackend`].
//! Native callback shapes stay behind the adapters in [`normalizer`].

mod legacy;
mod modern;
pub mod native;
pub mod normalizer;
pub mod selection;
mod unsupported;

pub use legacy::LegacyNativeBackend;
pub use modern::ModernNativeBackend;
pub use unsupported::UnsupportedBackend;

use bioprompt_core::BiometricError;
use std::panic::{catch_unwind, AssertUnwindSafe};

use native::PlatformFault;

/// Run native setup glue, turning both reported faults and panics into
/// terminal platform errors.
pub(crate) fn guard_platform_call<F>(call: F) -> Result<(), BiometricError>
where
    F: FnOnce() -> Result<(), PlatformFault>,
{
    match catch_unwind(AssertUnwindSafe(call)) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(fault)) => Err(fault.into()),
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "platform call panicked".to_string());
            Err(BiometricError::platform(
                bioprompt_core::codes::error::UNKNOWN,
                message,
            ))
        }
    }
}
