//! Well-known platform codes carried by `Help` and `Error` events.
//!
//! Neither list is exhaustive. Vendors add their own values, so every consumer
//! must treat an unknown code as opaque and pass it through unchanged.

/// Error codes reported with terminal `Error` events.
pub mod error {
    /// The hardware is unavailable. Try again later.
    pub const HW_UNAVAILABLE: i32 = 1;

    /// The sensor was unable to process the current image.
    pub const UNABLE_TO_PROCESS: i32 = 2;

    /// The request ran too long (platform and sensor specific, usually ~30s).
    pub const TIMEOUT: i32 = 3;

    /// Not enough storage remaining to complete the operation.
    pub const NO_SPACE: i32 = 4;

    /// The operation was canceled because the sensor became unavailable,
    /// or because the caller honoured a cancellation signal.
    pub const CANCELED: i32 = 5;

    /// A remove call failed.
    pub const UNABLE_TO_REMOVE: i32 = 6;

    /// Too many failed attempts; locked out for a short period.
    pub const LOCKOUT: i32 = 7;

    /// `LOCKOUT` occurred too many times; strong authentication is required.
    pub const LOCKOUT_PERMANENT: i32 = 9;

    /// The user dismissed the prompt.
    pub const USER_CANCELED: i32 = 10;

    /// The user has no biometrics enrolled.
    pub const NO_BIOMETRICS: i32 = 11;

    /// The device has no biometric sensor.
    pub const HW_NOT_PRESENT: i32 = 12;

    /// Placeholder code for failures that carry no platform code.
    pub const UNKNOWN: i32 = 0;
}

/// Image acquisition codes reported with `Help` events.
pub mod help {
    /// The image acquired was good.
    pub const ACQUIRED_GOOD: i32 = 0;

    /// Only a partial image was detected.
    pub const ACQUIRED_PARTIAL: i32 = 1;

    /// The image was too noisy to process.
    pub const ACQUIRED_INSUFFICIENT: i32 = 2;

    /// Suspected dirt on the sensor.
    pub const ACQUIRED_IMAGER_DIRTY: i32 = 3;

    /// Unreadable due to lack of motion.
    pub const ACQUIRED_TOO_SLOW: i32 = 4;

    /// Incomplete due to quick motion.
    pub const ACQUIRED_TOO_FAST: i32 = 5;
}
