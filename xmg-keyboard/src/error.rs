//! Driver error types

use thiserror::Error;
use xmg_transport::TransportError;

use crate::sensor::{FanChannel, SensorError};

/// Errors from control-surface operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DriverError {
    /// Value out of range or argument of the wrong kind
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Caller lacks the privilege required for raw passthrough
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Firmware call failed
    #[error("Firmware call failed: {0}")]
    FirmwareCallFailed(#[from] TransportError),

    /// Firmware returned an object the caller cannot use
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Fan reported a zero tachometer sample
    #[error("{channel} fan speed is not measurable")]
    Unmeasurable { channel: FanChannel },

    /// Unknown control command id
    #[error("Unsupported command: 0x{0:08X}")]
    Unsupported(u32),
}

impl From<SensorError> for DriverError {
    fn from(err: SensorError) -> Self {
        match err {
            SensorError::Transport(e) => Self::FirmwareCallFailed(e),
            SensorError::Unmeasurable { channel } => Self::Unmeasurable { channel },
            e @ (SensorError::UnexpectedType { .. } | SensorError::Truncated { .. }) => {
                Self::UnexpectedResponse(e.to_string())
            }
        }
    }
}
