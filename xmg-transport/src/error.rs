//! Transport error types

use thiserror::Error;

use crate::acpi::AcpiStatus;

/// Errors that can occur while calling the firmware
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The firmware method reported failure. Not retried.
    #[error("Firmware call 0x{function_id:02X} failed: {status}")]
    CallFailed { function_id: u32, status: AcpiStatus },
}
