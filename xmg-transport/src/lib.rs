//! Firmware transport for XMG/Clevo DCHU keyboard and fan control
//!
//! This crate wraps the vendor `_DSM` method exposed by the platform
//! firmware. Callers hand it a function id and a payload; it builds the
//! four-argument envelope, evaluates it and returns the raw result.
//!
//! - `Firmware`: raw backend that evaluates a prepared envelope
//! - `DchuTransport`: call adapter used by the keyboard layer
//! - `PrinterFirmware`: monitoring middleware
//! - `NullFirmware`: accepts everything, for dry runs

pub mod acpi;
pub mod envelope;
pub mod error;
pub mod printer;
pub mod protocol;
pub mod types;

mod adapter;

pub use acpi::{AcpiObject, AcpiStatus, ObjectType};
pub use adapter::DchuTransport;
pub use envelope::DsmEnvelope;
pub use error::TransportError;
pub use printer::{CallFilter, NullFirmware, OutputFormat, PrinterConfig, PrinterFirmware};
pub use types::{FirmwareInfo, FirmwareResponse};

/// The core firmware trait - all backends implement this
///
/// A backend evaluates one fully-built `_DSM` envelope and returns the
/// object the method produced, or the platform status on failure.
pub trait Firmware: Send + Sync {
    /// Evaluate the vendor method with the given envelope
    fn evaluate(&self, envelope: &DsmEnvelope) -> Result<Option<AcpiObject>, AcpiStatus>;

    /// Describe the backend
    fn info(&self) -> FirmwareInfo;
}
