//! Firmware call adapter
//!
//! `DchuTransport` wraps a raw `Firmware` backend (which only evaluates a
//! prepared envelope) and adds envelope construction, status mapping and
//! call tracing.
//!
//! ```text
//! [AcpiFirmware / NullFirmware]   <- implements Firmware (raw evaluate)
//!              |
//!      [PrinterFirmware]          <- optional monitoring middleware
//!              |
//!       [DchuTransport]           <- builds envelopes, maps failures
//!              |
//!     [codec / sensor / control]
//! ```

use std::sync::Arc;

use tracing::{debug, error};

use crate::envelope::DsmEnvelope;
use crate::error::TransportError;
use crate::protocol::describe;
use crate::types::{FirmwareInfo, FirmwareResponse};
use crate::Firmware;

/// Issues DCHU calls against a firmware backend.
///
/// Holds no per-call state; serialization of calls is the caller's job.
#[derive(Clone)]
pub struct DchuTransport {
    inner: Arc<dyn Firmware>,
}

impl DchuTransport {
    pub fn new(firmware: Arc<dyn Firmware>) -> Self {
        Self { inner: firmware }
    }

    /// Invoke `function_id` with `payload` and return whatever the firmware
    /// produced. Failures are reported once and never retried.
    pub fn invoke(&self, function_id: u32, payload: &[u8]) -> Result<FirmwareResponse, TransportError> {
        let envelope = DsmEnvelope::new(function_id, payload);
        debug!("DSM {}", describe(function_id, envelope.payload()));

        match self.inner.evaluate(&envelope) {
            Ok(object) => {
                let response = FirmwareResponse::new(object);
                debug!(
                    "DSM 0x{:02X} returned {} len={}",
                    function_id,
                    response.object_type(),
                    response.len()
                );
                Ok(response)
            }
            Err(status) => {
                error!("DSM 0x{function_id:02X} failed: {status}");
                Err(TransportError::CallFailed {
                    function_id,
                    status,
                })
            }
        }
    }

    /// Invoke with output requested (telemetry and passthrough)
    pub fn query(&self, function_id: u32, payload: &[u8]) -> Result<FirmwareResponse, TransportError> {
        self.invoke(function_id, payload)
    }

    /// Invoke and discard the result (set operations)
    pub fn send(&self, function_id: u32, payload: &[u8]) -> Result<(), TransportError> {
        self.invoke(function_id, payload).map(drop)
    }

    pub fn info(&self) -> FirmwareInfo {
        self.inner.info()
    }
}
