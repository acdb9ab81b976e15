//! `_DSM` argument envelope builder
//!
//! The firmware expects a fixed shape for every call:
//!
//! ```text
//! Arg0  Buffer   vendor UUID (16 bytes)
//! Arg1  Integer  revision (0)
//! Arg2  Integer  function id
//! Arg3  Package  [ Buffer(payload >= 16 bytes), Integer(0) x 259 ]
//! ```
//!
//! The filler integers carry no data; the firmware rejects packages of any
//! other size.

use crate::acpi::AcpiObject;
use crate::protocol::{ARG_COUNT, DCHU_UUID, DSM_REVISION, MIN_PAYLOAD_LEN, PACKAGE_LEN};

/// One outbound firmware call. Built per call and never retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DsmEnvelope {
    function_id: u32,
    payload: Vec<u8>,
}

impl DsmEnvelope {
    /// Build an envelope, zero-padding `payload` to the 16-byte minimum.
    /// Longer payloads are kept unchanged.
    pub fn new(function_id: u32, payload: &[u8]) -> Self {
        let mut buf = payload.to_vec();
        if buf.len() < MIN_PAYLOAD_LEN {
            buf.resize(MIN_PAYLOAD_LEN, 0);
        }
        Self {
            function_id,
            payload: buf,
        }
    }

    pub fn uuid(&self) -> &'static [u8; 16] {
        &DCHU_UUID
    }

    pub fn revision(&self) -> u64 {
        DSM_REVISION
    }

    pub fn function_id(&self) -> u32 {
        self.function_id
    }

    /// Payload as transmitted (after padding)
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// The fourth argument: payload buffer followed by integer filler
    pub fn package(&self) -> AcpiObject {
        let mut elements = Vec::with_capacity(PACKAGE_LEN);
        elements.push(AcpiObject::Buffer(self.payload.clone()));
        elements.resize(PACKAGE_LEN, AcpiObject::Integer(0));
        AcpiObject::Package(elements)
    }

    /// Full argument list in `_DSM` order
    pub fn args(&self) -> [AcpiObject; ARG_COUNT] {
        [
            AcpiObject::Buffer(DCHU_UUID.to_vec()),
            AcpiObject::Integer(DSM_REVISION),
            AcpiObject::Integer(u64::from(self.function_id)),
            self.package(),
        ]
    }
}
