//! Common types for the transport layer

use crate::acpi::{AcpiObject, ObjectType};

/// Raw result of a firmware call, handed back uninterpreted
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FirmwareResponse {
    object: Option<AcpiObject>,
}

impl FirmwareResponse {
    pub fn new(object: Option<AcpiObject>) -> Self {
        Self { object }
    }

    /// Declared type of the returned object (`Any` when nothing came back)
    pub fn object_type(&self) -> ObjectType {
        self.object
            .as_ref()
            .map_or(ObjectType::Any, AcpiObject::object_type)
    }

    /// Declared length of the returned object
    pub fn len(&self) -> usize {
        self.object.as_ref().map_or(0, AcpiObject::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn object(&self) -> Option<&AcpiObject> {
        self.object.as_ref()
    }

    pub fn into_object(self) -> Option<AcpiObject> {
        self.object
    }

    /// Buffer contents, if the firmware returned a buffer
    pub fn buffer(&self) -> Option<&[u8]> {
        self.object.as_ref().and_then(AcpiObject::as_buffer)
    }
}

/// Backend description, for logs and `status` output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirmwareInfo {
    /// Backend name (e.g. "null", "printer(null)")
    pub backend: String,
    /// ACPI path of the evaluated device, if known
    pub device_path: Option<String>,
}

impl FirmwareInfo {
    pub fn new(backend: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            device_path: None,
        }
    }
}
