//! Minimal ACPI object model for `_DSM` arguments and results

use std::fmt;

use serde::Serialize;

/// ACPI object type tag (values follow `ACPI_TYPE_*`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum ObjectType {
    /// No object returned
    Any = 0,
    Integer = 1,
    String = 2,
    Buffer = 3,
    Package = 4,
}

impl ObjectType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Integer => "integer",
            Self::String => "string",
            Self::Buffer => "buffer",
            Self::Package => "package",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An ACPI object as passed to or returned from a control method
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum AcpiObject {
    Integer(u64),
    String(String),
    Buffer(Vec<u8>),
    Package(Vec<AcpiObject>),
}

impl AcpiObject {
    pub fn object_type(&self) -> ObjectType {
        match self {
            Self::Integer(_) => ObjectType::Integer,
            Self::String(_) => ObjectType::String,
            Self::Buffer(_) => ObjectType::Buffer,
            Self::Package(_) => ObjectType::Package,
        }
    }

    /// Length as ACPI reports it: bytes for buffers and strings,
    /// element count for packages, 8 for integers.
    pub fn len(&self) -> usize {
        match self {
            Self::Integer(_) => std::mem::size_of::<u64>(),
            Self::String(s) => s.len(),
            Self::Buffer(b) => b.len(),
            Self::Package(p) => p.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_buffer(&self) -> Option<&[u8]> {
        match self {
            Self::Buffer(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<u64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_package(&self) -> Option<&[AcpiObject]> {
        match self {
            Self::Package(p) => Some(p),
            _ => None,
        }
    }
}

/// Status code reported by the platform when evaluating a method fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AcpiStatus(pub u32);

impl AcpiStatus {
    pub const AE_ERROR: Self = Self(0x0001);
    pub const AE_NO_MEMORY: Self = Self(0x0004);
    pub const AE_NOT_FOUND: Self = Self(0x0005);
    pub const AE_TYPE: Self = Self(0x0008);
    pub const AE_BAD_PARAMETER: Self = Self(0x1001);

    /// Exception name, if this is one of the well-known codes
    pub fn name(&self) -> Option<&'static str> {
        match *self {
            Self::AE_ERROR => Some("AE_ERROR"),
            Self::AE_NO_MEMORY => Some("AE_NO_MEMORY"),
            Self::AE_NOT_FOUND => Some("AE_NOT_FOUND"),
            Self::AE_TYPE => Some("AE_TYPE"),
            Self::AE_BAD_PARAMETER => Some("AE_BAD_PARAMETER"),
            _ => None,
        }
    }
}

impl fmt::Display for AcpiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name} (0x{:04X})", self.0),
            None => write!(f, "0x{:04X}", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_len() {
        assert_eq!(AcpiObject::Integer(5).len(), 8);
        assert_eq!(AcpiObject::Buffer(vec![0; 3]).len(), 3);
        assert_eq!(
            AcpiObject::Package(vec![AcpiObject::Integer(0), AcpiObject::Integer(1)]).len(),
            2
        );
        assert!(AcpiObject::String(String::new()).is_empty());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(AcpiStatus::AE_NOT_FOUND.to_string(), "AE_NOT_FOUND (0x0005)");
        assert_eq!(AcpiStatus(0x3001).to_string(), "0x3001");
    }

    #[test]
    fn test_object_json() {
        let json = serde_json::to_string(&AcpiObject::Buffer(vec![1, 2])).unwrap();
        assert_eq!(json, r#"{"type":"buffer","value":[1,2]}"#);
    }
}
