//! Retained keyboard state

/// Last values successfully applied to the firmware.
///
/// Zeroed at attach. A field is only written after its firmware call
/// succeeded, so it always reflects what the hardware was last told.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceState {
    pub brightness: u8,
    /// Packed 24-bit colour
    pub color: u32,
    /// Idle timeout in seconds; negative means disabled
    pub timeout: i32,
}
