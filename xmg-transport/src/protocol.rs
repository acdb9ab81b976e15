//! Protocol constants for the DCHU `_DSM` interface

/// Vendor UUID scoping the `_DSM` method (byte order as passed to ACPI).
pub const DCHU_UUID: [u8; 16] = [
    0xe4, 0x24, 0xf2, 0x93, 0xdc, 0xfb, 0xbf, 0x4b, 0xad, 0xd6, 0xdb, 0x71, 0xbd, 0xc0, 0xaf, 0xad,
];

/// `_DSM` revision argument. The firmware only knows revision 0.
pub const DSM_REVISION: u64 = 0;

/// Minimum payload buffer size accepted by the firmware
pub const MIN_PAYLOAD_LEN: usize = 0x10;

/// Element count of the fourth `_DSM` argument (payload buffer + integer filler)
pub const PACKAGE_LEN: usize = 0x104;

/// Number of argument objects passed to `_DSM`
pub const ARG_COUNT: usize = 4;

/// DCHU function ids (third `_DSM` argument)
pub mod function {
    /// Keyboard lighting: brightness and colour
    pub const KEYBOARD_DCHU_COMMAND: u32 = 0x67;
    /// Keyboard options: idle timeout and boot effect
    pub const KEYBOARD_DCHU_COMMAND_2: u32 = 0x79;
    /// Fan/temperature telemetry readout
    pub const FAN_DCHU_COMMAND_GET: u32 = 0x63;

    /// Get human-readable name for a function id
    pub fn name(function_id: u32) -> &'static str {
        match function_id {
            KEYBOARD_DCHU_COMMAND => "KEYBOARD_DCHU_COMMAND",
            KEYBOARD_DCHU_COMMAND_2 => "KEYBOARD_DCHU_COMMAND_2",
            FAN_DCHU_COMMAND_GET => "FAN_DCHU_COMMAND_GET",
            _ => "UNKNOWN",
        }
    }
}

/// Tags stored in the top byte of a 32-bit keyboard command
pub mod magic {
    use super::function;

    pub const BRIGHTNESS: u8 = 0xF4;
    pub const COLOR: u8 = 0xF0;
    pub const TIMEOUT: u8 = 0x12;
    pub const BOOT: u8 = 0x0E;

    /// Low byte marker of an enabled idle timeout
    pub const TIMEOUT_ENABLED_MARKER: u8 = 0xFF;

    /// Name of the tag for a given function id, if it is a known pair.
    ///
    /// Colour and timeout tags are only meaningful on their own function id,
    /// so the function is part of the lookup.
    pub fn name(function_id: u32, tag: u8) -> Option<&'static str> {
        match (function_id, tag) {
            (function::KEYBOARD_DCHU_COMMAND, BRIGHTNESS) => Some("BRIGHTNESS"),
            (function::KEYBOARD_DCHU_COMMAND, COLOR) => Some("COLOR"),
            (function::KEYBOARD_DCHU_COMMAND_2, TIMEOUT) => Some("TIMEOUT"),
            (function::KEYBOARD_DCHU_COMMAND_2, BOOT) => Some("BOOT_EFFECT"),
            _ => None,
        }
    }
}

/// Fan telemetry record layout
pub mod fan_record {
    /// Minimum response length carrying all fields
    pub const LEN: usize = 22;

    pub const CPU_RPM: usize = 2;
    pub const GPU_RPM: usize = 4;
    pub const GPU2_RPM: usize = 6;

    pub const CPU_DUTY: usize = 16;
    pub const CPU_TEMP: usize = 17;
    pub const GPU_DUTY: usize = 18;
    pub const GPU_TEMP: usize = 19;
    pub const GPU2_DUTY: usize = 20;
    pub const GPU2_TEMP: usize = 21;

    /// `rpm = RPM_DIVIDEND / sample` (fan controller clock scaled by its divisor)
    pub const RPM_DIVIDEND: u32 = 2_156_250;
}

/// Describe a keyboard command payload for monitoring output.
///
/// Decodes the little-endian 32-bit value at the start of the payload and
/// names its magic tag when the function id is a keyboard function.
pub fn describe(function_id: u32, payload: &[u8]) -> String {
    let fname = function::name(function_id);
    let Some(word) = payload.get(..4) else {
        return format!("{fname} ({} bytes)", payload.len());
    };
    let value = u32::from_le_bytes([word[0], word[1], word[2], word[3]]);
    let tag = (value >> 24) as u8;
    match magic::name(function_id, tag) {
        Some(tag_name) => format!("{fname} {tag_name} value=0x{:06X}", value & 0x00FF_FFFF),
        None => format!("{fname} 0x{value:08X}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_names() {
        assert_eq!(function::name(0x67), "KEYBOARD_DCHU_COMMAND");
        assert_eq!(function::name(0x79), "KEYBOARD_DCHU_COMMAND_2");
        assert_eq!(function::name(0x63), "FAN_DCHU_COMMAND_GET");
        assert_eq!(function::name(0x01), "UNKNOWN");
    }

    #[test]
    fn test_magic_is_scoped_by_function() {
        assert_eq!(
            magic::name(function::KEYBOARD_DCHU_COMMAND, magic::COLOR),
            Some("COLOR")
        );
        // Timeout tag on the lighting function is not a known command
        assert_eq!(magic::name(function::KEYBOARD_DCHU_COMMAND, magic::TIMEOUT), None);
    }

    #[test]
    fn test_describe() {
        let payload = 0xF400_0020u32.to_le_bytes();
        assert_eq!(
            describe(function::KEYBOARD_DCHU_COMMAND, &payload),
            "KEYBOARD_DCHU_COMMAND BRIGHTNESS value=0x000020"
        );
        assert_eq!(
            describe(function::FAN_DCHU_COMMAND_GET, &[]),
            "FAN_DCHU_COMMAND_GET (0 bytes)"
        );
        assert_eq!(describe(0x42, &[1, 0, 0, 0]), "UNKNOWN 0x00000001");
    }
}
