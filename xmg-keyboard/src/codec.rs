//! Keyboard command codec
//!
//! Every keyboard command is a single little-endian 32-bit word: a magic tag
//! in the top byte and the value in the low 24 bits. Encoders validate their
//! input and never touch device state; a rejected value never reaches the
//! firmware.

use std::fmt;
use std::str::FromStr;

use tracing::debug;
use xmg_transport::protocol::{function, magic};
use xmg_transport::{DchuTransport, TransportError};

use crate::error::DriverError;

/// Largest idle timeout the firmware accepts, in seconds
pub const MAX_TIMEOUT: i32 = 0xFFFF;

/// Keyboard controller revision, which sets the brightness bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HardwareRevision {
    /// First-generation controller
    Early,
    #[default]
    Current,
}

impl HardwareRevision {
    /// Highest accepted brightness level
    pub const fn max_brightness(self) -> u8 {
        match self {
            Self::Early => 171,
            Self::Current => 191,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Early => "early",
            Self::Current => "current",
        }
    }
}

impl fmt::Display for HardwareRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HardwareRevision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "early" => Ok(Self::Early),
            "current" | "" => Ok(Self::Current),
            _ => Err(format!("Unknown hardware revision: {s}")),
        }
    }
}

/// A command that can be sent through the DCHU interface
pub trait DchuCommand {
    /// Function id the command is sent on
    const FUNCTION: u32;

    /// Encoded 32-bit command word
    fn value(&self) -> u32;

    /// Payload bytes as sent to the firmware (little endian)
    fn payload(&self) -> [u8; 4] {
        self.value().to_le_bytes()
    }
}

/// Set keyboard backlight brightness
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetBrightness {
    pub level: u8,
}

impl DchuCommand for SetBrightness {
    const FUNCTION: u32 = function::KEYBOARD_DCHU_COMMAND;

    fn value(&self) -> u32 {
        u32::from(magic::BRIGHTNESS) << 24 | u32::from(self.level)
    }
}

/// Set keyboard backlight colour (24-bit, opaque to the codec)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetColor {
    pub rgb: u32,
}

impl DchuCommand for SetColor {
    const FUNCTION: u32 = function::KEYBOARD_DCHU_COMMAND;

    fn value(&self) -> u32 {
        u32::from(magic::COLOR) << 24 | self.rgb
    }
}

/// Set or disable the backlight idle timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetTimeout {
    /// `None` disables the timeout
    pub seconds: Option<u16>,
}

impl DchuCommand for SetTimeout {
    const FUNCTION: u32 = function::KEYBOARD_DCHU_COMMAND_2;

    fn value(&self) -> u32 {
        let tag = u32::from(magic::TIMEOUT) << 24;
        match self.seconds {
            None => tag,
            Some(secs) => tag | u32::from(secs) << 8 | u32::from(magic::TIMEOUT_ENABLED_MARKER),
        }
    }
}

/// Enable or disable the boot-time lighting effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetBootEffect {
    pub enabled: bool,
}

impl DchuCommand for SetBootEffect {
    const FUNCTION: u32 = function::KEYBOARD_DCHU_COMMAND_2;

    fn value(&self) -> u32 {
        u32::from(magic::BOOT) << 24 | u32::from(self.enabled)
    }
}

/// Validate a brightness level against the revision bound
pub fn encode_brightness(level: i32, revision: HardwareRevision) -> Result<SetBrightness, DriverError> {
    let max = revision.max_brightness();
    match u8::try_from(level) {
        Ok(level) if level <= max => Ok(SetBrightness { level }),
        _ => Err(DriverError::InvalidArgument(format!(
            "brightness {level} out of range 0..={max}"
        ))),
    }
}

/// Validate a packed 24-bit colour
pub fn encode_color(rgb: u32) -> Result<SetColor, DriverError> {
    if rgb & 0xFF00_0000 != 0 {
        return Err(DriverError::InvalidArgument(format!(
            "colour 0x{rgb:08X} exceeds 24 bits"
        )));
    }
    Ok(SetColor { rgb })
}

/// Validate an idle timeout. Negative values disable it.
pub fn encode_timeout(seconds: i32) -> Result<SetTimeout, DriverError> {
    if seconds < 0 {
        return Ok(SetTimeout { seconds: None });
    }
    u16::try_from(seconds)
        .map(|secs| SetTimeout { seconds: Some(secs) })
        .map_err(|_| {
            DriverError::InvalidArgument(format!("timeout {seconds} out of range 0..={MAX_TIMEOUT}"))
        })
}

pub fn encode_boot_effect(enabled: bool) -> SetBootEffect {
    SetBootEffect { enabled }
}

/// A keyboard command recovered from a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardCommand {
    Brightness(SetBrightness),
    Color(SetColor),
    Timeout(SetTimeout),
    BootEffect(SetBootEffect),
}

/// Classify a payload sent on `function_id` back into a typed command.
///
/// Returns `None` for payloads shorter than one word, unknown function ids
/// and unknown tags. Bounds are not re-validated.
pub fn decode_command(function_id: u32, payload: &[u8]) -> Option<KeyboardCommand> {
    let word: [u8; 4] = payload.get(..4)?.try_into().ok()?;
    let value = u32::from_le_bytes(word);
    let tag = (value >> 24) as u8;
    let low = value & 0x00FF_FFFF;

    match (function_id, tag) {
        (function::KEYBOARD_DCHU_COMMAND, magic::BRIGHTNESS) => {
            Some(KeyboardCommand::Brightness(SetBrightness { level: low as u8 }))
        }
        (function::KEYBOARD_DCHU_COMMAND, magic::COLOR) => {
            Some(KeyboardCommand::Color(SetColor { rgb: low }))
        }
        (function::KEYBOARD_DCHU_COMMAND_2, magic::TIMEOUT) => {
            let seconds = (low != 0).then_some((low >> 8) as u16);
            Some(KeyboardCommand::Timeout(SetTimeout { seconds }))
        }
        (function::KEYBOARD_DCHU_COMMAND_2, magic::BOOT) => {
            Some(KeyboardCommand::BootEffect(SetBootEffect { enabled: low & 1 != 0 }))
        }
        _ => None,
    }
}

/// Extension trait for sending typed commands
pub trait DchuTransportExt {
    fn send_cmd<C: DchuCommand + fmt::Debug>(&self, cmd: &C) -> Result<(), TransportError>;
}

impl DchuTransportExt for DchuTransport {
    fn send_cmd<C: DchuCommand + fmt::Debug>(&self, cmd: &C) -> Result<(), TransportError> {
        debug!("Sending {cmd:?} (0x{:08X})", cmd.value());
        self.send(C::FUNCTION, &cmd.payload())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brightness_range() {
        for revision in [HardwareRevision::Early, HardwareRevision::Current] {
            let max = i32::from(revision.max_brightness());
            for level in 0..=max {
                let cmd = encode_brightness(level, revision).unwrap();
                assert_eq!(cmd.value() >> 24, 0xF4);
                assert_eq!(cmd.value() & 0x00FF_FFFF, level as u32);
            }
            assert!(matches!(
                encode_brightness(max + 1, revision),
                Err(DriverError::InvalidArgument(_))
            ));
            assert!(encode_brightness(-1, revision).is_err());
        }
    }

    #[test]
    fn test_brightness_payload_is_little_endian() {
        let cmd = encode_brightness(0x20, HardwareRevision::Current).unwrap();
        assert_eq!(cmd.payload(), [0x20, 0x00, 0x00, 0xF4]);
        assert_eq!(SetBrightness::FUNCTION, 0x67);
    }

    #[test]
    fn test_color_preserves_low_bits() {
        for rgb in (0..=0xFF_FFFF).step_by(0x1011).chain([0x00FF00, 0xFF_FFFF]) {
            let cmd = encode_color(rgb).unwrap();
            assert_eq!(cmd.value() & 0x00FF_FFFF, rgb);
            assert_eq!((cmd.value() >> 24) as u8, magic::COLOR);
        }
        assert!(encode_color(0x0100_0000).is_err());
        assert!(encode_color(u32::MAX).is_err());
    }

    #[test]
    fn test_timeout_encoding() {
        assert_eq!(encode_timeout(-1).unwrap().value(), u32::from(magic::TIMEOUT) << 24);
        assert_eq!(
            encode_timeout(0xFFFF).unwrap().value(),
            u32::from(magic::TIMEOUT) << 24 | 0xFFFF << 8 | 0xFF
        );
        assert_eq!(
            encode_timeout(0).unwrap().value(),
            u32::from(magic::TIMEOUT) << 24 | 0xFF
        );
        assert!(matches!(
            encode_timeout(0x10000),
            Err(DriverError::InvalidArgument(_))
        ));
        assert_eq!(SetTimeout::FUNCTION, function::KEYBOARD_DCHU_COMMAND_2);
    }

    #[test]
    fn test_boot_effect_encoding() {
        assert_eq!(encode_boot_effect(true).value() & 0xFF, 1);
        assert_eq!(encode_boot_effect(false).value() & 0xFF, 0);
        assert_eq!((encode_boot_effect(true).value() >> 24) as u8, magic::BOOT);
    }

    #[test]
    fn test_decode_command() {
        let color = encode_color(0x00FF00).unwrap();
        assert_eq!(
            decode_command(SetColor::FUNCTION, &color.payload()),
            Some(KeyboardCommand::Color(color))
        );

        let timeout = encode_timeout(30).unwrap();
        assert_eq!(
            decode_command(SetTimeout::FUNCTION, &timeout.payload()),
            Some(KeyboardCommand::Timeout(timeout))
        );

        let disabled = encode_timeout(-5).unwrap();
        assert_eq!(
            decode_command(SetTimeout::FUNCTION, &disabled.payload()),
            Some(KeyboardCommand::Timeout(SetTimeout { seconds: None }))
        );

        // Right tag, wrong function
        assert_eq!(decode_command(SetTimeout::FUNCTION, &color.payload()), None);
        assert_eq!(decode_command(SetColor::FUNCTION, &[0xF4]), None);
    }

    #[test]
    fn test_revision_parse() {
        assert_eq!("early".parse::<HardwareRevision>(), Ok(HardwareRevision::Early));
        assert_eq!("Current".parse::<HardwareRevision>(), Ok(HardwareRevision::Current));
        assert!("v3".parse::<HardwareRevision>().is_err());
        assert_eq!(HardwareRevision::default().max_brightness(), 191);
    }
}
