//! Keyboard lighting and fan telemetry for XMG/Clevo laptops
//!
//! This crate sits on top of `xmg_transport` and turns typed requests into
//! DCHU firmware calls:
//!
//! - `codec`: validated command encoding
//! - `sensor`: fan/temperature record decoding
//! - `control`: per-device dispatcher holding retained state
//! - `resume`: replay of volatile settings after suspend

pub mod codec;
pub mod control;
pub mod error;
pub mod resume;
pub mod sensor;
pub mod state;

pub use codec::{
    decode_command, encode_boot_effect, encode_brightness, encode_color, encode_timeout,
    DchuCommand, DchuTransportExt, HardwareRevision, KeyboardCommand, SetBootEffect,
    SetBrightness, SetColor, SetTimeout, MAX_TIMEOUT,
};
pub use control::{
    is_effective_root, ControlArg, ControlCommand, ControlResponse, PrivilegeCheck,
    RawCommandRequest, RawResult, XmgDevice, MAX_RAW_LEN,
};
pub use error::DriverError;
pub use resume::{ReplayedSetting, ResumeReport};
pub use sensor::{decode_fan_record, FanChannel, SensorError, SensorReading};
pub use state::DeviceState;

// Re-export transport types consumers need to build a device
pub use xmg_transport::{Firmware, NullFirmware};
