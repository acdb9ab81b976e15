//! Control surface and command dispatcher
//!
//! `XmgDevice` owns one device's transport and retained state. Requests come
//! in either through `dispatch` (numeric command id plus argument, the shape
//! of an ioctl call) or through the typed methods, and both take the same
//! path:
//!
//! ```text
//! lock state -> validate/encode -> firmware call -> update state -> unlock
//! ```
//!
//! The state lock is held across the firmware call, so at most one call per
//! device is in flight. Telemetry reads, raw passthrough and resume take the
//! same lock.

use std::mem::size_of;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};
use xmg_transport::{AcpiObject, DchuTransport, Firmware, FirmwareInfo};

use crate::codec::{
    encode_boot_effect, encode_brightness, encode_color, encode_timeout, DchuTransportExt,
    HardwareRevision,
};
use crate::error::DriverError;
use crate::sensor::{self, SensorError, SensorReading};
use crate::state::DeviceState;

/// Largest buffer accepted by raw passthrough
pub const MAX_RAW_LEN: usize = 4096;

/// ioctl type byte shared by all control commands
pub const CONTROL_MAGIC: u8 = b'X';

const IOC_WRITE: u32 = 1;
const IOC_READ: u32 = 2;

const fn ioc(dir: u32, ty: u8, nr: u8, size: usize) -> u32 {
    dir << 30 | (size as u32) << 16 | (ty as u32) << 8 | nr as u32
}

const fn iow(ty: u8, nr: u8, size: usize) -> u32 {
    ioc(IOC_WRITE, ty, nr, size)
}

const fn iowr(ty: u8, nr: u8, size: usize) -> u32 {
    ioc(IOC_READ | IOC_WRITE, ty, nr, size)
}

/// Stable command identifiers
pub mod id {
    use super::*;

    pub const SET_BRIGHTNESS: u32 = iow(CONTROL_MAGIC, 0x00, size_of::<libc::c_int>());
    pub const SET_COLOR: u32 = iow(CONTROL_MAGIC, 0x01, size_of::<libc::c_int>());
    pub const SET_TIMEOUT: u32 = iow(CONTROL_MAGIC, 0x02, size_of::<libc::c_int>());
    pub const SET_BOOT_EFFECT: u32 = iow(CONTROL_MAGIC, 0x03, size_of::<libc::c_int>());
    /// Argument is a pointer to the request record, hence pointer size
    pub const CALL_RAW: u32 = iowr(CONTROL_MAGIC, 0x10, size_of::<*mut libc::c_void>());
}

/// Control commands understood by the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlCommand {
    SetBrightness,
    SetColor,
    SetTimeout,
    SetBootEffect,
    CallRaw,
}

impl ControlCommand {
    pub fn from_id(command_id: u32) -> Option<Self> {
        match command_id {
            id::SET_BRIGHTNESS => Some(Self::SetBrightness),
            id::SET_COLOR => Some(Self::SetColor),
            id::SET_TIMEOUT => Some(Self::SetTimeout),
            id::SET_BOOT_EFFECT => Some(Self::SetBootEffect),
            id::CALL_RAW => Some(Self::CallRaw),
            _ => None,
        }
    }

    pub fn id(self) -> u32 {
        match self {
            Self::SetBrightness => id::SET_BRIGHTNESS,
            Self::SetColor => id::SET_COLOR,
            Self::SetTimeout => id::SET_TIMEOUT,
            Self::SetBootEffect => id::SET_BOOT_EFFECT,
            Self::CallRaw => id::CALL_RAW,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::SetBrightness => "SET_BRIGHTNESS",
            Self::SetColor => "SET_COLOR",
            Self::SetTimeout => "SET_TIMEOUT",
            Self::SetBootEffect => "SET_BOOT_EFFECT",
            Self::CallRaw => "CALL_RAW",
        }
    }
}

/// Raw passthrough request.
///
/// `buffer` is both input and output: its length is the payload length and
/// the output capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCommandRequest {
    pub function_id: u32,
    pub buffer: Vec<u8>,
}

impl RawCommandRequest {
    pub fn new(function_id: u32, buffer: Vec<u8>) -> Self {
        Self {
            function_id,
            buffer,
        }
    }
}

/// Outcome of a successful raw passthrough
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawResult {
    /// Bytes of response written to the front of the buffer
    pub length: usize,
    /// The response did not fit the caller's buffer
    pub truncated: bool,
}

/// Argument accompanying a dispatched command
#[derive(Debug)]
pub enum ControlArg<'a> {
    Int(i32),
    Raw(&'a mut RawCommandRequest),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlResponse {
    Done,
    Raw(RawResult),
}

/// Decides whether the caller may use raw passthrough
pub trait PrivilegeCheck: Send + Sync {
    fn is_privileged(&self) -> bool;
}

impl<F> PrivilegeCheck for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn is_privileged(&self) -> bool {
        self()
    }
}

/// Default privilege check: effective uid 0
pub fn is_effective_root() -> bool {
    // SAFETY: geteuid has no preconditions and cannot fail
    unsafe { libc::geteuid() == 0 }
}

/// One keyboard/fan controller
pub struct XmgDevice {
    pub(crate) transport: DchuTransport,
    revision: HardwareRevision,
    privilege: Box<dyn PrivilegeCheck>,
    pub(crate) state: Mutex<DeviceState>,
}

impl XmgDevice {
    /// Attach to a firmware backend with zeroed state
    pub fn new(firmware: Arc<dyn Firmware>) -> Self {
        Self {
            transport: DchuTransport::new(firmware),
            revision: HardwareRevision::default(),
            privilege: Box::new(is_effective_root),
            state: Mutex::new(DeviceState::default()),
        }
    }

    pub fn with_revision(mut self, revision: HardwareRevision) -> Self {
        self.revision = revision;
        self
    }

    /// Replace the raw passthrough privilege check
    pub fn with_privilege_check(mut self, check: impl PrivilegeCheck + 'static) -> Self {
        self.privilege = Box::new(check);
        self
    }

    pub fn revision(&self) -> HardwareRevision {
        self.revision
    }

    pub fn max_brightness(&self) -> u8 {
        self.revision.max_brightness()
    }

    /// Snapshot of retained state
    pub fn state(&self) -> DeviceState {
        *self.state.lock()
    }

    pub fn firmware_info(&self) -> FirmwareInfo {
        self.transport.info()
    }

    // === Dispatch ===

    /// Handle a numeric control command
    pub fn dispatch(
        &self,
        command_id: u32,
        arg: ControlArg<'_>,
    ) -> Result<ControlResponse, DriverError> {
        let command =
            ControlCommand::from_id(command_id).ok_or(DriverError::Unsupported(command_id))?;
        debug!("Dispatch {} ({:#010x})", command.name(), command_id);

        match (command, arg) {
            (ControlCommand::SetBrightness, ControlArg::Int(v)) => {
                self.set_brightness(v).map(|_| ControlResponse::Done)
            }
            // ioctl ints are reinterpreted as raw bits; negative values fail the width check
            (ControlCommand::SetColor, ControlArg::Int(v)) => {
                self.set_color(v as u32).map(|_| ControlResponse::Done)
            }
            (ControlCommand::SetTimeout, ControlArg::Int(v)) => {
                self.set_timeout(v).map(|_| ControlResponse::Done)
            }
            (ControlCommand::SetBootEffect, ControlArg::Int(v)) => {
                self.set_boot_effect(v != 0).map(|_| ControlResponse::Done)
            }
            (ControlCommand::CallRaw, ControlArg::Raw(request)) => {
                self.call_raw(request).map(ControlResponse::Raw)
            }
            (command, arg) => Err(DriverError::InvalidArgument(format!(
                "{} does not take {}",
                command.name(),
                match arg {
                    ControlArg::Int(_) => "an integer",
                    ControlArg::Raw(_) => "a raw request",
                }
            ))),
        }
    }

    // === Lighting ===

    pub fn set_brightness(&self, level: i32) -> Result<(), DriverError> {
        let mut state = self.state.lock();
        let cmd = encode_brightness(level, self.revision)?;
        self.transport.send_cmd(&cmd)?;
        state.brightness = cmd.level;
        info!("Brightness set to {}", cmd.level);
        Ok(())
    }

    pub fn set_color(&self, rgb: u32) -> Result<(), DriverError> {
        let mut state = self.state.lock();
        let cmd = encode_color(rgb)?;
        self.transport.send_cmd(&cmd)?;
        state.color = cmd.rgb;
        info!("Colour set to {:06x}", cmd.rgb);
        Ok(())
    }

    /// Set the idle timeout in seconds; negative disables it
    pub fn set_timeout(&self, seconds: i32) -> Result<(), DriverError> {
        let mut state = self.state.lock();
        let cmd = encode_timeout(seconds)?;
        self.transport.send_cmd(&cmd)?;
        state.timeout = seconds;
        info!("Timeout set to {seconds}");
        Ok(())
    }

    /// Boot effect is write-only and not retained
    pub fn set_boot_effect(&self, enabled: bool) -> Result<(), DriverError> {
        let _guard = self.state.lock();
        self.transport.send_cmd(&encode_boot_effect(enabled))?;
        info!("Boot effect {}", if enabled { "enabled" } else { "disabled" });
        Ok(())
    }

    // === Telemetry ===

    pub fn read_fan_data(&self) -> Result<SensorReading, SensorError> {
        let _guard = self.state.lock();
        sensor::read_fan_data(&self.transport)
    }

    // === Passthrough ===

    /// Forward an arbitrary function id and buffer to the firmware.
    ///
    /// On success the response replaces the front of `request.buffer`; bytes
    /// past the reported length are zeroed. A call that returns nothing
    /// leaves the buffer untouched.
    pub fn call_raw(&self, request: &mut RawCommandRequest) -> Result<RawResult, DriverError> {
        if !self.privilege.is_privileged() {
            return Err(DriverError::PermissionDenied(
                "raw firmware calls require administrator privileges".into(),
            ));
        }
        let capacity = request.buffer.len();
        if capacity == 0 || capacity > MAX_RAW_LEN {
            return Err(DriverError::InvalidArgument(format!(
                "raw buffer length {capacity} out of range 1..={MAX_RAW_LEN}"
            )));
        }

        let _guard = self.state.lock();
        let payload = request.buffer.clone();
        let response = self.transport.query(request.function_id, &payload)?;

        let bytes = match response.into_object() {
            None => {
                return Ok(RawResult {
                    length: 0,
                    truncated: false,
                })
            }
            Some(AcpiObject::Buffer(data)) => data,
            Some(AcpiObject::Integer(v)) => v.to_le_bytes().to_vec(),
            Some(other) => {
                return Err(DriverError::UnexpectedResponse(format!(
                    "raw call 0x{:02X} returned a {}",
                    request.function_id,
                    other.object_type()
                )))
            }
        };

        let length = bytes.len().min(capacity);
        request.buffer[..length].copy_from_slice(&bytes[..length]);
        request.buffer[length..].fill(0);

        let truncated = bytes.len() > capacity;
        if truncated {
            debug!(
                "Raw response truncated from {} to {} bytes",
                bytes.len(),
                capacity
            );
        }
        Ok(RawResult { length, truncated })
    }
}
