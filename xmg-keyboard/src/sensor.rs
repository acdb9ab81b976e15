//! Fan and temperature telemetry decoding
//!
//! The firmware answers `FAN_DCHU_COMMAND_GET` with a 22-byte record:
//!
//! ```text
//! [0..2]   reserved
//! [2..4]   CPU fan tachometer sample (big endian)
//! [4..6]   GPU fan tachometer sample (big endian)
//! [6..8]   GPU2 fan tachometer sample (big endian)
//! [8..16]  reserved
//! [16]     CPU fan duty     [17] CPU temperature (°C)
//! [18]     GPU fan duty     [19] GPU temperature (°C)
//! [20]     GPU2 fan duty    [21] GPU2 temperature (°C)
//! ```

use std::fmt;

use thiserror::Error;
use tracing::debug;
use xmg_transport::protocol::{fan_record, function};
use xmg_transport::{DchuTransport, FirmwareResponse, ObjectType, TransportError};

/// Fan whose tachometer a reading came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FanChannel {
    Cpu,
    Gpu,
    Gpu2,
}

impl fmt::Display for FanChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cpu => "CPU",
            Self::Gpu => "GPU",
            Self::Gpu2 => "GPU2",
        })
    }
}

/// Errors decoding a telemetry response
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SensorError {
    #[error("Expected a buffer, firmware returned {found}")]
    UnexpectedType { found: ObjectType },

    #[error("Fan record too short: expected {expected} bytes, got {got}")]
    Truncated { expected: usize, got: usize },

    #[error("{channel} fan reported a zero tachometer sample")]
    Unmeasurable { channel: FanChannel },

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// One telemetry snapshot. Temperatures are raw degrees Celsius.
///
/// An RPM field is `None` when that fan's tachometer sample was zero
/// (stopped or absent fan); the other channels stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SensorReading {
    pub cpu_rpm: Option<u32>,
    pub gpu_rpm: Option<u32>,
    pub gpu2_rpm: Option<u32>,
    pub cpu_temp: u8,
    pub gpu_temp: u8,
    pub gpu2_temp: u8,
    pub cpu_duty: u8,
    pub gpu_duty: u8,
    pub gpu2_duty: u8,
}

impl SensorReading {
    /// Fan speed, or `Unmeasurable` if this fan's sample was zero
    pub fn rpm(&self, channel: FanChannel) -> Result<u32, SensorError> {
        let rpm = match channel {
            FanChannel::Cpu => self.cpu_rpm,
            FanChannel::Gpu => self.gpu_rpm,
            FanChannel::Gpu2 => self.gpu2_rpm,
        };
        rpm.ok_or(SensorError::Unmeasurable { channel })
    }

    pub fn temp(&self, channel: FanChannel) -> u8 {
        match channel {
            FanChannel::Cpu => self.cpu_temp,
            FanChannel::Gpu => self.gpu_temp,
            FanChannel::Gpu2 => self.gpu2_temp,
        }
    }

    pub fn duty(&self, channel: FanChannel) -> u8 {
        match channel {
            FanChannel::Cpu => self.cpu_duty,
            FanChannel::Gpu => self.gpu_duty,
            FanChannel::Gpu2 => self.gpu2_duty,
        }
    }
}

fn rpm_at(data: &[u8], offset: usize) -> Option<u32> {
    let sample = u16::from_be_bytes([data[offset], data[offset + 1]]);
    (sample != 0).then(|| fan_record::RPM_DIVIDEND / u32::from(sample))
}

/// Decode a telemetry response into a reading
pub fn decode_fan_record(response: &FirmwareResponse) -> Result<SensorReading, SensorError> {
    let data = response.buffer().ok_or(SensorError::UnexpectedType {
        found: response.object_type(),
    })?;
    if data.len() < fan_record::LEN {
        return Err(SensorError::Truncated {
            expected: fan_record::LEN,
            got: data.len(),
        });
    }

    Ok(SensorReading {
        cpu_rpm: rpm_at(data, fan_record::CPU_RPM),
        gpu_rpm: rpm_at(data, fan_record::GPU_RPM),
        gpu2_rpm: rpm_at(data, fan_record::GPU2_RPM),
        cpu_temp: data[fan_record::CPU_TEMP],
        gpu_temp: data[fan_record::GPU_TEMP],
        gpu2_temp: data[fan_record::GPU2_TEMP],
        cpu_duty: data[fan_record::CPU_DUTY],
        gpu_duty: data[fan_record::GPU_DUTY],
        gpu2_duty: data[fan_record::GPU2_DUTY],
    })
}

/// Query the firmware for a fresh telemetry record
pub fn read_fan_data(transport: &DchuTransport) -> Result<SensorReading, SensorError> {
    let response = transport.query(function::FAN_DCHU_COMMAND_GET, &[])?;
    let reading = decode_fan_record(&response)?;
    debug!("Fan data: {reading:?}");
    Ok(reading)
}
