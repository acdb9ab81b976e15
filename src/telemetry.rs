//! Fan and temperature channels, hwmon style
//!
//! Each read performs its own firmware round trip; values from different
//! channels may come from different records.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use xmg_keyboard::{DriverError, FanChannel, SensorReading, XmgDevice};

/// Exposed telemetry channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TelemetryChannel {
    Fan1,
    Fan2,
    Temp1,
    Temp2,
}

impl TelemetryChannel {
    pub const ALL: &'static [TelemetryChannel] = &[
        TelemetryChannel::Fan1,
        TelemetryChannel::Fan2,
        TelemetryChannel::Temp1,
        TelemetryChannel::Temp2,
    ];

    /// hwmon attribute prefix (`fan1`, `temp2`, ...)
    pub fn name(self) -> &'static str {
        match self {
            Self::Fan1 => "fan1",
            Self::Fan2 => "fan2",
            Self::Temp1 => "temp1",
            Self::Temp2 => "temp2",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Fan1 => "CPU Fan",
            Self::Fan2 => "GPU Fan",
            Self::Temp1 => "CPU Temp",
            Self::Temp2 => "GPU Temp",
        }
    }

    pub fn unit(self) -> &'static str {
        if self.is_fan() {
            "RPM"
        } else {
            "m°C"
        }
    }

    pub fn is_fan(self) -> bool {
        matches!(self, Self::Fan1 | Self::Fan2)
    }

    fn source(self) -> FanChannel {
        match self {
            Self::Fan1 | Self::Temp1 => FanChannel::Cpu,
            Self::Fan2 | Self::Temp2 => FanChannel::Gpu,
        }
    }

    /// Channel value from an already decoded reading.
    /// Fans in RPM, temperatures in millidegrees Celsius. Only fan channels
    /// can be unmeasurable.
    pub fn value(self, reading: &SensorReading) -> Result<i64, DriverError> {
        if self.is_fan() {
            Ok(i64::from(reading.rpm(self.source())?))
        } else {
            Ok(i64::from(reading.temp(self.source())) * 1000)
        }
    }

    /// Query the firmware and return this channel's value
    pub fn read(self, device: &XmgDevice) -> Result<i64, DriverError> {
        let reading = device.read_fan_data()?;
        self.value(&reading)
    }
}

impl fmt::Display for TelemetryChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TelemetryChannel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown channel: {s}"))
    }
}

/// One channel sample, for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct ChannelSample {
    pub channel: TelemetryChannel,
    pub label: &'static str,
    pub value: i64,
}

impl ChannelSample {
    pub fn new(channel: TelemetryChannel, value: i64) -> Self {
        Self {
            channel,
            label: channel.label(),
            value,
        }
    }
}
