//! Persisted keyboard settings
//!
//! The CLI keeps the last applied lighting values in a small TOML file so
//! relative adjustments have a base and `restore` can replay everything
//! after a reboot.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, warn};
use xmg_keyboard::{DriverError, HardwareRevision, XmgDevice, MAX_TIMEOUT};

use crate::color::color_name;

/// Absolute value or signed step, as typed on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjust {
    Absolute(i32),
    Relative(i32),
}

impl Adjust {
    /// Apply to `current` and clamp to `0..=max`
    pub fn apply(self, current: i32, max: i32) -> i32 {
        let target = match self {
            Self::Absolute(v) => i64::from(v),
            Self::Relative(d) => i64::from(current.max(0)) + i64::from(d),
        };
        target.clamp(0, i64::from(max)) as i32
    }
}

impl FromStr for Adjust {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let value = s
            .parse::<i32>()
            .map_err(|e| format!("Invalid value '{s}': {e}"))?;
        if s.starts_with('+') || s.starts_with('-') {
            Ok(Self::Relative(value))
        } else {
            Ok(Self::Absolute(value))
        }
    }
}

/// Idle timeout argument: seconds, a step, or `off`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutArg {
    Off,
    Set(Adjust),
}

impl TimeoutArg {
    /// Resolve against the stored timeout; `-1` means disabled
    pub fn resolve(self, current: i32) -> i32 {
        match self {
            Self::Off => -1,
            Self::Set(adjust) => adjust.apply(current, MAX_TIMEOUT),
        }
    }
}

impl FromStr for TimeoutArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "off" | "disable" | "disabled" => Ok(Self::Off),
            _ => s.parse().map(Self::Set),
        }
    }
}

fn serialize_revision<S: Serializer>(rev: &HardwareRevision, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(rev.name())
}

fn deserialize_revision<'de, D: Deserializer<'de>>(d: D) -> Result<HardwareRevision, D::Error> {
    let name = String::deserialize(d)?;
    name.parse().map_err(serde::de::Error::custom)
}

/// Last applied lighting values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub brightness: i32,
    /// Packed colour (`b << 16 | r << 8 | g`)
    #[serde(default)]
    pub color: u32,
    /// Seconds; negative means disabled
    #[serde(default)]
    pub timeout: i32,
    #[serde(default)]
    pub boot_effect: bool,
    #[serde(
        default,
        serialize_with = "serialize_revision",
        deserialize_with = "deserialize_revision"
    )]
    pub revision: HardwareRevision,
}

impl Settings {
    /// Get the default settings file path
    pub fn default_path() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("xmg")
            .join("settings.toml")
    }

    /// Load settings from a file, or return default if not found
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let settings: Settings = toml::from_str(&content)?;
            debug!("Loaded settings from {}", path.display());
            Ok(settings)
        } else {
            Ok(Self::default())
        }
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        debug!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Brightness after applying `adjust`, clamped to the revision bound
    pub fn resolve_brightness(&self, adjust: Adjust) -> i32 {
        adjust.apply(self.brightness, i32::from(self.revision.max_brightness()))
    }

    /// Replay every stored value; the boot effect only if it was set.
    ///
    /// Every value is attempted even after a failure; the first error is
    /// returned.
    pub fn restore(&self, device: &XmgDevice) -> Result<(), DriverError> {
        let mut results = vec![
            ("brightness", device.set_brightness(self.brightness)),
            ("color", device.set_color(self.color)),
            ("timeout", device.set_timeout(self.timeout)),
        ];
        if self.boot_effect {
            results.push(("boot effect", device.set_boot_effect(true)));
        }

        let mut first = None;
        for (name, result) in results {
            if let Err(e) = result {
                warn!("Failed to restore {name}: {e}");
                first.get_or_insert(e);
            }
        }
        first.map_or(Ok(()), Err)
    }

    /// Brightness as a percentage of the revision bound
    pub fn brightness_percent(&self) -> i32 {
        self.brightness * 100 / i32::from(self.revision.max_brightness())
    }
}

impl fmt::Display for Settings {
    /// `[colour] brightness%`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}%",
            color_name(self.color),
            self.brightness_percent()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjust_parse() {
        assert_eq!("10".parse(), Ok(Adjust::Absolute(10)));
        assert_eq!("+10".parse(), Ok(Adjust::Relative(10)));
        assert_eq!("-3".parse(), Ok(Adjust::Relative(-3)));
        assert!("ten".parse::<Adjust>().is_err());
    }

    #[test]
    fn test_adjust_clamps() {
        assert_eq!(Adjust::Relative(50).apply(180, 191), 191);
        assert_eq!(Adjust::Relative(-50).apply(20, 191), 0);
        assert_eq!(Adjust::Absolute(500).apply(0, 191), 191);
        assert_eq!(Adjust::Relative(10).apply(-1, MAX_TIMEOUT), 10);
    }

    #[test]
    fn test_timeout_arg() {
        assert_eq!("off".parse(), Ok(TimeoutArg::Off));
        assert_eq!(TimeoutArg::Off.resolve(30), -1);
        assert_eq!(
            "+70000".parse::<TimeoutArg>().unwrap().resolve(10),
            MAX_TIMEOUT
        );
    }

    #[test]
    fn test_brightness_bound_follows_revision() {
        let settings = Settings {
            brightness: 100,
            revision: HardwareRevision::Early,
            ..Settings::default()
        };
        assert_eq!(settings.resolve_brightness(Adjust::Relative(100)), 171);
    }

    #[test]
    fn test_status_line() {
        let settings = Settings {
            brightness: 191,
            color: 0x00_ff00,
            ..Settings::default()
        };
        assert_eq!(settings.to_string(), "[red] 100%");

        let settings = Settings {
            brightness: 95,
            color: crate::color::pack_rgb(1, 2, 3),
            ..Settings::default()
        };
        assert_eq!(settings.to_string(), "[1-2-3] 49%");
    }

    #[test]
    fn test_toml_format() {
        let settings = Settings {
            brightness: 50,
            color: 0xff_0000,
            timeout: -1,
            boot_effect: true,
            revision: HardwareRevision::Early,
        };
        let text = toml::to_string_pretty(&settings).unwrap();
        assert!(text.contains("revision = \"early\""));
        assert_eq!(toml::from_str::<Settings>(&text).unwrap(), settings);

        // Missing fields take defaults
        let partial: Settings = toml::from_str("brightness = 7").unwrap();
        assert_eq!(partial.brightness, 7);
        assert_eq!(partial.revision, HardwareRevision::Current);
    }
}
