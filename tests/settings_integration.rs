//! Integration tests for the settings record.
//!
//! These exercise the file round trip and `restore` against a recording
//! firmware, the path the CLI takes after a reboot.

use std::sync::Arc;

use parking_lot::Mutex;
use xmg_driver::{Adjust, ColorArg, Settings, TelemetryChannel};
use xmg_keyboard::{DriverError, FanChannel, HardwareRevision, XmgDevice};
use xmg_transport::protocol::function;
use xmg_transport::{AcpiObject, AcpiStatus, DsmEnvelope, Firmware, FirmwareInfo};

#[derive(Default)]
struct Recorder {
    words: Mutex<Vec<(u32, u32)>>,
    reply: Option<AcpiObject>,
    /// Index of the call that reports failure
    fail_call: Option<usize>,
}

impl Firmware for Recorder {
    fn evaluate(&self, envelope: &DsmEnvelope) -> Result<Option<AcpiObject>, AcpiStatus> {
        let p = envelope.payload();
        let mut words = self.words.lock();
        words.push((
            envelope.function_id(),
            u32::from_le_bytes([p[0], p[1], p[2], p[3]]),
        ));
        if self.fail_call == Some(words.len() - 1) {
            return Err(AcpiStatus::AE_ERROR);
        }
        Ok(self.reply.clone())
    }

    fn info(&self) -> FirmwareInfo {
        FirmwareInfo::new("recorder")
    }
}

// ── File round trip ──

#[test]
fn missing_file_loads_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(settings, Settings::default());
}

#[test]
fn save_creates_parent_dirs_and_reloads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("xmg").join("nested").join("settings.toml");

    let settings = Settings {
        brightness: 120,
        color: 0x00_fa5a,
        timeout: 300,
        boot_effect: true,
        revision: HardwareRevision::Early,
    };
    settings.save(&path).unwrap();

    assert_eq!(Settings::load(&path).unwrap(), settings);
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    std::fs::write(&path, "brightness = \"bright\"").unwrap();

    assert!(Settings::load(&path).is_err());
}

// ── Relative adjustments ──

#[test]
fn relative_changes_build_on_stored_values() {
    let mut settings = Settings {
        brightness: 180,
        color: 0x00_fa5a,
        ..Settings::default()
    };

    settings.brightness = settings.resolve_brightness(Adjust::Relative(20));
    assert_eq!(settings.brightness, 191);

    // orange + 1 wraps to green
    settings.color = ColorArg::Relative(1).resolve(settings.color);
    assert_eq!(settings.color, 0x00_00ff);
    assert_eq!(settings.to_string(), "[green] 100%");
}

// ── Restore ──

#[test]
fn restore_replays_all_values_and_boot_flag() {
    let fw = Arc::new(Recorder::default());
    let device = XmgDevice::new(fw.clone());
    let settings = Settings {
        brightness: 64,
        color: 0xff_0000,
        timeout: 30,
        boot_effect: true,
        ..Settings::default()
    };

    settings.restore(&device).unwrap();

    assert_eq!(
        *fw.words.lock(),
        vec![
            (function::KEYBOARD_DCHU_COMMAND, 0xF400_0040),
            (function::KEYBOARD_DCHU_COMMAND, 0xF0FF_0000),
            (function::KEYBOARD_DCHU_COMMAND_2, 0x1200_1EFF),
            (function::KEYBOARD_DCHU_COMMAND_2, 0x0E00_0001),
        ]
    );
    assert_eq!(device.state().color, 0xff_0000);
}

#[test]
fn restore_continues_after_a_failed_value() {
    let fw = Arc::new(Recorder {
        fail_call: Some(0),
        ..Recorder::default()
    });
    let device = XmgDevice::new(fw.clone());
    let settings = Settings {
        brightness: 64,
        color: 0xff_0000,
        timeout: 30,
        boot_effect: true,
        ..Settings::default()
    };

    let err = settings.restore(&device).unwrap_err();

    assert!(matches!(err, DriverError::FirmwareCallFailed(_)));
    assert_eq!(fw.words.lock().len(), 4);
    assert_eq!(device.state().brightness, 0);
    assert_eq!(device.state().color, 0xff_0000);
    assert_eq!(device.state().timeout, 30);
}

#[test]
fn restore_skips_unset_boot_effect() {
    let fw = Arc::new(Recorder::default());
    let device = XmgDevice::new(fw.clone());

    Settings::default().restore(&device).unwrap();

    let words = fw.words.lock();
    assert_eq!(words.len(), 3);
    assert!(words
        .iter()
        .all(|(_, w)| (w >> 24) as u8 != xmg_transport::protocol::magic::BOOT));
}

// ── Telemetry ──

#[test]
fn each_channel_read_is_a_round_trip() {
    let mut record = vec![0u8; 22];
    record[2..4].copy_from_slice(&1000u16.to_be_bytes());
    record[4..6].copy_from_slice(&2000u16.to_be_bytes());
    record[6..8].copy_from_slice(&3000u16.to_be_bytes());
    record[17] = 48;
    record[19] = 57;

    let fw = Arc::new(Recorder {
        reply: Some(AcpiObject::Buffer(record)),
        ..Recorder::default()
    });
    let device = XmgDevice::new(fw.clone());

    assert_eq!(TelemetryChannel::Fan1.read(&device).unwrap(), 2156);
    assert_eq!(TelemetryChannel::Fan2.read(&device).unwrap(), 1078);
    assert_eq!(TelemetryChannel::Temp1.read(&device).unwrap(), 48_000);
    assert_eq!(TelemetryChannel::Temp2.read(&device).unwrap(), 57_000);

    let words = fw.words.lock();
    assert_eq!(words.len(), 4);
    assert!(words
        .iter()
        .all(|(f, _)| *f == function::FAN_DCHU_COMMAND_GET));
}

#[test]
fn stopped_fan_fails_only_its_rpm_channel() {
    let mut record = vec![0u8; 22];
    record[4..6].copy_from_slice(&2000u16.to_be_bytes());
    record[17] = 48;
    record[19] = 57;

    let fw = Arc::new(Recorder {
        reply: Some(AcpiObject::Buffer(record)),
        ..Recorder::default()
    });
    let device = XmgDevice::new(fw);

    assert_eq!(
        TelemetryChannel::Fan1.read(&device),
        Err(DriverError::Unmeasurable {
            channel: FanChannel::Cpu
        })
    );
    assert_eq!(TelemetryChannel::Fan2.read(&device), Ok(1078));
    assert_eq!(TelemetryChannel::Temp1.read(&device), Ok(48_000));
    assert_eq!(TelemetryChannel::Temp2.read(&device), Ok(57_000));
}
