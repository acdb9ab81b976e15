//! Command handlers for the CLI application.
//!
//! - `set`: lighting commands (brightness, color, timeout, boot-effect, restore)
//! - `query`: read-only commands (sensors, status)
//! - `raw`: raw DCHU passthrough

pub mod query;
pub mod raw;
pub mod set;

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{bail, Context as _};
use xmg_driver::Settings;
use xmg_keyboard::XmgDevice;
use xmg_transport::{CallFilter, Firmware, NullFirmware, OutputFormat, PrinterConfig, PrinterFirmware};

use crate::cli::Cli;

/// Result type for command handlers
pub type CommandResult = anyhow::Result<()>;

/// Everything a handler needs: the device, stored settings and where they live
pub struct Context {
    pub device: XmgDevice,
    pub settings: Settings,
    pub settings_path: PathBuf,
}

impl Context {
    /// Persist settings and print the status line
    pub fn commit(&self) -> CommandResult {
        self.settings
            .save(&self.settings_path)
            .with_context(|| format!("Failed to save {}", self.settings_path.display()))?;
        println!("{}", self.settings);
        Ok(())
    }
}

/// Create printer config if monitoring is enabled
pub fn create_printer_config(cli: &Cli) -> anyhow::Result<Option<PrinterConfig>> {
    if !cli.monitor && !cli.dry_run {
        return Ok(None);
    }

    let filter = match cli.filter.as_deref() {
        Some(f) => CallFilter::from_str(f).map_err(anyhow::Error::msg)?,
        None => CallFilter::All,
    };
    let format = match cli.format.as_deref() {
        Some(f) => OutputFormat::from_str(f).map_err(anyhow::Error::msg)?,
        None => OutputFormat::Text,
    };

    Ok(Some(
        PrinterConfig::default()
            .with_hex(cli.hex)
            .with_filter(filter)
            .with_format(format),
    ))
}

/// Pick the firmware backend.
///
/// Only the dry-run backend ships with the CLI; evaluating the vendor method
/// on real hardware needs a platform backend implementing `Firmware`.
fn open_firmware(cli: &Cli) -> anyhow::Result<Arc<dyn Firmware>> {
    let firmware: Arc<dyn Firmware> = if cli.dry_run {
        Arc::new(NullFirmware::new())
    } else {
        bail!(
            "No firmware backend available on this system. \
             Platform backends implement xmg_transport::Firmware; \
             use --dry-run to preview calls"
        );
    };

    Ok(match create_printer_config(cli)? {
        Some(config) => PrinterFirmware::wrap(firmware, config),
        None => firmware,
    })
}

/// Load stored settings and apply CLI overrides
pub fn load_settings(cli: &Cli) -> anyhow::Result<(Settings, PathBuf)> {
    let settings_path = cli.settings.clone().unwrap_or_else(Settings::default_path);
    let mut settings = Settings::load(&settings_path)
        .with_context(|| format!("Failed to load {}", settings_path.display()))?;
    if let Some(revision) = cli.revision {
        settings.revision = revision;
    }
    Ok((settings, settings_path))
}

/// Load settings and attach the device
pub fn open(cli: &Cli) -> anyhow::Result<Context> {
    let (settings, settings_path) = load_settings(cli)?;
    let device = XmgDevice::new(open_firmware(cli)?).with_revision(settings.revision);
    tracing::debug!("Using firmware backend {}", device.firmware_info().backend);

    Ok(Context {
        device,
        settings,
        settings_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_missing_backend_names_the_firmware_trait() {
        let cli = Cli::try_parse_from(["xmg-cli", "status"]).unwrap();
        let err = open_firmware(&cli).err().unwrap();
        assert!(err.to_string().contains("xmg_transport::Firmware"));
        assert!(err.to_string().contains("--dry-run"));
    }

    #[test]
    fn test_dry_run_uses_null_firmware_behind_printer() {
        let cli = Cli::try_parse_from(["xmg-cli", "--dry-run", "status"]).unwrap();
        let firmware = open_firmware(&cli).unwrap();
        assert_eq!(firmware.info().backend, "printer(null)");
    }
}
