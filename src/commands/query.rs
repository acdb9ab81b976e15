//! Query (read-only) command handlers.

use crossterm::style::Stylize;
use xmg_driver::{ChannelSample, TelemetryChannel};

use super::{CommandResult, Context};
use crate::cli::Cli;

/// Read telemetry channels, one firmware round trip each
pub fn sensors(ctx: &Context, channel: Option<TelemetryChannel>, json: bool) -> CommandResult {
    let channels = match channel {
        Some(c) => vec![c],
        None => TelemetryChannel::ALL.to_vec(),
    };

    let mut samples = Vec::new();
    let mut failed = 0;
    for ch in channels {
        match ch.read(&ctx.device) {
            Ok(value) => samples.push(ChannelSample::new(ch, value)),
            Err(e) => {
                failed += 1;
                eprintln!("{} {}: {e}", "Failed to read".red(), ch.label());
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&samples)?);
    } else {
        for s in &samples {
            println!(
                "{:<6} {:<9} {:>7} {}",
                s.channel.name(),
                s.label,
                s.value,
                s.channel.unit().dim()
            );
        }
    }

    if failed > 0 && samples.is_empty() {
        anyhow::bail!("No telemetry channel could be read");
    }
    Ok(())
}

/// Show stored settings and the firmware backend.
/// Works without a backend.
pub fn status(cli: &Cli) -> CommandResult {
    let (s, settings_path) = super::load_settings(cli)?;
    let backend = match super::open_firmware(cli) {
        Ok(firmware) => firmware.info().backend,
        Err(_) => "unavailable".to_string(),
    };
    let timeout = if s.timeout < 0 {
        "off".to_string()
    } else {
        format!("{}s", s.timeout)
    };

    println!("{}", s.to_string().bold());
    println!("  brightness   {} / {}", s.brightness, s.revision.max_brightness());
    println!("  color        0x{:06x}", s.color);
    println!("  timeout      {timeout}");
    println!("  boot effect  {}", if s.boot_effect { "on" } else { "off" });
    println!("  revision     {}", s.revision);
    println!("  backend      {backend}");
    println!("  settings     {}", settings_path.display());
    Ok(())
}
