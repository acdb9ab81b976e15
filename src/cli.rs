// CLI definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use xmg_driver::{Adjust, ColorArg, TelemetryChannel, TimeoutArg};
use xmg_keyboard::HardwareRevision;

#[derive(Parser)]
#[command(name = "xmg-cli")]
#[command(author, version, about = "XMG/Clevo keyboard lighting and fan control")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Settings file (default: ~/.cache/xmg/settings.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Keyboard controller revision (early: brightness 0-171, current: 0-191)
    #[arg(long, global = true, value_parser = parse_revision)]
    pub revision: Option<HardwareRevision>,

    /// Print every firmware call and its result
    #[arg(long, global = true)]
    pub monitor: bool,

    /// Show raw payload hex in monitor output
    #[arg(long, global = true)]
    pub hex: bool,

    /// Monitor filter (all, keyboard, fan, fn=0xNN)
    #[arg(long, global = true)]
    pub filter: Option<String>,

    /// Monitor output format (text, json)
    #[arg(long, global = true)]
    pub format: Option<String>,

    /// Do not touch firmware; accept every call and print it
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    // === Set Commands ===
    /// Set keyboard brightness (absolute or +N/-N)
    #[command(visible_aliases = ["bright", "b"])]
    Brightness {
        #[arg(allow_hyphen_values = true, value_parser = parse_adjust)]
        value: Adjust,
    },

    /// Set keyboard colour (rrr-ggg-bbb, preset name, or +N/-N to cycle presets)
    #[command(visible_aliases = ["colour", "c"])]
    Color {
        #[arg(allow_hyphen_values = true, value_parser = parse_color)]
        value: ColorArg,
    },

    /// Set idle timeout in seconds (absolute, +N/-N, or "off")
    #[command(visible_alias = "t")]
    Timeout {
        #[arg(allow_hyphen_values = true, value_parser = parse_timeout)]
        value: TimeoutArg,
    },

    /// Enable the boot lighting effect
    #[command(visible_alias = "o")]
    BootEffect,

    /// Re-apply all stored settings
    #[command(visible_alias = "r")]
    Restore,

    // === Query Commands ===
    /// Read fan speeds and temperatures
    #[command(visible_aliases = ["sens", "fans"])]
    Sensors {
        /// Only this channel (fan1, fan2, temp1, temp2)
        #[arg(value_parser = parse_channel)]
        channel: Option<TelemetryChannel>,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },

    /// Show stored settings and backend
    #[command(visible_alias = "s")]
    Status,

    // === Utility ===
    /// Send a raw DCHU call (requires root)
    Raw {
        /// Function id (decimal or 0x-prefixed hex)
        #[arg(value_parser = parse_function_id)]
        function: u32,
        /// Payload as hex bytes (read from stdin if omitted)
        #[arg(long = "data", value_name = "HEX")]
        data: Option<String>,
        /// Response buffer size (at least the payload length)
        #[arg(long, default_value_t = 256)]
        len: usize,
    },
}

fn parse_revision(s: &str) -> Result<HardwareRevision, String> {
    s.parse()
}

fn parse_adjust(s: &str) -> Result<Adjust, String> {
    s.parse()
}

fn parse_color(s: &str) -> Result<ColorArg, String> {
    s.parse()
}

fn parse_timeout(s: &str) -> Result<TimeoutArg, String> {
    s.parse()
}

fn parse_channel(s: &str) -> Result<TelemetryChannel, String> {
    s.parse()
}

fn parse_function_id(s: &str) -> Result<u32, String> {
    let s = s.trim();
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    }
    .map_err(|e| format!("Invalid function id '{s}': {e}"))
}
