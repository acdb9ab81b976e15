//! PrinterFirmware middleware for monitoring firmware calls
//!
//! Wraps any `Firmware` backend and prints every `_DSM` call and its result
//! to stderr before handing the result back unchanged.
//!
//! # Example
//!
//! ```ignore
//! use xmg_transport::{NullFirmware, PrinterConfig, PrinterFirmware};
//!
//! let firmware = PrinterFirmware::wrap(Arc::new(NullFirmware::new()), PrinterConfig::default());
//! // Every evaluate() is now echoed to stderr
//! ```

use std::str::FromStr;
use std::sync::Arc;

use crossterm::style::Stylize;
use serde::Serialize;

use crate::acpi::{AcpiObject, AcpiStatus};
use crate::envelope::DsmEnvelope;
use crate::protocol::{describe, function};
use crate::types::FirmwareInfo;
use crate::Firmware;

/// Output format for the printer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown output format: {s}")),
        }
    }
}

/// Call filter for selective display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallFilter {
    #[default]
    All,
    Keyboard,
    Fan,
    Function(u32),
}

impl CallFilter {
    fn matches(&self, function_id: u32) -> bool {
        match self {
            Self::All => true,
            Self::Keyboard => matches!(
                function_id,
                function::KEYBOARD_DCHU_COMMAND | function::KEYBOARD_DCHU_COMMAND_2
            ),
            Self::Fan => function_id == function::FAN_DCHU_COMMAND_GET,
            Self::Function(f) => *f == function_id,
        }
    }
}

impl FromStr for CallFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" | "" => Ok(Self::All),
            "keyboard" | "kbd" => Ok(Self::Keyboard),
            "fan" | "fans" => Ok(Self::Fan),
            s if s.starts_with("fn=") || s.starts_with("0x") => {
                let hex_str = s.strip_prefix("fn=").unwrap_or(s);
                let hex_str = hex_str.strip_prefix("0x").unwrap_or(hex_str);
                u32::from_str_radix(hex_str, 16)
                    .map(Self::Function)
                    .map_err(|e| format!("Invalid function id: {e}"))
            }
            _ => Err(format!("Unknown filter: {s}")),
        }
    }
}

/// Configuration for the PrinterFirmware
#[derive(Debug, Clone, Default)]
pub struct PrinterConfig {
    /// Show raw hex dump of the payload
    pub show_hex: bool,
    pub filter: CallFilter,
    pub format: OutputFormat,
}

impl PrinterConfig {
    pub fn with_hex(mut self, show: bool) -> Self {
        self.show_hex = show;
        self
    }

    pub fn with_filter(mut self, filter: CallFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }
}

/// One monitored call, as emitted in JSON mode
#[derive(Debug, Serialize)]
struct CallRecord<'a> {
    function: u32,
    name: &'static str,
    payload: &'a [u8],
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a AcpiObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<u32>,
}

/// Firmware middleware that prints all calls and results
pub struct PrinterFirmware {
    inner: Arc<dyn Firmware>,
    config: PrinterConfig,
}

impl PrinterFirmware {
    /// Wrap a firmware backend with printing middleware
    pub fn wrap(firmware: Arc<dyn Firmware>, config: PrinterConfig) -> Arc<dyn Firmware> {
        Arc::new(Self {
            inner: firmware,
            config,
        })
    }

    fn print_call(&self, envelope: &DsmEnvelope) {
        if self.config.format != OutputFormat::Text {
            return;
        }
        let id = envelope.function_id();
        eprintln!(
            "{} {}  0x{:02x} {}",
            ">>>".cyan(),
            "DSM".cyan().bold(),
            id,
            describe(id, envelope.payload()).yellow()
        );
        if self.config.show_hex {
            eprintln!("    {}  {:02x?}", "HEX".dim(), envelope.payload());
        }
    }

    fn print_result(&self, envelope: &DsmEnvelope, result: &Result<Option<AcpiObject>, AcpiStatus>) {
        match self.config.format {
            OutputFormat::Text => match result {
                Ok(None) => eprintln!("{} {}  (none)", "<<<".green(), "RET".green().bold()),
                Ok(Some(obj)) => {
                    eprintln!(
                        "{} {}  {} len={}",
                        "<<<".green(),
                        "RET".green().bold(),
                        obj.object_type(),
                        obj.len()
                    );
                    if self.config.show_hex {
                        if let Some(buf) = obj.as_buffer() {
                            eprintln!("    {}  {:02x?}", "HEX".dim(), buf);
                        }
                    }
                }
                Err(status) => eprintln!("{} {}  {}", "<<<".red(), "ERR".red().bold(), status),
            },
            OutputFormat::Json => {
                let id = envelope.function_id();
                let record = CallRecord {
                    function: id,
                    name: function::name(id),
                    payload: envelope.payload(),
                    result: result.as_ref().ok().and_then(Option::as_ref),
                    status: result.as_ref().err().map(|s| s.0),
                };
                match serde_json::to_string(&record) {
                    Ok(line) => eprintln!("{line}"),
                    Err(e) => tracing::warn!("Failed to serialize call record: {e}"),
                }
            }
        }
    }
}

impl Firmware for PrinterFirmware {
    fn evaluate(&self, envelope: &DsmEnvelope) -> Result<Option<AcpiObject>, AcpiStatus> {
        let show = self.config.filter.matches(envelope.function_id());
        if show {
            self.print_call(envelope);
        }
        let result = self.inner.evaluate(envelope);
        if show {
            self.print_result(envelope, &result);
        }
        result
    }

    fn info(&self) -> FirmwareInfo {
        let inner = self.inner.info();
        FirmwareInfo {
            backend: format!("printer({})", inner.backend),
            device_path: inner.device_path,
        }
    }
}

/// Backend that accepts every call and returns nothing.
///
/// Used for dry runs where no firmware is reachable.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullFirmware;

impl NullFirmware {
    pub fn new() -> Self {
        Self
    }
}

impl Firmware for NullFirmware {
    fn evaluate(&self, _envelope: &DsmEnvelope) -> Result<Option<AcpiObject>, AcpiStatus> {
        Ok(None)
    }

    fn info(&self) -> FirmwareInfo {
        FirmwareInfo::new("null")
    }
}
