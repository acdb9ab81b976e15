// XMG keyboard control - shared library
// Colour presets, persisted settings and telemetry presentation for the CLI

pub mod color;
pub mod settings;
pub mod telemetry;

pub use color::{ColorArg, ColorPreset, PRESETS};
pub use settings::{Adjust, Settings, TimeoutArg};
pub use telemetry::{ChannelSample, TelemetryChannel};
