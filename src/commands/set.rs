//! Set (write) command handlers.
//!
//! Each handler resolves the argument against the stored settings, applies
//! it, and only then records it.

use anyhow::Context as _;
use xmg_driver::{Adjust, ColorArg, TimeoutArg};

use super::{CommandResult, Context};

/// Set brightness (absolute or relative, clamped to the revision bound)
pub fn brightness(ctx: &mut Context, value: Adjust) -> CommandResult {
    let level = ctx.settings.resolve_brightness(value);
    ctx.device
        .set_brightness(level)
        .context("Failed to set brightness")?;
    ctx.settings.brightness = level;
    ctx.commit()
}

/// Set colour, or step through presets
pub fn color(ctx: &mut Context, value: ColorArg) -> CommandResult {
    let color = value.resolve(ctx.settings.color);
    ctx.device.set_color(color).context("Failed to set colour")?;
    ctx.settings.color = color;
    ctx.commit()
}

/// Set or disable the idle timeout
pub fn timeout(ctx: &mut Context, value: TimeoutArg) -> CommandResult {
    let seconds = value.resolve(ctx.settings.timeout);
    ctx.device
        .set_timeout(seconds)
        .context("Failed to set timeout")?;
    ctx.settings.timeout = seconds;
    ctx.commit()
}

/// Enable the boot effect
pub fn boot_effect(ctx: &mut Context) -> CommandResult {
    ctx.device
        .set_boot_effect(true)
        .context("Failed to set boot effect")?;
    ctx.settings.boot_effect = true;
    ctx.commit()
}

/// Re-apply everything stored
pub fn restore(ctx: &mut Context) -> CommandResult {
    ctx.settings
        .restore(&ctx.device)
        .context("Failed to restore settings")?;
    ctx.commit()
}
