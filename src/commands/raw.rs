//! Raw DCHU passthrough.

use std::io::Read;

use anyhow::{bail, Context as _};
use crossterm::style::Stylize;
use xmg_keyboard::{decode_command, RawCommandRequest, MAX_RAW_LEN};

use super::{CommandResult, Context};

/// Parse hex bytes, ignoring whitespace, commas and `0x` prefixes
pub fn parse_hex(input: &str) -> anyhow::Result<Vec<u8>> {
    let digits: String = input
        .split(|c: char| c.is_whitespace() || c == ',')
        .map(|tok| tok.trim_start_matches("0x").trim_start_matches("0X"))
        .collect();
    if digits.len() % 2 != 0 {
        bail!("Odd number of hex digits");
    }
    (0..digits.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .with_context(|| format!("Invalid hex byte '{}'", &digits[i..i + 2]))
        })
        .collect()
}

/// Request buffer of `len` bytes (at least the payload), payload first.
/// Payloads larger than the passthrough limit are rejected, never cut.
pub fn request_buffer(payload: Vec<u8>, len: usize) -> anyhow::Result<Vec<u8>> {
    if payload.len() > MAX_RAW_LEN {
        bail!(
            "Payload of {} bytes exceeds the {MAX_RAW_LEN} byte limit",
            payload.len()
        );
    }
    let mut buffer = payload;
    let capacity = len.min(MAX_RAW_LEN).max(buffer.len());
    buffer.resize(capacity, 0);
    Ok(buffer)
}

/// Send `function` with a payload and print the response bytes
pub fn raw(ctx: &Context, function: u32, data: Option<&str>, len: usize) -> CommandResult {
    let payload = match data {
        Some(hex) => parse_hex(hex)?,
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read payload from stdin")?;
            parse_hex(&input)?
        }
    };

    // Raw calls skip validation; show what a recognised payload would do
    if let Some(cmd) = decode_command(function, &payload) {
        eprintln!("{} {cmd:?}", "Keyboard command:".dim());
    }

    let buffer = request_buffer(payload, len)?;
    let capacity = buffer.len();

    let mut request = RawCommandRequest::new(function, buffer);
    let result = ctx
        .device
        .call_raw(&mut request)
        .with_context(|| format!("Raw call 0x{function:02X} failed"))?;

    let bytes = &request.buffer[..result.length];
    println!("{} bytes: {:02x?}", result.length, bytes);
    if result.truncated {
        eprintln!("warning: response truncated to {capacity} bytes");
    }
    Ok(())
}
