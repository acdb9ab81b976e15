// Keyboard colour presets and parsing
//
// The controller takes colour packed as `blue << 16 | red << 8 | green`.

use std::fmt;
use std::str::FromStr;

/// Named colour with its packed controller value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPreset {
    pub name: &'static str,
    pub value: u32,
}

/// Presets cycled by relative colour changes, in order
pub const PRESETS: &[ColorPreset] = &[
    ColorPreset {
        name: "green",
        value: 0x00_00ff,
    },
    ColorPreset {
        name: "red",
        value: 0x00_ff00,
    },
    ColorPreset {
        name: "blue",
        value: 0xff_0000,
    },
    // 250-90-0
    ColorPreset {
        name: "orange",
        value: 0x00_fa5a,
    },
];

/// Pack 8-bit channels into the controller layout
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    u32::from(b) << 16 | u32::from(r) << 8 | u32::from(g)
}

/// Split a packed colour into (r, g, b)
pub fn unpack_rgb(color: u32) -> (u8, u8, u8) {
    (
        ((color >> 8) & 0xff) as u8,
        (color & 0xff) as u8,
        ((color >> 16) & 0xff) as u8,
    )
}

/// Index of `color` in the preset list (first preset if not a preset)
pub fn preset_index(color: u32) -> usize {
    PRESETS.iter().position(|p| p.value == color).unwrap_or(0)
}

/// Step `delta` presets away from `color`, wrapping in both directions
pub fn cycle(color: u32, delta: i32) -> u32 {
    let len = PRESETS.len() as i64;
    let idx = (preset_index(color) as i64 + i64::from(delta)).rem_euclid(len);
    PRESETS[idx as usize].value
}

/// Preset name, or `r-g-b` for anything else
pub fn color_name(color: u32) -> String {
    match PRESETS.iter().find(|p| p.value == color) {
        Some(p) => p.name.to_string(),
        None => {
            let (r, g, b) = unpack_rgb(color);
            format!("{r}-{g}-{b}")
        }
    }
}

/// Colour argument as given on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorArg {
    /// Packed colour
    Absolute(u32),
    /// Preset steps
    Relative(i32),
}

impl ColorArg {
    /// Resolve against the currently stored colour
    pub fn resolve(self, current: u32) -> u32 {
        match self {
            Self::Absolute(c) => c,
            Self::Relative(d) => cycle(current, d),
        }
    }
}

impl FromStr for ColorArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with('+') || s.starts_with('-') {
            return s
                .parse::<i32>()
                .map(Self::Relative)
                .map_err(|e| format!("Invalid colour step '{s}': {e}"));
        }
        if let Some(p) = PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(s)) {
            return Ok(Self::Absolute(p.value));
        }

        let parts: Vec<&str> = s.split('-').collect();
        let [r, g, b] = parts.as_slice() else {
            return Err(format!(
                "Invalid colour '{s}' (expected rrr-ggg-bbb, +N/-N or a preset name)"
            ));
        };
        let channel = |v: &str| {
            v.trim()
                .parse::<u8>()
                .map_err(|e| format!("Invalid colour channel '{v}': {e}"))
        };
        Ok(Self::Absolute(pack_rgb(channel(*r)?, channel(*g)?, channel(*b)?)))
    }
}

impl fmt::Display for ColorArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absolute(c) => f.write_str(&color_name(*c)),
            Self::Relative(d) => write!(f, "{d:+}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_rgb() {
        assert_eq!(pack_rgb(250, 90, 0), 0x00_fa5a);
        assert_eq!(unpack_rgb(0x00_fa5a), (250, 90, 0));
        assert_eq!(pack_rgb(0, 0, 255), 0xff_0000);
    }

    #[test]
    fn test_cycle_wraps() {
        assert_eq!(cycle(0x00_00ff, 1), 0x00_ff00);
        assert_eq!(cycle(0x00_fa5a, 1), 0x00_00ff);
        assert_eq!(cycle(0x00_00ff, -1), 0x00_fa5a);
        assert_eq!(cycle(0x00_00ff, 9), 0x00_ff00);
        // Unknown colour counts as the first preset
        assert_eq!(cycle(0x12_3456, 2), 0xff_0000);
    }

    #[test]
    fn test_parse_color_arg() {
        assert_eq!("+1".parse(), Ok(ColorArg::Relative(1)));
        assert_eq!("-2".parse(), Ok(ColorArg::Relative(-2)));
        assert_eq!("Orange".parse(), Ok(ColorArg::Absolute(0x00_fa5a)));
        assert_eq!("255-0-0".parse(), Ok(ColorArg::Absolute(0x00_ff00)));
        assert!("255-0".parse::<ColorArg>().is_err());
        assert!("256-0-0".parse::<ColorArg>().is_err());
        assert!("purple".parse::<ColorArg>().is_err());
    }

    #[test]
    fn test_color_name() {
        assert_eq!(color_name(0x00_ff00), "red");
        assert_eq!(color_name(pack_rgb(1, 2, 3)), "1-2-3");
    }
}
