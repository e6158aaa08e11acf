//! Background colors and hex color parsing (`#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`).

use core::fmt;
use core::str::FromStr;

/// Solid fill behind the grid.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "alloc::string::String", into = "alloc::string::String"))]
pub enum CanvasColor {
    /// Transparent black `[0, 0, 0, 0]`.
    #[default]
    Transparent,
    /// sRGB color with alpha (8-bit per channel).
    Srgb { r: u8, g: u8, b: u8, a: u8 },
}

impl CanvasColor {
    /// The grid's brand blue, `#106596`.
    pub const BRAND: Self = Self::Srgb {
        r: 0x10,
        g: 0x65,
        b: 0x96,
        a: 0xFF,
    };

    /// White, fully opaque.
    pub const fn white() -> Self {
        Self::Srgb {
            r: 255,
            g: 255,
            b: 255,
            a: 255,
        }
    }

    /// Black, fully opaque.
    pub const fn black() -> Self {
        Self::Srgb {
            r: 0,
            g: 0,
            b: 0,
            a: 255,
        }
    }

    /// Channel values in RGBA order.
    pub const fn to_rgba(self) -> [u8; 4] {
        match self {
            Self::Transparent => [0, 0, 0, 0],
            Self::Srgb { r, g, b, a } => [r, g, b, a],
        }
    }
}

/// Error returned when a string is not a hex color.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("expected a color like #RRGGBB, #RRGGBBAA, #RGB or \"transparent\"")]
pub struct ColorParseError;

impl FromStr for CanvasColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("transparent") {
            return Ok(Self::Transparent);
        }
        parse_hex(s.strip_prefix('#').unwrap_or(s)).ok_or(ColorParseError)
    }
}

#[cfg(feature = "alloc")]
impl TryFrom<alloc::string::String> for CanvasColor {
    type Error = ColorParseError;

    fn try_from(s: alloc::string::String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Formats as `#rrggbbaa`, or `transparent`.
impl fmt::Display for CanvasColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Transparent => f.write_str("transparent"),
            Self::Srgb { r, g, b, a: 255 } => write!(f, "#{r:02x}{g:02x}{b:02x}"),
            Self::Srgb { r, g, b, a } => write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}"),
        }
    }
}

#[cfg(feature = "alloc")]
impl From<CanvasColor> for alloc::string::String {
    fn from(color: CanvasColor) -> Self {
        use alloc::string::ToString;
        color.to_string()
    }
}

fn parse_hex(hex: &str) -> Option<CanvasColor> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let bytes = hex.as_bytes();
    let [r, g, b, a] = match hex.len() {
        3 | 4 => {
            let mut out = [0xFF; 4];
            for (slot, &ch) in out.iter_mut().zip(bytes) {
                let n = hex_val(ch)?;
                *slot = n << 4 | n;
            }
            out
        }
        6 | 8 => {
            let mut out = [0xFF; 4];
            for (slot, pair) in out.iter_mut().zip(bytes.chunks_exact(2)) {
                *slot = hex_val(pair[0])? << 4 | hex_val(pair[1])?;
            }
            out
        }
        _ => return None,
    };
    Some(CanvasColor::Srgb { r, g, b, a })
}

fn hex_val(ch: u8) -> Option<u8> {
    match ch {
        b'0'..=b'9' => Some(ch - b'0'),
        b'a'..=b'f' => Some(ch - b'a' + 10),
        b'A'..=b'F' => Some(ch - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Option<CanvasColor> {
        s.parse().ok()
    }

    #[test]
    fn hex_3_digit() {
        assert_eq!(
            parse("#f0a"),
            Some(CanvasColor::Srgb {
                r: 0xFF,
                g: 0x00,
                b: 0xAA,
                a: 0xFF
            })
        );
    }

    #[test]
    fn hex_4_digit_with_alpha() {
        assert_eq!(parse("f0a8").map(CanvasColor::to_rgba), Some([0xFF, 0, 0xAA, 0x88]));
    }

    #[test]
    fn hex_6_digit_brand() {
        assert_eq!(parse("#106596"), Some(CanvasColor::BRAND));
        assert_eq!(parse("  106596 "), Some(CanvasColor::BRAND));
    }

    #[test]
    fn hex_8_digit() {
        assert_eq!(parse("#10659680").map(CanvasColor::to_rgba), Some([0x10, 0x65, 0x96, 0x80]));
    }

    #[test]
    fn transparent_keyword() {
        assert_eq!(parse("Transparent"), Some(CanvasColor::Transparent));
    }

    #[test]
    fn invalid_returns_none() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("#12345"), None);
        assert_eq!(parse("#gggggg"), None);
        assert_eq!(parse("blue"), None);
    }

    #[cfg(feature = "std")]
    #[test]
    fn display_round_trips_through_parse() {
        for color in [
            CanvasColor::BRAND,
            CanvasColor::Transparent,
            CanvasColor::Srgb {
                r: 1,
                g: 2,
                b: 3,
                a: 4,
            },
        ] {
            assert_eq!(parse(&color.to_string()), Some(color));
        }
    }
}
