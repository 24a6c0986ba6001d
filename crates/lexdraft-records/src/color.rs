//! Run colors
//!
//! Colors reach the reconstructor in whatever shape the upstream generator
//! chose to emit. [`ColorValue`] accepts any JSON value so that decoding never
//! fails on a color, and [`resolve_color`] turns it into an explicit [`Rgb`]
//! or "no explicit color".
//!
//! | Input                          | Result             |
//! |--------------------------------|--------------------|
//! | absent / `null`                | no explicit color  |
//! | `"auto"` (any case)            | no explicit color  |
//! | `"#RRGGBB"` / `"RRGGBB"`       | `Rgb(R, G, B)`     |
//! | `[r, g, b]` with each in 0-255 | `Rgb(r, g, b)`     |
//! | anything else                  | no explicit color  |

use std::fmt;

use serde::{Deserialize, Serialize};

/// An explicit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Pure red, the color that marks template placeholders
    pub const RED: Rgb = Rgb::new(0xFF, 0x00, 0x00);

    /// Create a color from its components
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a 6-digit hex string, with an optional leading `#`
    pub fn from_hex(value: &str) -> Option<Self> {
        let hex = value.strip_prefix('#').unwrap_or(value);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let component = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::new(component(0)?, component(2)?, component(4)?))
    }

    /// Uppercase hex form without `#`, as written to `w:color/@w:val`
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

impl From<Rgb> for ColorValue {
    fn from(rgb: Rgb) -> Self {
        ColorValue::Components(vec![rgb.r.into(), rgb.g.into(), rgb.b.into()])
    }
}

/// A run color as it appears in a record
///
/// The serializer always writes `[r, g, b]`. Generated text may use hex
/// strings, `"auto"`, or shapes that resolve to nothing; those are kept in
/// [`ColorValue::Other`] instead of failing the decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorValue {
    /// Integer sequence, expected to be `[r, g, b]`
    Components(Vec<i64>),
    /// String form: hex digits or `"auto"`
    Text(String),
    /// Any other JSON value
    Other(serde_json::Value),
}

impl ColorValue {
    /// Whether this value explicitly asks for the inherited color (`"auto"`)
    pub fn is_auto(&self) -> bool {
        matches!(self, ColorValue::Text(s) if s.eq_ignore_ascii_case("auto"))
    }

    /// Resolve to an explicit color, see [`resolve_color`]
    pub fn resolve(&self) -> Option<Rgb> {
        match self {
            ColorValue::Components(parts) => match parts.as_slice() {
                [r, g, b] => Some(Rgb::new(
                    u8::try_from(*r).ok()?,
                    u8::try_from(*g).ok()?,
                    u8::try_from(*b).ok()?,
                )),
                _ => None,
            },
            ColorValue::Text(s) if s.is_empty() || s.eq_ignore_ascii_case("auto") => None,
            ColorValue::Text(s) => Rgb::from_hex(s),
            ColorValue::Other(_) => None,
        }
    }
}

/// Resolve an optional record color to an explicit RGB triple
///
/// Never fails: malformed values degrade to `None` ("inherit default").
pub fn resolve_color(value: Option<&ColorValue>) -> Option<Rgb> {
    value.and_then(ColorValue::resolve)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> ColorValue {
        ColorValue::Text(s.to_string())
    }

    #[test]
    fn test_resolution_table() {
        assert_eq!(resolve_color(None), None);
        assert_eq!(resolve_color(Some(&text("auto"))), None);
        assert_eq!(resolve_color(Some(&text("AUTO"))), None);
        assert_eq!(resolve_color(Some(&text("#FF0000"))), Some(Rgb::RED));
        assert_eq!(resolve_color(Some(&text("ff0000"))), Some(Rgb::RED));
        assert_eq!(
            resolve_color(Some(&ColorValue::Components(vec![0, 128, 255]))),
            Some(Rgb::new(0, 128, 255))
        );
        assert_eq!(resolve_color(Some(&text("nope"))), None);
    }

    #[test]
    fn test_malformed_values_degrade() {
        assert_eq!(resolve_color(Some(&text(""))), None);
        assert_eq!(resolve_color(Some(&text("#FF00"))), None);
        assert_eq!(resolve_color(Some(&text("GG0000"))), None);
        assert_eq!(resolve_color(Some(&text("##FF0000"))), None);
        assert_eq!(
            resolve_color(Some(&ColorValue::Components(vec![1, 2]))),
            None
        );
        assert_eq!(
            resolve_color(Some(&ColorValue::Components(vec![1, 2, 3, 4]))),
            None
        );
        assert_eq!(
            resolve_color(Some(&ColorValue::Components(vec![256, 0, 0]))),
            None
        );
        assert_eq!(
            resolve_color(Some(&ColorValue::Components(vec![-1, 0, 0]))),
            None
        );
        assert_eq!(
            resolve_color(Some(&ColorValue::Other(serde_json::json!({"r": 1})))),
            None
        );
    }

    #[test]
    fn test_non_ascii_string_does_not_panic() {
        // six bytes, but not six hex digits
        assert_eq!(Rgb::from_hex("ééé"), None);
    }

    #[test]
    fn test_decode_shapes() {
        let v: ColorValue = serde_json::from_str("[0, 128, 255]").unwrap();
        assert_eq!(v, ColorValue::Components(vec![0, 128, 255]));

        let v: ColorValue = serde_json::from_str("\"#00FF00\"").unwrap();
        assert_eq!(v.resolve(), Some(Rgb::new(0, 255, 0)));

        let v: ColorValue = serde_json::from_str("[0.5, 1, 2]").unwrap();
        assert!(matches!(v, ColorValue::Other(_)));
        assert_eq!(v.resolve(), None);

        let v: ColorValue = serde_json::from_str("12").unwrap();
        assert_eq!(v.resolve(), None);
    }

    #[test]
    fn test_hex_formatting() {
        assert_eq!(Rgb::new(0x0A, 0xBC, 0x00).to_hex(), "0ABC00");
        assert_eq!(Rgb::RED.to_string(), "#FF0000");
        assert_eq!(ColorValue::from(Rgb::RED), ColorValue::Components(vec![255, 0, 0]));
    }

    #[test]
    fn test_is_auto() {
        assert!(text("Auto").is_auto());
        assert!(!text("FF0000").is_auto());
        assert!(!ColorValue::Components(vec![0, 0, 0]).is_auto());
    }
}
