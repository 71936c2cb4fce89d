//! RGBA color value shared by the store and every render surface.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// An sRGB color with a straight alpha channel in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Same color with the alpha channel replaced, clamped to `0.0..=1.0`.
    /// A NaN alpha counts as opaque.
    pub fn with_alpha(self, alpha: f32) -> Self {
        let alpha = if alpha.is_nan() { 1.0 } else { alpha };
        Self {
            a: alpha.clamp(0.0, 1.0),
            ..self
        }
    }

    pub fn is_opaque(&self) -> bool {
        self.a >= 1.0
    }

    /// `#rrggbb`, ignoring alpha.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Alpha as a byte, rounded.
    pub fn alpha_u8(&self) -> u8 {
        (self.a * 255.0).round() as u8
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            write!(f, "{}", self.to_hex())
        } else {
            write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl FromStr for Color {
    type Err = ValidationError;

    /// Accepts `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)` and `rgba(r, g, b, a)`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let invalid = || ValidationError::InvalidColor(s.to_string());

        if let Some(hex) = text.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(invalid);
        }

        let lower = text.to_ascii_lowercase();
        if let Some(body) = lower
            .strip_prefix("rgba(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let parts: Vec<&str> = body.split(',').map(str::trim).collect();
            let [r, g, b, a] = parts.as_slice() else {
                return Err(invalid());
            };
            let alpha: f32 = a.parse().map_err(|_| invalid())?;
            if !(0.0..=1.0).contains(&alpha) {
                return Err(invalid());
            }
            return Ok(Color {
                r: r.parse().map_err(|_| invalid())?,
                g: g.parse().map_err(|_| invalid())?,
                b: b.parse().map_err(|_| invalid())?,
                a: alpha,
            });
        }

        if let Some(body) = lower
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let parts: Vec<&str> = body.split(',').map(str::trim).collect();
            let [r, g, b] = parts.as_slice() else {
                return Err(invalid());
            };
            return Ok(Color::rgb(
                r.parse().map_err(|_| invalid())?,
                g.parse().map_err(|_| invalid())?,
                b.parse().map_err(|_| invalid())?,
            ));
        }

        Err(invalid())
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    match hex.len() {
        3 => {
            let nibble = |i: usize| {
                let v = u8::from_str_radix(hex.get(i..i + 1)?, 16).ok()?;
                Some(v * 17)
            };
            Some(Color::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
        }
        6 => Some(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Color::rgb(byte(0)?, byte(2)?, byte(4)?).with_alpha(byte(6)? as f32 / 255.0)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_forms() {
        assert_eq!("#FFCC00".parse::<Color>().unwrap(), Color::rgb(255, 204, 0));
        assert_eq!("#b0c4de".parse::<Color>().unwrap(), Color::rgb(176, 196, 222));
        assert_eq!("#f60".parse::<Color>().unwrap(), Color::rgb(255, 102, 0));

        let translucent: Color = "#ff6b6b80".parse().unwrap();
        assert_eq!(translucent.alpha_u8(), 128);
    }

    #[test]
    fn parses_functional_forms() {
        assert_eq!(
            "rgb(255, 107, 107)".parse::<Color>().unwrap(),
            Color::rgb(255, 107, 107)
        );
        let c: Color = "RGBA(1,2,3,0.5)".parse().unwrap();
        assert_eq!((c.r, c.g, c.b, c.a), (1, 2, 3, 0.5));
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "red", "#12", "#gggggg", "rgb(1,2)", "rgb(300,0,0)", "rgba(1,2,3,2)"] {
            assert!(bad.parse::<Color>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn with_alpha_only_touches_alpha() {
        let base = Color::rgb(255, 107, 107);
        let fill = base.with_alpha(0.3);
        assert_eq!((fill.r, fill.g, fill.b), (255, 107, 107));
        assert_eq!(fill.a, 0.3);
        assert_eq!(base.with_alpha(7.0).a, 1.0);
    }

    #[test]
    fn nan_alpha_stays_printable() {
        let c = Color::rgb(1, 2, 3).with_alpha(f32::NAN);
        assert_eq!(c.a, 1.0);
        assert_eq!(c.to_string().parse::<Color>().unwrap(), c);
        assert_eq!(Color::rgb(1, 2, 3).with_alpha(f32::NEG_INFINITY).a, 0.0);
    }

    #[test]
    fn display_round_trips_through_parse() {
        let opaque = Color::rgb(31, 119, 180);
        assert_eq!(opaque.to_string(), "#1f77b4");
        let fill = opaque.with_alpha(0.3);
        assert_eq!(fill.to_string(), "rgba(31, 119, 180, 0.3)");
        assert_eq!(fill.to_string().parse::<Color>().unwrap(), fill);
    }
}
