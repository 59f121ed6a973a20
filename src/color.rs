use std::fmt;

use crate::error::{StagecastError, StagecastResult};

/// 8-bit RGB color. Overlays composite over live video, so alpha is carried
/// separately as per-frame opacity rather than baked into the color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rgb` or `#rrggbb` (leading `#` optional, case-insensitive).
    pub fn from_hex(s: &str) -> StagecastResult<Self> {
        let hex = s.trim().trim_start_matches('#');
        let expand = |h: u8| h << 4 | h;
        match hex.len() {
            3 => {
                let v = u16::from_str_radix(hex, 16)
                    .map_err(|_| StagecastError::parse(format!("invalid hex color '{s}'")))?;
                Ok(Self::rgb(
                    expand((v >> 8) as u8 & 0xf),
                    expand((v >> 4) as u8 & 0xf),
                    expand(v as u8 & 0xf),
                ))
            }
            6 => {
                let v = u32::from_str_radix(hex, 16)
                    .map_err(|_| StagecastError::parse(format!("invalid hex color '{s}'")))?;
                Ok(Self::rgb((v >> 16) as u8, (v >> 8) as u8, v as u8))
            }
            _ => Err(StagecastError::parse(format!(
                "hex color '{s}' must have 3 or 6 digits"
            ))),
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Per-channel linear interpolation, `t` clamped to `[0, 1]`, rounded to
    /// the nearest representable byte.
    pub fn lerp(a: Self, b: Self, t: f64) -> Self {
        fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
            let a = f64::from(a);
            let b = f64::from(b);
            (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
        }

        let t = t.clamp(0.0, 1.0);
        Self {
            r: lerp_u8(a.r, b.r, t),
            g: lerp_u8(a.g, b.g, t),
            b: lerp_u8(a.b, b.b, t),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl serde::Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Ordered, non-empty list of colors backing a gradient.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct Palette(Vec<Color>);

impl Palette {
    /// Fallback entry used when a palette would otherwise be empty.
    pub const FALLBACK: Color = Color::rgb(0xff, 0xff, 0xff);

    /// Downstream index math assumes at least one entry, so an empty input is
    /// promoted to a single fallback color rather than rejected.
    pub fn new(colors: Vec<Color>) -> Self {
        if colors.is_empty() {
            return Self(vec![Self::FALLBACK]);
        }
        Self(colors)
    }

    pub fn colors(&self) -> &[Color] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        false // never empty by construction
    }

    /// Per-index picker: out-of-bounds indices reuse the first entry.
    pub fn get(&self, index: usize) -> Color {
        self.0.get(index).copied().unwrap_or(self.0[0])
    }
}

impl From<&[Color]> for Palette {
    fn from(colors: &[Color]) -> Self {
        Self::new(colors.to_vec())
    }
}

/// Index-wise palette interpolation. Indices past `b`'s length reuse `b[0]`;
/// the result always has `a`'s length.
pub fn lerp_palette(a: &Palette, b: &Palette, t: f64) -> Palette {
    Palette::new(
        a.colors()
            .iter()
            .enumerate()
            .map(|(i, &ca)| Color::lerp(ca, b.get(i), t))
            .collect(),
    )
}
