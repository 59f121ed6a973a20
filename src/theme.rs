use tracing::warn;

use crate::color::{Color, Palette};

pub const DEFAULT_GRADIENT: &str = "aurora";
pub const DEFAULT_THEME: &str = "midnight";

const AURORA: &[Color] = &[
    Color::rgb(0x00, 0xe5, 0xa0),
    Color::rgb(0x2e, 0x86, 0xff),
    Color::rgb(0x9b, 0x5c, 0xff),
];
const SUNSET: &[Color] = &[
    Color::rgb(0xff, 0x6b, 0x35),
    Color::rgb(0xff, 0x2e, 0x63),
    Color::rgb(0x8a, 0x2b, 0xe2),
];
const OCEAN: &[Color] = &[
    Color::rgb(0x00, 0xc2, 0xff),
    Color::rgb(0x00, 0x6e, 0xd6),
    Color::rgb(0x00, 0x3a, 0x8c),
];
const NEON: &[Color] = &[
    Color::rgb(0x39, 0xff, 0x14),
    Color::rgb(0x00, 0xff, 0xff),
    Color::rgb(0xff, 0x00, 0xff),
];
const EMBER: &[Color] = &[
    Color::rgb(0xff, 0xd7, 0x00),
    Color::rgb(0xff, 0x8c, 0x00),
    Color::rgb(0xe6, 0x2e, 0x00),
];
const FOREST: &[Color] = &[
    Color::rgb(0x2e, 0xcc, 0x71),
    Color::rgb(0x14, 0x8f, 0x4b),
    Color::rgb(0x0b, 0x53, 0x2b),
];
const CANDY: &[Color] = &[
    Color::rgb(0xff, 0x8f, 0xc7),
    Color::rgb(0xff, 0x5e, 0xa8),
    Color::rgb(0xb8, 0x6b, 0xff),
];
const MONO: &[Color] = &[
    Color::rgb(0xf5, 0xf5, 0xf5),
    Color::rgb(0x9e, 0x9e, 0x9e),
    Color::rgb(0x42, 0x42, 0x42),
];

/// Gradient table order is stable; colorshift cycles it in this order.
pub const GRADIENT_NAMES: &[&str] = &[
    "aurora", "sunset", "ocean", "neon", "ember", "forest", "candy", "mono",
];

pub fn gradient_colors(name: &str) -> Option<&'static [Color]> {
    match name.trim().to_ascii_lowercase().as_str() {
        "aurora" => Some(AURORA),
        "sunset" => Some(SUNSET),
        "ocean" => Some(OCEAN),
        "neon" => Some(NEON),
        "ember" => Some(EMBER),
        "forest" => Some(FOREST),
        "candy" => Some(CANDY),
        "mono" => Some(MONO),
        _ => None,
    }
}

/// Resolves the gradient for an overlay instance.
///
/// Explicit colors always win; otherwise random mode picks one named
/// gradient from the seed (stable for the instance's lifetime); otherwise
/// the named gradient, failing closed to [`DEFAULT_GRADIENT`].
pub fn resolve_gradient(name: &str, explicit: &[String], random_mode: bool, seed: u64) -> Palette {
    if !explicit.is_empty() {
        let colors: Vec<Color> = explicit
            .iter()
            .filter_map(|entry| match Color::from_hex(entry) {
                Ok(color) => Some(color),
                Err(_) => {
                    warn!(entry = %entry, "dropping unparseable explicit color");
                    None
                }
            })
            .collect();
        if !colors.is_empty() {
            return Palette::new(colors);
        }
        warn!("no parseable explicit colors, falling back to named gradient");
    }

    if random_mode {
        let mut rng = fastrand::Rng::with_seed(seed);
        let pick = GRADIENT_NAMES[rng.usize(..GRADIENT_NAMES.len())];
        return Palette::from(gradient_colors(pick).unwrap_or(AURORA));
    }

    match gradient_colors(name) {
        Some(colors) => Palette::from(colors),
        None => {
            warn!(gradient = name, "unknown gradient, using default");
            Palette::from(AURORA)
        }
    }
}

/// Text/background/muted/border colors of a named theme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ThemeColors {
    pub text: Color,
    pub background: Color,
    pub muted: Color,
    pub border: Color,
}

const MIDNIGHT: ThemeColors = ThemeColors {
    text: Color::rgb(0xf2, 0xf4, 0xf8),
    background: Color::rgb(0x10, 0x14, 0x1f),
    muted: Color::rgb(0x8a, 0x92, 0xa6),
    border: Color::rgb(0x2a, 0x31, 0x45),
};
const PAPER: ThemeColors = ThemeColors {
    text: Color::rgb(0x1a, 0x1a, 0x1a),
    background: Color::rgb(0xfb, 0xf8, 0xf2),
    muted: Color::rgb(0x77, 0x70, 0x66),
    border: Color::rgb(0xd8, 0xd2, 0xc6),
};
const SLATE: ThemeColors = ThemeColors {
    text: Color::rgb(0xe6, 0xe9, 0xef),
    background: Color::rgb(0x23, 0x28, 0x31),
    muted: Color::rgb(0x99, 0xa2, 0xb1),
    border: Color::rgb(0x3c, 0x44, 0x52),
};
const VOID: ThemeColors = ThemeColors {
    text: Color::rgb(0xff, 0xff, 0xff),
    background: Color::rgb(0x00, 0x00, 0x00),
    muted: Color::rgb(0x7a, 0x7a, 0x7a),
    border: Color::rgb(0x1f, 0x1f, 0x1f),
};

pub const THEME_NAMES: &[&str] = &["midnight", "paper", "slate", "void"];

/// Fails closed to [`DEFAULT_THEME`].
pub fn resolve_theme(name: &str) -> ThemeColors {
    match name.trim().to_ascii_lowercase().as_str() {
        "midnight" => MIDNIGHT,
        "paper" => PAPER,
        "slate" => SLATE,
        "void" => VOID,
        other => {
            if !other.is_empty() {
                warn!(theme = other, "unknown theme, using default");
            }
            MIDNIGHT
        }
    }
}

/// Glyph identifier and brand color for a social platform. The glyph is a
/// name the rendering surface maps to an icon; the core never rasterizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PlatformStyle {
    pub glyph: &'static str,
    pub brand: Color,
}

pub const PLATFORM_NAMES: &[&str] = &[
    "twitch", "youtube", "twitter", "instagram", "discord", "github", "tiktok",
];

/// Fails closed to a generic link glyph in the default theme's muted color.
pub fn platform_style(name: &str) -> PlatformStyle {
    match name.trim().to_ascii_lowercase().as_str() {
        "twitch" => PlatformStyle {
            glyph: "twitch",
            brand: Color::rgb(0x91, 0x46, 0xff),
        },
        "youtube" => PlatformStyle {
            glyph: "youtube",
            brand: Color::rgb(0xff, 0x00, 0x00),
        },
        "twitter" | "x" => PlatformStyle {
            glyph: "twitter",
            brand: Color::rgb(0x1d, 0xa1, 0xf2),
        },
        "instagram" => PlatformStyle {
            glyph: "instagram",
            brand: Color::rgb(0xe1, 0x30, 0x6c),
        },
        "discord" => PlatformStyle {
            glyph: "discord",
            brand: Color::rgb(0x58, 0x65, 0xf2),
        },
        "github" => PlatformStyle {
            glyph: "github",
            brand: Color::rgb(0x18, 0x17, 0x17),
        },
        "tiktok" => PlatformStyle {
            glyph: "tiktok",
            brand: Color::rgb(0x01, 0xf2, 0xea),
        },
        other => {
            warn!(platform = other, "unknown platform, using generic glyph");
            PlatformStyle {
                glyph: "link",
                brand: MIDNIGHT.muted,
            }
        }
    }
}
