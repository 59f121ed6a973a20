use std::f64::consts::TAU;

use kurbo::{Circle, Point, Rect, RoundedRect, Shape};

use crate::clock::{self, Millis};
use crate::color::{Palette, lerp_palette};

/// Linear rotation angle in degrees, `[0, 360)`.
pub fn rotation_angle(now: Millis, period: Millis) -> f64 {
    360.0 * clock::progress(now, period)
}

fn wave(progress: f64) -> f64 {
    ((TAU * progress).sin() + 1.0) / 2.0
}

/// Sinusoidal pulse between 30% and 100% of the base opacity.
pub fn pulse_opacity(base: f64, progress: f64) -> f64 {
    base * (0.3 + 0.7 * wave(progress))
}

/// Sinusoidal breathe between 50% and 100% of the base size.
pub fn breathe_size(size: f64, progress: f64) -> f64 {
    size * (0.5 + 0.5 * wave(progress))
}

/// Stroke centerline geometry behind an animated dashed border.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum DashShape {
    Circle {
        radius: f64,
    },
    /// Outer box of `width` x `height` stroked at `thickness`; the dash
    /// travels the stroke centerline, inset by half the thickness per side.
    RoundedRect {
        width: f64,
        height: f64,
        radius: f64,
        thickness: f64,
    },
}

impl DashShape {
    /// Closed-form perimeter of the centerline. A rounded rectangle is four
    /// straight edges plus four quarter arcs; zero corner radius degenerates
    /// to `2 * ((w - t) + (h - t))`.
    pub fn perimeter(&self) -> f64 {
        match *self {
            Self::Circle { radius } => TAU * radius.max(0.0),
            Self::RoundedRect {
                width,
                height,
                radius,
                thickness,
            } => {
                let w = (width - thickness).max(0.0);
                let h = (height - thickness).max(0.0);
                let r = radius.clamp(0.0, w.min(h) / 2.0);
                2.0 * ((w - 2.0 * r) + (h - 2.0 * r)) + TAU * r
            }
        }
    }

    /// The same centerline as concrete geometry for the rendering surface.
    pub fn centerline(&self) -> kurbo::BezPath {
        match *self {
            Self::Circle { radius } => {
                Circle::new(Point::ZERO, radius.max(0.0)).to_path(1e-3)
            }
            Self::RoundedRect {
                width,
                height,
                radius,
                thickness,
            } => {
                let inset = thickness / 2.0;
                let w = (width - thickness).max(0.0);
                let h = (height - thickness).max(0.0);
                let r = radius.clamp(0.0, w.min(h) / 2.0);
                RoundedRect::from_rect(Rect::new(inset, inset, inset + w, inset + h), r)
                    .to_path(1e-3)
            }
        }
    }
}

/// Dash offset for the current progress; negative so the dash pattern
/// appears to travel forward along the path.
pub fn dash_offset(progress: f64, perimeter: f64) -> f64 {
    -progress * perimeter
}

/// Cycles through `K` palettes over one period: `index = floor(p * K)`,
/// interpolating into the next palette (wrapping) by the intra-segment
/// fraction. Returns `None` for an empty palette list.
pub fn cycle_palettes(palettes: &[Palette], progress: f64) -> Option<Palette> {
    if palettes.is_empty() {
        return None;
    }
    let k = palettes.len();
    let scaled = progress.clamp(0.0, 1.0) * k as f64;
    let index = (scaled.floor() as usize).min(k - 1);
    let local = scaled - index as f64;
    Some(lerp_palette(
        &palettes[index],
        &palettes[(index + 1) % k],
        local,
    ))
}
