//! Stagecast renders parametrized, animated graphical overlays for live
//! stream compositing: text plates, call-to-action banners, social-handle
//! lists, and animated borders.
//!
//! Each overlay instance is driven by a flat key/value parameter set
//! (typically a URL query string) layered over a named preset and built-in
//! defaults. The engine owns timing only: it resolves the parameters once,
//! drives timed visibility state machines and sequenced reveals off a
//! single clock, and emits declarative per-frame visual values
//! ([`overlay::OverlayFrame`]) for a rendering surface to paint.
#![forbid(unsafe_code)]

pub mod clock;
pub mod color;
pub mod config;
pub mod effects;
pub mod error;
pub mod overlay;
pub mod params;
pub mod registry;
pub mod sequence;
pub mod theme;
pub mod timer;
pub mod visibility;

pub use clock::{Clock, ManualClock, Millis, MonotonicClock};
pub use color::{Color, Palette, lerp_palette};
pub use config::{ResolvedConfig, resolve, resolve_builtin};
pub use error::{StagecastError, StagecastResult};
pub use overlay::{Overlay, OverlayFrame, OverlayKind};
pub use params::RawParams;
pub use registry::EffectRegistry;
pub use visibility::VisibilityState;
