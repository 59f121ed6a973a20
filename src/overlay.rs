use tracing::warn;

use crate::clock::{self, Millis};
use crate::color::Palette;
use crate::config::ResolvedConfig;
use crate::effects::{self, DashShape};
use crate::params;
use crate::registry::EffectRegistry;
use crate::sequence::{
    OneByOne, OneByOneTimings, SequencedItem, StaggerReveal, StaggerTimings, order_by_rank,
};
use crate::theme::{self, ThemeColors};
use crate::timer::TimerQueue;
use crate::visibility::{ExitTimer, LoopTimings, VisibilityCycle, VisibilityState};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayKind {
    /// Text plate (lower-third style captions).
    Plate,
    /// Call-to-action banner.
    Banner,
    /// Social-handle list.
    Socials,
    /// Animated border frame.
    Border,
}

impl OverlayKind {
    fn from_config(config: &ResolvedConfig) -> Self {
        match config.text("kind") {
            "banner" => Self::Banner,
            "socials" => Self::Socials,
            "border" => Self::Border,
            _ => Self::Plate,
        }
    }
}

/// One sequenced item with its resolved platform styling.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ItemFrame {
    pub identity: String,
    pub display_text: String,
    pub visible: bool,
    pub glyph: &'static str,
    pub brand: crate::color::Color,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct DashSample {
    pub perimeter: f64,
    pub offset: f64,
}

/// Declarative visual values for one frame. How these are painted is the
/// rendering surface's business; nothing here references a drawing API.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct OverlayFrame {
    pub kind: OverlayKind,
    pub visible: bool,
    pub state: Option<VisibilityState>,
    /// Loop iteration counter; renderers key re-mounts on this to replay
    /// entrance animations from their first frame.
    pub cycle: u64,
    pub should_exit: bool,
    pub title: String,
    pub subtitle: String,
    pub colors: Palette,
    pub theme: ThemeColors,
    pub enter_fx: String,
    pub exit_fx: String,
    pub rotation_deg: Option<f64>,
    pub pulse_opacity: Option<f64>,
    pub glow_size: Option<f64>,
    pub dash: Option<DashSample>,
    pub items: Vec<ItemFrame>,
}

/// One independently parametrized overlay instance.
///
/// Owns its timer queue and all animation state; instances share nothing.
/// Parameters are fixed at construction (a parameter change is a reload,
/// i.e. a new instance), and the random gradient pick is pinned by the seed
/// captured here, so sampling is deterministic given the clock.
#[derive(Debug)]
pub struct Overlay {
    kind: OverlayKind,
    config: ResolvedConfig,
    started: Millis,
    palette: Palette,
    theme: ThemeColors,
    cycle_set: Vec<Palette>,
    shift_set: Vec<Palette>,
    enter_fx: String,
    exit_fx: String,
    queue: TimerQueue,
    visibility: Option<VisibilityCycle>,
    exit: Option<ExitTimer>,
    stagger: Option<StaggerReveal>,
    one_by_one: Option<OneByOne>,
}

impl Overlay {
    pub fn new(config: ResolvedConfig, registry: &EffectRegistry, seed: u64, now: Millis) -> Self {
        let kind = OverlayKind::from_config(&config);
        let palette = theme::resolve_gradient(
            config.text("gradient"),
            config.list("colors"),
            config.flag("random_colors"),
            seed,
        );
        let theme_colors = theme::resolve_theme(config.text("theme"));

        let cycle_set = named_palettes(config.list("cycle"));
        let shift_set = if cycle_set.is_empty() && config.flag("colorshift") {
            theme::GRADIENT_NAMES
                .iter()
                .filter_map(|name| theme::gradient_colors(name))
                .map(Palette::from)
                .collect()
        } else {
            Vec::new()
        };

        let enter_fx = fx_or_default(registry, config.text("enter_fx"), "fade-up");
        let exit_fx = fx_or_default(registry, config.text("exit_fx"), "fade-out");

        let mut queue = TimerQueue::new();
        let mut overlay = Self {
            kind,
            started: now,
            palette,
            theme: theme_colors,
            cycle_set,
            shift_set,
            enter_fx,
            exit_fx,
            visibility: None,
            exit: None,
            stagger: None,
            one_by_one: None,
            queue: TimerQueue::new(),
            config,
        };

        match overlay.kind {
            OverlayKind::Plate | OverlayKind::Banner => {
                if overlay.config.flag("loop") {
                    overlay.visibility = Some(VisibilityCycle::new(
                        overlay.loop_timings(),
                        &mut queue,
                        now,
                    ));
                } else {
                    overlay.exit = Some(ExitTimer::new(
                        overlay.config.secs("exit_after"),
                        &mut queue,
                        now,
                    ));
                }
            }
            OverlayKind::Socials => {
                let items = build_items(&overlay.config);
                match overlay.config.text("mode") {
                    "one-by-one" => {
                        overlay.one_by_one = Some(OneByOne::new(
                            items,
                            overlay.one_by_one_timings(),
                            &mut queue,
                            now,
                        ));
                    }
                    _ => {
                        overlay.stagger = Some(StaggerReveal::new(
                            items,
                            overlay.stagger_timings(),
                            &mut queue,
                            now,
                        ));
                    }
                }
            }
            OverlayKind::Border => {}
        }

        overlay.queue = queue;
        overlay
    }

    pub fn kind(&self) -> OverlayKind {
        self.kind
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Ticks discrete timers up to `now`, then computes the frame's
    /// continuous values. Idempotent per timestamp; sampling the same
    /// instant twice yields the same continuous values, and missed frames
    /// cause no drift.
    pub fn sample(&mut self, now: Millis) -> OverlayFrame {
        let fired = self.queue.poll(now);
        if let Some(cycle) = &mut self.visibility {
            cycle.tick(&mut self.queue, now, &fired);
        }
        if let Some(exit) = &mut self.exit {
            exit.tick(&fired);
        }
        if let Some(stagger) = &mut self.stagger {
            stagger.tick(&mut self.queue, now, &fired);
        }
        if let Some(one_by_one) = &mut self.one_by_one {
            one_by_one.tick(&mut self.queue, now, &fired);
        }

        let elapsed = now.saturating_sub(self.started);
        let config = &self.config;

        let colors = if !self.cycle_set.is_empty() {
            let progress = clock::progress(elapsed, config.secs("cycle_period"));
            effects::cycle_palettes(&self.cycle_set, progress)
                .unwrap_or_else(|| self.palette.clone())
        } else if !self.shift_set.is_empty() {
            let progress = clock::progress(elapsed, config.secs("shift_period"));
            effects::cycle_palettes(&self.shift_set, progress)
                .unwrap_or_else(|| self.palette.clone())
        } else {
            self.palette.clone()
        };

        let rotation_deg = config
            .flag("rotate")
            .then(|| effects::rotation_angle(elapsed, config.secs("rotate_period")));
        let pulse_opacity = config
            .flag("pulse")
            .then(|| effects::pulse_opacity(1.0, clock::progress(elapsed, config.secs("pulse_period"))));
        let glow_size = config.flag("breathe").then(|| {
            effects::breathe_size(
                config.num("glow_size"),
                clock::progress(elapsed, config.secs("breathe_period")),
            )
        });
        let dash = config.flag("dash").then(|| {
            let shape = self.dash_shape();
            let perimeter = shape.perimeter();
            let progress = clock::progress(elapsed, config.secs("dash_period"));
            DashSample {
                perimeter,
                offset: effects::dash_offset(progress, perimeter),
            }
        });

        let should_exit = self.exit.as_ref().is_some_and(ExitTimer::should_exit);
        let visible = match &self.visibility {
            Some(cycle) => cycle.is_visible(config.flag("visible_through_exit")),
            None => !should_exit,
        };

        let items = self
            .stagger
            .as_ref()
            .map(StaggerReveal::items)
            .or_else(|| self.one_by_one.as_ref().map(OneByOne::items))
            .unwrap_or(&[])
            .iter()
            .map(|item| {
                let style = theme::platform_style(&item.identity);
                ItemFrame {
                    identity: item.identity.clone(),
                    display_text: item.display_text.clone(),
                    visible: item.visible,
                    glyph: style.glyph,
                    brand: style.brand,
                }
            })
            .collect();

        OverlayFrame {
            kind: self.kind,
            visible,
            state: self.visibility.as_ref().map(VisibilityCycle::state),
            cycle: self.visibility.as_ref().map_or(0, VisibilityCycle::cycle),
            should_exit,
            title: config.text("title").to_owned(),
            subtitle: config.text("subtitle").to_owned(),
            colors,
            theme: self.theme,
            enter_fx: self.enter_fx.clone(),
            exit_fx: self.exit_fx.clone(),
            rotation_deg,
            pulse_opacity,
            glow_size,
            dash,
            items,
        }
    }

    fn loop_timings(&self) -> LoopTimings {
        LoopTimings {
            delay: self.config.secs("delay"),
            entrance: self.config.secs("entrance_speed"),
            hold: self.config.secs("hold"),
            exit: self.config.secs("exit_speed"),
            pause: self.config.secs("pause"),
        }
    }

    fn stagger_timings(&self) -> StaggerTimings {
        StaggerTimings {
            step: self.config.millis("step_ms"),
            hide_step: self.config.millis("hide_step_ms"),
            hold: self.config.secs("hold"),
            pause: self.config.secs("pause"),
            looping: self.config.flag("loop"),
        }
    }

    fn one_by_one_timings(&self) -> OneByOneTimings {
        OneByOneTimings {
            each: self.config.secs("each"),
            each_pause: self.config.secs("each_pause"),
            gap: self.config.millis("gap_ms"),
        }
    }

    fn dash_shape(&self) -> DashShape {
        DashShape::RoundedRect {
            width: self.config.num("border_width"),
            height: self.config.num("border_height"),
            radius: self.config.num("border_radius"),
            thickness: self.config.num("border_thickness"),
        }
    }
}

fn fx_or_default(registry: &EffectRegistry, name: &str, fallback: &str) -> String {
    if registry.contains(name) {
        name.to_owned()
    } else {
        warn!(effect = name, fallback, "unknown effect name, using fallback");
        fallback.to_owned()
    }
}

fn named_palettes(names: &[String]) -> Vec<Palette> {
    names
        .iter()
        .filter_map(|name| match theme::gradient_colors(name) {
            Some(colors) => Some(Palette::from(colors)),
            None => {
                warn!(gradient = name.as_str(), "dropping unknown cycle gradient");
                None
            }
        })
        .collect()
}

/// Items for the sequenced reveal. An explicit `show` list fixes the order
/// outright; otherwise the `handles` order applies, adjusted by `ranks`.
fn build_items(config: &ResolvedConfig) -> Vec<SequencedItem> {
    let handles = params::parse_pairs(config.list("handles"));
    let display_for = |platform: &str| {
        handles
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(platform))
            .map(|(_, handle)| handle.clone())
            .unwrap_or_else(|| platform.to_owned())
    };

    let show = config.list("show");
    if !show.is_empty() {
        return show
            .iter()
            .map(|platform| SequencedItem::new(platform.clone(), display_for(platform)))
            .collect();
    }

    let items = handles
        .iter()
        .map(|(platform, handle)| SequencedItem::new(platform.clone(), handle.clone()))
        .collect();
    order_by_rank(items, &params::parse_rank_pairs(config.list("ranks")))
}
