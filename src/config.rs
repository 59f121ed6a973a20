use std::collections::BTreeMap;

use tracing::warn;

use crate::clock::Millis;
use crate::params::{self, RawParams};

/// One typed parameter value. The variant is fixed per key by the default
/// table; resolution never changes a key's variant.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Text(String),
    Flag(bool),
    List(Vec<String>),
}

impl ParamValue {
    pub fn text(s: &str) -> Self {
        Self::Text(s.to_owned())
    }

    pub fn list(items: &[&str]) -> Self {
        Self::List(items.iter().map(|s| (*s).to_owned()).collect())
    }

    fn same_kind(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::Number(_), Self::Number(_))
                | (Self::Text(_), Self::Text(_))
                | (Self::Flag(_), Self::Flag(_))
                | (Self::List(_), Self::List(_))
        )
    }
}

/// Default value plus, for enumerated text keys, the allowed value set.
#[derive(Clone, Debug)]
pub struct ParamSpec {
    pub default: ParamValue,
    pub allowed: Option<&'static [&'static str]>,
}

impl ParamSpec {
    fn plain(default: ParamValue) -> Self {
        Self {
            default,
            allowed: None,
        }
    }

    fn choice(default: &str, allowed: &'static [&'static str]) -> Self {
        Self {
            default: ParamValue::text(default),
            allowed: Some(allowed),
        }
    }
}

pub type DefaultTable = BTreeMap<&'static str, ParamSpec>;
pub type PresetFragment = BTreeMap<&'static str, ParamValue>;
pub type PresetTable = BTreeMap<&'static str, PresetFragment>;

pub const OVERLAY_KINDS: &[&str] = &["plate", "banner", "socials", "border"];
pub const REVEAL_MODES: &[&str] = &["stagger", "one-by-one"];

/// Caption keys resolve presence-based: a key present in the raw input wins
/// even when empty, so an explicit blank can suppress a preset caption.
pub const CAPTION_KEYS: &[&str] = &["title", "subtitle"];

/// Every key recognized by the engine, with its default. Downstream code
/// reads config unconditionally, so this table must stay total.
pub fn default_table() -> DefaultTable {
    use ParamValue::{Flag, Number};

    let mut t = DefaultTable::new();

    t.insert("kind", ParamSpec::choice("plate", OVERLAY_KINDS));
    t.insert("theme", ParamSpec::plain(ParamValue::text("midnight")));
    t.insert("gradient", ParamSpec::plain(ParamValue::text("aurora")));
    t.insert("colors", ParamSpec::plain(ParamValue::list(&[])));
    t.insert("random_colors", ParamSpec::plain(Flag(false)));

    // Captions (presence-based fallback, see CAPTION_KEYS).
    t.insert("title", ParamSpec::plain(ParamValue::text("")));
    t.insert("subtitle", ParamSpec::plain(ParamValue::text("")));

    // Looping visibility cycle, seconds.
    t.insert("loop", ParamSpec::plain(Flag(false)));
    t.insert("delay", ParamSpec::plain(Number(0.0)));
    t.insert("entrance_speed", ParamSpec::plain(Number(0.6)));
    t.insert("hold", ParamSpec::plain(Number(4.0)));
    t.insert("exit_speed", ParamSpec::plain(Number(0.6)));
    t.insert("pause", ParamSpec::plain(Number(2.0)));
    t.insert("visible_through_exit", ParamSpec::plain(Flag(false)));

    // Non-loop auto-exit, seconds; 0 disables.
    t.insert("exit_after", ParamSpec::plain(Number(0.0)));

    // Sequenced reveal.
    t.insert("mode", ParamSpec::choice("stagger", REVEAL_MODES));
    t.insert("step_ms", ParamSpec::plain(Number(150.0)));
    t.insert("hide_step_ms", ParamSpec::plain(Number(80.0)));
    t.insert("gap_ms", ParamSpec::plain(Number(300.0)));
    t.insert("each", ParamSpec::plain(Number(2.0)));
    t.insert("each_pause", ParamSpec::plain(Number(0.5)));
    t.insert("show", ParamSpec::plain(ParamValue::list(&[])));
    t.insert("handles", ParamSpec::plain(ParamValue::list(&[])));
    t.insert("ranks", ParamSpec::plain(ParamValue::list(&[])));

    // Continuous effects.
    t.insert("rotate", ParamSpec::plain(Flag(false)));
    t.insert("rotate_period", ParamSpec::plain(Number(8.0)));
    t.insert("pulse", ParamSpec::plain(Flag(false)));
    t.insert("pulse_period", ParamSpec::plain(Number(2.0)));
    t.insert("breathe", ParamSpec::plain(Flag(false)));
    t.insert("breathe_period", ParamSpec::plain(Number(3.0)));
    t.insert("glow_size", ParamSpec::plain(Number(24.0)));
    t.insert("dash", ParamSpec::plain(Flag(false)));
    t.insert("dash_period", ParamSpec::plain(Number(6.0)));
    t.insert("cycle", ParamSpec::plain(ParamValue::list(&[])));
    t.insert("cycle_period", ParamSpec::plain(Number(12.0)));
    t.insert("colorshift", ParamSpec::plain(Flag(false)));
    t.insert("shift_period", ParamSpec::plain(Number(30.0)));

    // Border geometry, pixels.
    t.insert("border_width", ParamSpec::plain(Number(1280.0)));
    t.insert("border_height", ParamSpec::plain(Number(720.0)));
    t.insert("border_radius", ParamSpec::plain(Number(24.0)));
    t.insert("border_thickness", ParamSpec::plain(Number(6.0)));

    // Entrance/exit animation names handed to the rendering surface.
    t.insert("enter_fx", ParamSpec::plain(ParamValue::text("fade-up")));
    t.insert("exit_fx", ParamSpec::plain(ParamValue::text("fade-out")));

    t
}

/// Built-in presets. A preset never defines a key absent from the default
/// table; unknown keys would be inert anyway.
pub fn builtin_presets() -> PresetTable {
    use ParamValue::{Flag, Number};

    let mut t = PresetTable::new();

    let mut lower_third = PresetFragment::new();
    lower_third.insert("kind", ParamValue::text("plate"));
    lower_third.insert("loop", Flag(true));
    lower_third.insert("hold", Number(6.0));
    lower_third.insert("pause", Number(10.0));
    lower_third.insert("gradient", ParamValue::text("sunset"));
    lower_third.insert("title", ParamValue::text("Hello there"));
    t.insert("lower-third", lower_third);

    let mut cta = PresetFragment::new();
    cta.insert("kind", ParamValue::text("banner"));
    cta.insert("loop", Flag(true));
    cta.insert("visible_through_exit", Flag(true));
    cta.insert("pulse", Flag(true));
    cta.insert("hold", Number(5.0));
    cta.insert("pause", Number(8.0));
    cta.insert("gradient", ParamValue::text("ember"));
    cta.insert("title", ParamValue::text("Follow the channel!"));
    t.insert("cta", cta);

    let mut socials = PresetFragment::new();
    socials.insert("kind", ParamValue::text("socials"));
    socials.insert("mode", ParamValue::text("one-by-one"));
    socials.insert("each", Number(3.0));
    socials.insert("show", ParamValue::list(&["twitch", "youtube", "twitter"]));
    t.insert("socials", socials);

    let mut frame = PresetFragment::new();
    frame.insert("kind", ParamValue::text("border"));
    frame.insert("dash", Flag(true));
    frame.insert("rotate", Flag(true));
    frame.insert("gradient", ParamValue::text("aurora"));
    t.insert("frame", frame);

    t
}

/// Fully-defaulted, immutable parameter set. Every key of the default table
/// has a value of that key's variant; accessors therefore never fail.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct ResolvedConfig {
    values: BTreeMap<String, ParamValue>,
}

impl ResolvedConfig {
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.values.get(key)
    }

    pub fn num(&self, key: &str) -> f64 {
        match self.values.get(key) {
            Some(ParamValue::Number(n)) => *n,
            _ => 0.0,
        }
    }

    pub fn text(&self, key: &str) -> &str {
        match self.values.get(key) {
            Some(ParamValue::Text(s)) => s,
            _ => "",
        }
    }

    pub fn flag(&self, key: &str) -> bool {
        matches!(self.values.get(key), Some(ParamValue::Flag(true)))
    }

    pub fn list(&self, key: &str) -> &[String] {
        match self.values.get(key) {
            Some(ParamValue::List(items)) => items,
            _ => &[],
        }
    }

    /// Seconds-typed parameter as timeline millis (already clamped >= 0).
    pub fn secs(&self, key: &str) -> Millis {
        Millis::from_secs_f64(self.num(key))
    }

    /// Millis-typed parameter (already clamped >= 0).
    pub fn millis(&self, key: &str) -> Millis {
        Millis(self.num(key).round() as u64)
    }
}

/// Merges built-in defaults, the selected preset, and explicit overrides
/// into one total config.
///
/// Precedence per key, highest first: raw value (present and non-blank,
/// parseable as the key's type, within the allowed set) -> preset value of
/// the same kind (validated the same way) -> default. Unknown preset names
/// degrade to defaults; nothing here fails.
pub fn resolve(raw: &RawParams, defaults: &DefaultTable, presets: &PresetTable) -> ResolvedConfig {
    let preset: Option<&PresetFragment> = match raw.get("preset") {
        None => None,
        Some(name) => {
            let name = name.trim();
            let found = presets.get(name);
            if found.is_none() && !name.is_empty() {
                warn!(preset = name, "unknown preset, using defaults");
            }
            found
        }
    };

    let mut values = BTreeMap::new();
    for (&key, spec) in defaults {
        let value = if CAPTION_KEYS.contains(&key) {
            resolve_caption(raw, preset, key)
        } else {
            resolve_generic(raw, preset, key, spec)
        };
        values.insert(key.to_owned(), value);
    }
    ResolvedConfig { values }
}

/// Shorthand for resolving against the built-in tables.
pub fn resolve_builtin(raw: &RawParams) -> ResolvedConfig {
    resolve(raw, &default_table(), &builtin_presets())
}

fn resolve_caption(raw: &RawParams, preset: Option<&PresetFragment>, key: &str) -> ParamValue {
    if let Some(explicit) = raw.get(key) {
        return ParamValue::text(explicit);
    }
    if let Some(ParamValue::Text(s)) = preset.and_then(|p| p.get(key)) {
        return ParamValue::text(s);
    }
    ParamValue::text("")
}

fn resolve_generic(
    raw: &RawParams,
    preset: Option<&PresetFragment>,
    key: &str,
    spec: &ParamSpec,
) -> ParamValue {
    if !raw.is_blank(key) {
        let input = raw.get(key).unwrap_or("");
        if let Some(parsed) = parse_as(input, spec, key) {
            return parsed;
        }
    }

    if let Some(value) = preset.and_then(|p| p.get(key)) {
        if !value.same_kind(&spec.default) {
            warn!(key, "preset value has wrong type, skipping layer");
        } else if let Some(validated) = validate(value.clone(), spec, key) {
            return validated;
        }
    }

    spec.default.clone()
}

/// Parses a raw string as the key's declared type. `None` falls through to
/// the next layer.
fn parse_as(input: &str, spec: &ParamSpec, key: &str) -> Option<ParamValue> {
    let parsed = match spec.default {
        ParamValue::Number(_) => match input.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => ParamValue::Number(n),
            _ => {
                warn!(key, input, "unparseable number, falling through");
                return None;
            }
        },
        ParamValue::Text(_) => ParamValue::text(input.trim()),
        ParamValue::Flag(_) => match params::parse_bool(input) {
            Some(b) => ParamValue::Flag(b),
            None => {
                warn!(key, input, "unrecognized boolean, falling through");
                return None;
            }
        },
        ParamValue::List(_) => ParamValue::List(params::parse_list(input)),
    };
    validate(parsed, spec, key)
}

/// Enforces the allowed set for enumerated keys and the non-negative floor
/// for numbers (every numeric key is a duration, period, or size).
fn validate(value: ParamValue, spec: &ParamSpec, key: &str) -> Option<ParamValue> {
    match value {
        ParamValue::Text(s) => match spec.allowed {
            Some(allowed) => {
                let lowered = s.to_ascii_lowercase();
                if allowed.contains(&lowered.as_str()) {
                    Some(ParamValue::Text(lowered))
                } else {
                    warn!(key, value = %s, "value outside allowed set, falling through");
                    None
                }
            }
            None => Some(ParamValue::Text(s)),
        },
        ParamValue::Number(n) => Some(ParamValue::Number(n.max(0.0))),
        other => Some(other),
    }
}
