use std::collections::BTreeMap;

use tracing::debug;

/// One keyframe of a named entrance/exit animation: offset in `[0, 1]`
/// plus the declarative properties the rendering surface tweens between.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct EffectKeyframe {
    pub offset: f64,
    pub opacity: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
}

impl EffectKeyframe {
    const fn at(offset: f64, opacity: f64, translate_x: f64, translate_y: f64, scale: f64) -> Self {
        Self {
            offset,
            opacity,
            translate_x,
            translate_y,
            scale,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct EffectDef {
    pub keyframes: Vec<EffectKeyframe>,
}

/// Named animation definitions the rendering surface keys on.
///
/// Registration is explicit and idempotent: the first definition for a name
/// wins and later calls are no-ops, replacing the old "inject into a shared
/// document stylesheet if not already present" pattern without any global
/// mutable state.
#[derive(Clone, Debug, Default)]
pub struct EffectRegistry {
    defs: BTreeMap<String, EffectDef>,
}

impl EffectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the built-in entrance/exit animations.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("fade-in", fade(0.0, 0.0));
        registry.register("fade-out", fade_out());
        registry.register("fade-up", fade(0.0, 24.0));
        registry.register("fade-down", fade(0.0, -24.0));
        registry.register("slide-left", fade(48.0, 0.0));
        registry.register("slide-right", fade(-48.0, 0.0));
        registry.register("pop", pop());
        registry
    }

    /// Returns `true` when the definition was newly added, `false` when the
    /// name was already registered (the existing definition is kept).
    pub fn register(&mut self, name: &str, def: EffectDef) -> bool {
        if self.defs.contains_key(name) {
            debug!(name, "effect already registered, keeping existing definition");
            return false;
        }
        self.defs.insert(name.to_owned(), def);
        true
    }

    pub fn get(&self, name: &str) -> Option<&EffectDef> {
        self.defs.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.defs.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.defs.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

fn fade(from_x: f64, from_y: f64) -> EffectDef {
    EffectDef {
        keyframes: vec![
            EffectKeyframe::at(0.0, 0.0, from_x, from_y, 1.0),
            EffectKeyframe::at(1.0, 1.0, 0.0, 0.0, 1.0),
        ],
    }
}

fn fade_out() -> EffectDef {
    EffectDef {
        keyframes: vec![
            EffectKeyframe::at(0.0, 1.0, 0.0, 0.0, 1.0),
            EffectKeyframe::at(1.0, 0.0, 0.0, 0.0, 1.0),
        ],
    }
}

fn pop() -> EffectDef {
    EffectDef {
        keyframes: vec![
            EffectKeyframe::at(0.0, 0.0, 0.0, 0.0, 0.85),
            EffectKeyframe::at(0.6, 1.0, 0.0, 0.0, 1.04),
            EffectKeyframe::at(1.0, 1.0, 0.0, 0.0, 1.0),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_present() {
        let registry = EffectRegistry::with_builtins();
        for name in ["fade-in", "fade-out", "fade-up", "fade-down", "pop"] {
            assert!(registry.contains(name), "missing builtin {name}");
        }
    }

    #[test]
    fn registration_is_idempotent() {
        let mut registry = EffectRegistry::new();
        assert!(registry.register("custom", fade(0.0, 10.0)));
        assert!(!registry.register("custom", fade(0.0, 99.0)));
        // First definition wins.
        assert_eq!(
            registry.get("custom").unwrap().keyframes[0].translate_y,
            10.0
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn builtin_keyframes_span_full_offset_range() {
        let registry = EffectRegistry::with_builtins();
        for name in registry.names().collect::<Vec<_>>() {
            let def = registry.get(name).unwrap();
            assert_eq!(def.keyframes.first().unwrap().offset, 0.0);
            assert_eq!(def.keyframes.last().unwrap().offset, 1.0);
        }
    }
}
