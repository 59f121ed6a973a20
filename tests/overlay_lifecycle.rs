//! End-to-end: query string -> resolved config -> overlay sampled on a
//! hand-driven clock.

use stagecast::clock::progress;
use stagecast::{
    Clock, Color, EffectRegistry, ManualClock, Millis, Overlay, Palette, RawParams,
    VisibilityState, lerp_palette, resolve_builtin,
};

fn overlay_for(query: &str, seed: u64) -> Overlay {
    let config = resolve_builtin(&RawParams::from_query(query));
    Overlay::new(config, &EffectRegistry::with_builtins(), seed, Millis::ZERO)
}

#[test]
fn lower_third_preset_loops_through_full_cycle() {
    let clock = ManualClock::new(Millis::ZERO);
    let mut overlay = overlay_for(
        "preset=lower-third&delay=1&entrance_speed=1&hold=2&exit_speed=1&pause=1",
        0,
    );

    let frame = overlay.sample(clock.now());
    assert_eq!(frame.state, Some(VisibilityState::Entering));
    assert_eq!(frame.title, "Hello there");
    assert!(frame.visible);

    clock.set(Millis(2000));
    assert_eq!(overlay.sample(clock.now()).state, Some(VisibilityState::Visible));

    clock.set(Millis(4000));
    let frame = overlay.sample(clock.now());
    assert_eq!(frame.state, Some(VisibilityState::Exiting));
    assert!(!frame.visible);

    clock.set(Millis(5000));
    assert_eq!(overlay.sample(clock.now()).state, Some(VisibilityState::Hidden));

    clock.set(Millis(6000));
    let frame = overlay.sample(clock.now());
    assert_eq!(frame.state, Some(VisibilityState::Entering));
    assert_eq!(frame.cycle, 1);
}

#[test]
fn cta_preset_stays_mounted_through_exit() {
    let mut overlay = overlay_for("preset=cta&delay=0&entrance_speed=1&hold=2&exit_speed=1", 0);

    // cta sets visible_through_exit, so the exit animation runs mounted.
    assert_eq!(overlay.sample(Millis(1000)).state, Some(VisibilityState::Visible));
    let frame = overlay.sample(Millis(3000));
    assert_eq!(frame.state, Some(VisibilityState::Exiting));
    assert!(frame.visible);
    assert!(frame.pulse_opacity.is_some());
}

#[test]
fn override_beats_preset_beats_default_end_to_end() {
    let mut overlay = overlay_for("preset=cta&title=Subscribe!", 0);
    let frame = overlay.sample(Millis::ZERO);
    // Override wins over the preset caption.
    assert_eq!(frame.title, "Subscribe!");
    // Preset wins over the default gradient.
    let ember = stagecast::theme::gradient_colors("ember").unwrap();
    assert_eq!(frame.colors.colors(), ember);
}

#[test]
fn one_by_one_socials_cycle_exclusively() {
    let mut overlay = overlay_for(
        "kind=socials&mode=one-by-one&show=twitch,youtube,discord&each=2&each_pause=0.5",
        0,
    );

    let visible_at = |overlay: &mut Overlay, ms: u64| {
        let frame = overlay.sample(Millis(ms));
        let visible: Vec<String> = frame
            .items
            .iter()
            .filter(|i| i.visible)
            .map(|i| i.identity.clone())
            .collect();
        assert!(visible.len() <= 1, "more than one item visible at {ms}ms");
        visible
    };

    assert_eq!(visible_at(&mut overlay, 300), ["twitch"]);
    assert_eq!(visible_at(&mut overlay, 2000), ["twitch"]);
    assert_eq!(visible_at(&mut overlay, 2500), Vec::<String>::new());
    assert_eq!(visible_at(&mut overlay, 2800), ["youtube"]);
    assert_eq!(visible_at(&mut overlay, 5000), Vec::<String>::new());
    assert_eq!(visible_at(&mut overlay, 5300), ["discord"]);
    assert_eq!(visible_at(&mut overlay, 7500), Vec::<String>::new());
    assert_eq!(visible_at(&mut overlay, 7800), ["twitch"]);
}

#[test]
fn staggered_socials_reveal_in_rank_order() {
    let mut overlay = overlay_for(
        "kind=socials&handles=twitch:a,youtube:b,github:c&ranks=github:0&step_ms=150",
        0,
    );

    let frame = overlay.sample(Millis(0));
    assert_eq!(frame.items[0].identity, "github");
    assert!(frame.items[0].visible);
    assert!(!frame.items[1].visible);

    let frame = overlay.sample(Millis(150));
    assert!(frame.items[1].visible);
    let frame = overlay.sample(Millis(300));
    assert!(frame.items.iter().all(|i| i.visible));
}

#[test]
fn border_frame_effects_derive_from_one_clock() {
    let mut overlay = overlay_for(
        "preset=frame&rotate_period=4&dash_period=4&border_width=200&border_height=100&border_radius=0&border_thickness=20",
        0,
    );

    let frame = overlay.sample(Millis(1000));
    assert_eq!(frame.rotation_deg, Some(90.0));
    let dash = frame.dash.expect("frame preset enables dash");
    assert_eq!(dash.perimeter, 2.0 * ((200.0 - 20.0) + (100.0 - 20.0)));
    assert_eq!(dash.offset, -0.25 * dash.perimeter);

    // Sampling the same instant twice is idempotent.
    let again = overlay.sample(Millis(1000));
    assert_eq!(again.rotation_deg, frame.rotation_deg);
    assert_eq!(again.dash, frame.dash);
}

#[test]
fn palette_cycling_matches_closed_form_at_boundary() {
    let mut overlay = overlay_for("kind=border&cycle=aurora,sunset,ocean,neon&cycle_period=4", 0);

    let to_palette = |name: &str| Palette::from(stagecast::theme::gradient_colors(name).unwrap());
    let expected = lerp_palette(&to_palette("ocean"), &to_palette("neon"), 0.0);

    // t = period/2 over K=4 lands exactly on the index-2 boundary.
    let frame = overlay.sample(Millis(2000));
    assert_eq!(frame.colors, expected);

    // Mid-segment: halfway between the first two palettes.
    let frame = overlay.sample(Millis(500));
    assert_eq!(
        frame.colors,
        lerp_palette(&to_palette("aurora"), &to_palette("sunset"), 0.5)
    );
}

#[test]
fn explicit_colors_override_gradient_and_random() {
    let mut overlay = overlay_for("colors=%23112233,%23445566&random_colors=1&gradient=ocean", 0);
    let frame = overlay.sample(Millis::ZERO);
    assert_eq!(
        frame.colors.colors(),
        &[Color::rgb(0x11, 0x22, 0x33), Color::rgb(0x44, 0x55, 0x66)]
    );
}

#[test]
fn random_gradient_differs_across_seeds_but_not_within_one() {
    let picks: Vec<Palette> = (0..16)
        .map(|seed| {
            let mut overlay = overlay_for("random_colors=1", seed);
            overlay.sample(Millis::ZERO).colors
        })
        .collect();
    assert!(
        picks.iter().any(|p| p != &picks[0]),
        "16 seeds all picked the same gradient"
    );

    let mut overlay = overlay_for("random_colors=1", 3);
    assert_eq!(overlay.sample(Millis(0)).colors, overlay.sample(Millis(9999)).colors);
}

#[test]
fn missed_frames_cause_no_drift() {
    let mut sparse = overlay_for("kind=border&rotate=1&rotate_period=8", 0);
    let mut dense = overlay_for("kind=border&rotate=1&rotate_period=8", 0);

    for ms in (0..=6000).step_by(100) {
        dense.sample(Millis(ms));
    }
    // The sparse instance skips straight to 6000ms (tab backgrounded).
    assert_eq!(
        sparse.sample(Millis(6000)).rotation_deg,
        dense.sample(Millis(6000)).rotation_deg,
    );
    assert_eq!(
        sparse.sample(Millis(6000)).rotation_deg,
        Some(360.0 * progress(Millis(6000), Millis(8000)))
    );
}
