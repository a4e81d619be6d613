// Trail behaviour that only shows up over many ticks.

use glam::Vec2;
use oil_core::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn handles() -> (TextureHandle, TextureHandle, TextureHandle) {
    (
        TextureHandle::from_raw(10),
        TextureHandle::from_raw(11),
        TextureHandle::from_raw(99),
    )
}

fn active_trail() -> TrailModel {
    let (a, b, neutral) = handles();
    TrailModel::new(
        Some(PingPong::new(a, b)),
        neutral,
        16.0 / 9.0,
        TrailSettings::default(),
    )
}

#[test]
fn source_alternates_with_tick_parity() {
    let (a, b, _) = handles();
    for n in 0..12 {
        let mut trail = active_trail();
        for _ in 0..n {
            let before = *trail.targets().unwrap().destination();
            assert!(trail.tick(|_, _| true));
            assert_eq!(trail.output(), before);
        }
        let expected = if n % 2 == 0 { a } else { b };
        assert_eq!(trail.output(), expected, "after {n} ticks");
    }
}

#[test]
fn every_pass_writes_the_buffer_it_does_not_read() {
    let mut trail = active_trail();
    for _ in 0..7 {
        trail.tick(|pass, _| {
            assert_ne!(pass.source, pass.destination);
            true
        });
    }
}

#[test]
fn held_pointer_settles_at_floor() {
    let mut trail = active_trail();
    trail.set_raw_pointer(Vec2::splat(0.5));
    for _ in 0..30 {
        trail.tick(|_, _| true);
        let brush = trail.brush();
        assert_eq!(brush.radius, 0.0);
        assert!((brush.strength - (DEFAULT_TRAIL_STRENGTH - BRUSH_STRENGTH_MARGIN)).abs() < 1e-6);
    }
    assert_eq!(trail.pointer().smoothed(), Vec2::splat(0.5));
}

#[test]
fn brush_fades_without_jumping_after_motion_stops() {
    let mut trail = active_trail();
    trail.set_raw_pointer(Vec2::new(0.9, 0.2));
    trail.tick(|_, _| true);
    let mut last = trail.brush().radius;
    for _ in 0..60 {
        trail.tick(|_, _| true);
        let radius = trail.brush().radius;
        assert!(radius <= last + 1e-6);
        last = radius;
    }
    assert!(last < 1e-3);
}

#[test]
fn smoothing_converges_monotonically_without_overshoot() {
    let mut rng = StdRng::seed_from_u64(0x0011);
    for _ in 0..200 {
        let start = Vec2::new(rng.gen(), rng.gen());
        let target = Vec2::new(rng.gen(), rng.gen());
        let ratio = rng.gen_range(0.05..0.95);
        let mut pointer = PointerState::new(start, ratio);
        pointer.set_raw(target);

        let mut gap = start.distance(target);
        for _ in 0..400 {
            let next = pointer.smooth();
            assert!(next <= gap + 1e-6, "gap grew from {gap} to {next}");
            gap = next;
            let s = pointer.smoothed();
            for (axis_s, axis_start, axis_t) in [(s.x, start.x, target.x), (s.y, start.y, target.y)] {
                let (lo, hi) = if axis_start <= axis_t {
                    (axis_start, axis_t)
                } else {
                    (axis_t, axis_start)
                };
                assert!(axis_s >= lo - 1e-6 && axis_s <= hi + 1e-6);
            }
        }
        assert!(gap < 1e-3);
    }
}

#[test]
fn unavailable_trail_is_inert() {
    let (_, _, neutral) = handles();
    let mut trail = TrailModel::new(None, neutral, 16.0 / 9.0, TrailSettings::default());
    assert_eq!(trail.state(), TrailState::Unavailable);

    trail.set_raw_pointer(Vec2::new(0.1, 0.9));
    let mut painted = false;
    for _ in 0..5 {
        assert!(!trail.tick(|_, _| {
            painted = true;
            true
        }));
    }
    assert!(!painted);
    assert_eq!(trail.output(), neutral);
    assert_eq!(trail.pointer().smoothed(), Vec2::splat(0.5));
    assert_eq!(trail.state(), TrailState::Unavailable);
}

#[test]
fn preset_reaches_trail_settings() {
    let mut trail = active_trail();
    let preset = TuningPreset::from_json(r#"{"trail.strength": 1.0, "oil.flow_speed": 0.2}"#)
        .expect("valid preset");
    assert_eq!(preset.apply_to(trail.settings_mut()), 1);
    assert_eq!(trail.settings().strength, 1.0);
    trail.set_raw_pointer(Vec2::splat(0.5));
    assert!(trail.tick(|_, _| true));
    let brush = trail.brush();
    assert!((brush.strength - 0.6).abs() < 1e-6);
}

#[test]
fn unavailable_trail_never_moves_smoothed_pointer() {
    let (_, _, neutral) = handles();
    let mut trail = TrailModel::new(None, neutral, 16.0 / 9.0, TrailSettings::default());
    let start = trail.pointer().smoothed();
    let brush = trail.brush();

    let mut rng = StdRng::seed_from_u64(0x0022);
    for _ in 0..100 {
        trail.set_raw_pointer(Vec2::new(rng.gen(), rng.gen()));
        assert!(!trail.tick(|_, _| true));
        assert_eq!(trail.pointer().smoothed(), start);
        assert_eq!(trail.brush(), brush);
    }
}
