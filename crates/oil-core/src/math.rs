//! Scalar helpers shared by the pointer model and the brush.

/// Linear blend from `from` toward `to` by `t`.
///
/// Applied once per tick this is exponential damping: the remaining gap
/// shrinks by `1 - t` every call.
#[inline]
pub fn damp(from: f32, to: f32, t: f32) -> f32 {
    from * (1.0 - t) + to * t
}

/// Maps `value` from `[min, max]` onto `[0, 1]`, clamped.
///
/// A degenerate range maps everything to 0.
#[inline]
pub fn norm(value: f32, min: f32, max: f32) -> f32 {
    let span = max - min;
    if span.abs() <= f32::EPSILON || !value.is_finite() {
        return 0.0;
    }
    ((value - min) / span).clamp(0.0, 1.0)
}

/// Circular ease-out: fast start, gentle landing. Input is clamped to `[0, 1]`.
#[inline]
pub fn circ_ease_out(t: f32) -> f32 {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) } - 1.0;
    (1.0 - t * t).max(0.0).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damp_hits_endpoints() {
        assert_eq!(damp(2.0, 6.0, 0.0), 2.0);
        assert_eq!(damp(2.0, 6.0, 1.0), 6.0);
        assert!((damp(2.0, 6.0, 0.25) - 3.0).abs() < 1e-6);
    }

    #[test]
    fn norm_clamps_outside_range() {
        assert_eq!(norm(-5.0, 0.0, 19.0), 0.0);
        assert_eq!(norm(100.0, 0.0, 19.0), 1.0);
        assert!((norm(9.5, 0.0, 19.0) - 0.5).abs() < 1e-6);
        assert_eq!(norm(3.0, 1.0, 1.0), 0.0);
        assert_eq!(norm(f32::NAN, 0.0, 1.0), 0.0);
    }

    #[test]
    fn circ_ease_out_is_monotonic_and_bounded() {
        let mut last = circ_ease_out(0.0);
        assert_eq!(last, 0.0);
        for i in 1..=20 {
            let v = circ_ease_out(i as f32 / 20.0);
            assert!(v >= last);
            assert!(v <= 1.0);
            last = v;
        }
        assert!((circ_ease_out(1.0) - 1.0).abs() < 1e-6);
        // ease-out runs ahead of linear
        assert!(circ_ease_out(0.3) > 0.3);
    }
}
