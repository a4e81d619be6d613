use glam::Vec2;

use crate::math::damp;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
}

/// A normalised pointer/touch move as delivered to scene nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    /// Client position in physical pixels, y down.
    pub client: Vec2,
    /// Position on the plane, `[0, 1]` on both axes, y up.
    pub normalized: Vec2,
}

/// Raw and smoothed pointer position on the plane.
///
/// Event handlers only ever write `raw`. `smoothed` moves exclusively through
/// [`PointerState::smooth`], which the trail calls once per tick, so every
/// frame reads one consistent position no matter how many events arrived.
#[derive(Debug, Clone)]
pub struct PointerState {
    raw: Vec2,
    smoothed: Vec2,
    smooth_ratio: f32,
}

impl PointerState {
    pub fn new(start: Vec2, smooth_ratio: f32) -> Self {
        Self {
            raw: start,
            smoothed: start,
            smooth_ratio: smooth_ratio.clamp(0.0, 1.0),
        }
    }

    pub fn set_raw(&mut self, position: Vec2) {
        if position.is_finite() {
            self.raw = position;
        }
    }

    /// One damping step of `smoothed` toward `raw`; returns the remaining gap.
    pub fn smooth(&mut self) -> f32 {
        self.smoothed = Vec2::new(
            damp(self.smoothed.x, self.raw.x, self.smooth_ratio),
            damp(self.smoothed.y, self.raw.y, self.smooth_ratio),
        );
        self.raw.distance(self.smoothed)
    }

    pub fn raw(&self) -> Vec2 {
        self.raw
    }

    pub fn smoothed(&self) -> Vec2 {
        self.smoothed
    }
}
