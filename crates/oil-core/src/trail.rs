//! Trail bookkeeping: ping-pong roles, pointer smoothing and the brush model.
//!
//! The GPU side only has to supply a paint callback; everything that decides
//! *what* gets painted and *which* buffer is read or written lives here.

use glam::{Mat4, Vec2};

use crate::constants::{
    BRUSH_BASE_RADIUS, BRUSH_MAX_RADIUS, BRUSH_STRENGTH_MARGIN, DEFAULT_TRAIL_LENGTH,
    DEFAULT_TRAIL_RADIUS_SCALE, DEFAULT_TRAIL_STRENGTH, INITIAL_BRUSH_RADIUS,
    POINTER_DELTA_SCALE, POINTER_SMOOTH_RATIO,
};
use crate::math::{circ_ease_out, damp, norm};
use crate::pointer::PointerState;
use crate::texture::TextureHandle;
use crate::tuning::{ParamSpec, Tunable};
use crate::uniforms::UniformSet;

pub const TRAIL_MOUSE: &str = "mouse";
pub const TRAIL_RADIUS: &str = "radius";
pub const TRAIL_STRENGTH: &str = "strength";
pub const TRAIL_LENGTH: &str = "length";
pub const TRAIL_ASPECT: &str = "aspect";
pub const TRAIL_SOURCE: &str = "source";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailState {
    Active,
    /// The device cannot render the trail. Permanent for the session.
    Unavailable,
}

/// Two buffers of which exactly one is the read side at any time.
#[derive(Debug, Clone)]
pub struct PingPong<T> {
    buffers: [T; 2],
    source: usize,
}

impl<T> PingPong<T> {
    /// `a` starts as the source.
    pub fn new(a: T, b: T) -> Self {
        Self {
            buffers: [a, b],
            source: 0,
        }
    }

    pub fn source(&self) -> &T {
        &self.buffers[self.source]
    }

    pub fn destination(&self) -> &T {
        &self.buffers[1 - self.source]
    }

    pub fn swap(&mut self) {
        self.source = 1 - self.source;
    }

    /// 0 while `a` is the source, 1 while `b` is.
    pub fn source_index(&self) -> usize {
        self.source
    }
}

/// Paint parameters for one decay pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brush {
    pub radius: f32,
    pub strength: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailSettings {
    pub radius_scale: f32,
    /// Upper bound of paint strength; the floor sits a fixed margin below.
    pub strength: f32,
    /// How much of the previous frame fades per tick.
    pub length: f32,
}

impl Default for TrailSettings {
    fn default() -> Self {
        Self {
            radius_scale: DEFAULT_TRAIL_RADIUS_SCALE,
            strength: DEFAULT_TRAIL_STRENGTH,
            length: DEFAULT_TRAIL_LENGTH,
        }
    }
}

const TRAIL_PARAMS: &[ParamSpec] = &[
    ParamSpec::new("radius", "radius", 0.5, 2.0).with_step(0.01),
    ParamSpec::new("strength", "strength", 0.1, 2.0).with_step(0.01),
    ParamSpec::new("length", "length", 0.001, 0.1).with_step(0.001),
];

impl Tunable for TrailSettings {
    fn group(&self) -> &'static str {
        "trail"
    }

    fn params(&self) -> &'static [ParamSpec] {
        TRAIL_PARAMS
    }

    fn value(&self, name: &str) -> Option<f32> {
        match name {
            "radius" => Some(self.radius_scale),
            "strength" => Some(self.strength),
            "length" => Some(self.length),
            _ => None,
        }
    }

    fn store(&mut self, name: &str, value: f32) {
        match name {
            "radius" => self.radius_scale = value,
            "strength" => self.strength = value,
            "length" => self.length = value,
            _ => {}
        }
    }
}

/// Source and destination of one decay pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailPass {
    pub source: TextureHandle,
    pub destination: TextureHandle,
}

/// Everything about the trail except the GPU work itself.
#[derive(Debug, Clone)]
pub struct TrailModel {
    state: TrailState,
    targets: Option<PingPong<TextureHandle>>,
    neutral: TextureHandle,
    pointer: PointerState,
    brush: Brush,
    settings: TrailSettings,
    aspect: f32,
    uniforms: UniformSet,
}

impl TrailModel {
    /// `targets` is `None` when the capability probe failed; the model is then
    /// [`TrailState::Unavailable`] for good and [`TrailModel::output`] returns
    /// `neutral`.
    pub fn new(
        targets: Option<PingPong<TextureHandle>>,
        neutral: TextureHandle,
        aspect: f32,
        settings: TrailSettings,
    ) -> Self {
        let state = if targets.is_some() {
            TrailState::Active
        } else {
            log::warn!("[trail] render targets unavailable, trail disabled for this session");
            TrailState::Unavailable
        };
        let aspect = if aspect.is_finite() && aspect > 0.0 {
            aspect
        } else {
            1.0
        };
        let mut model = Self {
            state,
            targets,
            neutral,
            pointer: PointerState::new(Vec2::splat(0.5), POINTER_SMOOTH_RATIO),
            brush: Brush {
                radius: INITIAL_BRUSH_RADIUS,
                strength: settings.strength,
            },
            settings,
            aspect,
            uniforms: UniformSet::new(),
        };
        model.refresh_uniforms();
        model
    }

    pub fn state(&self) -> TrailState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == TrailState::Active
    }

    /// Texture consumers should sample this frame.
    pub fn output(&self) -> TextureHandle {
        match &self.targets {
            Some(targets) => *targets.source(),
            None => self.neutral,
        }
    }

    pub fn targets(&self) -> Option<&PingPong<TextureHandle>> {
        self.targets.as_ref()
    }

    /// Records a pointer position on the plane (`[0, 1]`, y up). Never moves
    /// the smoothed position.
    pub fn set_raw_pointer(&mut self, position: Vec2) {
        if position.is_finite() {
            self.pointer
                .set_raw(position.clamp(Vec2::ZERO, Vec2::ONE));
        }
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn brush(&self) -> Brush {
        self.brush
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn settings(&self) -> &TrailSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut TrailSettings {
        &mut self.settings
    }

    /// Uniforms for the next paint pass.
    pub fn uniforms(&self) -> &UniformSet {
        &self.uniforms
    }

    /// One trail tick: paint from source into destination with the current
    /// uniforms, swap, then move the pointer and brush for the next tick.
    /// `paint` reports whether the destination was written; if not, the
    /// roles and the pointer stay as they were. Returns `false` without
    /// doing anything while unavailable.
    pub fn tick(&mut self, paint: impl FnOnce(TrailPass, &UniformSet) -> bool) -> bool {
        let Some(pass) = self.targets.as_ref().map(|t| TrailPass {
            source: *t.source(),
            destination: *t.destination(),
        }) else {
            return false;
        };
        self.refresh_uniforms();
        self.uniforms.set_texture(TRAIL_SOURCE, pass.source);
        if !paint(pass, &self.uniforms) {
            return false;
        }
        if let Some(targets) = self.targets.as_mut() {
            targets.swap();
        }
        self.advance();
        true
    }

    fn advance(&mut self) {
        let gap = self.pointer.smooth();
        let delta = gap.clamp(0.0, 1.0) * POINTER_DELTA_SCALE;
        let eased = circ_ease_out(norm(delta, 0.0, BRUSH_MAX_RADIUS));
        let max_strength = self.settings.strength;
        self.brush = Brush {
            radius: damp(0.0, BRUSH_BASE_RADIUS, eased) * self.settings.radius_scale,
            strength: damp(max_strength - BRUSH_STRENGTH_MARGIN, max_strength, eased),
        };
    }

    pub fn write_uniforms(&self, set: &mut UniformSet) {
        set.set_vec2(TRAIL_MOUSE, self.pointer.smoothed());
        set.set_float(TRAIL_RADIUS, self.brush.radius);
        set.set_float(TRAIL_STRENGTH, self.brush.strength);
        set.set_float(TRAIL_LENGTH, self.settings.length);
        set.set_float(TRAIL_ASPECT, self.aspect);
    }

    fn refresh_uniforms(&mut self) {
        let mut set = std::mem::take(&mut self.uniforms);
        self.write_uniforms(&mut set);
        self.uniforms = set;
    }
}

/// GPU layout of the decay pass uniforms.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TrailUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub mouse: [f32; 2],
    pub radius: f32,
    pub strength: f32,
    pub length: f32,
    pub aspect: f32,
    pub _pad: [f32; 2],
}

impl TrailUniforms {
    pub fn from_set(set: &UniformSet, view_proj: Mat4) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            mouse: set.vec2(TRAIL_MOUSE).unwrap_or(Vec2::splat(0.5)).to_array(),
            radius: set.float(TRAIL_RADIUS).unwrap_or(0.0),
            strength: set.float(TRAIL_STRENGTH).unwrap_or(0.0),
            length: set.float(TRAIL_LENGTH).unwrap_or(DEFAULT_TRAIL_LENGTH),
            aspect: set.float(TRAIL_ASPECT).unwrap_or(1.0),
            _pad: [0.0; 2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active() -> TrailModel {
        let targets = PingPong::new(TextureHandle::from_raw(1), TextureHandle::from_raw(2));
        TrailModel::new(
            Some(targets),
            TextureHandle::from_raw(0),
            16.0 / 9.0,
            TrailSettings::default(),
        )
    }

    #[test]
    fn ping_pong_swaps_roles() {
        let mut pp = PingPong::new('a', 'b');
        assert_eq!((*pp.source(), *pp.destination()), ('a', 'b'));
        pp.swap();
        assert_eq!((*pp.source(), *pp.destination()), ('b', 'a'));
        assert_eq!(pp.source_index(), 1);
    }

    #[test]
    fn paint_reads_source_and_writes_destination() {
        let mut trail = active();
        let mut seen = None;
        assert!(trail.tick(|pass, uniforms| {
            seen = Some((pass, uniforms.texture(TRAIL_SOURCE)));
            true
        }));
        let (pass, sampled) = seen.unwrap();
        assert_eq!(pass.source, TextureHandle::from_raw(1));
        assert_eq!(pass.destination, TextureHandle::from_raw(2));
        assert_eq!(sampled, Some(pass.source));
        assert_eq!(trail.output(), TextureHandle::from_raw(2));
    }

    #[test]
    fn paint_uses_brush_from_previous_tick() {
        let mut trail = active();
        trail.set_raw_pointer(Vec2::new(1.0, 0.5));
        let mut first = None;
        trail.tick(|_, u| {
            first = u.float(TRAIL_RADIUS);
            true
        });
        assert_eq!(first, Some(INITIAL_BRUSH_RADIUS));

        let expected = trail.brush().radius;
        let mut second = None;
        trail.tick(|_, u| {
            second = u.float(TRAIL_RADIUS);
            true
        });
        assert_eq!(second, Some(expected));
        assert!(expected > 0.0);
    }

    #[test]
    fn fast_motion_saturates_brush() {
        let mut trail = active();
        trail.set_raw_pointer(Vec2::new(1.0, 1.0));
        assert!(trail.tick(|_, _| true));
        let brush = trail.brush();
        // gap 0.53 * 100 is well past the max radius, so easing hits 1.
        assert!((brush.radius - BRUSH_BASE_RADIUS * DEFAULT_TRAIL_RADIUS_SCALE).abs() < 1e-6);
        assert!((brush.strength - DEFAULT_TRAIL_STRENGTH).abs() < 1e-6);
    }

    #[test]
    fn failed_paint_keeps_roles_and_pointer() {
        let mut trail = active();
        trail.set_raw_pointer(Vec2::new(1.0, 1.0));
        assert!(!trail.tick(|_, _| false));
        assert_eq!(trail.output(), TextureHandle::from_raw(1));
        assert_eq!(trail.pointer().smoothed(), Vec2::splat(0.5));
        assert_eq!(trail.brush().radius, INITIAL_BRUSH_RADIUS);

        let mut source = None;
        assert!(trail.tick(|pass, _| {
            source = Some(pass.source);
            true
        }));
        assert_eq!(source, Some(TextureHandle::from_raw(1)));
        assert_eq!(trail.output(), TextureHandle::from_raw(2));
    }

    #[test]
    fn raw_pointer_is_clamped_to_plane() {
        let mut trail = active();
        trail.set_raw_pointer(Vec2::new(-3.0, 7.0));
        assert_eq!(trail.pointer().raw(), Vec2::new(0.0, 1.0));
        trail.set_raw_pointer(Vec2::new(f32::NAN, 0.2));
        assert_eq!(trail.pointer().raw(), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn settings_are_tunable() {
        let mut trail = active();
        assert_eq!(trail.settings_mut().set("length", 1.0), Ok(0.1));
        let mut set = UniformSet::new();
        trail.write_uniforms(&mut set);
        assert_eq!(set.float(TRAIL_LENGTH), Some(0.1));
        assert!((set.float(TRAIL_ASPECT).unwrap() - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn uniform_layout_matches_wgsl() {
        assert_eq!(std::mem::size_of::<TrailUniforms>(), 96);
    }
}
