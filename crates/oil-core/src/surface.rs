//! Uniform state of the visible oil plane.

use glam::{Mat4, Vec2};

use crate::clock::FrameStep;
use crate::constants::{
    DEFAULT_FLOW_BLUR_RADIUS, DEFAULT_FLOW_SPEED, DEFAULT_NOISE_AMPLITUDE, DEFAULT_NOISE_SCALE_X,
    DEFAULT_NOISE_SCALE_Y, DEFAULT_NOISE_SPEED, SURFACE_TIME_SCALE,
};
use crate::layout::Viewport;
use crate::texture::TextureHandle;
use crate::tuning::{ParamSpec, Tunable};
use crate::uniforms::UniformSet;

pub const SURFACE_TIME: &str = "time";
pub const SURFACE_RESOLUTION: &str = "resolution";
pub const SURFACE_FLOW_OFFSET: &str = "flow_offset";
pub const SURFACE_BASE_TEXTURE: &str = "base_texture";
pub const SURFACE_TRAIL_TEXTURE: &str = "trail_texture";
pub const SURFACE_FLOW_MAP: &str = "flow_map";

const SURFACE_PARAMS: &[ParamSpec] = &[
    ParamSpec::new("flow_speed", "flowSpeed", 0.001, 0.5).with_step(0.001),
    ParamSpec::new("flow_blur_radius", "flowBlurRadius", 0.0, 50.0),
    ParamSpec::new("noise_speed", "noiseSpeed", 0.0, 3.0).with_step(0.05),
    ParamSpec::new("noise_scale_x", "noiseScaleX", 0.0, 25.0),
    ParamSpec::new("noise_scale_y", "noiseScaleY", 0.0, 25.0),
    ParamSpec::new("noise_amplitude", "noiseAmplitude", 0.0, 1.0).with_step(0.01),
];

/// Time, resolution, tunables and texture bindings of the surface shader.
///
/// The tunable knobs are stored directly in the uniform set under their
/// parameter names, so a write is visible to the next draw with no copy.
#[derive(Debug, Clone)]
pub struct SurfaceModel {
    uniforms: UniformSet,
    time_scale: f32,
}

impl SurfaceModel {
    pub fn new(base: TextureHandle, flow_map: TextureHandle, trail: TextureHandle) -> Self {
        let mut uniforms = UniformSet::new();
        uniforms.set_float(SURFACE_TIME, 0.0);
        uniforms.set_float(SURFACE_FLOW_OFFSET, 0.0);
        uniforms.set_vec2(SURFACE_RESOLUTION, Vec2::ONE);
        uniforms.set_texture(SURFACE_BASE_TEXTURE, base);
        uniforms.set_texture(SURFACE_FLOW_MAP, flow_map);
        uniforms.set_texture(SURFACE_TRAIL_TEXTURE, trail);
        let defaults = [
            DEFAULT_FLOW_SPEED,
            DEFAULT_FLOW_BLUR_RADIUS,
            DEFAULT_NOISE_SPEED,
            DEFAULT_NOISE_SCALE_X,
            DEFAULT_NOISE_SCALE_Y,
            DEFAULT_NOISE_AMPLITUDE,
        ];
        for (spec, value) in SURFACE_PARAMS.iter().zip(defaults) {
            uniforms.set_float(spec.name, value);
        }
        Self {
            uniforms,
            time_scale: SURFACE_TIME_SCALE,
        }
    }

    pub fn update(&mut self, step: FrameStep) {
        self.uniforms
            .set_float(SURFACE_TIME, step.time * self.time_scale);
    }

    pub fn set_resolution(&mut self, viewport: Viewport) {
        if viewport.is_valid() {
            self.uniforms.set_vec2(
                SURFACE_RESOLUTION,
                Vec2::new(viewport.width, viewport.height),
            );
        }
    }

    pub fn set_trail_texture(&mut self, handle: TextureHandle) {
        self.uniforms.set_texture(SURFACE_TRAIL_TEXTURE, handle);
    }

    pub fn uniforms(&self) -> &UniformSet {
        &self.uniforms
    }
}

impl Tunable for SurfaceModel {
    fn group(&self) -> &'static str {
        "oil"
    }

    fn params(&self) -> &'static [ParamSpec] {
        SURFACE_PARAMS
    }

    fn value(&self, name: &str) -> Option<f32> {
        SURFACE_PARAMS
            .iter()
            .find(|p| p.name == name)
            .and_then(|p| self.uniforms.float(p.name))
    }

    fn store(&mut self, name: &str, value: f32) {
        if let Some(spec) = SURFACE_PARAMS.iter().find(|p| p.name == name) {
            self.uniforms.set_float(spec.name, value);
        }
    }
}

/// GPU layout of the surface shader uniforms.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SurfaceUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub resolution: [f32; 2],
    pub time: f32,
    pub flow_speed: f32,
    pub flow_offset: f32,
    pub flow_blur_radius: f32,
    pub noise_speed: f32,
    pub noise_scale_x: f32,
    pub noise_scale_y: f32,
    pub noise_amplitude: f32,
    pub _pad: [f32; 2],
}

impl SurfaceUniforms {
    /// `model_view_proj` already includes the node's world translation.
    pub fn from_set(set: &UniformSet, model_view_proj: Mat4) -> Self {
        let f = |name: &str| set.float(name).unwrap_or(0.0);
        Self {
            view_proj: model_view_proj.to_cols_array_2d(),
            resolution: set.vec2(SURFACE_RESOLUTION).unwrap_or(Vec2::ONE).to_array(),
            time: f(SURFACE_TIME),
            flow_speed: f("flow_speed"),
            flow_offset: f(SURFACE_FLOW_OFFSET),
            flow_blur_radius: f("flow_blur_radius"),
            noise_speed: f("noise_speed"),
            noise_scale_x: f("noise_scale_x"),
            noise_scale_y: f("noise_scale_y"),
            noise_amplitude: f("noise_amplitude"),
            _pad: [0.0; 2],
        }
    }
}
