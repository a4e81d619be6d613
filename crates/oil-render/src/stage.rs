use glam::{Vec2, Vec3};
use oil_core::{
    describe, split_key, FrameStep, ImageData, NodeEvent, OrthographicCamera, ParamState,
    PlaneLayout, PointerEvent, PointerKind, SamplingFilter, SceneGraph, Stage, TextureProvider,
    TrailSettings, Tunable, TuningError, TuningPreset, CLEAR_COLOR, MAX_STEP_SECONDS,
    SCENE_CAMERA_Z,
};

use crate::context::{RenderTarget, RendererContext};
use crate::error::RenderError;
use crate::node::{Group, RenderNode};
use crate::surface::SurfaceNode;
use crate::trail::TrailAccumulator;

/// Per-session knobs chosen by the front-end.
#[derive(Debug, Clone, PartialEq)]
pub struct StageOptions {
    pub max_step: f32,
    /// Build the trail as if the capability probe had failed.
    pub force_trail_unavailable: bool,
    pub clear_color: [f64; 4],
    pub trail: TrailSettings,
}

impl Default for StageOptions {
    fn default() -> Self {
        Self {
            max_step: MAX_STEP_SECONDS,
            force_trail_unavailable: false,
            clear_color: CLEAR_COLOR,
            trail: TrailSettings::default(),
        }
    }
}

/// Decoded images the surface samples.
#[derive(Debug, Clone)]
pub struct SurfaceAssets {
    pub base: ImageData,
    pub flow_map: ImageData,
}

impl SurfaceAssets {
    /// Flat grey base and a still flow map, for when loading fails.
    pub fn placeholder() -> Self {
        Self {
            base: ImageData::solid(4, 4, [204, 204, 204, 255]),
            flow_map: ImageData::uniform_flow(1, 1, [0.0, 0.0]),
        }
    }
}

/// Renderer, trail, camera and the visible scene, wired for the frame
/// driver.
pub struct OilStage {
    ctx: RendererContext,
    scene: SceneGraph<dyn RenderNode>,
    camera: OrthographicCamera,
    trail: TrailAccumulator,
    plane: PlaneLayout,
}

impl OilStage {
    /// Uploads the assets, builds the trail and lays the plane out against
    /// the context's current viewport.
    pub fn new(
        mut ctx: RendererContext,
        assets: &SurfaceAssets,
        options: &StageOptions,
    ) -> Result<Self, RenderError> {
        let viewport = ctx.viewport();
        let plane = PlaneLayout::from_viewport(viewport);
        ctx.set_clear_color(options.clear_color);

        let base = ctx.create_texture("base_texture", &assets.base, SamplingFilter::Linear);
        let flow_map = ctx.create_texture("flow_map", &assets.flow_map, SamplingFilter::Linear);
        let trail = TrailAccumulator::new(
            &mut ctx,
            &plane,
            options.trail,
            options.force_trail_unavailable,
        );

        let mut scene: SceneGraph<dyn RenderNode> = SceneGraph::new();
        let root = scene.add_root(Box::new(Group::new("root")));
        let surface = scene.add_child(
            root,
            Box::new(SurfaceNode::new(
                &ctx,
                &plane,
                base,
                flow_map,
                trail.output(),
            )),
        )?;
        scene.set_translation(surface, Vec3::new(0.0, plane.offset_y, 0.0))?;

        log::info!(
            "[stage] plane {}x{} offset {} trail {:?}",
            plane.width,
            plane.height,
            plane.offset_y,
            trail.state()
        );
        Ok(Self {
            ctx,
            scene,
            camera: OrthographicCamera::new(viewport.width, viewport.height, SCENE_CAMERA_Z),
            trail,
            plane,
        })
    }

    /// Viewport change, already coalesced by the caller.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        self.ctx
            .resize(width, height, &mut self.camera, &mut self.scene)
    }

    /// Pointer or touch move at `client` (physical pixels, y down). Only
    /// records the position; nothing is drawn until the next tick.
    pub fn pointer_move(&mut self, kind: PointerKind, client: Vec2) -> PointerEvent {
        let bounds = self.plane.screen_bounds(self.ctx.viewport());
        let event = PointerEvent {
            kind,
            client,
            normalized: bounds.normalize(client),
        };
        self.trail.on_pointer_move(&event);
        self.scene.dispatch(NodeEvent::PointerMove(event));
        event
    }

    /// Sets one parameter addressed as `"group.name"`, e.g.
    /// `"oil.noise_speed"` or `"trail.length"`. Returns the stored value.
    pub fn apply(&mut self, key: &str, value: f32) -> Result<f32, TuningError> {
        let unknown = || TuningError::UnknownParam(key.to_string());
        let (group, name) = split_key(key).ok_or_else(unknown)?;
        self.with_tunable(group, |t| t.set(name, value))
            .unwrap_or_else(|| Err(unknown()))
    }

    pub fn apply_preset(&mut self, preset: &TuningPreset) -> usize {
        self.groups()
            .into_iter()
            .filter_map(|g| self.with_tunable(g, |t| preset.apply_to(t)))
            .sum()
    }

    pub fn preset(&mut self) -> TuningPreset {
        let mut preset = TuningPreset::new();
        for group in self.groups() {
            self.with_tunable(group, |t| preset.capture(t));
        }
        preset
    }

    /// Every tunable parameter with its range and live value.
    pub fn params(&mut self) -> Vec<ParamState> {
        let mut out = Vec::new();
        for group in self.groups() {
            if let Some(states) = self.with_tunable(group, |t| describe(t)) {
                out.extend(states);
            }
        }
        out
    }

    fn groups(&mut self) -> Vec<&'static str> {
        let mut groups = vec![self.trail.settings_mut().group()];
        for id in self.scene.walk() {
            if let Some(t) = self.scene.get_mut(id).and_then(|n| n.as_tunable_mut()) {
                groups.push(t.group());
            }
        }
        groups
    }

    fn with_tunable<R>(
        &mut self,
        group: &str,
        f: impl FnOnce(&mut dyn Tunable) -> R,
    ) -> Option<R> {
        let trail = self.trail.settings_mut();
        if trail.group() == group {
            return Some(f(trail));
        }
        for id in self.scene.walk() {
            if let Some(t) = self.scene.get_mut(id).and_then(|n| n.as_tunable_mut()) {
                if t.group() == group {
                    return Some(f(t));
                }
            }
        }
        None
    }
}

impl Stage for OilStage {
    type Node = dyn RenderNode;

    fn advance_trail(&mut self, _step: FrameStep) {
        self.trail.update(&mut self.ctx);
    }

    fn scene_mut(&mut self) -> &mut SceneGraph<dyn RenderNode> {
        &mut self.scene
    }

    fn render(&mut self, _step: FrameStep) {
        if let Err(e) = self
            .ctx
            .render(&mut self.scene, &self.camera, RenderTarget::Screen)
        {
            log::error!("[stage] frame dropped: {e}");
        }
    }
}
