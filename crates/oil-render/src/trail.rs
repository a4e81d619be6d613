//! GPU side of the trail: two float render targets and the decay pass that
//! ping-pongs between them.

use std::cell::Cell;
use std::rc::Rc;

use fnv::FnvHashMap;
use glam::Mat4;
use oil_core::{
    NodeId, OrthographicCamera, PingPong, PlaneLayout, PointerEvent, SceneGraph,
    SceneNode, TextureHandle, TrailModel, TrailSettings, TrailState, TrailUniforms, UniformSet,
    TRAIL_CAMERA_Z, TRAIL_SOURCE,
};

use crate::context::{RenderTarget, RendererContext};
use crate::error::RenderError;
use crate::geometry::PlaneGeometry;
use crate::helpers;
use crate::node::{GpuFrame, RenderNode};
use crate::TRAIL_WGSL;

/// Shared view of the texture the trail currently exposes.
///
/// The accumulator repoints it after every swap; consumers read it when they
/// prepare their draw.
#[derive(Debug, Clone)]
pub struct TrailOutput(Rc<Cell<TextureHandle>>);

impl TrailOutput {
    pub fn new(handle: TextureHandle) -> Self {
        Self(Rc::new(Cell::new(handle)))
    }

    pub fn get(&self) -> TextureHandle {
        self.0.get()
    }

    fn set(&self, handle: TextureHandle) {
        self.0.set(handle);
    }
}

/// Full-buffer quad running the decay shader.
struct DecayQuad {
    pipeline: wgpu::RenderPipeline,
    layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    geometry: PlaneGeometry,
    uniforms: UniformSet,
    // One per ping-pong buffer once both have been read.
    bind_groups: FnvHashMap<TextureHandle, wgpu::BindGroup>,
    active: Option<TextureHandle>,
}

impl DecayQuad {
    fn new(device: &wgpu::Device, format: wgpu::TextureFormat, width: f32, height: f32) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("trail_shader"),
            source: wgpu::ShaderSource::Wgsl(TRAIL_WGSL.into()),
        });
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("trail_bgl"),
            entries: &[
                helpers::uniform_entry(0),
                helpers::texture_entry(1),
                helpers::sampler_entry(2),
            ],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("trail_pl"),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });
        let pipeline = helpers::make_plane_pipeline(
            device,
            "trail_pipeline",
            &pipeline_layout,
            &shader,
            format,
            None,
        );
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("trail_uniforms"),
            size: std::mem::size_of::<TrailUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self {
            pipeline,
            layout,
            uniform_buffer,
            geometry: PlaneGeometry::new(device, "trail_quad", width, height),
            uniforms: UniformSet::new(),
            bind_groups: FnvHashMap::default(),
            active: None,
        }
    }

    fn set_uniforms(&mut self, uniforms: &UniformSet) {
        self.uniforms = uniforms.clone();
    }
}

impl SceneNode for DecayQuad {
    fn label(&self) -> &str {
        "trail_quad"
    }
}

impl RenderNode for DecayQuad {
    fn prepare(&mut self, frame: &GpuFrame<'_>, model_view_proj: Mat4) -> Result<(), RenderError> {
        self.active = None;
        let packed = TrailUniforms::from_set(&self.uniforms, model_view_proj);
        frame
            .queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&packed));

        let Some(source) = self.uniforms.texture(TRAIL_SOURCE) else {
            return Ok(());
        };
        if !self.bind_groups.contains_key(&source) {
            let tex = frame.textures.get(source)?;
            let bind_group = frame.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("trail_bg"),
                layout: &self.layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: self.uniform_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(&tex.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::Sampler(&tex.sampler),
                    },
                ],
            });
            self.bind_groups.insert(source, bind_group);
        }
        self.active = Some(source);
        Ok(())
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        let Some(bind_group) = self.active.and_then(|h| self.bind_groups.get(&h)) else {
            return;
        };
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, bind_group, &[]);
        self.geometry.draw(pass);
    }
}

/// Decaying pointer trail living in a pair of float render targets.
///
/// Sized once to the plane and never resized. Owns an isolated scene and
/// camera so its pass never sees the visible scene.
pub struct TrailAccumulator {
    model: TrailModel,
    scene: SceneGraph<DecayQuad>,
    quad: Option<NodeId>,
    camera: OrthographicCamera,
    output: TrailOutput,
}

impl TrailAccumulator {
    /// Probes the device and allocates the buffers. When the probe fails (or
    /// `force_unavailable` is set) the trail is built in the permanent
    /// unavailable state instead; this never fails.
    pub fn new(
        ctx: &mut RendererContext,
        plane: &PlaneLayout,
        settings: TrailSettings,
        force_unavailable: bool,
    ) -> Self {
        let (width, height) = plane.pixel_size();
        let format = if force_unavailable {
            None
        } else {
            ctx.trail_format()
        };

        let mut scene = SceneGraph::new();
        let mut quad = None;
        let targets = format.map(|format| {
            log::info!("[trail] {width}x{height} {format:?}");
            let a = ctx.create_render_target("trail_a", width, height, format);
            let b = ctx.create_render_target("trail_b", width, height, format);
            quad = Some(scene.add_root(Box::new(DecayQuad::new(
                ctx.device(),
                format,
                width as f32,
                height as f32,
            ))));
            PingPong::new(a, b)
        });

        let model = TrailModel::new(targets, ctx.neutral_texture(), plane.aspect(), settings);
        let output = TrailOutput::new(model.output());
        Self {
            model,
            scene,
            quad,
            camera: OrthographicCamera::new(width as f32, height as f32, TRAIL_CAMERA_Z),
            output,
        }
    }

    pub fn state(&self) -> TrailState {
        self.model.state()
    }

    /// Handle consumers hold on to; follows every swap.
    pub fn output(&self) -> TrailOutput {
        self.output.clone()
    }

    pub fn settings_mut(&mut self) -> &mut TrailSettings {
        self.model.settings_mut()
    }

    /// Records the pointer; the trail itself only moves on `update`.
    pub fn on_pointer_move(&mut self, event: &PointerEvent) {
        self.model.set_raw_pointer(event.normalized);
    }

    /// One tick: decay into the destination, swap, repoint consumers, then
    /// advance smoothing and the brush. No-op while unavailable or when the
    /// decay pass fails.
    pub fn update(&mut self, ctx: &mut RendererContext) {
        let Self {
            model,
            scene,
            quad,
            camera,
            output,
        } = self;
        let painted = model.tick(|pass, uniforms| {
            if let Some(node) = quad.and_then(|id| scene.get_mut(id)) {
                node.set_uniforms(uniforms);
            }
            match ctx.render(scene, camera, RenderTarget::Texture(pass.destination)) {
                Ok(()) => true,
                Err(e) => {
                    log::warn!("[trail] decay pass failed: {e}");
                    false
                }
            }
        });
        if painted {
            output.set(model.output());
        }
    }
}
