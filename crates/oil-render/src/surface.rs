use fnv::FnvHashMap;
use glam::Mat4;
use oil_core::{
    Capabilities, FrameStep, PlaneLayout, SceneNode, SurfaceModel, SurfaceUniforms, TextureHandle,
    Tunable, Viewport,
};

use crate::context::RendererContext;
use crate::error::RenderError;
use crate::geometry::PlaneGeometry;
use crate::helpers;
use crate::node::{GpuFrame, RenderNode};
use crate::trail::TrailOutput;
use crate::SURFACE_WGSL;

/// The visible plane: base image and flow map distorted by the trail.
pub struct SurfaceNode {
    model: SurfaceModel,
    base: TextureHandle,
    flow_map: TextureHandle,
    trail: TrailOutput,
    pipeline: wgpu::RenderPipeline,
    layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    geometry: PlaneGeometry,
    // Keyed by trail texture; base and flow map never change.
    bind_groups: FnvHashMap<TextureHandle, wgpu::BindGroup>,
    active: Option<TextureHandle>,
}

impl SurfaceNode {
    pub fn new(
        ctx: &RendererContext,
        plane: &PlaneLayout,
        base: TextureHandle,
        flow_map: TextureHandle,
        trail: TrailOutput,
    ) -> Self {
        let device = ctx.device();
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("surface_shader"),
            source: wgpu::ShaderSource::Wgsl(SURFACE_WGSL.into()),
        });
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("surface_bgl"),
            entries: &[
                helpers::uniform_entry(0),
                helpers::texture_entry(1),
                helpers::sampler_entry(2),
                helpers::texture_entry(3),
                helpers::sampler_entry(4),
                helpers::texture_entry(5),
                helpers::sampler_entry(6),
            ],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("surface_pl"),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });
        let pipeline = helpers::make_plane_pipeline(
            device,
            "surface_pipeline",
            &pipeline_layout,
            &shader,
            ctx.surface_format(),
            Some(wgpu::BlendState::ALPHA_BLENDING),
        );
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("surface_uniforms"),
            size: std::mem::size_of::<SurfaceUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut model = SurfaceModel::new(base, flow_map, trail.get());
        model.set_resolution(ctx.viewport());
        Self {
            model,
            base,
            flow_map,
            trail,
            pipeline,
            layout,
            uniform_buffer,
            geometry: PlaneGeometry::new(device, "surface_plane", plane.width, plane.height),
            bind_groups: FnvHashMap::default(),
            active: None,
        }
    }

    fn bind_group(
        &self,
        frame: &GpuFrame<'_>,
        trail: TextureHandle,
    ) -> Result<wgpu::BindGroup, RenderError> {
        let base = frame.textures.get(self.base)?;
        let flow = frame.textures.get(self.flow_map)?;
        let trail = frame.textures.get(trail)?;
        Ok(frame.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("surface_bg"),
            layout: &self.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&base.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&base.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(&flow.view),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::Sampler(&flow.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 5,
                    resource: wgpu::BindingResource::TextureView(&trail.view),
                },
                wgpu::BindGroupEntry {
                    binding: 6,
                    resource: wgpu::BindingResource::Sampler(&trail.sampler),
                },
            ],
        }))
    }
}

impl SceneNode for SurfaceNode {
    fn label(&self) -> &str {
        "oil_surface"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::NONE.with_update().with_resize()
    }

    fn update(&mut self, step: FrameStep) {
        self.model.update(step);
    }

    fn on_resize(&mut self, viewport: Viewport) {
        self.model.set_resolution(viewport);
    }

    fn as_tunable_mut(&mut self) -> Option<&mut dyn Tunable> {
        Some(&mut self.model)
    }
}

impl RenderNode for SurfaceNode {
    fn prepare(&mut self, frame: &GpuFrame<'_>, model_view_proj: Mat4) -> Result<(), RenderError> {
        self.active = None;
        let trail = self.trail.get();
        self.model.set_trail_texture(trail);
        let packed = SurfaceUniforms::from_set(self.model.uniforms(), model_view_proj);
        frame
            .queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&packed));

        if !self.bind_groups.contains_key(&trail) {
            let bind_group = self.bind_group(frame, trail)?;
            self.bind_groups.insert(trail, bind_group);
        }
        self.active = Some(trail);
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
