use glam::Mat4;
use oil_core::{
    resize_scene, ImageData, OrthographicCamera, SamplingFilter, SceneGraph, TextureHandle,
    TextureProvider, Viewport, CLEAR_COLOR,
};
use wgpu::util::DeviceExt;

use crate::error::RenderError;
use crate::helpers;
use crate::node::{GpuFrame, RenderNode};
use crate::textures::{GpuTexture, TextureRegistry};

/// Where a render call draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderTarget {
    #[default]
    Screen,
    /// An off-screen target from [`RendererContext::create_render_target`].
    Texture(TextureHandle),
}

/// The one GPU device, its presentation surface and every texture.
///
/// Constructed once per session and passed by reference to whatever needs
/// to render or upload.
pub struct RendererContext {
    surface: wgpu::Surface<'static>,
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    textures: TextureRegistry,
    neutral: TextureHandle,
    clear_color: wgpu::Color,
}

impl RendererContext {
    /// Brings up adapter, device and surface. Any failure here is fatal.
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<Self, RenderError> {
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(target)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderError::NoAdapter)?;
        let info = adapter.get_info();
        log::info!("[gpu] adapter: {} ({:?})", info.name, info.backend);

        // Only ask for what the adapter has; the trail probe checks later.
        let required_features = adapter.features() & wgpu::Features::FLOAT32_FILTERABLE;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("oil_device"),
                    required_features,
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                        .using_resolution(adapter.limits()),
                    memory_hints: wgpu::MemoryHints::Performance,
                },
                None,
            )
            .await?;
        device.on_uncaptured_error(Box::new(|e| log::error!("[gpu] uncaptured error: {e}")));

        let caps = surface.get_capabilities(&adapter);
        // Textures are uploaded as plain Rgba8Unorm, so present without an
        // sRGB conversion to keep colours as authored.
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or(RenderError::UnsupportedSurface)?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!("[gpu] surface {:?} {}x{}", format, config.width, config.height);

        let [r, g, b, a] = CLEAR_COLOR;
        let mut ctx = Self {
            surface,
            adapter,
            device,
            queue,
            config,
            textures: TextureRegistry::new(),
            neutral: TextureHandle::from_raw(0),
            clear_color: wgpu::Color { r, g, b, a },
        };
        ctx.neutral = ctx.create_texture(
            "neutral_trail",
            &ImageData::solid(1, 1, [0, 0, 0, 255]),
            SamplingFilter::Nearest,
        );
        Ok(ctx)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.config.width as f32, self.config.height as f32)
    }

    /// 1x1 black texture sampled in place of an unavailable trail.
    pub fn neutral_texture(&self) -> TextureHandle {
        self.neutral
    }

    pub fn set_clear_color(&mut self, rgba: [f64; 4]) {
        let [r, g, b, a] = rgba;
        self.clear_color = wgpu::Color { r, g, b, a };
    }

    /// Best float format the trail can render into and sample from, or
    /// `None` if the device cannot host it.
    pub fn trail_format(&self) -> Option<wgpu::TextureFormat> {
        // Surface pass samples base, flow map and trail.
        if self.device.limits().max_sampled_textures_per_shader_stage < 3 {
            return None;
        }
        let mut candidates = Vec::with_capacity(2);
        if self
            .device
            .features()
            .contains(wgpu::Features::FLOAT32_FILTERABLE)
        {
            candidates.push(wgpu::TextureFormat::Rgba32Float);
        }
        candidates.push(wgpu::TextureFormat::Rgba16Float);
        candidates.into_iter().find(|&format| {
            let features = self.adapter.get_texture_format_features(format);
            features.allowed_usages.contains(
                wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            ) && features
                .flags
                .contains(wgpu::TextureFormatFeatureFlags::FILTERABLE)
        })
    }

    /// Off-screen color target that can be drawn into and sampled.
    pub fn create_render_target(
        &mut self,
        label: &str,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    ) -> TextureHandle {
        let (texture, view) = helpers::create_color_texture(
            &self.device,
            label,
            width,
            height,
            format,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        );
        let sampler = helpers::create_sampler(&self.device, label, SamplingFilter::Linear);
        self.textures.insert(GpuTexture {
            texture,
            view,
            sampler,
            format,
        })
    }

    /// Reconfigures the surface, recomputes the camera bounds and fans
    /// `on_resize` out through `scene`. Redundant calls are harmless; zero
    /// sizes are ignored.
    pub fn resize<N: RenderNode + ?Sized>(
        &mut self,
        width: u32,
        height: u32,
        camera: &mut OrthographicCamera,
        scene: &mut SceneGraph<N>,
    ) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        if (self.config.width, self.config.height) != (width, height) {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
        resize_scene(camera, scene, Viewport::new(width as f32, height as f32))
    }

    /// Prepares every node, then draws them in traversal order into
    /// `target`. A screen frame that cannot be acquired is skipped.
    pub fn render<N: RenderNode + ?Sized>(
        &mut self,
        scene: &mut SceneGraph<N>,
        camera: &OrthographicCamera,
        target: RenderTarget,
    ) -> Result<(), RenderError> {
        let (frame, view, clear) = match target {
            RenderTarget::Screen => {
                let Some(frame) = self.acquire()? else {
                    return Ok(());
                };
                let view = frame
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());
                (Some(frame), view, self.clear_color)
            }
            RenderTarget::Texture(handle) => (
                None,
                self.textures.get(handle)?.view.clone(),
                wgpu::Color::BLACK,
            ),
        };

        let view_proj = camera.view_projection();
        let gpu = GpuFrame {
            device: &self.device,
            queue: &self.queue,
            textures: &self.textures,
        };
        scene.visit_mut(|_, world, node| {
            if let Err(e) = node.prepare(&gpu, view_proj * Mat4::from_translation(world)) {
                log::warn!("[render] `{}` not prepared: {e}", node.label());
            }
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("oil_encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("oil_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            scene.visit(|_, _, node| node.draw(&mut pass));
        }
        self.queue.submit(Some(encoder.finish()));
        if let Some(frame) = frame {
            frame.present();
        }
        Ok(())
    }

    fn acquire(&mut self) -> Result<Option<wgpu::SurfaceTexture>, RenderError> {
        match self.surface.get_current_texture() {
            Ok(frame) => Ok(Some(frame)),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("[gpu] surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                Ok(None)
            }
            Err(wgpu::SurfaceError::OutOfMemory) => Err(RenderError::OutOfMemory),
            Err(e) => {
                log::warn!("[gpu] skipping frame: {e:?}");
                Ok(None)
            }
        }
    }
}

impl TextureProvider for RendererContext {
    fn create_texture(
        &mut self,
        label: &str,
        image: &ImageData,
        filter: SamplingFilter,
    ) -> TextureHandle {
        let format = wgpu::TextureFormat::Rgba8Unorm;
        let texture = self.device.create_texture_with_data(
            &self.queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width: image.width(),
                    height: image.height(),
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            image.pixels(),
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = helpers::create_sampler(&self.device, label, filter);
        log::debug!("[gpu] texture `{label}` {}x{}", image.width(), image.height());
        self.textures.insert(GpuTexture {
            texture,
            view,
            sampler,
            format,
        })
    }
}
