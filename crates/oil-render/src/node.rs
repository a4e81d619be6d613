use glam::Mat4;
use oil_core::SceneNode;

use crate::error::RenderError;
use crate::textures::TextureRegistry;

/// GPU access handed to nodes while a frame is being prepared.
pub struct GpuFrame<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub textures: &'a TextureRegistry,
}

/// A scene node the renderer can draw.
///
/// `prepare` runs for every node before the render pass opens (uniform
/// uploads, bind group lookups); `draw` then records into the shared pass.
/// Both have no-op defaults so grouping nodes need nothing.
pub trait RenderNode: SceneNode {
    fn prepare(&mut self, _frame: &GpuFrame<'_>, _model_view_proj: Mat4) -> Result<(), RenderError> {
        Ok(())
    }

    fn draw(&self, _pass: &mut wgpu::RenderPass<'_>) {}
}

/// Invisible node used to hang other nodes off.
pub struct Group {
    label: &'static str,
}

impl Group {
    pub fn new(label: &'static str) -> Self {
        Self { label }
    }
}

impl SceneNode for Group {
    fn label(&self) -> &str {
        self.label
    }
}

impl RenderNode for Group {}
