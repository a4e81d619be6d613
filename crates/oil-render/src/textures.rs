use fnv::FnvHashMap;
use oil_core::TextureHandle;

use crate::error::RenderError;

/// A texture plus everything needed to sample it.
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub format: wgpu::TextureFormat,
}

/// Owner of every texture the renderer hands out. Handles are never reused.
#[derive(Default)]
pub struct TextureRegistry {
    textures: FnvHashMap<TextureHandle, GpuTexture>,
    next: u32,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, texture: GpuTexture) -> TextureHandle {
        let handle = TextureHandle::from_raw(self.next);
        self.next += 1;
        self.textures.insert(handle, texture);
        handle
    }

    pub fn get(&self, handle: TextureHandle) -> Result<&GpuTexture, RenderError> {
        self.textures
            .get(&handle)
            .ok_or(RenderError::UnknownTexture(handle))
    }
}
