use oil_core::{SceneError, TextureHandle};

/// Failures of the GPU side. Everything returned from bring-up is fatal;
/// per-frame errors other than `OutOfMemory` are absorbed by the renderer.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("no suitable GPU adapter")]
    NoAdapter,
    #[error("request_device error: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface creation failed: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("surface is not supported by the selected adapter")]
    UnsupportedSurface,
    #[error("surface ran out of memory")]
    OutOfMemory,
    #[error("unknown texture {0:?}")]
    UnknownTexture(TextureHandle),
    #[error(transparent)]
    Scene(#[from] SceneError),
}
