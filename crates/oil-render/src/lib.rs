//! wgpu side of the oil trail surface: renderer context, texture registry,
//! the ping-pong trail accumulator, the surface node and [`OilStage`], which
//! ties them together for a front-end's frame loop.

pub mod context;
pub mod error;
pub mod geometry;
pub mod helpers;
pub mod node;
pub mod stage;
pub mod surface;
pub mod textures;
pub mod trail;

pub use context::{RenderTarget, RendererContext};
pub use error::RenderError;
pub use node::{GpuFrame, Group, RenderNode};
pub use stage::{OilStage, StageOptions, SurfaceAssets};
pub use surface::SurfaceNode;
pub use textures::{GpuTexture, TextureRegistry};
pub use trail::{TrailAccumulator, TrailOutput};

pub static TRAIL_WGSL: &str = include_str!("../shaders/trail.wgsl");
pub static SURFACE_WGSL: &str = include_str!("../shaders/surface.wgsl");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shaders_declare_expected_entry_points_and_bindings() {
        for src in [TRAIL_WGSL, SURFACE_WGSL] {
            assert!(src.contains("fn vs_main"));
            assert!(src.contains("fn fs_main"));
        }
        assert!(TRAIL_WGSL.contains("@binding(2)"));
        assert!(SURFACE_WGSL.contains("@binding(6)"));
    }

    #[test]
    fn placeholder_assets_are_tiny_and_valid() {
        let assets = SurfaceAssets::placeholder();
        assert_eq!(assets.base.pixels().len(), 4 * 4 * 4);
        assert_eq!(assets.flow_map.width(), 1);
    }
}
