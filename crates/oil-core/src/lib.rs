//! Platform-free logic for the oil trail surface.
//!
//! Nothing in here touches the GPU or the windowing system, so the whole
//! frame protocol (clock, scene dispatch, ping-pong bookkeeping, pointer
//! smoothing, uniform values and tuning) can be exercised from host tests.
//! The wgpu side lives in `oil-render`.

pub mod camera;
pub mod clock;
pub mod constants;
pub mod error;
pub mod frame;
pub mod layout;
pub mod math;
pub mod pointer;
pub mod scene;
pub mod surface;
pub mod texture;
pub mod trail;
pub mod tuning;
pub mod uniforms;

pub use camera::*;
pub use clock::*;
pub use constants::*;
pub use error::*;
pub use frame::*;
pub use layout::*;
pub use pointer::*;
pub use scene::*;
pub use surface::*;
pub use texture::*;
pub use trail::*;
pub use tuning::*;
pub use uniforms::*;
