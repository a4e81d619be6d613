use glam::Vec2;

use crate::constants::PLANE_ASPECT_RATIO;

/// Drawable size in physical pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }
}

/// Size and placement of the visible plane, fixed at start-up.
///
/// The plane spans the initial viewport width with a locked aspect ratio and
/// is shifted so its bottom edge sits on the bottom of that viewport. The
/// trail buffer shares these dimensions so pointer and trail texels line up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneLayout {
    pub width: f32,
    pub height: f32,
    /// World-space vertical translation of the plane node.
    pub offset_y: f32,
}

impl PlaneLayout {
    pub fn from_viewport(viewport: Viewport) -> Self {
        let width = viewport.width.max(1.0);
        let height = (width * PLANE_ASPECT_RATIO).max(1.0);
        Self {
            width,
            height,
            offset_y: (height - viewport.height) * 0.5,
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Texel size of the trail buffers.
    pub fn pixel_size(&self) -> (u32, u32) {
        (self.width.round() as u32, self.height.round() as u32)
    }

    /// Where the plane lands on screen (client coordinates, y down) when the
    /// centred camera shows `viewport`.
    pub fn screen_bounds(&self, viewport: Viewport) -> PlaneBounds {
        let center_x = viewport.width * 0.5;
        let center_y = viewport.height * 0.5 - self.offset_y;
        PlaneBounds {
            left: center_x - self.width * 0.5,
            top: center_y - self.height * 0.5,
            width: self.width,
            height: self.height,
        }
    }
}

/// Screen rectangle of the plane in client coordinates (y down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneBounds {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl PlaneBounds {
    /// Converts a client position into plane-normalised coordinates with y up,
    /// cropped to the plane.
    pub fn normalize(&self, client: Vec2) -> Vec2 {
        if self.width <= 0.0 || self.height <= 0.0 || !client.is_finite() {
            return Vec2::splat(0.5);
        }
        let x = (client.x - self.left) / self.width;
        let y = 1.0 - (client.y - self.top) / self.height;
        Vec2::new(x.clamp(0.0, 1.0), y.clamp(0.0, 1.0))
    }
}
