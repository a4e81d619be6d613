use glam::{Mat4, Vec3};

use crate::constants::{CAMERA_FAR, CAMERA_NEAR};

/// Orthographic camera in pixel units, centred on the origin.
///
/// `left/right/top/bottom` are always `∓width/2` and `±height/2` of the last
/// viewport handed to [`OrthographicCamera::set_viewport`].
#[derive(Debug, Clone, PartialEq)]
pub struct OrthographicCamera {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
}

impl OrthographicCamera {
    pub fn new(width: f32, height: f32, z: f32) -> Self {
        let mut camera = Self {
            left: 0.0,
            right: 0.0,
            top: 0.0,
            bottom: 0.0,
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            position: Vec3::new(0.0, 0.0, z),
        };
        camera.set_viewport(width, height);
        camera
    }

    /// Recomputes the projection bounds from a viewport size. Idempotent.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.left = -width / 2.0;
        self.right = width / 2.0;
        self.top = height / 2.0;
        self.bottom = -height / 2.0;
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::orthographic_rh(
            self.left,
            self.right,
            self.bottom,
            self.top,
            self.near,
            self.far,
        )
    }

    pub fn view(&self) -> Mat4 {
        Mat4::from_translation(-self.position)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn bounds_follow_half_extents() {
        let mut camera = OrthographicCamera::new(800.0, 450.0, 500.0);
        assert_eq!((camera.left, camera.right), (-400.0, 400.0));
        assert_eq!((camera.bottom, camera.top), (-225.0, 225.0));
        camera.set_viewport(1600.0, 900.0);
        assert_eq!((camera.left, camera.right), (-800.0, 800.0));
        assert_eq!(camera.width(), 1600.0);
        assert_eq!(camera.height(), 900.0);
    }

    #[test]
    fn corners_map_to_clip_space_edges() {
        let camera = OrthographicCamera::new(800.0, 450.0, 500.0);
        let vp = camera.view_projection();
        let top_right = vp * Vec4::new(400.0, 225.0, 0.0, 1.0);
        assert!((top_right.x - 1.0).abs() < 1e-5);
        assert!((top_right.y - 1.0).abs() < 1e-5);
        assert!(top_right.z >= 0.0 && top_right.z <= 1.0);
        let bottom_left = vp * Vec4::new(-400.0, -225.0, 0.0, 1.0);
        assert!((bottom_left.x + 1.0).abs() < 1e-5);
        assert!((bottom_left.y + 1.0).abs() < 1e-5);
    }
}
