use fnv::FnvHashMap;
use glam::Vec2;

use crate::texture::TextureHandle;

/// A typed shader input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec2(Vec2),
    Texture(TextureHandle),
}

/// Named uniform values attached to one drawable.
///
/// Written by the owning node's `update` and by tuning; read once per draw
/// when the renderer packs the node's uniform buffer.
#[derive(Debug, Clone, Default)]
pub struct UniformSet {
    values: FnvHashMap<&'static str, UniformValue>,
}

impl UniformSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &'static str, value: UniformValue) {
        self.values.insert(name, value);
    }

    pub fn set_float(&mut self, name: &'static str, value: f32) {
        self.set(name, UniformValue::Float(value));
    }

    pub fn set_vec2(&mut self, name: &'static str, value: Vec2) {
        self.set(name, UniformValue::Vec2(value));
    }

    pub fn set_texture(&mut self, name: &'static str, handle: TextureHandle) {
        self.set(name, UniformValue::Texture(handle));
    }

    pub fn get(&self, name: &str) -> Option<UniformValue> {
        self.values.get(name).copied()
    }

    pub fn float(&self, name: &str) -> Option<f32> {
        match self.get(name)? {
            UniformValue::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn vec2(&self, name: &str) -> Option<Vec2> {
        match self.get(name)? {
            UniformValue::Vec2(v) => Some(v),
            _ => None,
        }
    }

    pub fn texture(&self, name: &str) -> Option<TextureHandle> {
        match self.get(name)? {
            UniformValue::Texture(h) => Some(h),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_getters_reject_mismatched_kinds() {
        let mut set = UniformSet::new();
        set.set_float("uTime", 2.0);
        set.set_vec2("uMouse", Vec2::new(0.1, 0.2));
        set.set_texture("tTrail", TextureHandle::from_raw(3));

        assert_eq!(set.float("uTime"), Some(2.0));
        assert_eq!(set.vec2("uTime"), None);
        assert_eq!(set.vec2("uMouse"), Some(Vec2::new(0.1, 0.2)));
        assert_eq!(set.texture("tTrail"), Some(TextureHandle::from_raw(3)));
        assert_eq!(set.float("missing"), None);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn later_writes_replace_earlier_ones() {
        let mut set = UniformSet::new();
        set.set_float("uTime", 1.0);
        set.set_float("uTime", 4.5);
        assert_eq!(set.float("uTime"), Some(4.5));
        assert_eq!(set.len(), 1);
    }
}
