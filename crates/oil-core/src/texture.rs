use crate::error::ImageError;

/// Opaque reference to a GPU texture owned by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(u32);

impl TextureHandle {
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Minification/magnification preference for a sampled texture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SamplingFilter {
    Nearest,
    #[default]
    Linear,
}

/// Decoded, tightly packed RGBA8 pixels, row 0 at the top.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageData {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl ImageData {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, ImageError> {
        if width == 0 || height == 0 {
            return Err(ImageError::Empty { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(ImageError::SizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Single-colour image, used for placeholders and the neutral trail.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let pixels = rgba
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Flow map pointing every texel at `direction` (each component in
    /// `[-1, 1]`, encoded into the red/green channels).
    pub fn uniform_flow(width: u32, height: u32, direction: [f32; 2]) -> Self {
        let encode = |v: f32| ((v.clamp(-1.0, 1.0) * 0.5 + 0.5) * 255.0).round() as u8;
        Self::solid(
            width,
            height,
            [encode(direction[0]), encode(direction[1]), 128, 255],
        )
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn bytes_per_row(&self) -> u32 {
        self.width * 4
    }
}

impl std::fmt::Debug for ImageData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageData")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Turns decoded images into GPU textures.
pub trait TextureProvider {
    fn create_texture(
        &mut self,
        label: &str,
        image: &ImageData,
        filter: SamplingFilter,
    ) -> TextureHandle;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_validates_buffer_length() {
        assert!(ImageData::new(2, 2, vec![0; 16]).is_ok());
        assert_eq!(
            ImageData::new(2, 2, vec![0; 15]),
            Err(ImageError::SizeMismatch {
                expected: 16,
                actual: 15
            })
        );
        assert_eq!(
            ImageData::new(0, 4, Vec::new()),
            Err(ImageError::Empty {
                width: 0,
                height: 4
            })
        );
    }

    #[test]
    fn solid_repeats_colour() {
        let img = ImageData::solid(3, 2, [1, 2, 3, 4]);
        assert_eq!(img.pixels().len(), 24);
        assert!(img.pixels().chunks(4).all(|px| px == [1, 2, 3, 4]));
    }

    #[test]
    fn uniform_flow_encodes_direction() {
        let img = ImageData::uniform_flow(1, 1, [1.0, -1.0]);
        assert_eq!(&img.pixels()[..2], &[255, 0]);
    }
}
