use bevy::math::{UVec2, Vec2};
use showroom_helpers::MAX_SURFACE_DIMENSION;

use crate::color::Rgb;

/// Drawing surface for the grid. Coordinates are logical pixels, the surface
/// maps them to its own resolution.
pub trait DotCanvas {
    /// Sizes the surface for a `size` container on a display with `scale_factor`
    /// physical pixels per logical pixel.
    fn resize(&mut self, size: Vec2, scale_factor: f32);
    fn clear(&mut self);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgb);
}

/// CPU raster into an RGBA8 buffer, uploaded as a texture every frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RasterCanvas {
    width: u32,
    height: u32,
    /// Physical pixels per logical pixel actually drawn with
    scale: f32,
    /// Device pixel ratio asked for by the last resize
    device_scale: f32,
    pixels: Vec<u8>,
}

impl RasterCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn physical_size(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    /// Physical pixels per logical pixel. Below the device ratio when the
    /// surface had to be clamped.
    pub const fn scale_factor(&self) -> f32 {
        self.scale
    }

    pub const fn device_scale_factor(&self) -> f32 {
        self.device_scale
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = ((y * self.width + x) * 4) as usize;
        let bytes = self.pixels.get(index..index + 4)?;
        bytes.try_into().ok()
    }
}

fn physical_extent(logical: f32, scale: f32) -> u32 {
    ((logical * scale).ceil().max(0.0) as u32).min(MAX_SURFACE_DIMENSION)
}

impl DotCanvas for RasterCanvas {
    fn resize(&mut self, size: Vec2, scale_factor: f32) {
        let device_scale = if scale_factor.is_finite() && scale_factor > 0.0 {
            scale_factor
        } else {
            1.0
        };
        // The whole logical area must map into the clamped buffer.
        let max = MAX_SURFACE_DIMENSION as f32;
        let scale = [size.x, size.y]
            .into_iter()
            .filter(|extent| *extent > 0.0)
            .fold(device_scale, |scale, extent| scale.min(max / extent));
        let width = physical_extent(size.x, scale);
        let height = physical_extent(size.y, scale);

        self.scale = scale;
        self.device_scale = device_scale;
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.pixels = vec![0; (width * height * 4) as usize];
        }
    }

    fn clear(&mut self) {
        self.pixels.fill(0);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgb) {
        let center = center * self.scale;
        let radius = radius * self.scale;
        let radius_sq = radius * radius;

        let min = (center - radius).floor().max(Vec2::ZERO);
        let max = (center + radius)
            .ceil()
            .min(Vec2::new(self.width as f32, self.height as f32));
        if min.x >= max.x || min.y >= max.y {
            return;
        }

        let rgba = [color.r, color.g, color.b, 255];
        for y in min.y as u32..max.y as u32 {
            let dy = y as f32 + 0.5 - center.y;
            for x in min.x as u32..max.x as u32 {
                let dx = x as f32 + 0.5 - center.x;
                if dx.mul_add(dx, dy * dy) > radius_sq {
                    continue;
                }
                let index = ((y * self.width + x) * 4) as usize;
                if let Some(pixel) = self.pixels.get_mut(index..index + 4) {
                    pixel.copy_from_slice(&rgba);
                }
            }
        }
    }
}
