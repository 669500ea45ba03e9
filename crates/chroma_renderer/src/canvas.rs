//! Floating point frame buffer with progressive accumulation.

use chroma_math::Interval;

use crate::material::Color;
use crate::sink::Frame;

/// Row-major linear RGB pixels.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl Canvas {
    /// Create a new canvas filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    /// Reset every pixel to black.
    pub fn clear(&mut self) {
        self.pixels.fill(Color::ZERO);
    }

    /// Quantize to 8-bit RGB.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgb(*color));
        }
        bytes
    }

    pub fn snapshot(&self) -> Frame {
        Frame::new(self.width, self.height, self.to_rgb8())
    }
}

/// Clamp each channel to [0, 1], scale by 255 and truncate.
#[inline]
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let quantize = |c: f32| (255.0 * Interval::UNIT.clamp(c)) as u8;
    [quantize(color.x), quantize(color.y), quantize(color.z)]
}

/// Write one pass sample into a pixel.
///
/// Accumulating integrators keep a running mean over the passes since the
/// last flush (`frame_index` is 1-based); the others overwrite. Returns the
/// summed absolute per-channel change.
#[inline]
pub fn store_sample(slot: &mut Color, sample: Color, frame_index: u64, accumulate: bool) -> f32 {
    let old = *slot;
    *slot = if accumulate {
        let n = frame_index.max(1) as f32;
        old * (1.0 - 1.0 / n) + sample / n
    } else {
        sample
    };
    (*slot - old).abs().element_sum()
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    #[test]
    fn test_color_to_rgb() {
        assert_eq!(color_to_rgb(Color::ZERO), [0, 0, 0]);
        assert_eq!(color_to_rgb(Color::ONE), [255, 255, 255]);
        assert_eq!(color_to_rgb(Color::new(2.0, -1.0, 0.5)), [255, 0, 127]);
    }

    #[test]
    fn test_nan_quantizes_to_black() {
        assert_eq!(color_to_rgb(Color::splat(f32::NAN)), [0, 0, 0]);
    }

    #[test]
    fn test_row_major_layout() {
        let mut canvas = Canvas::new(3, 2);
        canvas.set(2, 1, Color::ONE);
        assert_eq!(canvas.pixels()[5], Color::ONE);
        assert_eq!(canvas.get(2, 1), Color::ONE);

        let bytes = canvas.to_rgb8();
        assert_eq!(bytes.len(), 18);
        assert_eq!(&bytes[15..], &[255, 255, 255]);

        canvas.clear();
        assert!(canvas.pixels().iter().all(|c| *c == Color::ZERO));
    }

    #[test]
    fn test_running_mean() {
        let mut slot = Color::ZERO;
        for (i, v) in [1.0, 2.0, 3.0, 6.0].into_iter().enumerate() {
            store_sample(&mut slot, Color::splat(v), i as u64 + 1, true);
        }
        assert!((slot.x - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_fresh_write_and_change() {
        let mut slot = Color::splat(0.5);
        let change = store_sample(&mut slot, Color::new(1.0, 0.5, 0.0), 7, false);
        assert_eq!(slot, Color::new(1.0, 0.5, 0.0));
        assert!((change - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_accumulation_reduces_error() {
        // Noisy samples with mean 0.5
        let mut rng = StdRng::seed_from_u64(42);
        let mut canvas = Canvas::new(32, 32);
        let mut errors = Vec::new();

        for frame in 1..=256u64 {
            for slot in canvas.pixels_mut() {
                let sample = Color::splat(rng.gen::<f32>());
                store_sample(slot, sample, frame, true);
            }
            if frame == 1 || frame == 16 || frame == 256 {
                let error: f32 = canvas.pixels().iter().map(|c| (c.x - 0.5).abs()).sum::<f32>()
                    / canvas.pixels().len() as f32;
                errors.push(error);
            }
        }
        assert!(errors[1] < errors[0] * 0.5);
        assert!(errors[2] < errors[1] * 0.5);
    }
}
