//! Frame output.

use std::convert::Infallible;
use std::path::{Path, PathBuf};

/// An 8-bit RGB image, row-major, three bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Frame {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize * 3);
        Self {
            width,
            height,
            pixels,
        }
    }

    /// All black frame.
    pub fn blank(width: u32, height: u32) -> Self {
        Self::new(width, height, vec![0; width as usize * height as usize * 3])
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = (y as usize * self.width as usize + x as usize) * 3;
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]]
    }
}

/// Consumer of rendered frames.
pub trait FrameSink {
    type Error;

    fn accept(&mut self, frame: &Frame) -> Result<(), Self::Error>;
}

/// Writes every accepted frame to a PNG file, replacing the previous one.
#[derive(Debug, Clone)]
pub struct PngSink {
    path: PathBuf,
}

impl PngSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FrameSink for PngSink {
    type Error = image::ImageError;

    fn accept(&mut self, frame: &Frame) -> Result<(), Self::Error> {
        image::save_buffer(
            &self.path,
            &frame.pixels,
            frame.width,
            frame.height,
            image::ColorType::Rgb8,
        )?;
        log::info!("Saved {}x{} frame to {}", frame.width, frame.height, self.path.display());
        Ok(())
    }
}

/// Keeps accepted frames in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub frames: Vec<Frame>,
}

impl FrameSink for MemorySink {
    type Error = Infallible;

    fn accept(&mut self, frame: &Frame) -> Result<(), Self::Error> {
        self.frames.push(frame.clone());
        Ok(())
    }
}
