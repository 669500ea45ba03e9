//! Row bands for parallel passes.
//!
//! The image is cut into horizontal bands of whole rows, one per worker.
//! A band is a contiguous slice of the row-major canvas, so every worker
//! writes only its own memory during a pass.

/// A horizontal strip of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    /// First row of the band
    pub y: u32,
    /// Number of rows
    pub height: u32,
    /// Index of this band; also the worker that renders it
    pub index: usize,
}

impl Band {
    pub fn new(y: u32, height: u32, index: usize) -> Self {
        Self { y, height, index }
    }

    /// Get the total number of pixels in this band.
    pub fn pixel_count(&self, width: u32) -> usize {
        width as usize * self.height as usize
    }
}

/// Split `height` rows into at most `count` bands of equal height. The last
/// band takes the remainder.
pub fn generate_bands(height: u32, count: usize) -> Vec<Band> {
    let count = count.max(1) as u32;
    let rows = rows_per_band(height, count as usize);

    let mut bands = Vec::new();
    let mut y = 0;
    while y < height {
        let h = rows.min(height - y);
        bands.push(Band::new(y, h, bands.len()));
        y += rows;
    }
    bands
}

/// Rows in every band but the last.
pub fn rows_per_band(height: u32, count: usize) -> u32 {
    height.div_ceil(count.max(1) as u32).max(1)
}
