//! Two-dimensional 8-bit alpha mask produced by rasterizing a shape.
//!
//! Row-major, `width * height` bytes, one alpha value per pixel. Unlike a
//! wrapping field, out-of-range coordinates are simply outside the shape.

use crate::error::SwarmError;

/// Alpha value at or above which a pixel counts as part of the shape.
pub const DEFAULT_ALPHA_THRESHOLD: u8 = 128;

/// An 8-bit alpha raster.
#[derive(Debug, Clone, PartialEq)]
pub struct AlphaMask {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl AlphaMask {
    /// Creates a fully transparent mask.
    ///
    /// Returns `SwarmError::InvalidDimensions` if either dimension is zero
    /// or if `width * height` overflows `usize`.
    pub fn new(width: usize, height: usize) -> Result<Self, SwarmError> {
        let len = checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0; len],
        })
    }

    /// Wraps a pre-built row-major alpha buffer, validating its length.
    pub fn from_data(width: usize, height: usize, data: Vec<u8>) -> Result<Self, SwarmError> {
        let expected = checked_len(width, height)?;
        if data.len() != expected {
            return Err(SwarmError::InvalidConfig(format!(
                "alpha buffer has {} bytes, expected {expected} for {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Read-only access to the row-major alpha bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Alpha at `(x, y)`, or `None` outside the mask.
    pub fn alpha(&self, x: usize, y: usize) -> Option<u8> {
        (x < self.width && y < self.height).then(|| self.data[y * self.width + x])
    }

    /// Sets alpha at `(x, y)`. Out-of-range writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, alpha: u8) {
        if x < self.width && y < self.height {
            self.data[y * self.width + x] = alpha;
        }
    }

    /// True when `(x, y)` is inside the mask and its alpha is at least `threshold`.
    pub fn is_opaque(&self, x: usize, y: usize, threshold: u8) -> bool {
        self.alpha(x, y).is_some_and(|a| a >= threshold)
    }

    /// Number of pixels with alpha at least `threshold`.
    pub fn opaque_count(&self, threshold: u8) -> usize {
        self.data.iter().filter(|&&a| a >= threshold).count()
    }

    /// Coordinates of every pixel with alpha at least `threshold`, row-major.
    pub fn opaque_pixels(&self, threshold: u8) -> Vec<(usize, usize)> {
        self.iter()
            .filter(|&(_, _, a)| a >= threshold)
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    /// Iterates over all pixels yielding `(x, y, alpha)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, u8)> + '_ {
        self.data.iter().enumerate().map(|(i, &a)| {
            let x = i % self.width;
            let y = i / self.width;
            (x, y, a)
        })
    }
}

fn checked_len(width: usize, height: usize) -> Result<usize, SwarmError> {
    if width == 0 || height == 0 {
        return Err(SwarmError::InvalidDimensions);
    }
    width
        .checked_mul(height)
        .ok_or(SwarmError::InvalidDimensions)
}
