//! PNG output for frames and glyph masks.
//!
//! Feature-gated behind `png` (default on) so the simulation can be hosted
//! without pulling in the `image` crate.

use std::path::Path;

use swarm_core::{AlphaMask, DrawPoint, Palette, Srgb, SwarmError};

use crate::pixel::{points_to_rgba, MAX_FRAME_SIDE};

fn dims(width: usize, height: usize) -> Result<(u32, u32), SwarmError> {
    if width == 0 || height == 0 || width > MAX_FRAME_SIDE || height > MAX_FRAME_SIDE {
        return Err(SwarmError::InvalidDimensions);
    }
    let w = u32::try_from(width).map_err(|_| SwarmError::InvalidDimensions)?;
    let h = u32::try_from(height).map_err(|_| SwarmError::InvalidDimensions)?;
    Ok((w, h))
}

/// Writes a particle snapshot as a `width` x `height` PNG.
///
/// Returns `SwarmError::InvalidDimensions` for an empty frame or a side over
/// [`MAX_FRAME_SIDE`], or `SwarmError::Io` on write failure.
pub fn write_png(
    points: &[DrawPoint],
    palette: &Palette,
    width: usize,
    height: usize,
    background: Srgb,
    path: &Path,
) -> Result<(), SwarmError> {
    let (w, h) = dims(width, height)?;
    let rgba = points_to_rgba(points, palette, width, height, background);
    let img = image::RgbaImage::from_raw(w, h, rgba)
        .ok_or_else(|| SwarmError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| SwarmError::Io(e.to_string()))
}

/// Writes a glyph mask as a grayscale PNG, alpha mapped to luminance.
pub fn write_mask_png(mask: &AlphaMask, path: &Path) -> Result<(), SwarmError> {
    let (w, h) = dims(mask.width(), mask.height())?;
    let img = image::GrayImage::from_raw(w, h, mask.data().to_vec())
        .ok_or_else(|| SwarmError::Io("mask buffer size mismatch".into()))?;
    img.save(path).map_err(|e| SwarmError::Io(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use swarm_core::Shape;

    #[test]
    fn write_png_round_trip() {
        let palette = Palette::muted();
        let points = [DrawPoint {
            x: 5.0,
            y: 5.0,
            color_index: 1,
        }];
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");

        write_png(&points, &palette, 16, 12, Srgb::new(0.0, 0.0, 0.0), &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.width(), 16);
        assert_eq!(img.height(), 12);
        assert_eq!(img.get_pixel(6, 6).0, palette.color_at(1).to_rgba8());
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn write_png_rejects_empty_frame() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.png");
        let result = write_png(&[], &Palette::muted(), 0, 10, Srgb::new(0.0, 0.0, 0.0), &path);
        assert!(matches!(result, Err(SwarmError::InvalidDimensions)));
        assert!(!path.exists());
    }

    #[test]
    fn write_png_rejects_oversized_frame_before_drawing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.png");
        let result = write_png(
            &[],
            &Palette::muted(),
            1_000_000_000,
            1_000_000_000,
            Srgb::new(0.0, 0.0, 0.0),
            &path,
        );
        assert!(matches!(result, Err(SwarmError::InvalidDimensions)));
        let wide = write_png(
            &[],
            &Palette::muted(),
            MAX_FRAME_SIDE + 1,
            1,
            Srgb::new(0.0, 0.0, 0.0),
            &path,
        );
        assert!(matches!(wide, Err(SwarmError::InvalidDimensions)));
    }

    #[test]
    fn mask_png_rejects_oversized_mask() {
        let mask = swarm_core::AlphaMask::new(MAX_FRAME_SIDE + 1, 1).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let result = write_mask_png(&mask, &dir.path().join("mask.png"));
        assert!(matches!(result, Err(SwarmError::InvalidDimensions)));
    }

    #[test]
    fn write_png_reports_io_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("frame.png");
        let result = write_png(&[], &Palette::muted(), 4, 4, Srgb::new(0.0, 0.0, 0.0), &path);
        assert!(matches!(result, Err(SwarmError::Io(_))));
    }

    #[test]
    fn mask_png_keeps_alpha_as_luminance() {
        let mask = Shape::Circle.rasterize(32).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("circle.png");

        write_mask_png(&mask, &path).unwrap();

        let img = image::open(&path).unwrap().to_luma8();
        assert_eq!(img.dimensions(), (32, 32));
        assert_eq!(img.get_pixel(16, 16).0[0], 255);
        assert_eq!(img.get_pixel(0, 0).0[0], 0);
    }
}
