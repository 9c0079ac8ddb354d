//! Rasterizes a particle snapshot into an RGBA8 buffer.
//!
//! Always available; the PNG writer in [`crate::snapshot`] builds on it.

use swarm_core::{DrawPoint, Palette, Srgb};

/// Edge length of the square drawn for each particle.
pub const POINT_SIZE: usize = 3;

/// Largest frame edge, in pixels, accepted by the image writers.
pub const MAX_FRAME_SIDE: usize = 16_384;

/// Paints every point as a `POINT_SIZE` square with its top-left corner at
/// `(x, y)`, over a solid `background`.
///
/// Points are painted in order, so later ones cover earlier ones. Pixels
/// that fall outside the buffer are skipped. The buffer length is
/// `width * height * 4`.
pub fn points_to_rgba(
    points: &[DrawPoint],
    palette: &Palette,
    width: usize,
    height: usize,
    background: Srgb,
) -> Vec<u8> {
    let bg = background.to_rgba8();
    let mut buf: Vec<u8> = std::iter::repeat(bg)
        .take(width * height)
        .flatten()
        .collect();

    for point in points {
        if !point.x.is_finite() || !point.y.is_finite() {
            continue;
        }
        let rgba = palette.color_at(point.color_index).to_rgba8();
        let x0 = point.x.floor() as i64;
        let y0 = point.y.floor() as i64;
        for dy in 0..POINT_SIZE as i64 {
            let y = y0 + dy;
            if y < 0 || y >= height as i64 {
                continue;
            }
            for dx in 0..POINT_SIZE as i64 {
                let x = x0 + dx;
                if x < 0 || x >= width as i64 {
                    continue;
                }
                let offset = (y as usize * width + x as usize) * 4;
                buf[offset..offset + 4].copy_from_slice(&rgba);
            }
        }
    }
    buf
}
