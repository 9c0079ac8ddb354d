//! Rejection sampling of particle base positions from a glyph mask.
//!
//! Candidates are drawn uniformly over the mask and kept only when their
//! pixel is opaque. Results are translated so the mask is centered in the
//! viewport.

use glam::DVec2;
use log::{debug, warn};

use crate::config::{SwarmConfig, Viewport};
use crate::mask::{AlphaMask, DEFAULT_ALPHA_THRESHOLD};
use crate::prng::Xorshift64;
use crate::shape::Shape;

/// Draws base positions from the opaque interior of a shape.
///
/// Rejection is capped per sample. When the cap runs out the sampler picks
/// a uniformly random pixel from the mask's opaque pixel list instead, so
/// every returned point is still inside the shape and the loop always ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeSampler {
    threshold: u8,
    max_attempts: usize,
}

impl Default for ShapeSampler {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA_THRESHOLD, 10_000)
    }
}

impl ShapeSampler {
    /// `max_attempts` is clamped to at least 1.
    pub fn new(threshold: u8, max_attempts: usize) -> Self {
        Self {
            threshold,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn from_config(config: &SwarmConfig) -> Self {
        Self::new(config.alpha_threshold, config.max_sample_attempts)
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Rasterizes `shape` into a `box_size` square and samples `count` bases.
    ///
    /// Returns an empty vector (and logs) if rasterization fails or the mask
    /// has no opaque pixels.
    pub fn sample(
        &self,
        shape: Shape,
        box_size: usize,
        count: usize,
        viewport: Viewport,
        rng: &mut Xorshift64,
    ) -> Vec<DVec2> {
        match shape.rasterize(box_size) {
            Ok(mask) => self.sample_mask(&mask, count, viewport, rng),
            Err(e) => {
                warn!("rasterizing {shape} at {box_size}px failed: {e}");
                Vec::new()
            }
        }
    }

    /// Same as [`sample`](Self::sample) but selects the glyph by symbol id.
    /// Unknown ids yield an empty vector.
    pub fn sample_symbol(
        &self,
        symbol: &str,
        box_size: usize,
        count: usize,
        viewport: Viewport,
        rng: &mut Xorshift64,
    ) -> Vec<DVec2> {
        match Shape::from_symbol(symbol) {
            Ok(shape) => self.sample(shape, box_size, count, viewport, rng),
            Err(e) => {
                warn!("{e}");
                Vec::new()
            }
        }
    }

    /// Samples `count` bases from an already rasterized mask.
    pub fn sample_mask(
        &self,
        mask: &AlphaMask,
        count: usize,
        viewport: Viewport,
        rng: &mut Xorshift64,
    ) -> Vec<DVec2> {
        if mask.opaque_count(self.threshold) == 0 {
            warn!(
                "{}x{} mask has no pixels with alpha >= {}",
                mask.width(),
                mask.height(),
                self.threshold
            );
            return Vec::new();
        }

        let offset = centering_offset(mask, viewport);
        let mut opaque: Option<Vec<(usize, usize)>> = None;
        let mut fallbacks = 0usize;

        let bases = (0..count)
            .map(|_| {
                let (x, y) = self.draw_pixel(mask, rng).unwrap_or_else(|| {
                    fallbacks += 1;
                    let pixels = opaque.get_or_insert_with(|| mask.opaque_pixels(self.threshold));
                    pixels[rng.next_usize(pixels.len())]
                });
                DVec2::new(x as f64, y as f64) + offset
            })
            .collect();

        if fallbacks > 0 {
            debug!(
                "{fallbacks} of {count} samples hit the {} attempt cap",
                self.max_attempts
            );
        }
        bases
    }

    /// One rejection-sampling run; `None` once the attempt cap is spent.
    fn draw_pixel(&self, mask: &AlphaMask, rng: &mut Xorshift64) -> Option<(usize, usize)> {
        (0..self.max_attempts).find_map(|_| {
            let x = rng.next_usize(mask.width());
            let y = rng.next_usize(mask.height());
            mask.is_opaque(x, y, self.threshold).then_some((x, y))
        })
    }
}

/// Offset that centers `mask` inside `viewport`.
pub fn centering_offset(mask: &AlphaMask, viewport: Viewport) -> DVec2 {
    DVec2::new(
        (viewport.width - mask.width() as f64) / 2.0,
        (viewport.height - mask.height() as f64) / 2.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(400.0, 800.0)
    }

    /// Maps a sampled base back to its mask pixel.
    fn to_pixel(base: DVec2, mask: &AlphaMask, viewport: Viewport) -> (usize, usize) {
        let local = base - centering_offset(mask, viewport);
        (local.x as usize, local.y as usize)
    }

    #[test]
    fn returns_exactly_count_points() {
        let sampler = ShapeSampler::default();
        let mut rng = Xorshift64::new(1);
        let bases = sampler.sample(Shape::Circle, 64, 137, viewport(), &mut rng);
        assert_eq!(bases.len(), 137);
    }

    #[test]
    fn zero_count_is_empty() {
        let sampler = ShapeSampler::default();
        let mut rng = Xorshift64::new(1);
        assert!(sampler
            .sample(Shape::Circle, 64, 0, viewport(), &mut rng)
            .is_empty());
    }

    #[test]
    fn question_mark_bases_lie_inside_glyph() {
        let sampler = ShapeSampler::default();
        let mask = Shape::QuestionMark.rasterize(360).unwrap();
        let mut rng = Xorshift64::new(77);
        let bases = sampler.sample_mask(&mask, 1000, viewport(), &mut rng);
        assert_eq!(bases.len(), 1000);
        for base in bases {
            let (x, y) = to_pixel(base, &mask, viewport());
            assert!(
                mask.is_opaque(x, y, sampler.threshold()),
                "base {base:?} maps to transparent pixel ({x}, {y})"
            );
        }
    }

    #[test]
    fn bases_are_centered_in_viewport() {
        let sampler = ShapeSampler::default();
        let mut rng = Xorshift64::new(5);
        let bases = sampler.sample(Shape::Circle, 360, 2000, viewport(), &mut rng);
        let mean = bases.iter().copied().sum::<DVec2>() / bases.len() as f64;
        // Mask pixel indices average to (size - 1) / 2, so the disc center
        // lands half a pixel before the viewport center.
        let expected = viewport().center() - DVec2::splat(0.5);
        assert!(
            (mean - expected).length() < 8.0,
            "mean {mean:?}, expected near {expected:?}"
        );
    }

    #[test]
    fn offset_can_be_negative_for_small_viewports() {
        let mask = AlphaMask::new(360, 360).unwrap();
        let offset = centering_offset(&mask, Viewport::new(300.0, 300.0));
        assert_eq!(offset, DVec2::new(-30.0, -30.0));
    }

    #[test]
    fn transparent_mask_yields_empty() {
        let sampler = ShapeSampler::default();
        let mask = AlphaMask::new(32, 32).unwrap();
        let mut rng = Xorshift64::new(1);
        assert!(sampler.sample_mask(&mask, 10, viewport(), &mut rng).is_empty());
    }

    #[test]
    fn faint_mask_below_threshold_yields_empty() {
        let sampler = ShapeSampler::default();
        let mask = AlphaMask::from_data(2, 2, vec![127; 4]).unwrap();
        let mut rng = Xorshift64::new(1);
        assert!(sampler.sample_mask(&mask, 3, viewport(), &mut rng).is_empty());
    }

    #[test]
    fn unknown_symbol_yields_empty() {
        let sampler = ShapeSampler::default();
        let mut rng = Xorshift64::new(1);
        assert!(sampler
            .sample_symbol("star.fill", 64, 10, viewport(), &mut rng)
            .is_empty());
    }

    #[test]
    fn known_symbol_samples() {
        let sampler = ShapeSampler::default();
        let mut rng = Xorshift64::new(1);
        let bases = sampler.sample_symbol("questionmark", 64, 10, viewport(), &mut rng);
        assert_eq!(bases.len(), 10);
    }

    #[test]
    fn zero_box_size_yields_empty() {
        let sampler = ShapeSampler::default();
        let mut rng = Xorshift64::new(1);
        assert!(sampler
            .sample(Shape::Circle, 0, 10, viewport(), &mut rng)
            .is_empty());
    }

    #[test]
    fn attempt_cap_falls_back_to_the_single_opaque_pixel() {
        // One opaque pixel out of 10,000 and only one attempt per sample:
        // nearly every sample must come from the fallback path.
        let sampler = ShapeSampler::new(128, 1);
        let mut mask = AlphaMask::new(100, 100).unwrap();
        mask.set(42, 17, 255);
        let mut rng = Xorshift64::new(9);
        let bases = sampler.sample_mask(&mask, 50, viewport(), &mut rng);
        assert_eq!(bases.len(), 50);
        for base in bases {
            assert_eq!(to_pixel(base, &mask, viewport()), (42, 17));
        }
    }

    #[test]
    fn same_seed_same_bases() {
        let sampler = ShapeSampler::default();
        let mut a = Xorshift64::new(123);
        let mut b = Xorshift64::new(123);
        let pa = sampler.sample(Shape::QuestionMark, 96, 100, viewport(), &mut a);
        let pb = sampler.sample(Shape::QuestionMark, 96, 100, viewport(), &mut b);
        assert_eq!(pa, pb);
    }

    #[test]
    fn zero_attempt_cap_is_clamped() {
        let sampler = ShapeSampler::new(128, 0);
        let mut rng = Xorshift64::new(2);
        let bases = sampler.sample(Shape::Circle, 16, 5, viewport(), &mut rng);
        assert_eq!(bases.len(), 5);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(32))]

            #[test]
            fn sampled_bases_always_inside_shape(
                seed: u64,
                size in 16_usize..=96,
                count in 1_usize..=200,
                question: bool,
            ) {
                let shape = if question { Shape::QuestionMark } else { Shape::Circle };
                let sampler = ShapeSampler::default();
                let mask = shape.rasterize(size).unwrap();
                let mut rng = Xorshift64::new(seed);
                let bases = sampler.sample_mask(&mask, count, viewport(), &mut rng);
                prop_assert_eq!(bases.len(), count);
                for base in bases {
                    let (x, y) = to_pixel(base, &mask, viewport());
                    prop_assert!(mask.is_opaque(x, y, sampler.threshold()));
                }
            }
        }
    }
}
