//! Brightness to character mapping.
//!
//! Two flavours: a deterministic linear ramp for still images, and a bucketed
//! palette that draws a random glyph from a brightness bucket so consecutive
//! frames shimmer.

use crate::{GlyphgateError, Result};
use rand::seq::SliceRandom;
use rand::Rng;

/// Ten characters from darkest to lightest.
pub const LOGIN_RAMP: &str = "@%#*+=-:. ";

/// Sparse to dense glyph ramp for the animated banner.
pub const DENSITY_RAMP: &str = ".-':_,^=;><+!rc*/z?sLTv)J7(|Fi{C}fI31tlu[neoZ5Yxjya]2ESwqkP6h9d4VpOGbUAKXHm8RD#$Bg0MNWQ%&@■";

/// Number of glyph buckets cut from the ramp, before the blank bucket is added
pub const DENSITY_BUCKETS: usize = 6;

/// Deterministic palette: `index = sample * (len - 1) / 255`.
pub struct LinearPalette {
    lut: [char; 256],
    len: usize,
}

impl LinearPalette {
    /// Build from characters ordered darkest to lightest.
    pub fn new(ramp: &str) -> Result<Self> {
        let chars: Vec<char> = ramp.chars().collect();
        if chars.is_empty() {
            return Err(GlyphgateError::Palette("linear palette is empty".into()));
        }
        let mut lut = [' '; 256];
        for (sample, slot) in lut.iter_mut().enumerate() {
            *slot = chars[Self::index_for(sample as u8, chars.len())];
        }
        Ok(Self { lut, len: chars.len() })
    }

    fn index_for(sample: u8, len: usize) -> usize {
        sample as usize * (len - 1) / 255
    }

    /// Position of `sample` within the ramp.
    pub fn index(&self, sample: u8) -> usize {
        Self::index_for(sample, self.len)
    }

    #[inline]
    pub fn map(&self, sample: u8) -> char {
        self.lut[sample as usize]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for LinearPalette {
    fn default() -> Self {
        Self::new(LOGIN_RAMP).expect("login ramp is non-empty")
    }
}

/// Palette of interchangeable glyph sets, one per brightness band.
#[derive(Debug, Clone)]
pub struct BucketPalette {
    buckets: Vec<Vec<char>>,
    // sample -> bucket index, filled once
    lut: [u8; 256],
}

impl BucketPalette {
    /// Build from buckets ordered darkest to lightest.
    pub fn new(buckets: Vec<Vec<char>>) -> Result<Self> {
        if buckets.is_empty() || buckets.len() > 256 {
            return Err(GlyphgateError::Palette(format!(
                "bucket count must be within 1..=256, got {}",
                buckets.len()
            )));
        }
        if let Some(i) = buckets.iter().position(Vec::is_empty) {
            return Err(GlyphgateError::Palette(format!("bucket {i} is empty")));
        }
        let n = buckets.len();
        let mut lut = [0u8; 256];
        for (sample, slot) in lut.iter_mut().enumerate() {
            // floor(sample / (256 / n)) without the float division
            *slot = (sample * n / 256) as u8;
        }
        Ok(Self { buckets, lut })
    }

    /// Cut a sparse-to-dense ramp into buckets.
    ///
    /// Every second glyph is kept, the result is split into `count` equal
    /// contiguous buckets (leftover glyphs are dropped) and a blank bucket of
    /// the same size is prepended for the darkest band.
    pub fn from_density_ramp(ramp: &str, count: usize) -> Result<Self> {
        let glyphs: Vec<char> = ramp.chars().step_by(2).collect();
        let size = if count == 0 { 0 } else { glyphs.len() / count };
        if size == 0 {
            return Err(GlyphgateError::Palette(format!(
                "ramp of {} glyphs cannot fill {count} buckets",
                glyphs.len()
            )));
        }
        let mut buckets = Vec::with_capacity(count + 1);
        buckets.push(vec![' '; size]);
        buckets.extend(glyphs.chunks_exact(size).take(count).map(<[char]>::to_vec));
        Self::new(buckets)
    }

    pub fn bucket_index(&self, sample: u8) -> usize {
        self.lut[sample as usize] as usize
    }

    pub fn bucket(&self, sample: u8) -> &[char] {
        &self.buckets[self.bucket_index(sample)]
    }

    pub fn buckets(&self) -> &[Vec<char>] {
        &self.buckets
    }

    /// Draw one glyph uniformly from the bucket for `sample`.
    pub fn pick<R: Rng + ?Sized>(&self, sample: u8, rng: &mut R) -> char {
        // buckets are never empty
        *self.bucket(sample).choose(rng).unwrap_or(&' ')
    }
}

impl Default for BucketPalette {
    fn default() -> Self {
        Self::from_density_ramp(DENSITY_RAMP, DENSITY_BUCKETS).expect("density ramp fills its buckets")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn linear_maps_extremes() {
        let palette = LinearPalette::default();
        assert_eq!(palette.len(), 10);
        assert_eq!(palette.map(0), '@');
        assert_eq!(palette.map(255), ' ');
        assert_eq!(palette.index(0), 0);
        assert_eq!(palette.index(255), 9);
    }

    #[test]
    fn linear_uses_floor_quantization() {
        let palette = LinearPalette::default();
        // 28 * 9 / 255 = 0.98, 29 * 9 / 255 = 1.02
        assert_eq!(palette.map(28), '@');
        assert_eq!(palette.map(29), '%');
        assert_eq!(palette.map(128), '+');
        assert_eq!(palette.map(254), '.');
    }

    #[test]
    fn linear_is_monotonic_and_in_range() {
        let palette = LinearPalette::default();
        let mut prev = 0;
        for sample in 0..=255u8 {
            let idx = palette.index(sample);
            assert!(idx < palette.len());
            assert!(idx >= prev, "ramp goes backwards at {sample}");
            assert_eq!(LOGIN_RAMP.chars().nth(idx), Some(palette.map(sample)));
            prev = idx;
        }
    }

    #[test]
    fn single_char_palette() {
        let palette = LinearPalette::new("#").unwrap();
        assert!((0..=255u8).all(|s| palette.map(s) == '#'));
    }

    #[test]
    fn empty_palettes_rejected() {
        assert!(LinearPalette::new("").is_err());
        assert!(BucketPalette::new(vec![]).is_err());
        assert!(BucketPalette::new(vec![vec!['a'], vec![]]).is_err());
        assert!(BucketPalette::from_density_ramp("ab", 6).is_err());
        assert!(BucketPalette::from_density_ramp(DENSITY_RAMP, 0).is_err());
    }

    #[test]
    fn density_buckets_layout() {
        let palette = BucketPalette::default();
        let buckets = palette.buckets();
        assert_eq!(buckets.len(), 7);
        assert!(buckets.iter().all(|b| b.len() == 7));
        assert_eq!(buckets[0], vec![' '; 7]);
        assert_eq!(buckets[1].iter().collect::<String>(), ".'_^;<!");
        assert_eq!(buckets[6].iter().collect::<String>(), "AXmR#B0");
    }

    #[test]
    fn bucket_boundaries() {
        let palette = BucketPalette::default();
        assert_eq!(palette.bucket_index(0), 0);
        assert_eq!(palette.bucket_index(36), 0);
        assert_eq!(palette.bucket_index(37), 1);
        assert_eq!(palette.bucket_index(128), 3);
        assert_eq!(palette.bucket_index(255), 6);
        let mut prev = 0;
        for sample in 0..=255u8 {
            let idx = palette.bucket_index(sample);
            assert!(idx < palette.buckets().len());
            assert!(idx >= prev);
            prev = idx;
        }
    }

    #[test]
    fn pick_stays_in_bucket() {
        let palette = BucketPalette::default();
        let mut rng = StdRng::seed_from_u64(7);
        for sample in 0..=255u8 {
            let ch = palette.pick(sample, &mut rng);
            assert!(palette.bucket(sample).contains(&ch));
        }
        assert_eq!(palette.pick(0, &mut rng), ' ');
    }

    #[test]
    fn pick_is_reproducible_with_seed() {
        let palette = BucketPalette::default();
        let draw = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..64).map(|_| palette.pick(200, &mut rng)).collect::<String>()
        };
        assert_eq!(draw(42), draw(42));
    }

    #[test]
    fn single_glyph_buckets_are_deterministic() {
        let palette = BucketPalette::new(vec![vec!['a'], vec!['b']]).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(palette.pick(127, &mut rng), 'a');
        assert_eq!(palette.pick(128, &mut rng), 'b');
    }
}
