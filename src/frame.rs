//! Grid rendering - turns a luminance image into lines of text.

use crate::palette::{BucketPalette, LinearPalette};
use image::GrayImage;
use rand::Rng;
use rayon::prelude::*;
use std::fmt;
use std::ops::Range;

/// Banner text shown by the animated renderer.
pub const DEFAULT_MESSAGE: &str = "  Welcome to Work  ";
/// Row the overlay band is centered on.
pub const DEFAULT_MESSAGE_ROW: u32 = 25;

/// One rendered grid. Built whole and never edited afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    lines: Vec<String>,
    width: usize,
}

impl Frame {
    fn new(lines: Vec<String>, width: usize) -> Self {
        Self { lines, width }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Width in characters.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.lines.len()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            f.write_str(line)?;
        }
        Ok(())
    }
}

/// Tile each pixel through a deterministic palette, one line per image row.
pub fn render_linear(image: &GrayImage, palette: &LinearPalette) -> Frame {
    let width = image.width() as usize;
    let lines: Vec<String> = if width == 0 {
        Vec::new()
    } else {
        image
            .as_raw()
            .par_chunks(width)
            .map(|row| row.iter().map(|&sample| palette.map(sample)).collect::<String>())
            .collect()
    };
    Frame::new(lines, width)
}

/// A message stamped over a three-row band in the middle of the frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    message: Vec<char>,
    center_row: u32,
}

impl Overlay {
    pub fn new(message: &str, center_row: u32) -> Self {
        Self { message: message.chars().collect(), center_row }
    }

    /// Rows covered by the band: the center row and one either side.
    pub fn rows(&self) -> Range<u32> {
        self.center_row.saturating_sub(1)..self.center_row + 2
    }

    /// Columns covered by the band, centered in a grid `width` wide.
    pub fn columns(&self, width: u32) -> Range<u32> {
        let len = self.message.len() as u32;
        let start = (width / 2).saturating_sub(len / 2);
        start..(start + len).min(width)
    }
}

impl Default for Overlay {
    fn default() -> Self {
        Self::new(DEFAULT_MESSAGE, DEFAULT_MESSAGE_ROW)
    }
}

/// Render with a bucketed palette and stamp the overlay on top.
///
/// Within the band columns the second visited band row carries the message
/// and the other band rows are blank. Everything outside the band columns is
/// drawn from the image, band rows included.
pub fn render_overlaid<R: Rng + ?Sized>(
    image: &GrayImage,
    palette: &BucketPalette,
    overlay: &Overlay,
    rng: &mut R,
) -> Frame {
    let (w, h) = image.dimensions();
    let band_rows = overlay.rows();
    let band_cols = overlay.columns(w);

    let mut lines = Vec::with_capacity(h as usize);
    // counts band rows visited so far
    let mut k = 0;
    for y in 0..h {
        let in_band = band_rows.contains(&y);
        let mut line = String::with_capacity(w as usize);
        for x in 0..w {
            if in_band && band_cols.contains(&x) {
                let ch = if k == 1 {
                    overlay.message[(x - band_cols.start) as usize]
                } else {
                    ' '
                };
                line.push(ch);
                continue;
            }
            line.push(palette.pick(image.get_pixel(x, y).0[0], rng));
        }
        if in_band {
            k += 1;
        }
        lines.push(line);
    }
    Frame::new(lines, w as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn probe_palette() -> BucketPalette {
        // every bucket holds one glyph, so renders are deterministic
        BucketPalette::new(vec![vec!['.'], vec!['o'], vec!['#']]).unwrap()
    }

    fn gradient(w: u32, h: u32) -> GrayImage {
        GrayImage::from_fn(w, h, |x, _| Luma([(x * 255 / w.max(1)) as u8]))
    }

    #[test]
    fn linear_black_image_is_all_at_signs() {
        let img = GrayImage::from_pixel(10, 5, Luma([0]));
        let frame = render_linear(&img, &LinearPalette::default());
        assert_eq!(frame.height(), 5);
        assert_eq!(frame.width(), 10);
        assert!(frame.lines().iter().all(|l| l == "@@@@@@@@@@"));
    }

    #[test]
    fn linear_rows_follow_image_rows() {
        let img = GrayImage::from_fn(3, 2, |_, y| Luma([if y == 0 { 0 } else { 255 }]));
        let frame = render_linear(&img, &LinearPalette::default());
        assert_eq!(frame.to_string(), "@@@\n   ");
    }

    #[test]
    fn overlay_bands() {
        let overlay = Overlay::new("hi there", 25);
        assert_eq!(overlay.rows(), 24..27);
        assert_eq!(overlay.columns(100), 46..54);
        let odd = Overlay::new("  Welcome to Work  ", 25);
        assert_eq!(odd.columns(100), 41..60);
        assert_eq!(Overlay::new("toolong", 0).columns(4), 0..4);
        assert_eq!(Overlay::new("x", 0).rows(), 0..2);
    }

    #[test]
    fn message_sits_on_middle_band_row() {
        let img = gradient(100, 50);
        let overlay = Overlay::default();
        let mut rng = StdRng::seed_from_u64(1);
        let frame = render_overlaid(&img, &probe_palette(), &overlay, &mut rng);
        assert_eq!(frame.height(), 50);

        let cols = overlay.columns(100);
        let (s, e) = (cols.start as usize, cols.end as usize);
        let row = |y: usize| frame.lines()[y].chars().collect::<Vec<_>>();

        let text: String = row(25)[s..e].iter().collect();
        assert_eq!(text, DEFAULT_MESSAGE);
        for y in [24, 26] {
            assert!(row(y)[s..e].iter().all(|&c| c == ' '), "row {y} not blank");
        }
    }

    #[test]
    fn pixels_survive_outside_band_columns() {
        let img = gradient(100, 50);
        let overlay = Overlay::default();
        let palette = probe_palette();
        let mut rng = StdRng::seed_from_u64(2);
        let frame = render_overlaid(&img, &palette, &overlay, &mut rng);
        let cols = overlay.columns(100);

        for (y, line) in frame.lines().iter().enumerate() {
            for (x, ch) in line.chars().enumerate() {
                let in_band = overlay.rows().contains(&(y as u32)) && cols.contains(&(x as u32));
                if !in_band {
                    let sample = img.get_pixel(x as u32, y as u32).0[0];
                    assert_eq!(ch, palette.bucket(sample)[0], "cell ({x}, {y})");
                }
            }
        }
    }

    #[test]
    fn band_at_top_edge_uses_second_visited_row() {
        let img = GrayImage::from_pixel(10, 4, Luma([255]));
        let overlay = Overlay::new("ab", 0);
        let mut rng = StdRng::seed_from_u64(3);
        let frame = render_overlaid(&img, &probe_palette(), &overlay, &mut rng);
        assert_eq!(frame.lines()[0], "####  ####");
        assert_eq!(frame.lines()[1], "####ab####");
        assert_eq!(frame.lines()[2], "##########");
    }

    #[test]
    fn frames_flicker_between_renders() {
        let img = GrayImage::from_pixel(100, 50, Luma([200]));
        let palette = BucketPalette::default();
        let overlay = Overlay::default();
        let mut rng = StdRng::seed_from_u64(9);
        let a = render_overlaid(&img, &palette, &overlay, &mut rng);
        let b = render_overlaid(&img, &palette, &overlay, &mut rng);
        assert_ne!(a, b);
        let cols = overlay.columns(100);
        let text = |f: &Frame| -> String {
            f.lines()[25].chars().skip(cols.start as usize).take(cols.len()).collect()
        };
        assert_eq!(text(&a), DEFAULT_MESSAGE);
        assert_eq!(text(&a), text(&b));
    }
}
