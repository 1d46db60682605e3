//! Text rasterization into an alpha mask.
//!
//! A [`GlyphRasterizer`] draws a line of text, white and bold, centered on a
//! canvas-sized [`TextMask`]. The field builder samples the mask alpha to
//! decide where particles go. Only alpha is stored since the text is always
//! drawn in white.
//!
//! Two implementations ship with the crate:
//!
//! - [`FontRasterizer`] shapes and renders real fonts with cosmic-text.
//! - [`BlockRasterizer`] stamps a built-in 3x5 block font. It needs no font
//!   files and its output is identical on every machine.

mod block;
mod font;

use std::path::Path;

use image::{GrayImage, Luma};

use crate::error::RasterError;

pub use block::BlockRasterizer;
pub use font::FontRasterizer;

/// Where and how big to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextLayout {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Em size in pixels.
    pub font_size: f32,
}

impl TextLayout {
    pub fn center_x(&self) -> f32 {
        self.width as f32 / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.height as f32 / 2.0
    }
}

/// Turns text into coverage.
pub trait GlyphRasterizer {
    /// Draw `text` centered on a fresh mask of the layout's size.
    fn rasterize(&mut self, text: &str, layout: &TextLayout) -> TextMask;
}

impl<G: GlyphRasterizer + ?Sized> GlyphRasterizer for Box<G> {
    fn rasterize(&mut self, text: &str, layout: &TextLayout) -> TextMask {
        (**self).rasterize(text, layout)
    }
}

/// Canvas-sized coverage, one byte of alpha per pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct TextMask {
    image: GrayImage,
}

impl TextMask {
    /// A fully transparent mask.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: GrayImage::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Alpha at a pixel; zero outside the mask.
    pub fn alpha(&self, x: u32, y: u32) -> u8 {
        if x < self.width() && y < self.height() {
            self.image.get_pixel(x, y).0[0]
        } else {
            0
        }
    }

    /// Raise the coverage at a pixel, ignoring coordinates off the canvas.
    ///
    /// Overlapping glyph edges keep the strongest coverage instead of
    /// overwriting each other.
    pub fn cover(&mut self, x: i32, y: i32, alpha: u8) {
        if x < 0 || y < 0 || x as u32 >= self.width() || y as u32 >= self.height() {
            return;
        }
        let px = self.image.get_pixel_mut(x as u32, y as u32);
        if alpha > px.0[0] {
            *px = Luma([alpha]);
        }
    }

    /// Fill a rectangle with full coverage, clipped to the canvas.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32) {
        let (width, height) = (i64::from(self.width()), i64::from(self.height()));
        let x0 = i64::from(x).clamp(0, width);
        let x1 = (i64::from(x) + i64::from(w)).clamp(0, width);
        let y0 = i64::from(y).clamp(0, height);
        let y1 = (i64::from(y) + i64::from(h)).clamp(0, height);
        for py in y0..y1 {
            for px in x0..x1 {
                self.image.put_pixel(px as u32, py as u32, Luma([255]));
            }
        }
    }

    /// Number of pixels with alpha above `threshold`.
    pub fn count_above(&self, threshold: u8) -> usize {
        self.image.pixels().filter(|p| p.0[0] > threshold).count()
    }

    /// Write the mask as a grayscale PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), RasterError> {
        self.image.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cover_keeps_max_and_clips() {
        let mut mask = TextMask::new(4, 4);
        mask.cover(1, 1, 100);
        mask.cover(1, 1, 50);
        mask.cover(-1, 2, 255);
        mask.cover(4, 0, 255);
        assert_eq!(mask.alpha(1, 1), 100);
        assert_eq!(mask.alpha(10, 10), 0);
        assert_eq!(mask.count_above(0), 1);
    }

    #[test]
    fn test_fill_rect_clipped() {
        let mut mask = TextMask::new(4, 4);
        mask.fill_rect(2, 2, 5, 5);
        assert_eq!(mask.count_above(128), 4);

        let mut mask = TextMask::new(4, 4);
        mask.fill_rect(i32::MIN, i32::MIN, u32::MAX, u32::MAX);
        assert_eq!(mask.count_above(128), 16);
        mask.fill_rect(i32::MAX, 0, u32::MAX, 1);
    }

    #[test]
    fn test_save_png() {
        let path = std::env::temp_dir().join(format!("textdust-mask-{}.png", std::process::id()));
        let mut mask = TextMask::new(8, 8);
        mask.fill_rect(0, 0, 4, 4);
        mask.save_png(&path).unwrap();
        assert!(path.exists());
        std::fs::remove_file(&path).ok();
    }
}
