use std::path::Path;

use cosmic_text::{Attrs, Buffer, Color, Family, FontSystem, Metrics, Shaping, SwashCache, Weight};

use super::{BlockRasterizer, GlyphRasterizer, TextLayout, TextMask};
use crate::error::RasterError;

/// Renders text with real fonts via cosmic-text.
///
/// Uses the system bold sans-serif unless a font file is given. When the
/// system has no fonts at all it falls back to [`BlockRasterizer`] so the
/// effect still shows something.
pub struct FontRasterizer {
    font_system: FontSystem,
    swash_cache: SwashCache,
    family: Option<String>,
}

impl FontRasterizer {
    /// Load system fonts, plus `font` if given.
    ///
    /// Text is then drawn in the first family of that file.
    pub fn new(font: Option<&Path>) -> Result<Self, RasterError> {
        let mut font_system = FontSystem::new();

        let family = match font {
            Some(path) => {
                let before = font_system.db().len();
                font_system.db_mut().load_font_file(path)?;
                let family = font_system
                    .db()
                    .faces()
                    .skip(before)
                    .find_map(|face| face.families.first().map(|(name, _)| name.clone()))
                    .ok_or_else(|| RasterError::NoFace(path.to_path_buf()))?;
                tracing::info!("Using font family {:?} from {}", family, path.display());
                Some(family)
            }
            None => None,
        };

        if font_system.db().is_empty() {
            tracing::warn!("No fonts found, falling back to the built-in block font");
        }

        Ok(Self {
            font_system,
            swash_cache: SwashCache::new(),
            family,
        })
    }

    /// Whether any font face is available.
    pub fn has_fonts(&self) -> bool {
        !self.font_system.db().is_empty()
    }
}

impl GlyphRasterizer for FontRasterizer {
    fn rasterize(&mut self, text: &str, layout: &TextLayout) -> TextMask {
        if !self.has_fonts() {
            return BlockRasterizer.rasterize(text, layout);
        }

        let mut mask = TextMask::new(layout.width, layout.height);
        if text.is_empty() || layout.font_size <= 0.0 {
            return mask;
        }

        // One em per line so the line box is the em box, like a canvas
        // `textBaseline = "middle"`.
        let metrics = Metrics::new(layout.font_size, layout.font_size);
        let mut buffer = Buffer::new(&mut self.font_system, metrics);
        buffer.set_size(&mut self.font_system, None, None);

        let family = match &self.family {
            Some(name) => Family::Name(name),
            None => Family::SansSerif,
        };
        let attrs = Attrs::new().family(family).weight(Weight::BOLD);
        buffer.set_text(&mut self.font_system, text, attrs, Shaping::Advanced);
        buffer.shape_until_scroll(&mut self.font_system, false);

        let line_width = buffer
            .layout_runs()
            .next()
            .map(|run| run.line_w)
            .unwrap_or(0.0);
        let offset_x = (layout.center_x() - line_width / 2.0).round() as i32;
        let offset_y = (layout.center_y() - metrics.line_height / 2.0).round() as i32;

        buffer.draw(
            &mut self.font_system,
            &mut self.swash_cache,
            Color::rgb(0xFF, 0xFF, 0xFF),
            |x, y, w, h, color| {
                let alpha = color.a();
                if alpha == 0 {
                    return;
                }
                for dy in 0..h as i32 {
                    for dx in 0..w as i32 {
                        mask.cover(offset_x + x + dx, offset_y + y + dy, alpha);
                    }
                }
            },
        );

        mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> TextLayout {
        TextLayout {
            width: 800,
            height: 600,
            font_size: 140.0,
        }
    }

    #[test]
    fn test_missing_font_file() {
        let err = FontRasterizer::new(Some(Path::new("/no/such/font.ttf"))).err();
        assert!(matches!(err, Some(RasterError::Io(_))));
    }

    #[test]
    fn test_renders_something_and_is_stable() {
        let mut raster = FontRasterizer::new(None).unwrap();
        let first = raster.rasterize("HI", &layout());
        let second = raster.rasterize("HI", &layout());

        assert!(first.count_above(128) > 0);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_text() {
        let mut raster = FontRasterizer::new(None).unwrap();
        let mask = raster.rasterize("", &layout());
        assert_eq!(mask.count_above(0), 0);
    }
}
