use super::{GlyphRasterizer, TextLayout, TextMask};

// 3x5 glyphs, one row per byte, high bit on the left.
const DIGITS: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111],
    [0b010, 0b110, 0b010, 0b010, 0b111],
    [0b111, 0b001, 0b111, 0b100, 0b111],
    [0b111, 0b001, 0b011, 0b001, 0b111],
    [0b101, 0b101, 0b111, 0b001, 0b001],
    [0b111, 0b100, 0b111, 0b001, 0b111],
    [0b111, 0b100, 0b111, 0b101, 0b111],
    [0b111, 0b001, 0b010, 0b010, 0b010],
    [0b111, 0b101, 0b111, 0b101, 0b111],
    [0b111, 0b101, 0b111, 0b001, 0b111],
];

const LETTERS: [[u8; 5]; 26] = [
    [0b010, 0b101, 0b111, 0b101, 0b101], // A
    [0b110, 0b101, 0b110, 0b101, 0b110], // B
    [0b011, 0b100, 0b100, 0b100, 0b011], // C
    [0b110, 0b101, 0b101, 0b101, 0b110], // D
    [0b111, 0b100, 0b110, 0b100, 0b111], // E
    [0b111, 0b100, 0b110, 0b100, 0b100], // F
    [0b011, 0b100, 0b101, 0b101, 0b011], // G
    [0b101, 0b101, 0b111, 0b101, 0b101], // H
    [0b111, 0b010, 0b010, 0b010, 0b111], // I
    [0b001, 0b001, 0b001, 0b101, 0b010], // J
    [0b101, 0b110, 0b100, 0b110, 0b101], // K
    [0b100, 0b100, 0b100, 0b100, 0b111], // L
    [0b101, 0b111, 0b111, 0b101, 0b101], // M
    [0b110, 0b101, 0b101, 0b101, 0b101], // N
    [0b010, 0b101, 0b101, 0b101, 0b010], // O
    [0b110, 0b101, 0b110, 0b100, 0b100], // P
    [0b010, 0b101, 0b101, 0b110, 0b011], // Q
    [0b110, 0b101, 0b110, 0b101, 0b101], // R
    [0b011, 0b100, 0b010, 0b001, 0b110], // S
    [0b111, 0b010, 0b010, 0b010, 0b010], // T
    [0b101, 0b101, 0b101, 0b101, 0b111], // U
    [0b101, 0b101, 0b101, 0b101, 0b010], // V
    [0b101, 0b101, 0b111, 0b111, 0b101], // W
    [0b101, 0b101, 0b010, 0b101, 0b101], // X
    [0b101, 0b101, 0b010, 0b010, 0b010], // Y
    [0b111, 0b001, 0b010, 0b100, 0b111], // Z
];

const BOX: [u8; 5] = [0b111, 0b101, 0b101, 0b101, 0b111];

fn glyph(c: char) -> Option<[u8; 5]> {
    match c {
        '0'..='9' => Some(DIGITS[c as usize - '0' as usize]),
        'A'..='Z' => Some(LETTERS[c as usize - 'A' as usize]),
        'a'..='z' => Some(LETTERS[c as usize - 'a' as usize]),
        '!' => Some([0b010, 0b010, 0b010, 0b000, 0b010]),
        '?' => Some([0b111, 0b001, 0b011, 0b000, 0b010]),
        '.' => Some([0b000, 0b000, 0b000, 0b000, 0b010]),
        ',' => Some([0b000, 0b000, 0b000, 0b010, 0b100]),
        ':' => Some([0b000, 0b010, 0b000, 0b010, 0b000]),
        '-' => Some([0b000, 0b000, 0b111, 0b000, 0b000]),
        '+' => Some([0b000, 0b010, 0b111, 0b010, 0b000]),
        '\'' => Some([0b010, 0b010, 0b000, 0b000, 0b000]),
        ' ' => None,
        _ => Some(BOX),
    }
}

/// Built-in block font rasterizer.
///
/// Glyphs are 3x5 cells, five cells tall spanning 72% of the em size, with a
/// one cell gap between characters. Characters without a glyph render as a
/// hollow box; spaces render nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockRasterizer;

impl BlockRasterizer {
    pub fn new() -> Self {
        Self
    }

    fn cell_size(font_size: f32) -> f32 {
        font_size * 0.72 / 5.0
    }
}

impl GlyphRasterizer for BlockRasterizer {
    fn rasterize(&mut self, text: &str, layout: &TextLayout) -> TextMask {
        let mut mask = TextMask::new(layout.width, layout.height);
        let chars: Vec<char> = text.chars().collect();
        if chars.is_empty() {
            return mask;
        }

        let cell = Self::cell_size(layout.font_size);
        let text_width = (chars.len() * 4 - 1) as f32 * cell;
        let origin_x = layout.center_x() - text_width / 2.0;
        let origin_y = layout.center_y() - 2.5 * cell;

        for (i, c) in chars.iter().enumerate() {
            let Some(rows) = glyph(*c) else { continue };
            let glyph_x = origin_x + (i * 4) as f32 * cell;
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..3 {
                    if bits & (0b100 >> col) == 0 {
                        continue;
                    }
                    let x0 = (glyph_x + col as f32 * cell).round() as i32;
                    let x1 = (glyph_x + (col + 1) as f32 * cell).round() as i32;
                    let y0 = (origin_y + row as f32 * cell).round() as i32;
                    let y1 = (origin_y + (row + 1) as f32 * cell).round() as i32;
                    // Huge font sizes saturate the casts.
                    let w = x1.saturating_sub(x0).max(0) as u32;
                    let h = y1.saturating_sub(y0).max(0) as u32;
                    mask.fill_rect(x0, y0, w, h);
                }
            }
        }

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
    fn test_empty_text_is_transparent() {
        let mask = BlockRasterizer.rasterize("", &layout());
        assert_eq!(mask.count_above(0), 0);
        assert_eq!((mask.width(), mask.height()), (800, 600));
    }

    #[test]
    fn test_spaces_are_transparent() {
        let mask = BlockRasterizer.rasterize("   ", &layout());
        assert_eq!(mask.count_above(0), 0);
    }

    #[test]
    fn test_text_is_centered() {
        let mask = BlockRasterizer.rasterize("I", &layout());
        // I has a full top row and a center stem
        assert_eq!(mask.alpha(400, 300), 255);
        assert_eq!(mask.alpha(10, 10), 0);

        let (mut min_x, mut max_x) = (u32::MAX, 0);
        for y in 0..600 {
            for x in 0..800 {
                if mask.alpha(x, y) > 0 {
                    min_x = min_x.min(x);
                    max_x = max_x.max(x);
                }
            }
        }
        let mid = (min_x + max_x) as f32 / 2.0;
        assert!((mid - 400.0).abs() <= 1.0);
    }

    #[test]
    fn test_lowercase_matches_uppercase() {
        let upper = BlockRasterizer.rasterize("HI", &layout());
        let lower = BlockRasterizer.rasterize("hi", &layout());
        assert_eq!(upper, lower);
    }

    #[test]
    fn test_huge_font_size_is_clipped() {
        let layout = TextLayout {
            width: 64,
            height: 48,
            font_size: 1.0e12,
        };
        let mask = BlockRasterizer.rasterize("HI", &layout);
        assert_eq!((mask.width(), mask.height()), (64, 48));
        assert!(mask.count_above(128) <= 64 * 48);
    }

    #[test]
    fn test_wide_text_is_clipped() {
        let text = "W".repeat(200);
        let mask = BlockRasterizer.rasterize(&text, &layout());
        assert_eq!(mask.width(), 800);
        assert!(mask.count_above(128) > 0);
    }
}
