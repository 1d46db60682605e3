//! Text to particle conversion.
//!
//! The builder renders the text into a canvas-sized [`TextMask`], walks the
//! mask on a fixed grid and drops a particle on every sampled pixel that is
//! mostly opaque. Fields are never edited afterwards; a change of text, color
//! or canvas size builds a new one.
//!
//! ```ignore
//! let mut builder = FieldBuilder::new(BlockRasterizer, config).with_seed(7);
//! let field = builder.build("HI", Color::from_hex("#a78bfa")?, 800, 600);
//! println!("{} particles", field.len());
//! ```

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::color::Color;
use crate::config::EffectConfig;
use crate::particle::Particle;
use crate::raster::{GlyphRasterizer, TextLayout, TextMask};

/// The particles that currently spell the text, in row-major sampling order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleField {
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn new(particles: Vec<Particle>) -> Self {
        Self { particles }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }
}

impl<'a> IntoIterator for &'a ParticleField {
    type Item = &'a Particle;
    type IntoIter = std::slice::Iter<'a, Particle>;

    fn into_iter(self) -> Self::IntoIter {
        self.particles.iter()
    }
}

/// Builds [`ParticleField`]s from text.
pub struct FieldBuilder<G: GlyphRasterizer> {
    rasterizer: G,
    config: EffectConfig,
    rng: StdRng,
}

impl<G: GlyphRasterizer> FieldBuilder<G> {
    /// Create a builder. Attributes are random unless the config carries a seed.
    pub fn new(rasterizer: G, config: EffectConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rasterizer, config, rng }
    }

    /// Reseed the attribute generator.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn config(&self) -> &EffectConfig {
        &self.config
    }

    /// Layout used for a canvas of the given size.
    pub fn layout(&self, canvas_width: u32, canvas_height: u32) -> TextLayout {
        TextLayout {
            width: canvas_width,
            height: canvas_height,
            font_size: self.config.sampling.font_size(canvas_width),
        }
    }

    /// Render `text` for a canvas without sampling it.
    pub fn rasterize(&mut self, text: &str, canvas_width: u32, canvas_height: u32) -> TextMask {
        let layout = self.layout(canvas_width, canvas_height);
        self.rasterizer.rasterize(text, &layout)
    }

    /// Build a fresh field spelling `text` in `color`.
    ///
    /// The text is drawn as given; callers uppercase it. Empty text or a
    /// zero-sized canvas gives an empty field.
    pub fn build(&mut self, text: &str, color: Color, canvas_width: u32, canvas_height: u32) -> ParticleField {
        if text.is_empty() || canvas_width == 0 || canvas_height == 0 {
            return ParticleField::default();
        }

        let mask = self.rasterize(text, canvas_width, canvas_height);
        let field = self.sample(&mask, color);
        tracing::debug!(
            "Built {} particles for {:?} on {}x{}",
            field.len(),
            text,
            canvas_width,
            canvas_height
        );
        field
    }

    /// Drop a particle on every grid point of `mask` whose alpha clears the threshold.
    pub fn sample(&mut self, mask: &TextMask, color: Color) -> ParticleField {
        let sampling = &self.config.sampling;
        let stride = sampling.stride_for(mask.width()) as usize;

        let mut particles = Vec::new();
        for y in (0..mask.height()).step_by(stride) {
            for x in (0..mask.width()).step_by(stride) {
                if mask.alpha(x, y) > sampling.alpha_threshold {
                    particles.push(Particle::new(
                        Vec2::new(x as f32, y as f32),
                        color,
                        &self.config.particles,
                        &mut self.rng,
                    ));
                }
            }
        }

        ParticleField::new(particles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::BlockRasterizer;

    const VIOLET: Color = Color::rgb(0xa7, 0x8b, 0xfa);

    fn builder() -> FieldBuilder<BlockRasterizer> {
        FieldBuilder::new(BlockRasterizer, EffectConfig::default()).with_seed(1)
    }

    #[test]
    fn test_empty_text_gives_empty_field() {
        let field = builder().build("", VIOLET, 800, 600);
        assert!(field.is_empty());
    }

    #[test]
    fn test_zero_canvas_gives_empty_field() {
        assert!(builder().build("HI", VIOLET, 0, 600).is_empty());
        assert!(builder().build("HI", VIOLET, 800, 0).is_empty());
    }

    #[test]
    fn test_transparent_mask_gives_nothing() {
        let mask = TextMask::new(64, 64);
        assert!(builder().sample(&mask, VIOLET).is_empty());
    }

    #[test]
    fn test_samples_on_stride_grid() {
        let mut mask = TextMask::new(640, 64);
        mask.fill_rect(0, 0, 640, 64);
        let field = builder().sample(&mask, VIOLET);

        // 640 wide -> stride 4 -> 160 x 16 points
        assert_eq!(field.len(), 160 * 16);
        for p in &field {
            let rest = p.rest_position();
            assert_eq!(rest.x as u32 % 4, 0);
            assert_eq!(rest.y as u32 % 4, 0);
            assert_eq!(p.base_color(), VIOLET);
        }
    }

    #[test]
    fn test_narrow_canvas_uses_coarse_stride() {
        let mut mask = TextMask::new(320, 64);
        mask.fill_rect(0, 0, 320, 64);
        let field = builder().sample(&mask, VIOLET);
        assert_eq!(field.len(), 40 * 8);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let mut mask = TextMask::new(640, 4);
        mask.cover(0, 0, 128);
        mask.cover(4, 0, 129);
        let field = builder().sample(&mask, VIOLET);
        assert_eq!(field.len(), 1);
        assert_eq!(field.particles()[0].rest_position(), Vec2::new(4.0, 0.0));
    }

    #[test]
    fn test_row_major_order() {
        let mut mask = TextMask::new(640, 16);
        mask.cover(8, 8, 255);
        mask.cover(4, 0, 255);
        mask.cover(0, 8, 255);
        let field = builder().sample(&mask, VIOLET);
        let rests: Vec<Vec2> = field.iter().map(|p| p.rest_position()).collect();
        assert_eq!(
            rests,
            vec![Vec2::new(4.0, 0.0), Vec2::new(0.0, 8.0), Vec2::new(8.0, 8.0)]
        );
    }

    #[test]
    fn test_same_seed_same_field() {
        let a = builder().build("HI", VIOLET, 800, 600);
        let b = builder().build("HI", VIOLET, 800, 600);
        assert!(!a.is_empty());
        assert_eq!(a, b);
    }
}
