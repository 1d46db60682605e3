//! Effect configuration.
//!
//! Every tunable of the effect lives here. The defaults reproduce the classic
//! look: violet text, a 120 unit pointer radius and faint violet links. A
//! config can be stored as JSON and every field is optional when loading.
//!
//! ```ignore
//! let config = EffectConfig::load("dust.json")?;
//! Simulation::new().with_config(config).run()?;
//! ```

use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::ConfigError;

/// Complete effect configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EffectConfig {
    /// Text shown at startup.
    pub text: String,
    /// Particle color at startup.
    pub color: Color,
    /// Pointer influence and particle response.
    pub particles: ParticleConfig,
    /// Text rasterization and sampling.
    pub sampling: SamplingConfig,
    /// Pointer-proximate link drawing.
    pub connector: ConnectorConfig,
    /// Background and trail fade.
    pub trail: TrailConfig,
    /// Accept touch events as pointer input.
    pub touch_input: bool,
    /// Font file to use instead of the system sans-serif.
    pub font: Option<PathBuf>,
    /// Seed for particle attributes. Random when absent.
    pub seed: Option<u64>,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            text: "HELLO".into(),
            color: Color::rgb(0xa7, 0x8b, 0xfa),
            particles: ParticleConfig::default(),
            sampling: SamplingConfig::default(),
            connector: ConnectorConfig::default(),
            trail: TrailConfig::default(),
            touch_input: true,
            font: None,
            seed: None,
        }
    }
}

impl EffectConfig {
    /// Load a config from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Save this config as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// How particles are created and how they respond to the pointer.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParticleConfig {
    /// Distance within which the pointer pushes particles away.
    pub influence_radius: f32,
    /// Fraction of the offset from rest removed each frame.
    pub return_rate: f32,
    /// Color of perturbed particles.
    pub highlight: Color,
    pub radius: Range<f32>,
    pub displacement_gain: Range<f32>,
    pub resting_opacity: Range<f32>,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            influence_radius: 120.0,
            return_rate: 0.08,
            highlight: Color::WHITE,
            radius: 1.5..3.5,
            displacement_gain: 5.0..25.0,
            resting_opacity: 0.7..1.0,
        }
    }
}

/// Glyph rendering and the sampling grid walked over it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SamplingConfig {
    /// Upper bound on the font size.
    pub font_size_cap: f32,
    /// Scale the font with the canvas width (`width / font_width_divisor`).
    pub responsive_font: bool,
    pub font_width_divisor: f32,
    /// Pixels with alpha above this become particles.
    pub alpha_threshold: u8,
    /// Grid stride on wide canvases.
    pub stride: u32,
    /// Grid stride on narrow canvases when `adaptive_stride` is on.
    pub narrow_stride: u32,
    /// Canvases narrower than this count as narrow.
    pub narrow_breakpoint: u32,
    pub adaptive_stride: bool,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            font_size_cap: 140.0,
            responsive_font: true,
            font_width_divisor: 5.0,
            alpha_threshold: 128,
            stride: 4,
            narrow_stride: 8,
            narrow_breakpoint: 600,
            adaptive_stride: true,
        }
    }
}

impl SamplingConfig {
    /// Font size used for a canvas of the given width.
    pub fn font_size(&self, canvas_width: u32) -> f32 {
        if self.responsive_font {
            (canvas_width as f32 / self.font_width_divisor).min(self.font_size_cap)
        } else {
            self.font_size_cap
        }
    }

    /// Sampling stride for a canvas of the given width. Never zero.
    pub fn stride_for(&self, canvas_width: u32) -> u32 {
        let stride = if self.adaptive_stride && canvas_width < self.narrow_breakpoint {
            self.narrow_stride
        } else {
            self.stride
        };
        stride.max(1)
    }
}

/// Links drawn between particles near the pointer.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConnectorConfig {
    /// Extra reach beyond the influence radius for candidate particles.
    pub margin: f32,
    /// How many following candidates each candidate is compared against.
    pub window: usize,
    /// Pairs at or beyond this distance are not linked.
    pub max_distance: f32,
    /// Link opacity at zero distance.
    pub max_opacity: f32,
    pub color: Color,
    pub line_width: f32,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            margin: 50.0,
            window: 4,
            max_distance: 30.0,
            max_opacity: 0.2,
            color: Color::rgb(167, 139, 250),
            line_width: 0.5,
        }
    }
}

/// The translucent overlay painted every frame.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrailConfig {
    pub background: Color,
    /// Overlay alpha; lower values leave longer trails.
    pub fade_alpha: f32,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            background: Color::rgb(10, 10, 15),
            fade_alpha: 0.05,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_size_caps_at_140() {
        let sampling = SamplingConfig::default();
        assert_eq!(sampling.font_size(1920), 140.0);
        assert_eq!(sampling.font_size(500), 100.0);

        let fixed = SamplingConfig { responsive_font: false, ..Default::default() };
        assert_eq!(fixed.font_size(500), 140.0);
    }

    #[test]
    fn test_adaptive_stride() {
        let sampling = SamplingConfig::default();
        assert_eq!(sampling.stride_for(599), 8);
        assert_eq!(sampling.stride_for(600), 4);

        let fixed = SamplingConfig { adaptive_stride: false, ..Default::default() };
        assert_eq!(fixed.stride_for(320), 4);

        let zero = SamplingConfig { stride: 0, ..Default::default() };
        assert_eq!(zero.stride_for(1024), 1);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EffectConfig =
            serde_json::from_str(r##"{ "text": "RUST", "particles": { "influence_radius": 80.0 } }"##).unwrap();
        assert_eq!(config.text, "RUST");
        assert_eq!(config.particles.influence_radius, 80.0);
        assert_eq!(config.particles.return_rate, 0.08);
        assert_eq!(config.color, Color::rgb(0xa7, 0x8b, 0xfa));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("textdust-config-{}.json", std::process::id()));
        let mut config = EffectConfig::default();
        config.seed = Some(7);
        config.connector.window = 6;
        config.save(&path).unwrap();

        let loaded = EffectConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let err = EffectConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
