//! # textdust
//!
//! Interactive text made of particles. Every opaque pixel of the rendered
//! text becomes a dot; dots scatter away from the pointer, light up while
//! disturbed and drift back home once it leaves. Faint links appear between
//! neighboring dots around the pointer, and a translucent overlay each frame
//! leaves soft trails behind moving dots.
//!
//! ## Quick Start
//!
//! ```ignore
//! use textdust::prelude::*;
//!
//! fn main() -> Result<(), SimulationError> {
//!     Simulation::new()
//!         .with_text("hello")
//!         .with_color(Color::from_hex("#a78bfa")?)
//!         .run()
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Fields
//!
//! A [`FieldBuilder`] rasterizes text into a [`TextMask`] and samples it on a
//! fixed grid. The result is a [`ParticleField`]: an ordered list of
//! [`Particle`]s, each anchored at its rest position. Fields are rebuilt from
//! scratch whenever the text, the color or the window size changes.
//!
//! ### The loop
//!
//! [`SimulationState`] owns the field, the pointer and the current text and
//! color. Each tick paints the fade overlay, updates and draws every particle
//! in order, then lets the [`ProximityConnector`] draw links if the pointer
//! is active. Painting goes through the [`Painter`] trait, so the whole loop
//! runs and tests without a GPU:
//!
//! ```ignore
//! let mut state = SimulationState::new(config, Box::new(BlockRasterizer), 800, 600);
//! let mut frame = DrawList::new();
//! state.pointer_moved(Vec2::new(400.0, 300.0));
//! state.tick(&mut frame);
//! assert!(!frame.circles.is_empty());
//! ```
//!
//! [`Simulation`] wraps the state in a winit window with a wgpu renderer and,
//! with the `egui` feature, a small control panel.
//!
//! ## Configuration
//!
//! Every constant of the effect lives in [`EffectConfig`], which loads from
//! JSON with all fields optional. See the [`config`] module.

pub mod canvas;
pub mod color;
pub mod config;
pub mod connector;
pub mod error;
pub mod field;
mod gpu;
pub mod input;
#[cfg(feature = "egui")]
mod panel;
pub mod particle;
pub mod raster;
mod simulation;
pub mod state;
pub mod time;

pub use canvas::{DrawList, Painter};
pub use color::Color;
pub use config::{ConnectorConfig, EffectConfig, ParticleConfig, SamplingConfig, TrailConfig};
pub use connector::{Link, ProximityConnector};
pub use error::{ColorParseError, ConfigError, GpuError, RasterError, SimulationError};
pub use field::{FieldBuilder, ParticleField};
pub use glam::Vec2;
pub use particle::{Particle, PointerState, Response};
pub use raster::{BlockRasterizer, FontRasterizer, GlyphRasterizer, TextLayout, TextMask};
pub use simulation::Simulation;
pub use state::SimulationState;
pub use time::{AnimationControl, FrameClock};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use textdust::prelude::*;
/// ```
pub mod prelude {
    pub use crate::canvas::{DrawList, Painter};
    pub use crate::color::Color;
    pub use crate::config::EffectConfig;
    pub use crate::error::SimulationError;
    pub use crate::field::{FieldBuilder, ParticleField};
    pub use crate::particle::{Particle, PointerState};
    pub use crate::raster::{BlockRasterizer, FontRasterizer, GlyphRasterizer};
    pub use crate::simulation::Simulation;
    pub use crate::state::SimulationState;
    pub use crate::time::AnimationControl;
    pub use crate::Vec2;
}
