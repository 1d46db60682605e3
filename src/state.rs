//! Everything the animation loop mutates, in one place.

use glam::Vec2;

use crate::canvas::Painter;
use crate::color::Color;
use crate::config::{EffectConfig, TrailConfig};
use crate::connector::ProximityConnector;
use crate::error::ColorParseError;
use crate::field::{FieldBuilder, ParticleField};
use crate::particle::{PointerState, Response};
use crate::raster::GlyphRasterizer;

/// Called with the particle count after every rebuild.
pub type RebuildCallback = Box<dyn FnMut(usize)>;

/// Pointer, text, color, viewport and the particle field they produce.
///
/// Changing the text, the color or the viewport rebuilds the field at once,
/// so a tick always sees a complete field. The surface is cleared on the
/// first tick after a rebuild.
pub struct SimulationState {
    builder: FieldBuilder<Box<dyn GlyphRasterizer>>,
    field: ParticleField,
    pointer: PointerState,
    response: Response,
    connector: ProximityConnector,
    trail: TrailConfig,
    text: String,
    color: Color,
    viewport: (u32, u32),
    needs_clear: bool,
    on_rebuild: Option<RebuildCallback>,
}

impl SimulationState {
    /// Create the state and build the initial field from `config.text`.
    pub fn new(
        config: EffectConfig,
        rasterizer: Box<dyn GlyphRasterizer>,
        width: u32,
        height: u32,
    ) -> Self {
        let pointer = PointerState::new(config.particles.influence_radius);
        let response = Response::from(&config.particles);
        let connector = ProximityConnector::new(config.connector.clone());
        let trail = config.trail.clone();
        let text = config.text.to_uppercase();
        let color = config.color;

        let mut state = Self {
            builder: FieldBuilder::new(rasterizer, config),
            field: ParticleField::default(),
            pointer,
            response,
            connector,
            trail,
            text,
            color,
            viewport: (width, height),
            needs_clear: true,
            on_rebuild: None,
        };
        state.rebuild();
        state
    }

    /// Report rebuilds to `callback`, starting with the current field.
    pub fn set_on_rebuild(&mut self, mut callback: RebuildCallback) {
        callback(self.field.len());
        self.on_rebuild = Some(callback);
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn connector(&self) -> &ProximityConnector {
        &self.connector
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    pub fn particle_count(&self) -> usize {
        self.field.len()
    }

    /// Show new text. Returns `false` when the text is empty and ignored.
    pub fn submit_text(&mut self, text: &str) -> bool {
        let text = text.to_uppercase();
        if text.is_empty() {
            tracing::debug!("Ignoring empty text");
            return false;
        }
        self.text = text;
        self.rebuild();
        true
    }

    /// Recolor the text. Existing particles are replaced, not repainted.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        self.rebuild();
    }

    /// Parse and apply a hex color. On error the current color stays.
    pub fn set_color_hex(&mut self, hex: &str) -> Result<(), ColorParseError> {
        match Color::from_hex(hex) {
            Ok(color) => {
                self.set_color(color);
                Ok(())
            }
            Err(e) => {
                tracing::debug!("Ignoring color: {}", e);
                Err(e)
            }
        }
    }

    /// Match a new viewport size in logical pixels.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
        self.rebuild();
    }

    pub fn pointer_moved(&mut self, position: Vec2) {
        self.pointer.move_to(position);
    }

    pub fn pointer_released(&mut self) {
        self.pointer.release();
    }

    /// Clear the surface before the next paint, e.g. after the render target
    /// was recreated.
    pub fn invalidate(&mut self) {
        self.needs_clear = true;
    }

    /// Whether the surface has to be cleared and repainted.
    pub fn needs_repaint(&self) -> bool {
        self.needs_clear
    }

    /// Throw away the field and sample a new one.
    pub fn rebuild(&mut self) {
        let (width, height) = self.viewport;
        self.field = self.builder.build(&self.text, self.color, width, height);
        self.needs_clear = true;

        let count = self.field.len();
        tracing::info!("{:?} in {}: {} particles", self.text, self.color, count);
        if let Some(callback) = &mut self.on_rebuild {
            callback(count);
        }
    }

    /// Paint the field where it stands, without advancing it or fading.
    ///
    /// Used while paused so a rebuilt field or a recreated surface still
    /// shows the particles.
    pub fn paint_still<P: Painter + ?Sized>(&mut self, painter: &mut P) {
        painter.clear(self.trail.background);
        self.needs_clear = false;
        for particle in self.field.iter() {
            particle.draw(painter);
        }
    }

    /// Advance every particle one frame and paint the result.
    pub fn tick<P: Painter + ?Sized>(&mut self, painter: &mut P) {
        if self.needs_clear {
            painter.clear(self.trail.background);
            self.needs_clear = false;
        }
        painter.fade(self.trail.background, self.trail.fade_alpha);

        for particle in self.field.particles_mut() {
            particle.update(&self.pointer, &self.response);
            particle.draw(painter);
        }

        if self.pointer.is_active() {
            self.connector.connect(&self.field, &self.pointer, painter);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::canvas::DrawList;
    use crate::raster::BlockRasterizer;

    fn state() -> SimulationState {
        let config = EffectConfig {
            seed: Some(3),
            ..Default::default()
        };
        SimulationState::new(config, Box::new(BlockRasterizer), 800, 600)
    }

    #[test]
    fn test_initial_field() {
        let state = state();
        assert_eq!(state.text(), "HELLO");
        assert!(state.particle_count() > 0);
    }

    #[test]
    fn test_submit_uppercases_and_ignores_empty() {
        let mut state = state();
        assert!(state.submit_text("hi"));
        assert_eq!(state.text(), "HI");
        let count = state.particle_count();

        assert!(!state.submit_text(""));
        assert_eq!(state.text(), "HI");
        assert_eq!(state.particle_count(), count);
    }

    #[test]
    fn test_bad_color_keeps_previous() {
        let mut state = state();
        let before = state.color();
        assert!(state.set_color_hex("#zzzzzz").is_err());
        assert_eq!(state.color(), before);

        state.set_color_hex("#112233").unwrap();
        assert_eq!(state.color(), Color::rgb(0x11, 0x22, 0x33));
        assert!(state.field().iter().all(|p| p.base_color() == Color::rgb(0x11, 0x22, 0x33)));
    }

    #[test]
    fn test_first_tick_after_rebuild_clears() {
        let mut state = state();
        let mut list = DrawList::new();

        state.tick(&mut list);
        assert!(list.clear.is_some());
        assert!(list.fade.is_some());
        assert_eq!(list.circles.len(), state.particle_count());

        list.reset();
        state.tick(&mut list);
        assert!(list.clear.is_none());

        list.reset();
        state.resize(640, 480);
        state.tick(&mut list);
        assert!(list.clear.is_some());
    }

    #[test]
    fn test_paint_still_after_invalidate() {
        let mut state = state();
        let mut list = DrawList::new();
        state.tick(&mut list);
        assert!(!state.needs_repaint());

        let first = state.field().particles()[0].position();
        state.pointer_moved(first);
        list.reset();
        state.tick(&mut list);
        let frozen: Vec<_> = state.field().iter().map(|p| p.position()).collect();

        state.invalidate();
        assert!(state.needs_repaint());
        list.reset();
        state.paint_still(&mut list);

        assert!(!state.needs_repaint());
        assert_eq!(list.clear, Some(Color::rgb(10, 10, 15).to_rgba(1.0)));
        assert!(list.fade.is_none());
        assert!(list.lines.is_empty());
        let painted: Vec<_> = list.circles.iter().map(|c| Vec2::from(c.center)).collect();
        assert_eq!(painted, frozen);
    }

    #[test]
    fn test_links_only_with_pointer() {
        let mut state = state();
        let mut list = DrawList::new();
        state.tick(&mut list);
        assert!(list.lines.is_empty());

        let first = state.field().particles()[0].position();
        state.pointer_moved(first);
        list.reset();
        state.tick(&mut list);
        assert!(!list.lines.is_empty());

        state.pointer_released();
        list.reset();
        state.tick(&mut list);
        assert!(list.lines.is_empty());
    }

    #[test]
    fn test_rebuild_callback() {
        let counts = Rc::new(RefCell::new(Vec::new()));
        let sink = counts.clone();

        let mut state = state();
        state.set_on_rebuild(Box::new(move |n| sink.borrow_mut().push(n)));
        state.submit_text("A");
        state.submit_text("");

        let counts = counts.borrow();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[1], state.particle_count());
    }

    #[test]
    fn test_zero_viewport_is_empty() {
        let mut state = state();
        state.resize(0, 0);
        assert_eq!(state.particle_count(), 0);
        state.tick(&mut DrawList::new());
    }
}
