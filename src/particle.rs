//! A single text particle and the pointer it reacts to.

use glam::Vec2;
use rand::Rng;

use crate::canvas::Painter;
use crate::color::Color;
use crate::config::ParticleConfig;

/// Where the pointer is, if anywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    /// `None` while no mouse or touch contact is active.
    pub position: Option<Vec2>,
    /// Distance within which particles are pushed away.
    pub influence_radius: f32,
}

impl PointerState {
    pub fn new(influence_radius: f32) -> Self {
        Self {
            position: None,
            influence_radius,
        }
    }

    pub fn is_active(&self) -> bool {
        self.position.is_some()
    }

    pub fn move_to(&mut self, position: Vec2) {
        self.position = Some(position);
    }

    pub fn release(&mut self) {
        self.position = None;
    }
}

/// Per-frame response parameters shared by every particle in a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Response {
    /// Fraction of the offset from rest removed each frame.
    pub return_rate: f32,
    /// Color of perturbed particles.
    pub highlight: Color,
}

impl Default for Response {
    fn default() -> Self {
        Self {
            return_rate: 0.08,
            highlight: Color::WHITE,
        }
    }
}

impl From<&ParticleConfig> for Response {
    fn from(config: &ParticleConfig) -> Self {
        Self {
            return_rate: config.return_rate,
            highlight: config.highlight,
        }
    }
}

/// A point of the text that scatters from the pointer and eases back home.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    position: Vec2,
    rest_position: Vec2,
    radius: f32,
    displacement_gain: f32,
    base_color: Color,
    current_color: Color,
    opacity: f32,
    resting_opacity: f32,
}

impl Particle {
    /// Create a particle at rest with randomized size, gain and opacity.
    pub fn new<R: Rng>(rest: Vec2, color: Color, config: &ParticleConfig, rng: &mut R) -> Self {
        let radius = sample(rng, &config.radius);
        let displacement_gain = sample(rng, &config.displacement_gain);
        let resting_opacity = sample(rng, &config.resting_opacity);
        Self::with_attributes(rest, color, radius, displacement_gain, resting_opacity)
    }

    /// Create a particle at rest with explicit attributes.
    pub fn with_attributes(
        rest: Vec2,
        color: Color,
        radius: f32,
        displacement_gain: f32,
        resting_opacity: f32,
    ) -> Self {
        Self {
            position: rest,
            rest_position: rest,
            radius,
            displacement_gain,
            base_color: color,
            current_color: color,
            opacity: resting_opacity,
            resting_opacity,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn rest_position(&self) -> Vec2 {
        self.rest_position
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn displacement_gain(&self) -> f32 {
        self.displacement_gain
    }

    pub fn base_color(&self) -> Color {
        self.base_color
    }

    pub fn current_color(&self) -> Color {
        self.current_color
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn resting_opacity(&self) -> f32 {
        self.resting_opacity
    }

    /// Distance from the rest position.
    pub fn offset(&self) -> f32 {
        self.position.distance(self.rest_position)
    }

    /// Advance one frame.
    ///
    /// Inside the influence radius the particle is pushed straight away from
    /// the pointer, harder the closer it is, and lights up. Otherwise it
    /// removes `return_rate` of its offset from rest and returns to its
    /// resting look.
    pub fn update(&mut self, pointer: &PointerState, response: &Response) {
        if let Some(pointer_pos) = pointer.position {
            let to_pointer = pointer_pos - self.position;
            let distance = to_pointer.length();

            if distance < pointer.influence_radius {
                // A pointer exactly on top has no direction to push along.
                if distance > 0.0 {
                    let falloff = (pointer.influence_radius - distance) / pointer.influence_radius;
                    self.position -= to_pointer / distance * falloff * self.displacement_gain;
                }
                self.current_color = response.highlight;
                self.opacity = 1.0;
                return;
            }
        }

        self.position -= (self.position - self.rest_position) * response.return_rate;
        self.current_color = self.base_color;
        self.opacity = self.resting_opacity;
    }

    pub fn draw<P: Painter + ?Sized>(&self, painter: &mut P) {
        painter.fill_circle(self.position, self.radius, self.current_color, self.opacity);
    }
}

fn sample<R: Rng>(rng: &mut R, range: &std::ops::Range<f32>) -> f32 {
    if range.start < range.end {
        rng.gen_range(range.clone())
    } else {
        range.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::DrawList;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const VIOLET: Color = Color::rgb(0xa7, 0x8b, 0xfa);

    fn particle_at(x: f32, y: f32) -> Particle {
        Particle::with_attributes(Vec2::new(x, y), VIOLET, 2.0, 10.0, 0.8)
    }

    #[test]
    fn test_random_attributes_in_range() {
        let config = ParticleConfig::default();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let p = Particle::new(Vec2::new(5.0, 5.0), VIOLET, &config, &mut rng);
            assert!((1.5..3.5).contains(&p.radius()));
            assert!((5.0..25.0).contains(&p.displacement_gain()));
            assert!((0.7..1.0).contains(&p.resting_opacity()));
            assert_eq!(p.position(), p.rest_position());
            assert_eq!(p.opacity(), p.resting_opacity());
        }
    }

    #[test]
    fn test_degenerate_range_uses_start() {
        let config = ParticleConfig { radius: 2.0..2.0, ..Default::default() };
        let mut rng = StdRng::seed_from_u64(1);
        let p = Particle::new(Vec2::ZERO, VIOLET, &config, &mut rng);
        assert_eq!(p.radius(), 2.0);
    }

    #[test]
    fn test_repelled_inside_radius() {
        let mut p = particle_at(100.0, 100.0);
        let mut pointer = PointerState::new(120.0);
        pointer.move_to(Vec2::new(160.0, 100.0));

        p.update(&pointer, &Response::default());

        // distance 60 of 120 -> half strength, gain 10 -> 5 units left
        assert!((p.position().x - 95.0).abs() < 1e-4);
        assert_eq!(p.position().y, 100.0);
        assert_eq!(p.current_color(), Color::WHITE);
        assert_eq!(p.opacity(), 1.0);
    }

    #[test]
    fn test_pointer_on_top_does_not_move_or_nan() {
        let mut p = particle_at(100.0, 100.0);
        let mut pointer = PointerState::new(120.0);
        pointer.move_to(Vec2::new(100.0, 100.0));

        p.update(&pointer, &Response::default());

        assert_eq!(p.position(), Vec2::new(100.0, 100.0));
        assert!(p.position().is_finite());
        assert_eq!(p.current_color(), Color::WHITE);
        assert_eq!(p.opacity(), 1.0);
    }

    #[test]
    fn test_outside_radius_keeps_base_look() {
        let mut p = particle_at(0.0, 0.0);
        let mut pointer = PointerState::new(120.0);
        pointer.move_to(Vec2::new(120.0, 0.0));

        p.update(&pointer, &Response::default());

        assert_eq!(p.current_color(), VIOLET);
        assert_eq!(p.opacity(), 0.8);
        assert_eq!(p.position(), Vec2::ZERO);
    }

    #[test]
    fn test_eases_back_after_release() {
        let mut p = particle_at(50.0, 50.0);
        let mut pointer = PointerState::new(120.0);
        pointer.move_to(Vec2::new(60.0, 55.0));
        p.update(&pointer, &Response::default());
        assert_eq!(p.current_color(), Color::WHITE);

        pointer.release();
        let before = p.offset();
        p.update(&pointer, &Response::default());
        let after = p.offset();

        assert!((after - before * 0.92).abs() < 1e-3);
        assert_eq!(p.current_color(), VIOLET);
        assert_eq!(p.opacity(), 0.8);
    }

    #[test]
    fn test_draw_uses_current_look() {
        let mut p = particle_at(3.0, 4.0);
        let mut list = DrawList::new();
        p.draw(&mut list);
        assert_eq!(list.circles[0].center, [3.0, 4.0]);
        assert_eq!(list.circles[0].radius, 2.0);
        assert_eq!(list.circles[0].color, VIOLET.to_rgba(0.8));

        let mut pointer = PointerState::new(120.0);
        pointer.move_to(Vec2::new(3.0, 10.0));
        p.update(&pointer, &Response::default());
        p.draw(&mut list);
        assert_eq!(list.circles[1].color, Color::WHITE.to_rgba(1.0));
    }
}
