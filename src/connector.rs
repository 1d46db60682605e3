//! Faint links between particles around the pointer.
//!
//! Only particles close to the pointer are considered, and each one is only
//! compared against the next few candidates in field order. Because fields
//! are sampled row-major, neighbors in that order are mostly neighbors on
//! screen, so the short window finds most close pairs at a fraction of the
//! cost of an all-pairs search.

use glam::Vec2;

use crate::canvas::Painter;
use crate::config::ConnectorConfig;
use crate::field::ParticleField;
use crate::particle::PointerState;

/// A line between two particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub from: Vec2,
    pub to: Vec2,
    pub opacity: f32,
}

/// Finds and draws links near the pointer.
#[derive(Debug, Clone)]
pub struct ProximityConnector {
    config: ConnectorConfig,
    // Reused between frames.
    candidates: Vec<Vec2>,
    links: Vec<Link>,
}

impl Default for ProximityConnector {
    fn default() -> Self {
        Self::new(ConnectorConfig::default())
    }
}

impl ProximityConnector {
    pub fn new(config: ConnectorConfig) -> Self {
        Self {
            config,
            candidates: Vec::new(),
            links: Vec::new(),
        }
    }

    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    /// Links found by the last [`find`](Self::find) or [`connect`](Self::connect).
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Collect the links for the current particle positions.
    ///
    /// Finds nothing while the pointer is absent.
    pub fn find(&mut self, field: &ParticleField, pointer: &PointerState) -> &[Link] {
        self.candidates.clear();
        self.links.clear();

        let Some(pointer_pos) = pointer.position else {
            return &self.links;
        };

        let reach = pointer.influence_radius + self.config.margin;
        self.candidates.extend(
            field
                .iter()
                .map(|p| p.position())
                .filter(|pos| pointer_pos.distance(*pos) < reach),
        );

        let len = self.candidates.len();
        for a in 0..len {
            let end = (a + 1 + self.config.window).min(len);
            for b in (a + 1)..end {
                let (from, to) = (self.candidates[a], self.candidates[b]);
                let distance = from.distance(to);
                if distance < self.config.max_distance {
                    self.links.push(Link {
                        from,
                        to,
                        opacity: (1.0 - distance / self.config.max_distance) * self.config.max_opacity,
                    });
                }
            }
        }

        &self.links
    }

    /// Find the links and stroke them.
    pub fn connect<P: Painter + ?Sized>(
        &mut self,
        field: &ParticleField,
        pointer: &PointerState,
        painter: &mut P,
    ) {
        self.find(field, pointer);
        for link in &self.links {
            painter.stroke_line(
                link.from,
                link.to,
                self.config.line_width,
                self.config.color,
                link.opacity,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::DrawList;
    use crate::color::Color;
    use crate::particle::Particle;

    fn field(points: &[(f32, f32)]) -> ParticleField {
        ParticleField::new(
            points
                .iter()
                .map(|&(x, y)| Particle::with_attributes(Vec2::new(x, y), Color::WHITE, 2.0, 10.0, 0.8))
                .collect(),
        )
    }

    fn pointer_at(x: f32, y: f32) -> PointerState {
        let mut pointer = PointerState::new(120.0);
        pointer.move_to(Vec2::new(x, y));
        pointer
    }

    #[test]
    fn test_nothing_without_pointer() {
        let field = field(&[(0.0, 0.0), (1.0, 0.0)]);
        let mut connector = ProximityConnector::default();
        let mut list = DrawList::new();

        connector.connect(&field, &PointerState::new(120.0), &mut list);

        assert!(connector.links().is_empty());
        assert!(list.lines.is_empty());
    }

    #[test]
    fn test_link_opacity_and_style() {
        let field = field(&[(0.0, 0.0), (15.0, 0.0)]);
        let mut connector = ProximityConnector::default();
        let mut list = DrawList::new();

        connector.connect(&field, &pointer_at(0.0, 0.0), &mut list);

        assert_eq!(connector.links().len(), 1);
        assert!((connector.links()[0].opacity - 0.1).abs() < 1e-6);
        assert_eq!(list.lines.len(), 1);
        assert_eq!(list.lines[0].width, 0.5);
        assert_eq!(list.lines[0].color, Color::rgb(167, 139, 250).to_rgba(0.1));
    }

    #[test]
    fn test_far_pairs_not_linked() {
        let field = field(&[(0.0, 0.0), (30.0, 0.0), (100.0, 0.0)]);
        let mut connector = ProximityConnector::default();
        assert!(connector.find(&field, &pointer_at(0.0, 0.0)).is_empty());
    }

    #[test]
    fn test_only_candidates_near_pointer() {
        // The pair at x=500 is close together but far from the pointer.
        let field = field(&[(0.0, 0.0), (10.0, 0.0), (500.0, 0.0), (505.0, 0.0)]);
        let mut connector = ProximityConnector::default();
        let links = connector.find(&field, &pointer_at(0.0, 0.0));
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].to, Vec2::new(10.0, 0.0));
    }

    #[test]
    fn test_margin_extends_reach() {
        // 160 is outside the 120 radius but inside radius + 50.
        let field = field(&[(160.0, 0.0), (165.0, 0.0)]);
        let mut connector = ProximityConnector::default();
        assert_eq!(connector.find(&field, &pointer_at(0.0, 0.0)).len(), 1);
    }

    #[test]
    fn test_window_limits_comparisons() {
        // Six particles on one spot: each compares with at most four followers.
        let field = field(&[(1.0, 1.0); 6]);
        let mut connector = ProximityConnector::default();
        let links = connector.find(&field, &pointer_at(0.0, 0.0));
        // 4 + 4 + 3 + 2 + 1
        assert_eq!(links.len(), 14);
        assert!(links.iter().all(|l| (l.opacity - 0.2).abs() < 1e-6));
    }
}
