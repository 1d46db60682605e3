//! Drawing surface abstraction.
//!
//! The simulation never talks to the GPU directly. It paints through the
//! [`Painter`] trait, and [`DrawList`] records one frame of paint calls as
//! GPU-ready instances that the renderer uploads and draws in order:
//! clear, fade overlay, circles, then lines.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::color::Color;

/// Immediate-mode 2D painting in logical pixel coordinates.
pub trait Painter {
    /// Wipe the whole surface to an opaque color.
    fn clear(&mut self, color: Color);

    /// Cover the whole surface with a translucent color.
    fn fade(&mut self, color: Color, alpha: f32);

    /// Fill a circle.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color, opacity: f32);

    /// Stroke a straight line segment.
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color, opacity: f32);
}

/// Per-instance data for the circle pipeline.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct CircleInstance {
    pub center: [f32; 2],
    pub radius: f32,
    pub _pad: f32,
    pub color: [f32; 4],
}

/// Per-instance data for the line pipeline.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LineInstance {
    pub from: [f32; 2],
    pub to: [f32; 2],
    pub color: [f32; 4],
    pub width: f32,
    pub _pad: [f32; 3],
}

/// One frame worth of recorded paint calls.
#[derive(Debug, Default, Clone)]
pub struct DrawList {
    /// Set when the surface must be wiped before anything else.
    pub clear: Option<[f32; 4]>,
    /// Overlay color with alpha, painted after the clear.
    pub fade: Option<[f32; 4]>,
    pub circles: Vec<CircleInstance>,
    pub lines: Vec<LineInstance>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything but keep the allocations.
    pub fn reset(&mut self) {
        self.clear = None;
        self.fade = None;
        self.circles.clear();
        self.lines.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.clear.is_none() && self.fade.is_none() && self.circles.is_empty() && self.lines.is_empty()
    }
}

impl Painter for DrawList {
    fn clear(&mut self, color: Color) {
        // Anything recorded before a clear would be wiped anyway.
        self.fade = None;
        self.circles.clear();
        self.lines.clear();
        self.clear = Some(color.to_rgba(1.0));
    }

    fn fade(&mut self, color: Color, alpha: f32) {
        self.fade = Some(color.to_rgba(alpha.clamp(0.0, 1.0)));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color, opacity: f32) {
        self.circles.push(CircleInstance {
            center: center.to_array(),
            radius,
            _pad: 0.0,
            color: color.to_rgba(opacity),
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color, opacity: f32) {
        self.lines.push(LineInstance {
            from: from.to_array(),
            to: to.to_array(),
            color: color.to_rgba(opacity),
            width,
            _pad: [0.0; 3],
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_layouts_are_16_byte_multiples() {
        assert_eq!(std::mem::size_of::<CircleInstance>(), 32);
        assert_eq!(std::mem::size_of::<LineInstance>(), 48);
    }

    #[test]
    fn test_clear_drops_earlier_calls() {
        let mut list = DrawList::new();
        list.fade(Color::BLACK, 0.05);
        list.fill_circle(Vec2::ZERO, 2.0, Color::WHITE, 1.0);
        list.clear(Color::rgb(10, 10, 15));
        assert!(list.fade.is_none());
        assert!(list.circles.is_empty());
        assert_eq!(list.clear, Some(Color::rgb(10, 10, 15).to_rgba(1.0)));

        list.reset();
        assert!(list.is_empty());
    }

    #[test]
    fn test_records_in_order() {
        let mut list = DrawList::new();
        list.fill_circle(Vec2::new(1.0, 2.0), 3.0, Color::WHITE, 0.5);
        list.fill_circle(Vec2::new(4.0, 5.0), 1.5, Color::BLACK, 1.0);
        list.stroke_line(Vec2::ZERO, Vec2::ONE, 0.5, Color::WHITE, 0.1);

        assert_eq!(list.circles.len(), 2);
        assert_eq!(list.circles[0].center, [1.0, 2.0]);
        assert_eq!(list.circles[0].color[3], 0.5);
        assert_eq!(list.circles[1].radius, 1.5);
        assert_eq!(list.lines[0].to, [1.0, 1.0]);
    }
}
