//! Double-buffered vertex canvas
//!
//! Records primitives as a triangle list plus text labels. `present` swaps the
//! back buffer to the front, where a GPU backend (or a test) can read it.

use glam::Vec2;

use super::Canvas;
use super::shapes;
use super::vertex::{Color, Vertex};
use crate::sim::Rect;

/// Segments used to tessellate circles
const CIRCLE_SEGMENTS: u32 = 24;

/// A text draw request; glyph rasterization is left to the backend
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub text: String,
    pub pos: Vec2,
    pub size: f32,
    pub color: Color,
}

/// One finished frame
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub clear_color: Color,
    pub vertices: Vec<Vertex>,
    pub labels: Vec<TextLabel>,
}

/// Canvas that builds GPU-ready vertex data
#[derive(Debug, Default)]
pub struct VertexCanvas {
    width: f32,
    height: f32,
    back: Frame,
    front: Frame,
    frames_presented: u64,
}

impl VertexCanvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Last presented frame
    pub fn front(&self) -> &Frame {
        &self.front
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}

impl Canvas for VertexCanvas {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Color) {
        self.back.clear_color = color;
        self.back.vertices.clear();
        self.back.labels.clear();
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.back.vertices.extend_from_slice(&shapes::rect(rect, color));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.back
            .vertices
            .extend(shapes::circle(center, radius, color, CIRCLE_SEGMENTS));
    }

    fn draw_text(&mut self, text: &str, pos: Vec2, size: f32, color: Color) {
        self.back.labels.push(TextLabel {
            text: text.to_string(),
            pos,
            size,
            color,
        });
    }

    fn present(&mut self) {
        std::mem::swap(&mut self.front, &mut self.back);
        self.frames_presented += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present_swaps_buffers() {
        let mut canvas = VertexCanvas::new(800.0, 600.0);
        canvas.clear([0.0; 4]);
        canvas.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), [1.0; 4]);
        canvas.draw_text("Score: 0", Vec2::new(10.0, 10.0), 36.0, [1.0; 4]);
        assert!(canvas.front().vertices.is_empty());

        canvas.present();
        assert_eq!(canvas.front().vertices.len(), 6);
        assert_eq!(canvas.front().labels[0].text, "Score: 0");
        assert_eq!(canvas.frames_presented(), 1);

        // Next frame starts clean
        canvas.clear([0.0; 4]);
        canvas.present();
        assert!(canvas.front().vertices.is_empty());
        assert_eq!(canvas.frames_presented(), 2);
    }

    #[test]
    fn test_circle_tessellation() {
        let mut canvas = VertexCanvas::new(100.0, 100.0);
        canvas.clear([0.0; 4]);
        canvas.fill_circle(Vec2::new(50.0, 50.0), 5.0, [1.0; 4]);
        canvas.present();
        assert_eq!(canvas.front().vertices.len(), (CIRCLE_SEGMENTS * 3) as usize);
    }
}
