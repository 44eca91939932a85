//! Rendering surface
//!
//! The game only needs a drawable canvas of fixed size that accepts filled
//! rectangles, circles and text, and flips once per frame. Window and GPU
//! backends implement [`Canvas`]; [`VertexCanvas`] builds the triangle list
//! they upload.

use glam::Vec2;

use crate::sim::Rect;

pub mod canvas;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use canvas::{Frame, TextLabel, VertexCanvas};
pub use vertex::{Color, Vertex, colors};

/// A drawable surface
pub trait Canvas {
    /// Surface size in pixels
    fn size(&self) -> (f32, f32);

    /// Start a new frame filled with `color`
    fn clear(&mut self, color: Color);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    fn draw_text(&mut self, text: &str, pos: Vec2, size: f32, color: Color);

    /// Flip the finished frame to the display
    fn present(&mut self);
}
