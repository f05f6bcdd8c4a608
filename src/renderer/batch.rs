//! Tessellating draw surface
//!
//! Turns draw calls into a triangle list (pixel coordinates) for the GPU
//! pipeline. Text cannot be tessellated here, so runs are kept aside for
//! whoever presents the frame.

use glam::Vec2;

use super::shapes;
use super::surface::{Color, DrawSurface, GradientStop, TextRun};
use super::vertex::Vertex;
use crate::sim::collision::Aabb;

/// Segments used for circles and radial gradients
pub const CIRCLE_SEGMENTS: u32 = 24;

#[derive(Debug, Default)]
pub struct VertexBatch {
    vertices: Vec<Vertex>,
    texts: Vec<TextRun>,
    complete: bool,
}

impl VertexBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn texts(&self) -> &[TextRun] {
        &self.texts
    }

    /// True between `end_frame` and the next `begin_frame`
    pub fn is_complete(&self) -> bool {
        self.complete
    }
}

impl DrawSurface for VertexBatch {
    fn begin_frame(&mut self) {
        self.vertices.clear();
        self.texts.clear();
        self.complete = false;
    }

    fn fill_rect(&mut self, rect: Aabb, color: Color) {
        self.vertices.extend(shapes::quad(rect, color));
    }

    fn stroke_rect(&mut self, rect: Aabb, color: Color, line_width: f32) {
        self.vertices
            .extend(shapes::rect_outline(rect, color, line_width));
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        self.vertices.extend(shapes::convex_polygon(points, color));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.vertices
            .extend(shapes::circle(center, radius, color, CIRCLE_SEGMENTS));
    }

    fn fill_vertical_gradient(&mut self, rect: Aabb, stops: &[GradientStop]) {
        self.vertices.extend(shapes::vertical_gradient(rect, stops));
    }

    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, stops: &[GradientStop]) {
        self.vertices.extend(shapes::radial_gradient(
            center,
            radius,
            stops,
            CIRCLE_SEGMENTS,
        ));
    }

    fn fill_text(&mut self, run: TextRun) {
        self.texts.push(run);
    }

    fn end_frame(&mut self) {
        self.complete = true;
    }
}
