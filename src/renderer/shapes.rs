//! Shape generation for 2D primitives
//!
//! Everything is emitted as a triangle list in canvas pixels.

use glam::Vec2;
use std::f32::consts::PI;

use super::surface::{Color, GradientStop, sample_gradient};
use super::vertex::Vertex;
use crate::sim::collision::Aabb;

/// Two triangles covering `rect`
pub fn quad(rect: Aabb, color: Color) -> Vec<Vertex> {
    let (min, max) = (rect.min, rect.max);
    vec![
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

/// Rectangle outline centered on the rect edges, `line_width` thick
pub fn rect_outline(rect: Aabb, color: Color, line_width: f32) -> Vec<Vertex> {
    let half = line_width / 2.0;
    let (min, max) = (rect.min, rect.max);
    let edges = [
        // top, bottom
        Aabb::new(Vec2::new(min.x - half, min.y - half), Vec2::new(max.x + half, min.y + half)),
        Aabb::new(Vec2::new(min.x - half, max.y - half), Vec2::new(max.x + half, max.y + half)),
        // left, right
        Aabb::new(Vec2::new(min.x - half, min.y + half), Vec2::new(min.x + half, max.y - half)),
        Aabb::new(Vec2::new(max.x - half, min.y + half), Vec2::new(max.x + half, max.y - half)),
    ];
    edges.into_iter().flat_map(|e| quad(e, color)).collect()
}

/// Triangle fan over a convex polygon
pub fn convex_polygon(points: &[Vec2], color: Color) -> Vec<Vertex> {
    if points.len() < 3 {
        return Vec::new();
    }
    let mut vertices = Vec::with_capacity((points.len() - 2) * 3);
    let origin = points[0];
    for pair in points[1..].windows(2) {
        vertices.push(Vertex::new(origin.x, origin.y, color));
        vertices.push(Vertex::new(pair[0].x, pair[0].y, color));
        vertices.push(Vertex::new(pair[1].x, pair[1].y, color));
    }
    vertices
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: Color, segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ring whose color blends from inner to outer edge
pub fn gradient_ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    inner_color: Color,
    outer_color: Color,
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;
        let dir1 = Vec2::new(theta1.cos(), theta1.sin());
        let dir2 = Vec2::new(theta2.cos(), theta2.sin());

        let inner1 = center + dir1 * inner_radius;
        let outer1 = center + dir1 * outer_radius;
        let inner2 = center + dir2 * inner_radius;
        let outer2 = center + dir2 * outer_radius;

        // Two triangles per segment
        vertices.push(Vertex::new(inner1.x, inner1.y, inner_color));
        vertices.push(Vertex::new(outer1.x, outer1.y, outer_color));
        vertices.push(Vertex::new(inner2.x, inner2.y, inner_color));

        vertices.push(Vertex::new(inner2.x, inner2.y, inner_color));
        vertices.push(Vertex::new(outer1.x, outer1.y, outer_color));
        vertices.push(Vertex::new(outer2.x, outer2.y, outer_color));
    }

    vertices
}

/// Radial gradient as a center disc plus one blended ring per stop interval
pub fn radial_gradient(
    center: Vec2,
    radius: f32,
    stops: &[GradientStop],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    if stops.is_empty() || radius <= 0.0 {
        return vertices;
    }

    let first = stops[0];
    if first.offset > 0.0 {
        vertices.extend(circle(center, radius * first.offset, first.color, segments));
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        vertices.extend(gradient_ring(
            center,
            radius * a.offset,
            radius * b.offset,
            a.color,
            b.color,
            segments,
        ));
    }
    vertices
}

/// Vertical gradient as one horizontal band per stop interval
pub fn vertical_gradient(rect: Aabb, stops: &[GradientStop]) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    if stops.is_empty() {
        return vertices;
    }

    let height = rect.height();
    let mut offsets: Vec<f32> = stops.iter().map(|s| s.offset.clamp(0.0, 1.0)).collect();
    if offsets[0] > 0.0 {
        offsets.insert(0, 0.0);
    }
    if offsets[offsets.len() - 1] < 1.0 {
        offsets.push(1.0);
    }

    for pair in offsets.windows(2) {
        let (t0, t1) = (pair[0], pair[1]);
        if t1 <= t0 {
            continue;
        }
        let y0 = rect.min.y + height * t0;
        let y1 = rect.min.y + height * t1;
        let c0 = sample_gradient(stops, t0);
        let c1 = sample_gradient(stops, t1);

        vertices.push(Vertex::new(rect.min.x, y0, c0));
        vertices.push(Vertex::new(rect.max.x, y0, c0));
        vertices.push(Vertex::new(rect.min.x, y1, c1));
        vertices.push(Vertex::new(rect.min.x, y1, c1));
        vertices.push(Vertex::new(rect.max.x, y0, c0));
        vertices.push(Vertex::new(rect.max.x, y1, c1));
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Color = [1.0; 4];

    #[test]
    fn test_quad_and_outline_counts() {
        let rect = Aabb::from_xywh(10.0, 10.0, 20.0, 20.0);
        assert_eq!(quad(rect, WHITE).len(), 6);
        assert_eq!(rect_outline(rect, WHITE, 3.0).len(), 24);
    }

    #[test]
    fn test_convex_polygon_fan() {
        let tri = [Vec2::ZERO, Vec2::X, Vec2::Y];
        assert_eq!(convex_polygon(&tri, WHITE).len(), 3);
        let square = [Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y];
        assert_eq!(convex_polygon(&square, WHITE).len(), 6);
        assert!(convex_polygon(&tri[..2], WHITE).is_empty());
    }

    #[test]
    fn test_vertical_gradient_bands() {
        let rect = Aabb::from_xywh(0.0, 0.0, 800.0, 450.0);
        let stops = [
            GradientStop::new(0.0, [0.0, 0.0, 0.0, 1.0]),
            GradientStop::new(0.5, [0.5, 0.5, 0.5, 1.0]),
            GradientStop::new(1.0, WHITE),
        ];
        let v = vertical_gradient(rect, &stops);
        assert_eq!(v.len(), 12);
        assert_eq!(v[0].position, [0.0, 0.0]);
        assert_eq!(v[11].position, [800.0, 450.0]);
        assert_eq!(v[11].color, WHITE);
    }

    #[test]
    fn test_radial_gradient_rings() {
        let stops = [
            GradientStop::new(0.0, WHITE),
            GradientStop::new(0.5, [1.0, 1.0, 1.0, 0.5]),
            GradientStop::new(1.0, [0.0; 4]),
        ];
        let v = radial_gradient(Vec2::ZERO, 100.0, &stops, 16);
        assert_eq!(v.len(), 2 * 16 * 6);
        assert!(radial_gradient(Vec2::ZERO, 0.0, &stops, 16).is_empty());
    }
}
