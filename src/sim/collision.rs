//! Collision geometry
//!
//! Axis-aligned boxes for vehicle/obstacle tests and a radius check for
//! coin pickups. Screen coordinates: y grows downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_xywh(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + w, y + h),
        }
    }

    /// Shrink by `margin` on every side (never inverts)
    pub fn inset(&self, margin: f32) -> Self {
        let center = self.center();
        Self {
            min: (self.min + Vec2::splat(margin)).min(center),
            max: (self.max - Vec2::splat(margin)).max(center),
        }
    }

    pub fn left(&self) -> f32 {
        self.min.x
    }

    pub fn right(&self) -> f32 {
        self.max.x
    }

    pub fn top(&self) -> f32 {
        self.min.y
    }

    pub fn bottom(&self) -> f32 {
        self.max.y
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Strict overlap; touching edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.right() > other.left()
            && self.left() < other.right()
            && self.bottom() > other.top()
            && self.top() < other.bottom()
    }
}

/// Check a hit box (already inset) against obstacle bounds
pub fn hitbox_overlap(hitbox: &Aabb, obstacle: &Aabb) -> bool {
    hitbox.overlaps(obstacle)
}

/// Check whether a point lies strictly within `radius` of `center`
#[inline]
pub fn within_radius(center: Vec2, point: Vec2, radius: f32) -> bool {
    center.distance(point) < radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_basic() {
        let a = Aabb::from_xywh(0.0, 0.0, 10.0, 10.0);
        let b = Aabb::from_xywh(5.0, 5.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_touching_edges_miss() {
        let a = Aabb::from_xywh(0.0, 0.0, 10.0, 10.0);
        let right = Aabb::from_xywh(10.0, 0.0, 10.0, 10.0);
        let below = Aabb::from_xywh(0.0, 10.0, 10.0, 10.0);
        assert!(!a.overlaps(&right));
        assert!(!a.overlaps(&below));
    }

    #[test]
    fn test_inset_margin_avoids_graze() {
        // Sprite touches the obstacle by 3px, inside the 5px margin
        let sprite = Aabb::from_xywh(100.0, 350.0, 50.0, 50.0);
        let obstacle = Aabb::from_xywh(147.0, 360.0, 40.0, 40.0);
        assert!(sprite.overlaps(&obstacle));
        assert!(!hitbox_overlap(&sprite.inset(5.0), &obstacle));
    }

    #[test]
    fn test_inset_never_inverts() {
        let small = Aabb::from_xywh(0.0, 0.0, 4.0, 4.0).inset(10.0);
        assert!(small.width() >= 0.0);
        assert!(small.height() >= 0.0);
        assert_eq!(small.center(), Vec2::new(2.0, 2.0));
    }

    #[test]
    fn test_within_radius() {
        assert!(within_radius(Vec2::ZERO, Vec2::new(30.0, 0.0), 40.0));
        assert!(!within_radius(Vec2::ZERO, Vec2::new(40.0, 0.0), 40.0));
        assert!(!within_radius(Vec2::ZERO, Vec2::new(30.0, 30.0), 40.0));
    }
}
