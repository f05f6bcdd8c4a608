//! Session state and core simulation types
//!
//! Everything that changes during a run lives in `SessionState`. A fresh one
//! is built on every start; nothing carries over between sessions.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::*;

/// Lifecycle phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SessionPhase {
    /// No session armed
    #[default]
    Idle,
    /// Active gameplay
    Playing,
    /// Frozen, callbacks cancelled
    Paused,
    /// Natural game over, result emitted
    Ended,
}

/// The player's bike
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Left edge (fixed lane)
    pub x: f32,
    /// Top edge; `GROUND_Y` when resting
    pub y: f32,
    /// Positive is downward
    pub velocity_y: f32,
    pub airborne: bool,
}

impl Default for Vehicle {
    fn default() -> Self {
        Self {
            x: VEHICLE_X,
            y: GROUND_Y,
            velocity_y: 0.0,
            airborne: false,
        }
    }
}

impl Vehicle {
    /// Sprite bounds
    pub fn bounds(&self) -> Aabb {
        Aabb::from_xywh(self.x, self.y, VEHICLE_SIZE, VEHICLE_SIZE)
    }

    /// Collidable bounds, smaller than the sprite
    pub fn hitbox(&self, inset: f32) -> Aabb {
        self.bounds().inset(inset)
    }

    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleKind {
    Spike,
    Barrier,
    Cone,
    Hole,
    Ramp,
}

impl ObstacleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObstacleKind::Spike => "spike",
            ObstacleKind::Barrier => "barrier",
            ObstacleKind::Cone => "cone",
            ObstacleKind::Hole => "hole",
            ObstacleKind::Ramp => "ramp",
        }
    }
}

/// An obstacle scrolling toward the vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Obstacle {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_xywh(self.x, self.y, self.width, self.height)
    }
}

/// A coin floating above the ground
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub id: u32,
    /// Center
    pub pos: Vec2,
    /// Inert once set; removed when it scrolls off
    pub collected: bool,
}

/// Complete per-session state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub vehicle: Vehicle,
    /// Live obstacles (spawn order)
    pub obstacles: Vec<Obstacle>,
    /// Live coins (spawn order)
    pub coins: Vec<Coin>,
    pub score: u64,
    pub distance: f32,
    pub collected_coins: u32,
    pub jump_count: u32,
    pub lives: u8,
    /// Simulated ticks this session
    pub time_ticks: u64,
    /// Next entity ID
    next_id: u32,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            vehicle: Vehicle::default(),
            obstacles: Vec::new(),
            coins: Vec::new(),
            score: 0,
            distance: 0.0,
            collected_coins: 0,
            jump_count: 0,
            lives: STARTING_LIVES,
            time_ticks: 0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_dead(&self) -> bool {
        self.lives == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_state() {
        let state = SessionState::new();
        assert_eq!(state.lives, 3);
        assert_eq!(state.score, 0);
        assert_eq!(state.vehicle.y, GROUND_Y);
        assert!(!state.vehicle.airborne);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_entity_ids_unique() {
        let mut state = SessionState::new();
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_vehicle_hitbox_inset() {
        let vehicle = Vehicle::default();
        let hit = vehicle.hitbox(5.0);
        assert_eq!(hit.min, Vec2::new(105.0, 355.0));
        assert_eq!(hit.max, Vec2::new(145.0, 395.0));
        assert_eq!(vehicle.center(), Vec2::new(125.0, 375.0));
    }
}
