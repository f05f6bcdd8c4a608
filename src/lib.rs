//! Moto Dash - A side-scrolling motorbike runner
//!
//! Core modules:
//! - `sim`: Session simulation (physics, spawning, collisions, scoring, state machine)
//! - `renderer`: Draw surface abstraction, render pass and WebGPU backend
//! - `platform`: Frame/timer scheduling abstraction
//! - `tuning`: Data-driven game balance
//! - `config`: Per-run configuration supplied by the app shell

pub mod config;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use config::{Cosmetics, GameMode, PlayerProfile, RunConfig, StarThresholds, VehicleStats};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Logical drawing surface size (pixels)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 450.0;

    /// Vehicle sprite size (square)
    pub const VEHICLE_SIZE: f32 = 50.0;
    /// Fixed lane offset of the vehicle's left edge
    pub const VEHICLE_X: f32 = 100.0;
    /// Resting y of the vehicle's top edge
    pub const GROUND_Y: f32 = 350.0;
    /// The surface obstacles stand on (vehicle bottom when grounded)
    pub const GROUND_SURFACE_Y: f32 = GROUND_Y + VEHICLE_SIZE;
    /// Height of the ground strip drawn below the surface
    pub const GROUND_STRIP_HEIGHT: f32 = 10.0;

    /// Lives at session start
    pub const STARTING_LIVES: u8 = 3;

    /// Physics defaults (per tick, not per second)
    pub const GRAVITY: f32 = 0.6;
    pub const BASE_JUMP_IMPULSE: f32 = 12.0;
    pub const JUMP_SCALE: f32 = 0.8;
    /// Jump power multiplier on snow
    pub const SNOW_JUMP_MODIFIER: f32 = 0.7;
    pub const BASE_SPEED: f32 = 5.0;
    pub const SPEED_SCALE: f32 = 0.15;

    /// Ratings above this are treated as this (upgrades cap well below it)
    pub const MAX_RATING: f32 = 100.0;
}

/// Clamp a stat rating to a usable range. Non-finite and negative values become zero.
#[inline]
pub fn clamp_rating(rating: f32) -> f32 {
    if rating.is_finite() {
        rating.clamp(0.0, consts::MAX_RATING)
    } else {
        0.0
    }
}
