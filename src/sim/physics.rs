//! Vehicle integration and world scroll
//!
//! All quantities are per tick; the loop runs once per display refresh.

use super::state::{Coin, Obstacle, Vehicle};
use crate::consts::GROUND_Y;

/// Advance the vehicle one tick under gravity, landing exactly on the ground
pub fn integrate_vehicle(vehicle: &mut Vehicle, gravity: f32) {
    let mut y = vehicle.y + vehicle.velocity_y;
    let mut velocity_y = vehicle.velocity_y + gravity;
    let mut airborne = vehicle.airborne;

    if y >= GROUND_Y {
        y = GROUND_Y;
        velocity_y = 0.0;
        airborne = false;
    }

    vehicle.y = y;
    vehicle.velocity_y = velocity_y;
    vehicle.airborne = airborne;
}

/// Apply a jump impulse. Returns false (and changes nothing) while airborne.
pub fn apply_jump(vehicle: &mut Vehicle, power: f32) -> bool {
    if vehicle.airborne {
        return false;
    }
    vehicle.velocity_y = -power;
    vehicle.airborne = true;
    true
}

/// Move every obstacle and coin left by `game_speed`
pub fn scroll_entities(obstacles: &mut [Obstacle], coins: &mut [Coin], game_speed: f32) {
    for obstacle in obstacles.iter_mut() {
        obstacle.x -= game_speed;
    }
    for coin in coins.iter_mut() {
        coin.pos.x -= game_speed;
    }
}

/// Drop entities that have left the visible field
pub fn cull_offscreen(
    obstacles: &mut Vec<Obstacle>,
    coins: &mut Vec<Coin>,
    obstacle_margin: f32,
    coin_despawn_x: f32,
) {
    obstacles.retain(|o| o.x + o.width >= -obstacle_margin);
    coins.retain(|c| c.pos.x > coin_despawn_x);
}
