//! Collision and scoring resolution
//!
//! Runs after positions are updated for the tick. Obstacle hits cost a life
//! unless mitigated by defense; either way the obstacle is consumed so a
//! single obstacle can never hit twice.

use super::collision::{hitbox_overlap, within_radius};
use super::random::RandomSource;
use super::state::SessionState;
use crate::tuning::Tuning;

/// Result of resolving obstacles for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HitReport {
    /// Hits that cost a life
    pub damaging: u32,
    /// Hits absorbed by defense
    pub absorbed: u32,
    /// Lives reached zero this tick
    pub fatal: bool,
}

/// Test the vehicle against every live obstacle.
///
/// Stops at the first hit that takes the last life; obstacles after it are
/// left untouched since the session is over.
pub fn resolve_obstacles(
    state: &mut SessionState,
    tuning: &Tuning,
    defense_rating: f32,
    rng: &mut dyn RandomSource,
) -> HitReport {
    let hitbox = state.vehicle.hitbox(tuning.hitbox_inset);
    let mitigation = tuning.mitigation(defense_rating);
    let mut report = HitReport::default();

    let mut i = 0;
    while i < state.obstacles.len() && state.lives > 0 {
        if !hitbox_overlap(&hitbox, &state.obstacles[i].bounds()) {
            i += 1;
            continue;
        }

        let obstacle = state.obstacles.remove(i);
        let roll = rng.next_f32();
        if mitigation > 0.0 && roll <= mitigation {
            report.absorbed += 1;
            log::debug!("Absorbed {} #{}", obstacle.kind.as_str(), obstacle.id);
        } else {
            state.lives = state.lives.saturating_sub(1);
            report.damaging += 1;
            log::debug!(
                "Hit {} #{}, {} lives left",
                obstacle.kind.as_str(),
                obstacle.id,
                state.lives
            );
        }
    }

    report.fatal = report.damaging > 0 && state.lives == 0;
    report
}

/// Collect every uncollected coin within pickup range. Returns coins collected.
pub fn resolve_coins(state: &mut SessionState, tuning: &Tuning) -> u32 {
    let center = state.vehicle.center();
    let mut collected = 0;

    for coin in state.coins.iter_mut().filter(|c| !c.collected) {
        if within_radius(coin.pos, center, tuning.coin_pickup_radius) {
            coin.collected = true;
            collected += 1;
        }
    }

    state.collected_coins += collected;
    state.score += u64::from(collected) * tuning.coin_value;
    collected
}

/// Passive distance and score for one tick at `game_speed`
pub fn accrue_progress(state: &mut SessionState, tuning: &Tuning, game_speed: f32) {
    state.distance += game_speed * tuning.distance_rate;
    state.score += tuning.score_trickle(game_speed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::random::ScriptedRandom;
    use crate::sim::state::{Coin, Obstacle, ObstacleKind};
    use glam::Vec2;

    fn obstacle_on_vehicle(state: &mut SessionState) -> u32 {
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle {
            id,
            kind: ObstacleKind::Barrier,
            x: VEHICLE_X + 10.0,
            y: GROUND_SURFACE_Y - 70.0,
            width: 45.0,
            height: 70.0,
        });
        id
    }

    #[test]
    fn test_hit_costs_life_and_consumes() {
        let tuning = Tuning::classic();
        let mut state = SessionState::new();
        obstacle_on_vehicle(&mut state);
        let mut rng = ScriptedRandom::constant(0.5);

        let report = resolve_obstacles(&mut state, &tuning, 0.0, &mut rng);
        assert_eq!(report.damaging, 1);
        assert!(!report.fatal);
        assert_eq!(state.lives, 2);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_zero_defense_never_absorbs() {
        let tuning = Tuning::classic();
        let mut state = SessionState::new();
        obstacle_on_vehicle(&mut state);
        let mut rng = ScriptedRandom::constant(0.0);

        let report = resolve_obstacles(&mut state, &tuning, 0.0, &mut rng);
        assert_eq!(report.damaging, 1);
        assert_eq!(report.absorbed, 0);
    }

    #[test]
    fn test_high_defense_absorbs_every_hit() {
        let tuning = Tuning::classic();
        let mut state = SessionState::new();
        obstacle_on_vehicle(&mut state);
        // defense 12 -> 1.2 mitigation, above any roll in [0, 1)
        let mut rng = ScriptedRandom::constant(0.95);

        let report = resolve_obstacles(&mut state, &tuning, 12.0, &mut rng);
        assert_eq!(report.damaging, 0);
        assert_eq!(report.absorbed, 1);
        assert_eq!(state.lives, 3);
    }

    #[test]
    fn test_absorbed_hit_still_consumes() {
        let tuning = Tuning::classic();
        let mut state = SessionState::new();
        obstacle_on_vehicle(&mut state);
        // defense 5 -> 0.5 mitigation; roll 0.5 is absorbed
        let mut rng = ScriptedRandom::constant(0.5);

        let report = resolve_obstacles(&mut state, &tuning, 5.0, &mut rng);
        assert_eq!(report.absorbed, 1);
        assert_eq!(state.lives, 3);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_fatal_hit_stops_resolution() {
        let tuning = Tuning::classic();
        let mut state = SessionState::new();
        state.lives = 1;
        obstacle_on_vehicle(&mut state);
        let second = obstacle_on_vehicle(&mut state);
        let mut rng = ScriptedRandom::constant(0.5);

        let report = resolve_obstacles(&mut state, &tuning, 0.0, &mut rng);
        assert!(report.fatal);
        assert_eq!(report.damaging, 1);
        assert_eq!(state.lives, 0);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacles[0].id, second);
    }

    #[test]
    fn test_grounded_vehicle_hits_hole() {
        let tuning = Tuning::classic();
        let mut state = SessionState::new();
        state.obstacles.push(Obstacle {
            id: 1,
            kind: ObstacleKind::Hole,
            x: VEHICLE_X,
            y: GROUND_SURFACE_Y - 10.0,
            width: 100.0,
            height: 10.0,
        });
        let mut rng = ScriptedRandom::constant(0.5);
        assert_eq!(resolve_obstacles(&mut state, &tuning, 0.0, &mut rng).damaging, 1);
    }

    #[test]
    fn test_airborne_vehicle_clears_obstacle() {
        let tuning = Tuning::classic();
        let mut state = SessionState::new();
        obstacle_on_vehicle(&mut state);
        state.vehicle.y = GROUND_Y - 130.0;
        state.vehicle.airborne = true;
        let mut rng = ScriptedRandom::constant(0.5);

        let report = resolve_obstacles(&mut state, &tuning, 0.0, &mut rng);
        assert_eq!(report, HitReport::default());
        assert_eq!(state.obstacles.len(), 1);
    }

    #[test]
    fn test_coin_collected_once() {
        let tuning = Tuning::classic();
        let mut state = SessionState::new();
        let center = state.vehicle.center();
        state.coins.push(Coin {
            id: 1,
            pos: center + Vec2::new(10.0, -10.0),
            collected: false,
        });

        assert_eq!(resolve_coins(&mut state, &tuning), 1);
        assert_eq!(state.collected_coins, 1);
        assert_eq!(state.score, 10);
        assert!(state.coins[0].collected);

        // Still in range next tick
        assert_eq!(resolve_coins(&mut state, &tuning), 0);
        assert_eq!(state.collected_coins, 1);
        assert_eq!(state.score, 10);
    }

    #[test]
    fn test_far_coin_ignored() {
        let tuning = Tuning::classic();
        let mut state = SessionState::new();
        state.coins.push(Coin {
            id: 1,
            pos: Vec2::new(VEHICLE_X + 25.0, GROUND_Y - 100.0),
            collected: false,
        });
        assert_eq!(resolve_coins(&mut state, &tuning), 0);
        assert!(!state.coins[0].collected);
    }

    #[test]
    fn test_accrue_progress() {
        let tuning = Tuning::classic();
        let mut state = SessionState::new();
        accrue_progress(&mut state, &tuning, 5.0);
        assert!((state.distance - 0.5).abs() < 1e-6);
        assert_eq!(state.score, 1);
    }
}
