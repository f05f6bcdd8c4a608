//! Procedural obstacle and coin spawning
//!
//! Obstacles are gated by elapsed time since the previous obstacle (and, in
//! the timer variant, by an obstacle timer fire). Coins only come from coin
//! timer fires, which are queued here and consumed on the next tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::random::RandomSource;
use super::state::{Coin, Obstacle, SessionState};
use crate::consts::*;
use crate::tuning::Tuning;

/// Horizontal spread of coin spawns past the right edge
pub const COIN_SPREAD_X: f32 = 200.0;
/// Lowest coin height above the vehicle's resting top edge
pub const COIN_MIN_LIFT: f32 = 80.0;
/// Height band coins are spread over above `COIN_MIN_LIFT`
pub const COIN_LIFT_BAND: f32 = 120.0;

/// Interval timers that feed the spawner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerKind {
    CoinSpawn,
    ObstacleSpawn,
}

/// What one spawn pass produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnReport {
    pub obstacle: Option<u32>,
    pub coins: u32,
}

/// Spawn cadence state for one session
#[derive(Debug, Clone, Default)]
pub struct Spawner {
    /// Timestamp of the last obstacle spawn
    last_obstacle_ms: Option<f64>,
    /// Coin timer fires not yet consumed
    pending_coins: u32,
    /// An obstacle timer fire not yet consumed
    obstacle_armed: bool,
}

impl Spawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget all cadence state (session start)
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Record an interval timer fire
    pub fn queue(&mut self, timer: TimerKind) {
        match timer {
            TimerKind::CoinSpawn => self.pending_coins += 1,
            TimerKind::ObstacleSpawn => self.obstacle_armed = true,
        }
    }

    pub fn pending_coins(&self) -> u32 {
        self.pending_coins
    }

    pub fn last_obstacle_ms(&self) -> Option<f64> {
        self.last_obstacle_ms
    }

    /// Run one spawn pass for the tick at `now_ms`
    pub fn spawn(
        &mut self,
        state: &mut SessionState,
        tuning: &Tuning,
        rng: &mut dyn RandomSource,
        now_ms: f64,
    ) -> SpawnReport {
        let obstacle = self.try_spawn_obstacle(state, tuning, rng, now_ms);

        let mut coins = 0;
        while self.pending_coins > 0 {
            self.pending_coins -= 1;
            if self.try_spawn_coin(state, tuning, rng) {
                coins += 1;
            }
        }

        SpawnReport { obstacle, coins }
    }

    fn gate_open(&self, tuning: &Tuning, now_ms: f64) -> bool {
        match self.last_obstacle_ms {
            None => true,
            Some(last) => now_ms - last >= tuning.obstacle_interval_ms,
        }
    }

    fn try_spawn_obstacle(
        &mut self,
        state: &mut SessionState,
        tuning: &Tuning,
        rng: &mut dyn RandomSource,
        now_ms: f64,
    ) -> Option<u32> {
        if tuning.obstacle_timer && !self.obstacle_armed {
            return None;
        }
        if !self.gate_open(tuning, now_ms) || tuning.obstacles.is_empty() {
            return None;
        }
        self.last_obstacle_ms = Some(now_ms);
        self.obstacle_armed = false;

        let spec = tuning.obstacles[rng.next_index(tuning.obstacles.len())];
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle {
            id,
            kind: spec.kind,
            x: FIELD_WIDTH,
            y: GROUND_SURFACE_Y - spec.height,
            width: spec.width,
            height: spec.height,
        });
        log::debug!("Spawned {} #{id} at {now_ms:.0}ms", spec.kind.as_str());
        Some(id)
    }

    fn try_spawn_coin(
        &mut self,
        state: &mut SessionState,
        tuning: &Tuning,
        rng: &mut dyn RandomSource,
    ) -> bool {
        if rng.next_f32() < tuning.coin_skip_chance {
            return false;
        }
        let x = FIELD_WIDTH + rng.next_f32() * COIN_SPREAD_X;
        let y = GROUND_Y - COIN_MIN_LIFT - rng.next_f32() * COIN_LIFT_BAND;
        let id = state.next_entity_id();
        state.coins.push(Coin {
            id,
            pos: Vec2::new(x, y),
            collected: false,
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ObstacleKind;
    use crate::sim::random::{ScriptedRandom, SeededRandom};

    #[test]
    fn test_obstacle_gate() {
        let tuning = Tuning::classic();
        let mut state = SessionState::new();
        let mut spawner = Spawner::new();
        let mut rng = ScriptedRandom::constant(0.0);

        assert!(spawner.spawn(&mut state, &tuning, &mut rng, 0.0).obstacle.is_some());
        assert!(spawner.spawn(&mut state, &tuning, &mut rng, 1000.0).obstacle.is_none());
        assert!(spawner.spawn(&mut state, &tuning, &mut rng, 1499.0).obstacle.is_none());
        assert!(spawner.spawn(&mut state, &tuning, &mut rng, 1500.0).obstacle.is_some());
        assert_eq!(state.obstacles.len(), 2);
        assert_eq!(spawner.last_obstacle_ms(), Some(1500.0));
    }

    #[test]
    fn test_obstacle_placement_on_ground() {
        let tuning = Tuning::classic();
        let mut state = SessionState::new();
        let mut spawner = Spawner::new();
        // Index 1 of 4 kinds = barrier
        let mut rng = ScriptedRandom::constant(0.3);
        spawner.spawn(&mut state, &tuning, &mut rng, 0.0);

        let o = &state.obstacles[0];
        assert_eq!(o.kind, ObstacleKind::Barrier);
        assert_eq!(o.x, FIELD_WIDTH);
        assert_eq!(o.y + o.height, GROUND_SURFACE_Y);
        assert_eq!((o.width, o.height), (45.0, 70.0));
    }

    #[test]
    fn test_hole_is_flush_strip() {
        let tuning = Tuning::classic();
        let mut state = SessionState::new();
        let mut spawner = Spawner::new();
        let mut rng = ScriptedRandom::constant(0.9);
        spawner.spawn(&mut state, &tuning, &mut rng, 0.0);

        let hole = &state.obstacles[0];
        assert_eq!(hole.kind, ObstacleKind::Hole);
        assert_eq!(hole.y + hole.height, GROUND_SURFACE_Y);
        assert!(hole.height <= 10.0);
    }

    #[test]
    fn test_coins_need_timer_fire() {
        let tuning = Tuning::classic();
        let mut state = SessionState::new();
        let mut spawner = Spawner::new();
        let mut rng = ScriptedRandom::new(vec![0.5, 0.5, 0.5]);

        spawner.spawn(&mut state, &tuning, &mut rng, 0.0);
        assert!(state.coins.is_empty());

        spawner.queue(TimerKind::CoinSpawn);
        assert_eq!(spawner.pending_coins(), 1);
        let report = spawner.spawn(&mut state, &tuning, &mut rng, 100.0);
        assert_eq!(report.coins, 1);
        assert_eq!(spawner.pending_coins(), 0);

        let coin = &state.coins[0];
        assert!(!coin.collected);
        assert_eq!(coin.pos.x, FIELD_WIDTH + 100.0);
        assert_eq!(coin.pos.y, GROUND_Y - COIN_MIN_LIFT - 60.0);
    }

    #[test]
    fn test_coin_skip_chance() {
        let tuning = Tuning::classic();
        let mut state = SessionState::new();
        let mut spawner = Spawner::new();
        // Obstacle kind draw, then a skip roll under 0.3
        let mut rng = ScriptedRandom::new(vec![0.0, 0.1]);
        spawner.queue(TimerKind::CoinSpawn);
        let report = spawner.spawn(&mut state, &tuning, &mut rng, 0.0);
        assert_eq!(report.coins, 0);
        assert!(state.coins.is_empty());
    }

    #[test]
    fn test_timer_variant_needs_obstacle_fire() {
        let tuning = Tuning::ramp();
        let mut state = SessionState::new();
        let mut spawner = Spawner::new();
        let mut rng = SeededRandom::new(3);

        assert!(spawner.spawn(&mut state, &tuning, &mut rng, 0.0).obstacle.is_none());
        spawner.queue(TimerKind::ObstacleSpawn);
        assert!(spawner.spawn(&mut state, &tuning, &mut rng, 10.0).obstacle.is_some());
        // Fire consumed
        assert!(spawner.spawn(&mut state, &tuning, &mut rng, 5000.0).obstacle.is_none());
    }

    #[test]
    fn test_spawn_kinds_cover_table() {
        let tuning = Tuning::ramp();
        let mut state = SessionState::new();
        let mut spawner = Spawner::new();
        let mut rng = SeededRandom::new(11);
        for i in 0..200 {
            spawner.queue(TimerKind::ObstacleSpawn);
            spawner.spawn(&mut state, &tuning, &mut rng, i as f64 * 2000.0);
        }
        for spec in &tuning.obstacles {
            assert!(state.obstacles.iter().any(|o| o.kind == spec.kind));
        }
        assert!(!state.obstacles.iter().any(|o| o.kind == ObstacleKind::Cone));
    }
}
