//! One simulation step
//!
//! Physics → spawner → resolver, in that order, over the session state.
//! The session state machine owns phases and callbacks; this only advances
//! the world.

use super::physics::{apply_jump, cull_offscreen, integrate_vehicle, scroll_entities};
use super::random::RandomSource;
use super::scoring::{HitReport, accrue_progress, resolve_coins, resolve_obstacles};
use super::spawner::{SpawnReport, Spawner};
use super::state::SessionState;
use crate::config::{GameMode, RunConfig};
use crate::tuning::Tuning;

/// Everything a step reads but does not own
pub struct StepContext<'a> {
    pub tuning: &'a Tuning,
    pub config: &'a RunConfig,
    /// Frame timestamp (ms)
    pub now_ms: f64,
}

/// What happened during one step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    pub spawned: SpawnReport,
    pub hits: HitReport,
    pub coins: u32,
}

impl StepReport {
    pub fn game_over(&self) -> bool {
        self.hits.fatal
    }
}

/// Advance the world by one tick
pub fn step(
    state: &mut SessionState,
    spawner: &mut Spawner,
    rng: &mut dyn RandomSource,
    ctx: &StepContext,
) -> StepReport {
    let tuning = ctx.tuning;
    let stats = &ctx.config.stats;
    let game_speed = tuning.game_speed(stats.speed);

    state.time_ticks += 1;

    // Physics
    integrate_vehicle(&mut state.vehicle, tuning.gravity);
    scroll_entities(&mut state.obstacles, &mut state.coins, game_speed);
    cull_offscreen(
        &mut state.obstacles,
        &mut state.coins,
        tuning.obstacle_despawn_margin,
        tuning.coin_despawn_x,
    );

    // Spawning
    let spawned = spawner.spawn(state, tuning, rng, ctx.now_ms);

    // Collisions
    let hits = resolve_obstacles(state, tuning, stats.defense, rng);
    if hits.fatal {
        return StepReport {
            spawned,
            hits,
            coins: 0,
        };
    }

    let coins = resolve_coins(state, tuning);
    accrue_progress(state, tuning, game_speed);

    StepReport {
        spawned,
        hits,
        coins,
    }
}

/// Apply a jump request. Returns whether it was accepted.
pub fn jump(state: &mut SessionState, tuning: &Tuning, config: &RunConfig) -> bool {
    let power = tuning.jump_power(config.stats.jump, config.mode == GameMode::Snow);
    if apply_jump(&mut state.vehicle, power) {
        state.jump_count += 1;
        true
    } else {
        false
    }
}
