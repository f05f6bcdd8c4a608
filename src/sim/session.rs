//! Session state machine
//!
//! `Idle -> Playing <-> Paused -> Ended -> Idle`. The session owns the
//! per-run state and every callback registration made on its behalf: entering
//! `Playing` arms one animation frame plus the spawn timers, leaving it
//! cancels all of them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::random::RandomSource;
use super::spawner::{Spawner, TimerKind};
use super::state::{SessionPhase, SessionState};
use super::tick::{self, StepContext};
use crate::config::{GameMode, RunConfig};
use crate::platform::{CallbackHandle, CallbackKind, Due, Scheduler};
use crate::renderer::scene::{Frame, draw_frame};
use crate::renderer::surface::DrawSurface;
use crate::tuning::Tuning;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("no drawing surface attached")]
    NoSurface,
    #[error("cannot {action} while {from:?}")]
    InvalidTransition {
        from: SessionPhase,
        action: &'static str,
    },
}

/// Live counters mirrored to the shell after every tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub score: u64,
    pub distance: f32,
    pub collected_coins: u32,
    pub jump_count: u32,
    pub lives: u8,
}

/// Final aggregate of a run that ended naturally
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    pub score: u64,
    pub distance: f32,
    pub collected_coins: u32,
    pub jump_count: u32,
    pub stars: u8,
    pub lives_remaining: u8,
    pub mode: GameMode,
}

/// Notifications for the shell, drained with `Session::drain_events`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    Tick(TickReport),
    Ended(SessionResult),
    /// Shell-initiated exit; no reward applies
    Aborted,
}

/// What a call to `Session::tick` did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Not playing; nothing advanced
    Skipped,
    Advanced(TickReport),
    /// This tick ended the run
    Ended(SessionResult),
}

pub struct Session {
    phase: SessionPhase,
    state: SessionState,
    config: RunConfig,
    tuning: Tuning,
    spawner: Spawner,
    rng: Box<dyn RandomSource>,
    scheduler: Box<dyn Scheduler>,
    surface: Option<Box<dyn DrawSurface>>,
    frame: Option<CallbackHandle>,
    timers: Vec<CallbackHandle>,
    events: Vec<SessionEvent>,
    last_frame_ms: f64,
}

impl Session {
    pub fn new(tuning: Tuning, rng: Box<dyn RandomSource>, scheduler: Box<dyn Scheduler>) -> Self {
        Self {
            phase: SessionPhase::Idle,
            state: SessionState::new(),
            config: RunConfig::default(),
            tuning,
            spawner: Spawner::new(),
            rng,
            scheduler,
            surface: None,
            frame: None,
            timers: Vec::new(),
            events: Vec::new(),
            last_frame_ms: 0.0,
        }
    }

    /// Attach the drawing surface; required before `start`
    pub fn attach_surface(&mut self, surface: Box<dyn DrawSurface>) {
        self.surface = Some(surface);
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Registrations currently held (frame + timers)
    pub fn armed_callbacks(&self) -> usize {
        self.frame.iter().count() + self.timers.len()
    }

    /// Take all pending events in emission order
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        log::warn!("Rejected {action} while {:?}", self.phase);
        SessionError::InvalidTransition {
            from: self.phase,
            action,
        }
    }

    /// Arm a fresh run
    pub fn start(&mut self, config: RunConfig) -> Result<(), SessionError> {
        if !matches!(self.phase, SessionPhase::Idle | SessionPhase::Ended) {
            return Err(self.invalid("start"));
        }
        if self.surface.is_none() {
            return Err(SessionError::NoSurface);
        }

        self.config = config.sanitized();
        self.state = SessionState::new();
        self.spawner.reset();
        self.phase = SessionPhase::Playing;
        self.arm();

        log::info!(
            "Session started ({} mode, speed {} jump {} defense {})",
            self.config.mode.as_str(),
            self.config.stats.speed,
            self.config.stats.jump,
            self.config.stats.defense
        );
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Playing {
            return Err(self.invalid("pause"));
        }
        self.disarm();
        self.phase = SessionPhase::Paused;
        self.render(self.last_frame_ms);
        log::info!("Session paused at tick {}", self.state.time_ticks);
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Paused {
            return Err(self.invalid("resume"));
        }
        self.phase = SessionPhase::Playing;
        self.arm();
        log::info!("Session resumed");
        Ok(())
    }

    pub fn toggle_pause(&mut self) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::Playing => self.pause(),
            SessionPhase::Paused => self.resume(),
            _ => Err(self.invalid("toggle pause")),
        }
    }

    /// Frame callback. Advances one tick while playing, otherwise does nothing.
    pub fn tick(&mut self, now_ms: f64) -> TickOutcome {
        if self.phase != SessionPhase::Playing {
            return TickOutcome::Skipped;
        }
        // This frame is spent; make sure no other is left behind
        if let Some(handle) = self.frame.take() {
            self.scheduler.cancel(handle);
        }
        self.last_frame_ms = now_ms;

        let ctx = StepContext {
            tuning: &self.tuning,
            config: &self.config,
            now_ms,
        };
        let step = tick::step(&mut self.state, &mut self.spawner, self.rng.as_mut(), &ctx);
        self.render(now_ms);

        let report = self.report();
        self.events.push(SessionEvent::Tick(report));

        if step.game_over() {
            let stars = self.config.stars.stars_for(self.state.distance);
            return match self.end(stars) {
                Ok(result) => TickOutcome::Ended(result),
                Err(_) => TickOutcome::Advanced(report),
            };
        }

        self.frame = Some(self.scheduler.request_frame());
        TickOutcome::Advanced(report)
    }

    /// Finish the run and emit its result
    pub fn end(&mut self, stars: u8) -> Result<SessionResult, SessionError> {
        if !matches!(self.phase, SessionPhase::Playing | SessionPhase::Paused) {
            return Err(self.invalid("end"));
        }
        self.disarm();
        self.phase = SessionPhase::Ended;

        let result = SessionResult {
            score: self.state.score,
            distance: self.state.distance,
            collected_coins: self.state.collected_coins,
            jump_count: self.state.jump_count,
            stars: stars.min(3),
            lives_remaining: self.state.lives,
            mode: self.config.mode,
        };
        self.events.push(SessionEvent::Ended(result));
        log::info!(
            "Session ended: score {} distance {:.0} stars {}",
            result.score,
            result.distance,
            result.stars
        );
        Ok(result)
    }

    /// Leave the run without a result
    pub fn abort(&mut self) -> Result<(), SessionError> {
        if self.phase == SessionPhase::Idle {
            return Err(self.invalid("abort"));
        }
        let was = self.phase;
        self.disarm();
        self.phase = SessionPhase::Idle;
        // An ended run already reported its result
        if was != SessionPhase::Ended {
            self.events.push(SessionEvent::Aborted);
            log::info!("Session aborted");
        }
        Ok(())
    }

    /// Interval timer callback. Returns whether the fire was queued.
    pub fn on_timer(&mut self, timer: TimerKind) -> bool {
        if self.phase != SessionPhase::Playing {
            return false;
        }
        self.spawner.queue(timer);
        true
    }

    /// Jump input. Returns whether the jump was applied.
    pub fn jump(&mut self) -> bool {
        if self.phase != SessionPhase::Playing {
            return false;
        }
        tick::jump(&mut self.state, &self.tuning, &self.config)
    }

    /// Route a fired callback to `tick` or `on_timer`
    pub fn dispatch(&mut self, due: Due) -> Option<TickOutcome> {
        match due.kind {
            CallbackKind::Frame => Some(self.tick(due.at_ms)),
            CallbackKind::Interval(timer) => {
                self.on_timer(timer);
                None
            }
        }
    }

    fn report(&self) -> TickReport {
        TickReport {
            score: self.state.score,
            distance: self.state.distance,
            collected_coins: self.state.collected_coins,
            jump_count: self.state.jump_count,
            lives: self.state.lives,
        }
    }

    fn render(&mut self, time_ms: f64) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        draw_frame(
            surface.as_mut(),
            &Frame {
                state: &self.state,
                config: &self.config,
                tuning: &self.tuning,
                time_ms,
                paused: self.phase == SessionPhase::Paused,
            },
        );
    }

    fn arm(&mut self) {
        if self.frame.is_none() {
            self.frame = Some(self.scheduler.request_frame());
        }
        if self.timers.is_empty() {
            self.timers.push(
                self.scheduler
                    .start_interval(TimerKind::CoinSpawn, self.tuning.coin_interval_ms),
            );
            if self.tuning.obstacle_timer {
                self.timers.push(
                    self.scheduler
                        .start_interval(TimerKind::ObstacleSpawn, self.tuning.obstacle_interval_ms),
                );
            }
        }
    }

    fn disarm(&mut self) {
        if let Some(handle) = self.frame.take() {
            self.scheduler.cancel(handle);
        }
        for handle in self.timers.drain(..) {
            self.scheduler.cancel(handle);
        }
    }
}
