//! Session simulation
//!
//! Everything that decides what happens during a run lives here:
//! - Per-tick steps only, driven by the frame callback
//! - Randomness only through an injected `RandomSource`
//! - No platform dependencies; rendering is reached through `DrawSurface`

pub mod collision;
pub mod physics;
pub mod random;
pub mod scoring;
pub mod session;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::Aabb;
pub use random::{RandomSource, ScriptedRandom, SeededRandom};
pub use scoring::HitReport;
pub use session::{Session, SessionError, SessionEvent, SessionResult, TickOutcome, TickReport};
pub use spawner::{SpawnReport, Spawner, TimerKind};
pub use state::{Coin, Obstacle, ObstacleKind, SessionPhase, SessionState, Vehicle};
pub use tick::{StepContext, StepReport, jump, step};
