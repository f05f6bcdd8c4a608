//! Platform abstraction layer
//!
//! The session never loops on its own. It asks a `Scheduler` for the next
//! animation frame and for interval timers, and cancels them when it leaves
//! `Playing`. The browser shell implements this on `requestAnimationFrame`
//! and `setInterval`; `manual::ManualScheduler` drives a virtual clock for
//! the headless runner and tests.

pub mod manual;

pub use crate::sim::TimerKind;
pub use manual::{Due, ManualScheduler};

/// What a scheduled callback will invoke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackKind {
    /// One-shot animation frame
    Frame,
    /// Repeating timer
    Interval(TimerKind),
}

/// Opaque registration returned by a scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackHandle {
    pub kind: CallbackKind,
    pub id: i32,
}

/// Registers and cancels callbacks on behalf of a session
pub trait Scheduler {
    /// Request one animation frame
    fn request_frame(&mut self) -> CallbackHandle;

    /// Start a repeating timer
    fn start_interval(&mut self, timer: TimerKind, period_ms: f64) -> CallbackHandle;

    /// Cancel a frame or timer. Cancelling a spent frame is harmless.
    fn cancel(&mut self, handle: CallbackHandle);
}
