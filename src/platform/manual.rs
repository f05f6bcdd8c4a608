//! Virtual-clock scheduler
//!
//! Clones share one queue, so a test can hand one clone to the session and
//! keep another to advance time and inspect registrations.

use std::cell::RefCell;
use std::rc::Rc;

use super::{CallbackHandle, CallbackKind, Scheduler, TimerKind};

/// A callback that came due during `advance`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Due {
    pub kind: CallbackKind,
    /// Virtual timestamp of the fire
    pub at_ms: f64,
}

#[derive(Debug, Clone)]
struct Interval {
    id: i32,
    timer: TimerKind,
    period_ms: f64,
    next_fire_ms: f64,
}

#[derive(Debug, Default)]
struct Queue {
    now_ms: f64,
    next_id: i32,
    frames: Vec<i32>,
    intervals: Vec<Interval>,
    frames_requested: u64,
}

/// Deterministic scheduler driven by explicit `advance` calls
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    queue: Rc<RefCell<Queue>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> f64 {
        self.queue.borrow().now_ms
    }

    /// Frames requested and not yet fired or cancelled
    pub fn pending_frames(&self) -> usize {
        self.queue.borrow().frames.len()
    }

    /// Live interval timers
    pub fn active_intervals(&self) -> usize {
        self.queue.borrow().intervals.len()
    }

    /// Total frame requests ever made
    pub fn frames_requested(&self) -> u64 {
        self.queue.borrow().frames_requested
    }

    /// True when nothing is scheduled
    pub fn is_quiet(&self) -> bool {
        let q = self.queue.borrow();
        q.frames.is_empty() && q.intervals.is_empty()
    }

    /// Move the clock forward and return everything that came due, timers
    /// before the frame. Frames requested while handling the result fire on
    /// the next call.
    pub fn advance(&self, dt_ms: f64) -> Vec<Due> {
        let mut q = self.queue.borrow_mut();
        q.now_ms += dt_ms;
        let now = q.now_ms;

        let mut due = Vec::new();
        for interval in q.intervals.iter_mut() {
            while interval.next_fire_ms <= now {
                due.push(Due {
                    kind: CallbackKind::Interval(interval.timer),
                    at_ms: interval.next_fire_ms,
                });
                interval.next_fire_ms += interval.period_ms;
            }
        }
        due.sort_by(|a, b| a.at_ms.total_cmp(&b.at_ms));

        if !q.frames.is_empty() {
            q.frames.clear();
            due.push(Due {
                kind: CallbackKind::Frame,
                at_ms: now,
            });
        }
        due
    }

    fn allocate(q: &mut Queue) -> i32 {
        q.next_id += 1;
        q.next_id
    }
}

impl Scheduler for ManualScheduler {
    fn request_frame(&mut self) -> CallbackHandle {
        let mut q = self.queue.borrow_mut();
        let id = Self::allocate(&mut q);
        q.frames.push(id);
        q.frames_requested += 1;
        CallbackHandle {
            kind: CallbackKind::Frame,
            id,
        }
    }

    fn start_interval(&mut self, timer: TimerKind, period_ms: f64) -> CallbackHandle {
        let mut q = self.queue.borrow_mut();
        let id = Self::allocate(&mut q);
        // Guard against a zero period spinning forever in `advance`
        let period_ms = period_ms.max(1.0);
        let next_fire_ms = q.now_ms + period_ms;
        q.intervals.push(Interval {
            id,
            timer,
            period_ms,
            next_fire_ms,
        });
        CallbackHandle {
            kind: CallbackKind::Interval(timer),
            id,
        }
    }

    fn cancel(&mut self, handle: CallbackHandle) {
        let mut q = self.queue.borrow_mut();
        match handle.kind {
            CallbackKind::Frame => q.frames.retain(|&id| id != handle.id),
            CallbackKind::Interval(_) => q.intervals.retain(|i| i.id != handle.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_is_one_shot() {
        let mut sched = ManualScheduler::new();
        sched.request_frame();
        let due = sched.advance(16.0);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].kind, CallbackKind::Frame);
        assert!(sched.advance(16.0).is_empty());
    }

    #[test]
    fn test_interval_fires_on_period() {
        let mut sched = ManualScheduler::new();
        sched.start_interval(TimerKind::CoinSpawn, 2000.0);
        assert!(sched.advance(1999.0).is_empty());
        let due = sched.advance(1.0);
        assert_eq!(due[0].kind, CallbackKind::Interval(TimerKind::CoinSpawn));
        assert_eq!(due[0].at_ms, 2000.0);
        assert_eq!(sched.advance(4000.0).len(), 2);
    }

    #[test]
    fn test_cancel_and_shared_view() {
        let mut sched = ManualScheduler::new();
        let observer = sched.clone();
        let frame = sched.request_frame();
        let timer = sched.start_interval(TimerKind::ObstacleSpawn, 1500.0);
        assert_eq!(observer.pending_frames(), 1);
        assert_eq!(observer.active_intervals(), 1);

        sched.cancel(frame);
        sched.cancel(timer);
        assert!(observer.is_quiet());
        assert!(observer.advance(5000.0).is_empty());
    }
}
