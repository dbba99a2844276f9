//! Pauses between mutating calls
//!
//! With `Listing` discovery the fixed delays give the canister time to
//! commit a milestone before it is listed. When the create reply carries
//! the id, the synchronous return is the acknowledgment and no delay is
//! needed.

use std::thread;
use std::time::Duration;

/// Delays applied during a seeding run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Pause after each milestone creation, before id discovery
    pub milestone_settle: Duration,
    /// Pause after each task creation
    pub task_gap: Duration,
}

impl Pacing {
    /// 1s after milestones, 500ms after tasks
    #[must_use]
    pub const fn fixed_delay() -> Self {
        Self {
            milestone_settle: Duration::from_secs(1),
            task_gap: Duration::from_millis(500),
        }
    }

    /// No delays
    #[must_use]
    pub const fn acknowledged() -> Self {
        Self {
            milestone_settle: Duration::ZERO,
            task_gap: Duration::ZERO,
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::fixed_delay()
    }
}

/// Something that can wait
pub trait Pacer {
    /// Block for `duration`
    fn pause(&mut self, duration: Duration);
}

/// Sleeps the current thread
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&mut self, duration: Duration) {
        if !duration.is_zero() {
            thread::sleep(duration);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn fixed_delay_defaults() {
        let pacing = Pacing::default();
        assert_eq!(pacing.milestone_settle, Duration::from_secs(1));
        assert_eq!(pacing.task_gap, Duration::from_millis(500));
    }

    #[test]
    fn thread_pacer_sleeps() {
        let start = Instant::now();
        ThreadPacer.pause(Duration::from_millis(20));
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
