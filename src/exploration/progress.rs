//! Stall detection for the active navigation goal.

use std::time::{Duration, Instant};

use crate::geometry::WorldPoint;

/// Outcome of one progress observation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Keep pursuing the active goal
    Keep,
    /// The goal has stalled; blacklist it and select afresh
    Abandon,
}

/// Tracks whether the robot is closing in on the active goal.
///
/// Holds the smallest goal distance seen so far and the wall-clock time
/// it last strictly improved. The baseline belongs to exactly one goal:
/// callers must [`retarget`](ProgressMonitor::retarget) whenever the
/// active goal changes, so progress is never compared across goals.
#[derive(Debug)]
pub struct ProgressMonitor {
    timeout: Duration,
    best_distance: Option<f32>,
    last_improved: Instant,
}

impl ProgressMonitor {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            best_distance: None,
            last_improved: Instant::now(),
        }
    }

    /// Forget the previous goal's baseline.
    pub fn retarget(&mut self) {
        self.best_distance = None;
        self.last_improved = Instant::now();
    }

    /// Record one observation of the robot relative to the active goal.
    ///
    /// Signals [`Verdict::Abandon`] only once the configured timeout has
    /// elapsed since the distance last strictly improved.
    pub fn observe(&mut self, pose: WorldPoint, goal: WorldPoint) -> Verdict {
        let distance = pose.distance(&goal);

        match self.best_distance {
            None => {
                self.best_distance = Some(distance);
                self.last_improved = Instant::now();
                Verdict::Keep
            }
            Some(best) if distance < best => {
                self.best_distance = Some(distance);
                self.last_improved = Instant::now();
                Verdict::Keep
            }
            Some(_) if self.last_improved.elapsed() >= self.timeout => Verdict::Abandon,
            Some(_) => Verdict::Keep,
        }
    }
}
