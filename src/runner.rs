//! Periodic run loop for the exploration controller.
//!
//! Owns the controller and its collaborators and drives one tick per
//! configured period. Strictly serial: the next tick starts only after
//! the previous one returns, so no controller state needs locking. The
//! shutdown flag is checked at the top of every cycle, before any
//! collaborator is touched, so cancellation never races a goal dispatch.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::config::ExplorationConfig;
use crate::exploration::{ControllerState, ExplorationController, TickReport};
use crate::providers::{FrontierSearch, GoalExecutor, MapSource};
use crate::viz::MarkerSink;

pub struct ExplorationLoop {
    controller: ExplorationController,
    map: Box<dyn MapSource>,
    search: Box<dyn FrontierSearch>,
    executor: Box<dyn GoalExecutor>,
    sink: Option<Box<dyn MarkerSink>>,
    interval: Duration,
    stop_on_complete: bool,
    shutdown: Arc<AtomicBool>,
    last_status: Instant,
    status_interval: Duration,
}

impl ExplorationLoop {
    pub fn new(
        config: &ExplorationConfig,
        map: Box<dyn MapSource>,
        search: Box<dyn FrontierSearch>,
        executor: Box<dyn GoalExecutor>,
        sink: Option<Box<dyn MarkerSink>>,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        let resolution = map.resolution();
        // guard against a zero/negative frequency in hand-edited configs
        let frequency = config.planner_frequency.max(0.01);
        Self {
            controller: ExplorationController::new(config, resolution),
            map,
            search,
            executor,
            sink,
            interval: Duration::from_secs_f32(1.0 / frequency),
            stop_on_complete: config.stop_on_complete,
            shutdown,
            last_status: Instant::now(),
            status_interval: Duration::from_secs(3),
        }
    }

    /// Run until exploration completes or shutdown is requested.
    pub fn run(&mut self) {
        tracing::info!(
            "exploration loop started, period {:.2}s",
            self.interval.as_secs_f32()
        );

        loop {
            let tick_start = Instant::now();

            if self.shutdown.load(Ordering::Acquire) {
                tracing::info!("shutdown requested, stopping exploration loop");
                break;
            }

            let report = self.controller.tick(
                self.map.as_ref(),
                self.search.as_mut(),
                self.executor.as_mut(),
                self.sink.as_deref_mut(),
            );

            if self.last_status.elapsed() >= self.status_interval {
                self.log_status(&report);
                self.last_status = Instant::now();
            }

            if report.state == ControllerState::Done && self.stop_on_complete {
                tracing::info!("exploration complete, stopping loop");
                break;
            }

            let elapsed = tick_start.elapsed();
            if elapsed < self.interval {
                std::thread::sleep(self.interval - elapsed);
            }
        }

        tracing::info!("exploration loop exited");
    }

    pub fn controller(&self) -> &ExplorationController {
        &self.controller
    }

    fn log_status(&self, report: &TickReport) {
        let state = match report.state {
            ControllerState::Searching => "searching",
            ControllerState::Navigating => "navigating",
            ControllerState::Done => "done",
        };

        match report.goal {
            Some(goal) => tracing::info!(
                "exploring: state={}, goal=({:.2}, {:.2}), frontiers={}, blacklisted={}",
                state,
                goal.x,
                goal.y,
                report.frontier_count,
                self.controller.blacklist().len()
            ),
            None => tracing::info!(
                "exploring: state={}, no goal, frontiers={}, blacklisted={}",
                state,
                report.frontier_count,
                self.controller.blacklist().len()
            ),
        }
    }
}
