//! Periodic exploration decision driver.
//!
//! Each tick: query pose, query frontiers, publish markers, pick the
//! cheapest viable candidate, dispatch it if it differs from the active
//! goal, and abandon the goal if progress has stalled. All decision
//! state lives here; the map, the search, and the executor stay behind
//! their traits.

use std::time::Duration;

use crate::config::ExplorationConfig;
use crate::geometry::WorldPoint;
use crate::providers::{FrontierSearch, GoalExecutor, MapSource};
use crate::viz::{self, MarkerBatch, MarkerSink};

use super::blacklist::GoalBlacklist;
use super::progress::{ProgressMonitor, Verdict};
use super::ranker;

/// State of the exploration run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerState {
    /// No active goal; the next tick selects one
    Searching,
    /// A goal has been dispatched and is being pursued
    Navigating,
    /// No viable frontier remains. Terminal: no further goal is ever
    /// dispatched; re-entry would require an explicit blacklist reset,
    /// which is not part of the baseline contract.
    Done,
}

/// Summary of one tick, for status logging and tests.
#[derive(Clone, Debug)]
pub struct TickReport {
    pub state: ControllerState,
    pub goal: Option<WorldPoint>,
    /// Candidates returned by the search this tick (0 on a skipped tick)
    pub frontier_count: usize,
}

/// The exploration decision loop.
///
/// Owned by a single driver and ticked strictly serially; no tick ever
/// overlaps another, so the state here needs no locking.
pub struct ExplorationController {
    state: ControllerState,
    blacklist: GoalBlacklist,
    monitor: ProgressMonitor,
    goal: Option<WorldPoint>,
    visualize: bool,
    /// Markers drawn on the previous pass, so stale ids can be cleared
    last_markers_count: usize,
}

impl ExplorationController {
    /// Create a controller. `resolution` is the map cell size, fixing the
    /// blacklist tolerance for the run.
    pub fn new(config: &ExplorationConfig, resolution: f32) -> Self {
        Self {
            state: ControllerState::Searching,
            blacklist: GoalBlacklist::new(config.blacklist_tolerance_factor * resolution),
            monitor: ProgressMonitor::new(Duration::from_secs_f32(config.progress_timeout_secs)),
            goal: None,
            visualize: config.visualize,
            last_markers_count: 0,
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn goal(&self) -> Option<WorldPoint> {
        self.goal
    }

    pub fn blacklist(&self) -> &GoalBlacklist {
        &self.blacklist
    }

    /// Whether the terminal state has been reached.
    pub fn is_done(&self) -> bool {
        self.state == ControllerState::Done
    }

    /// Run one decision cycle.
    ///
    /// Collaborator failures are transient: the tick is skipped with a
    /// warning and nothing in the decision state changes. Never panics,
    /// never returns an error.
    pub fn tick(
        &mut self,
        map: &dyn MapSource,
        search: &mut dyn FrontierSearch,
        executor: &mut dyn GoalExecutor,
        mut sink: Option<&mut (dyn MarkerSink + '_)>,
    ) -> TickReport {
        if self.state == ControllerState::Done {
            return self.report(0);
        }

        let pose = match map.current_pose() {
            Ok(pose) => pose,
            Err(e) => {
                tracing::warn!("pose unavailable, skipping tick: {e}");
                return self.report(0);
            }
        };

        let frontiers = match search.search_from(pose) {
            Ok(frontiers) => frontiers,
            Err(e) => {
                tracing::warn!("frontier search failed, skipping tick: {e}");
                return self.report(0);
            }
        };
        tracing::debug!("found {} frontiers", frontiers.len());

        if self.visualize && let Some(sink) = sink.as_deref_mut() {
            let markers = viz::frontier_markers(&frontiers, &self.blacklist);
            let stale = self.last_markers_count.saturating_sub(markers.len());
            self.last_markers_count = markers.len();
            sink.publish(&MarkerBatch {
                frame_id: map.global_frame_id().to_string(),
                markers,
                stale,
            });
        }

        let target = match ranker::select_goal(&frontiers, &self.blacklist) {
            Some(target) => target,
            None => {
                tracing::info!(
                    "exploration complete: no viable frontier ({} candidates, {} blacklisted)",
                    frontiers.len(),
                    self.blacklist.len()
                );
                self.goal = None;
                self.monitor.retarget();
                self.state = ControllerState::Done;
                return self.report(frontiers.len());
            }
        };

        // A candidate at the active goal's location is the same goal;
        // anything further away replaces it.
        let is_new = !self.goal.is_some_and(|goal| goal.same_location(&target));
        if is_new {
            tracing::info!("new goal ({:.2}, {:.2})", target.x, target.y);
            self.goal = Some(target);
            self.monitor.retarget();
            self.state = ControllerState::Navigating;
            if let Err(e) = executor.send_goal(target) {
                // Not fatal: an undispatched goal makes no progress and
                // falls to the timeout below.
                tracing::warn!("goal dispatch failed: {e}");
            }
        }

        if let Some(goal) = self.goal
            && self.monitor.observe(pose, goal) == Verdict::Abandon
        {
            tracing::warn!(
                "no progress toward ({:.2}, {:.2}), blacklisting goal",
                goal.x,
                goal.y
            );
            self.blacklist.add(goal);
            self.goal = None;
            self.monitor.retarget();
            self.state = ControllerState::Searching;
        }

        self.report(frontiers.len())
    }

    fn report(&self, frontier_count: usize) -> TickReport {
        TickReport {
            state: self.state,
            goal: self.goal,
            frontier_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{Frontier, ProviderError};

    struct StubMap {
        pose: WorldPoint,
        fail: bool,
    }

    impl StubMap {
        fn at(x: f32, y: f32) -> Self {
            Self {
                pose: WorldPoint::new(x, y),
                fail: false,
            }
        }
    }

    impl MapSource for StubMap {
        fn current_pose(&self) -> Result<WorldPoint, ProviderError> {
            if self.fail {
                Err(ProviderError::Unavailable("stub map down".into()))
            } else {
                Ok(self.pose)
            }
        }

        fn resolution(&self) -> f32 {
            0.05
        }

        fn global_frame_id(&self) -> &str {
            "map"
        }
    }

    struct StubSearch {
        frontiers: Vec<Frontier>,
        fail: bool,
    }

    impl StubSearch {
        fn with(frontiers: Vec<Frontier>) -> Self {
            Self {
                frontiers,
                fail: false,
            }
        }
    }

    impl FrontierSearch for StubSearch {
        fn search_from(&mut self, _from: WorldPoint) -> Result<Vec<Frontier>, ProviderError> {
            if self.fail {
                Err(ProviderError::Timeout("stub search timed out".into()))
            } else {
                Ok(self.frontiers.clone())
            }
        }
    }

    #[derive(Default)]
    struct StubExecutor {
        sent: Vec<WorldPoint>,
    }

    impl GoalExecutor for StubExecutor {
        fn send_goal(&mut self, goal: WorldPoint) -> Result<(), ProviderError> {
            self.sent.push(goal);
            Ok(())
        }
    }

    #[derive(Default)]
    struct CaptureSink {
        batches: Vec<MarkerBatch>,
    }

    impl MarkerSink for CaptureSink {
        fn publish(&mut self, batch: &MarkerBatch) {
            self.batches.push(batch.clone());
        }
    }

    fn frontier(x: f32, y: f32, cost: f32) -> Frontier {
        Frontier {
            centroid: WorldPoint::new(x, y),
            cost,
            points: vec![WorldPoint::new(x, y)],
            size: 10,
        }
    }

    fn config(timeout_secs: f32) -> ExplorationConfig {
        ExplorationConfig {
            progress_timeout_secs: timeout_secs,
            ..Default::default()
        }
    }

    #[test]
    fn test_dispatches_cheapest_frontier() {
        let mut controller = ExplorationController::new(&config(30.0), 0.05);
        let map = StubMap::at(0.0, 0.0);
        let mut search =
            StubSearch::with(vec![frontier(5.0, 5.0, 1.0), frontier(10.0, 10.0, 2.0)]);
        let mut executor = StubExecutor::default();

        let report = controller.tick(&map, &mut search, &mut executor, None);

        assert_eq!(report.state, ControllerState::Navigating);
        assert_eq!(report.goal, Some(WorldPoint::new(5.0, 5.0)));
        assert_eq!(executor.sent, vec![WorldPoint::new(5.0, 5.0)]);
    }

    #[test]
    fn test_same_goal_not_redispatched() {
        let mut controller = ExplorationController::new(&config(30.0), 0.05);
        let map = StubMap::at(0.0, 0.0);
        let mut search = StubSearch::with(vec![frontier(5.0, 5.0, 1.0)]);
        let mut executor = StubExecutor::default();

        controller.tick(&map, &mut search, &mut executor, None);
        controller.tick(&map, &mut search, &mut executor, None);

        assert_eq!(executor.sent.len(), 1);
    }

    #[test]
    fn test_stall_blacklists_and_reselects() {
        // zero timeout: the second observation of an unchanged distance
        // abandons immediately
        let mut controller = ExplorationController::new(&config(0.0), 0.05);
        let map = StubMap::at(0.0, 0.0);
        let mut search =
            StubSearch::with(vec![frontier(5.0, 5.0, 1.0), frontier(10.0, 10.0, 2.0)]);
        let mut executor = StubExecutor::default();

        // tick 1: dispatch (5,5); tick 2: abandon it
        controller.tick(&map, &mut search, &mut executor, None);
        let report = controller.tick(&map, &mut search, &mut executor, None);
        assert_eq!(report.state, ControllerState::Searching);
        assert_eq!(report.goal, None);
        assert!(controller.blacklist().contains(WorldPoint::new(5.0, 5.0)));

        // tick 3: the cheapest viable candidate is now (10,10)
        let report = controller.tick(&map, &mut search, &mut executor, None);
        assert_eq!(report.goal, Some(WorldPoint::new(10.0, 10.0)));

        // ticks 4-5: abandon that too, then every candidate is excluded
        controller.tick(&map, &mut search, &mut executor, None);
        let report = controller.tick(&map, &mut search, &mut executor, None);
        assert_eq!(report.state, ControllerState::Done);
        assert!(controller.is_done());
        assert_eq!(executor.sent.len(), 2);
    }

    #[test]
    fn test_empty_search_terminates() {
        let mut controller = ExplorationController::new(&config(30.0), 0.05);
        let map = StubMap::at(0.0, 0.0);
        let mut search = StubSearch::with(Vec::new());
        let mut executor = StubExecutor::default();

        let report = controller.tick(&map, &mut search, &mut executor, None);
        assert_eq!(report.state, ControllerState::Done);

        // terminal: even if the search would now find candidates,
        // nothing is dispatched
        search.frontiers = vec![frontier(5.0, 5.0, 1.0)];
        let report = controller.tick(&map, &mut search, &mut executor, None);
        assert_eq!(report.state, ControllerState::Done);
        assert!(executor.sent.is_empty());
    }

    #[test]
    fn test_transient_pose_failure_skips_tick() {
        let mut controller = ExplorationController::new(&config(30.0), 0.05);
        let mut map = StubMap::at(0.0, 0.0);
        map.fail = true;
        let mut search = StubSearch::with(vec![frontier(5.0, 5.0, 1.0)]);
        let mut executor = StubExecutor::default();

        let report = controller.tick(&map, &mut search, &mut executor, None);
        assert_eq!(report.state, ControllerState::Searching);
        assert!(executor.sent.is_empty());

        // provider recovers: the next tick proceeds normally
        map.fail = false;
        let report = controller.tick(&map, &mut search, &mut executor, None);
        assert_eq!(report.state, ControllerState::Navigating);
        assert_eq!(executor.sent.len(), 1);
    }

    #[test]
    fn test_transient_search_failure_skips_tick() {
        let mut controller = ExplorationController::new(&config(30.0), 0.05);
        let map = StubMap::at(0.0, 0.0);
        let mut search = StubSearch::with(vec![frontier(5.0, 5.0, 1.0)]);
        search.fail = true;
        let mut executor = StubExecutor::default();

        // a timed-out search must not be mistaken for "no frontiers"
        let report = controller.tick(&map, &mut search, &mut executor, None);
        assert_eq!(report.state, ControllerState::Searching);
        assert!(executor.sent.is_empty());

        search.fail = false;
        let report = controller.tick(&map, &mut search, &mut executor, None);
        assert_eq!(report.state, ControllerState::Navigating);
    }

    #[test]
    fn test_marker_batches_clear_stale_ids() {
        let mut controller = ExplorationController::new(
            &ExplorationConfig {
                visualize: true,
                ..Default::default()
            },
            0.05,
        );
        let map = StubMap::at(0.0, 0.0);
        let mut executor = StubExecutor::default();
        let mut sink = CaptureSink::default();

        let mut search =
            StubSearch::with(vec![frontier(5.0, 5.0, 1.0), frontier(10.0, 10.0, 2.0)]);
        controller.tick(&map, &mut search, &mut executor, Some(&mut sink));

        // the list shrinks: one previously drawn marker is now stale
        search.frontiers = vec![frontier(10.0, 10.0, 2.0)];
        controller.tick(&map, &mut search, &mut executor, Some(&mut sink));

        assert_eq!(sink.batches.len(), 2);
        assert_eq!(sink.batches[0].markers.len(), 2);
        assert_eq!(sink.batches[0].stale, 0);
        assert_eq!(sink.batches[0].frame_id, "map");
        assert_eq!(sink.batches[1].markers.len(), 1);
        assert_eq!(sink.batches[1].stale, 1);
    }

    #[test]
    fn test_no_markers_when_visualize_disabled() {
        let mut controller = ExplorationController::new(&config(30.0), 0.05);
        let map = StubMap::at(0.0, 0.0);
        let mut search = StubSearch::with(vec![frontier(5.0, 5.0, 1.0)]);
        let mut executor = StubExecutor::default();
        let mut sink = CaptureSink::default();

        controller.tick(&map, &mut search, &mut executor, Some(&mut sink));
        assert!(sink.batches.is_empty());
    }
}
