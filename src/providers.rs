//! Contracts for the external collaborators the controller consumes.
//!
//! The exploration core never computes occupancy grids, never plans
//! paths, and never drives the robot. It reaches those subsystems
//! through the traits below; the decision loop only assumes what the
//! contracts state.

use thiserror::Error;

use crate::geometry::WorldPoint;

/// Failure of an external collaborator.
///
/// Always transient from the controller's perspective: the current tick
/// is skipped and the query retried on the next one.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),

    #[error("collaborator timed out: {0}")]
    Timeout(String),
}

/// A frontier candidate produced by the external search.
///
/// Lists handed to the controller are sorted ascending by `cost` and are
/// valid for a single tick only; a fresh search replaces them entirely.
#[derive(Clone, Debug)]
pub struct Frontier {
    /// Centroid of the frontier region
    pub centroid: WorldPoint,
    /// Selection cost, lower is better. The formula is owned by the
    /// search; the controller only relies on the ordering.
    pub cost: f32,
    /// Boundary points describing the frontier extent
    pub points: Vec<WorldPoint>,
    /// Size measure (frontier cell count)
    pub size: usize,
}

/// Weights and thresholds passed through to the frontier search.
///
/// Opaque to the controller; it carries them from configuration to the
/// search and never interprets them.
#[derive(Clone, Copy, Debug)]
pub struct SearchParams {
    pub potential_scale: f32,
    pub orientation_scale: f32,
    pub gain_scale: f32,
    /// Minimum frontier extent worth reporting (meters)
    pub min_frontier_size: f32,
}

/// Occupancy map and robot pose queries.
pub trait MapSource {
    /// Current robot position in the global frame.
    fn current_pose(&self) -> Result<WorldPoint, ProviderError>;

    /// Grid cell size in meters. Fixed for the lifetime of a map.
    fn resolution(&self) -> f32;

    /// Identifier of the global frame, passed through to visualization.
    fn global_frame_id(&self) -> &str;
}

/// Frontier search seeded at a position.
pub trait FrontierSearch {
    /// Candidates sorted ascending by cost. An empty list means the map
    /// holds no reachable unknown space.
    fn search_from(&mut self, from: WorldPoint) -> Result<Vec<Frontier>, ProviderError>;
}

/// Navigation goal dispatch.
///
/// Fire and forget: whether the robot actually reaches the goal is
/// observed only through the progress monitor's distance tracking, never
/// through a callback.
pub trait GoalExecutor {
    fn send_goal(&mut self, goal: WorldPoint) -> Result<(), ProviderError>;
}
