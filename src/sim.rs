//! Simulated collaborators for running Anvesha without a robot.
//!
//! A small in-process world stands in for the mapping stack, the
//! frontier search, and the navigation executor, so the binary can drive
//! the decision loop end to end on a workstation. The simulated search
//! honors only the contract the controller relies on (a cost-ascending
//! candidate list); its cost formula is a stand-in for the real one.

use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::SimConfig;
use crate::geometry::WorldPoint;
use crate::providers::{
    Frontier, FrontierSearch, GoalExecutor, MapSource, ProviderError, SearchParams,
};

/// Robot standoff from a region it cannot approach (meters). Larger than
/// the clear radius, so such regions are never marked explored and the
/// progress timeout is what gets rid of them.
const BLOCKED_STANDOFF: f32 = 0.75;

/// Regions within this distance of the robot count as explored (meters).
const CLEAR_RADIUS: f32 = 0.3;

/// One unexplored pocket of the simulated arena.
#[derive(Clone, Debug)]
struct Region {
    center: WorldPoint,
    /// Frontier cell count reported for this region
    size: usize,
    /// Unreachable pockets hold the robot at [`BLOCKED_STANDOFF`]
    reachable: bool,
}

/// The simulated world shared by the three collaborator handles.
pub struct SimWorld {
    resolution: f32,
    pose: WorldPoint,
    goal: Option<WorldPoint>,
    step: f32,
    regions: Vec<Region>,
}

impl SimWorld {
    fn generate(config: &SimConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut regions = Vec::with_capacity(config.regions);

        for i in 0..config.regions {
            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            let radius = rng.random_range(0.3..1.0) * config.extent;
            regions.push(Region {
                center: WorldPoint::ZERO.point_at(angle, radius),
                size: rng.random_range(8..40),
                reachable: i >= config.unreachable,
            });
        }

        Self {
            resolution: config.resolution,
            pose: WorldPoint::ZERO,
            goal: None,
            step: config.step,
            regions,
        }
    }

    /// Advance the robot one step toward the active goal and mark any
    /// reachable region it got close to as explored.
    fn advance(&mut self) {
        if let Some(goal) = self.goal {
            let distance = self.pose.distance(&goal);
            let standoff = self.standoff_for(goal);
            if distance > standoff {
                let travel = self.step.min(distance - standoff);
                let heading = self.pose.angle_to(&goal);
                self.pose = self.pose.point_at(heading, travel);
            }
        }
        let pose = self.pose;
        self.regions
            .retain(|r| !(r.reachable && pose.distance(&r.center) < CLEAR_RADIUS));
    }

    /// Minimum distance the robot can close to `goal`. Unreachable
    /// regions behave like a pocket behind a wall.
    fn standoff_for(&self, goal: WorldPoint) -> f32 {
        let blocked = self
            .regions
            .iter()
            .any(|r| !r.reachable && r.center.same_location(&goal));
        if blocked { BLOCKED_STANDOFF } else { 0.0 }
    }
}

/// Shared world handle.
pub type SharedWorld = Arc<Mutex<SimWorld>>;

fn lock(world: &SharedWorld) -> Result<std::sync::MutexGuard<'_, SimWorld>, ProviderError> {
    world
        .lock()
        .map_err(|e| ProviderError::Unavailable(format!("sim world poisoned: {e}")))
}

/// Map/pose provider backed by the simulated world.
///
/// Each pose poll advances the simulation one step, so the world moves
/// at the controller's tick rate.
pub struct SimMap {
    world: SharedWorld,
    resolution: f32,
    frame_id: String,
}

impl MapSource for SimMap {
    fn current_pose(&self) -> Result<WorldPoint, ProviderError> {
        let mut world = lock(&self.world)?;
        world.advance();
        Ok(world.pose)
    }

    fn resolution(&self) -> f32 {
        self.resolution
    }

    fn global_frame_id(&self) -> &str {
        &self.frame_id
    }
}

/// Frontier search backed by the simulated world.
pub struct SimSearch {
    world: SharedWorld,
    params: SearchParams,
}

impl FrontierSearch for SimSearch {
    fn search_from(&mut self, from: WorldPoint) -> Result<Vec<Frontier>, ProviderError> {
        let world = lock(&self.world)?;

        let mut frontiers: Vec<Frontier> = world
            .regions
            .iter()
            .filter(|r| r.size as f32 * world.resolution >= self.params.min_frontier_size)
            .map(|r| {
                let distance = from.distance(&r.center);
                // Stand-in cost: distance in cells, discounted by size.
                let cost = self.params.potential_scale * (distance / world.resolution)
                    - self.params.gain_scale * r.size as f32 * world.resolution;
                Frontier {
                    centroid: r.center,
                    cost,
                    points: boundary_ring(r.center, r.size as f32 * world.resolution * 0.5),
                    size: r.size,
                }
            })
            .collect();

        frontiers.sort_by(|a, b| a.cost.total_cmp(&b.cost));
        Ok(frontiers)
    }
}

/// Goal executor backed by the simulated world.
pub struct SimExecutor {
    world: SharedWorld,
}

impl GoalExecutor for SimExecutor {
    fn send_goal(&mut self, goal: WorldPoint) -> Result<(), ProviderError> {
        let mut world = lock(&self.world)?;
        world.goal = Some(goal);
        Ok(())
    }
}

/// Build the three collaborator handles over one shared world.
pub fn spawn(config: &SimConfig, params: SearchParams) -> (SimMap, SimSearch, SimExecutor) {
    let world: SharedWorld = Arc::new(Mutex::new(SimWorld::generate(config)));
    let map = SimMap {
        world: Arc::clone(&world),
        resolution: config.resolution,
        frame_id: "map".to_string(),
    };
    let search = SimSearch {
        world: Arc::clone(&world),
        params,
    };
    let executor = SimExecutor { world };
    (map, search, executor)
}

/// Eight points outlining a region, for marker rendering.
fn boundary_ring(center: WorldPoint, radius: f32) -> Vec<WorldPoint> {
    (0..8)
        .map(|i| {
            let angle = i as f32 * std::f32::consts::TAU / 8.0;
            center.point_at(angle, radius)
        })
        .collect()
}
