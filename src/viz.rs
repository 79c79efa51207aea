//! Frontier render records for the visualization sink.
//!
//! The controller does not render anything itself; it builds one batch of
//! records per tick and hands it to whatever sink is attached. Colors
//! encode selection status: a fixed red for blacklisted candidates, a
//! cost-rank gradient for viable ones (the cheapest candidate sits at the
//! green end).

use serde::Serialize;

use crate::exploration::GoalBlacklist;
use crate::geometry::WorldPoint;
use crate::providers::Frontier;

/// RGBA color, components in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    /// Fixed color for blacklisted candidates.
    pub const BLACKLISTED: Rgba = Rgba {
        r: 1.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };

    /// Gradient color for the viable candidate at `rank` within a batch
    /// of `total` candidates. Rank 0 (cheapest) is the green end.
    pub fn viable(rank: usize, total: usize) -> Rgba {
        let t = rank as f32 / (total + 1) as f32;
        Rgba {
            r: t,
            g: 1.0 - t,
            b: 1.0,
            a: 1.0,
        }
    }
}

/// One render record: a frontier's points, its color, and its id within
/// the tick's batch.
#[derive(Clone, Debug, Serialize)]
pub struct FrontierMarker {
    pub id: usize,
    pub points: Vec<WorldPoint>,
    pub color: Rgba,
}

/// A full visualization pass: fresh records plus the number of ids from
/// the previous pass that are now stale and must be cleared.
#[derive(Clone, Debug, Serialize)]
pub struct MarkerBatch {
    /// Global frame the points are expressed in
    pub frame_id: String,
    pub markers: Vec<FrontierMarker>,
    /// Count of stale ids to delete, starting at `markers.len()`
    pub stale: usize,
}

/// Render target for frontier marker batches.
pub trait MarkerSink {
    fn publish(&mut self, batch: &MarkerBatch);
}

/// Build the render records for one tick's frontier list.
pub fn frontier_markers(frontiers: &[Frontier], blacklist: &GoalBlacklist) -> Vec<FrontierMarker> {
    let total = frontiers.len();
    frontiers
        .iter()
        .enumerate()
        .map(|(id, frontier)| {
            let color = if blacklist.contains(frontier.centroid) {
                Rgba::BLACKLISTED
            } else {
                Rgba::viable(id, total)
            };
            FrontierMarker {
                id,
                points: frontier.points.clone(),
                color,
            }
        })
        .collect()
}

/// Sink that logs batch summaries instead of rendering; used when no
/// renderer is attached.
pub struct LogSink;

impl MarkerSink for LogSink {
    fn publish(&mut self, batch: &MarkerBatch) {
        tracing::debug!(
            "markers: {} drawn, {} cleared, frame={}",
            batch.markers.len(),
            batch.stale,
            batch.frame_id
        );
    }
}
