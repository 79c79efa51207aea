//! Goal selection over ranked frontier candidates.

use crate::geometry::WorldPoint;
use crate::providers::Frontier;

use super::blacklist::GoalBlacklist;

/// Pick the goal for this tick: the centroid of the first candidate whose
/// centroid is not blacklisted.
///
/// `frontiers` arrives already sorted ascending by cost from the external
/// search, so the first viable candidate is the cheapest one. `None`
/// means every candidate is excluded or none exist; that is the
/// exploration-complete signal, not an error.
pub fn select_goal(frontiers: &[Frontier], blacklist: &GoalBlacklist) -> Option<WorldPoint> {
    frontiers
        .iter()
        .find(|f| !blacklist.contains(f.centroid))
        .map(|f| f.centroid)
}
