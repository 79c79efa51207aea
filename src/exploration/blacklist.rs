//! Blacklist of goal positions that failed or were abandoned.

use crate::geometry::WorldPoint;

/// Goal locations excluded from future selection.
///
/// Entries are never removed: once a goal has proven unreachable it stays
/// excluded for the remainder of the run. Membership uses an axis-aligned
/// square of half-width `tolerance` around each entry rather than a
/// circular radius; the square is a cheap per-axis comparison inherited
/// from the grid resolution the tolerance is derived from, and its
/// semantics are part of the contract.
#[derive(Clone, Debug)]
pub struct GoalBlacklist {
    entries: Vec<WorldPoint>,
    /// Half-width of the membership square (meters), a small multiple of
    /// the map resolution.
    tolerance: f32,
}

impl GoalBlacklist {
    /// Create an empty blacklist with the given tolerance in meters.
    pub fn new(tolerance: f32) -> Self {
        Self {
            entries: Vec::new(),
            tolerance,
        }
    }

    /// Record a rejected goal.
    ///
    /// Appends unconditionally; duplicates are permitted and harmless
    /// since membership testing scans every entry anyway.
    pub fn add(&mut self, goal: WorldPoint) {
        self.entries.push(goal);
    }

    /// Whether `goal` falls within the tolerance square of any entry.
    ///
    /// The test is per-axis: |dx| and |dy| must each be below the
    /// tolerance independently.
    pub fn contains(&self, goal: WorldPoint) -> bool {
        self.entries.iter().any(|entry| {
            (goal.x - entry.x).abs() < self.tolerance && (goal.y - entry.y).abs() < self.tolerance
        })
    }

    /// Number of recorded entries, duplicates included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
