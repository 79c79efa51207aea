//! Frontier exploration decision core.
//!
//! This module holds the state and policy of the decision loop:
//! - the permanent goal blacklist with spatial-tolerance membership
//! - goal selection over ranked frontier candidates
//! - progress monitoring and stall detection
//! - the periodic controller tying them together

mod blacklist;
mod controller;
mod progress;
mod ranker;

pub use blacklist::GoalBlacklist;
pub use controller::{ControllerState, ExplorationController, TickReport};
pub use progress::{ProgressMonitor, Verdict};
pub use ranker::select_goal;
