//! Configuration loading for Anvesha

use crate::error::Result;
use crate::providers::SearchParams;
use serde::Deserialize;
use std::path::Path;

/// Main configuration structure
#[derive(Clone, Debug, Deserialize)]
pub struct AnveshaConfig {
    #[serde(default)]
    pub exploration: ExplorationConfig,
    #[serde(default)]
    pub sim: SimConfig,
}

/// Exploration controller settings
#[derive(Clone, Debug, Deserialize)]
pub struct ExplorationConfig {
    /// Controller ticks per second (default: 1.0)
    #[serde(default = "default_planner_frequency")]
    pub planner_frequency: f32,

    /// Maximum duration without distance improvement before the active
    /// goal is abandoned, in seconds (default: 30.0)
    #[serde(default = "default_progress_timeout")]
    pub progress_timeout_secs: f32,

    /// Publish frontier markers each tick (default: false)
    #[serde(default)]
    pub visualize: bool,

    /// Weight passed through to the frontier search cost function
    #[serde(default = "default_potential_scale")]
    pub potential_scale: f32,

    /// Weight passed through to the frontier search cost function
    #[serde(default)]
    pub orientation_scale: f32,

    /// Weight passed through to the frontier search cost function
    #[serde(default = "default_gain_scale")]
    pub gain_scale: f32,

    /// Minimum frontier extent worth reporting, in meters, passed
    /// through to the frontier search (default: 0.5)
    #[serde(default = "default_min_frontier_size")]
    pub min_frontier_size: f32,

    /// Blacklist tolerance as a multiple of the map resolution
    /// (default: 5.0)
    #[serde(default = "default_blacklist_tolerance_factor")]
    pub blacklist_tolerance_factor: f32,

    /// Stop the tick loop once exploration is complete (default: true).
    /// When false the loop keeps ticking inertly in the terminal state.
    #[serde(default = "default_stop_on_complete")]
    pub stop_on_complete: bool,
}

impl ExplorationConfig {
    /// Opaque weights handed to the frontier search.
    pub fn search_params(&self) -> SearchParams {
        SearchParams {
            potential_scale: self.potential_scale,
            orientation_scale: self.orientation_scale,
            gain_scale: self.gain_scale,
            min_frontier_size: self.min_frontier_size,
        }
    }
}

impl Default for ExplorationConfig {
    fn default() -> Self {
        Self {
            planner_frequency: default_planner_frequency(),
            progress_timeout_secs: default_progress_timeout(),
            visualize: false,
            potential_scale: default_potential_scale(),
            orientation_scale: 0.0,
            gain_scale: default_gain_scale(),
            min_frontier_size: default_min_frontier_size(),
            blacklist_tolerance_factor: default_blacklist_tolerance_factor(),
            stop_on_complete: default_stop_on_complete(),
        }
    }
}

/// Simulated-world settings for running without a robot
#[derive(Clone, Debug, Deserialize)]
pub struct SimConfig {
    /// Grid cell size in meters (default: 0.05)
    #[serde(default = "default_resolution")]
    pub resolution: f32,

    /// Radius within which unexplored regions are seeded, meters
    /// (default: 6.0)
    #[serde(default = "default_extent")]
    pub extent: f32,

    /// Number of unexplored regions to seed (default: 8)
    #[serde(default = "default_regions")]
    pub regions: usize,

    /// Of those, regions the robot cannot approach (default: 1)
    #[serde(default = "default_unreachable")]
    pub unreachable: usize,

    /// Robot travel per pose poll, meters (default: 0.25)
    #[serde(default = "default_step")]
    pub step: f32,

    /// Seed for region placement (default: 7)
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            resolution: default_resolution(),
            extent: default_extent(),
            regions: default_regions(),
            unreachable: default_unreachable(),
            step: default_step(),
            seed: default_seed(),
        }
    }
}

// Default value functions
fn default_planner_frequency() -> f32 {
    1.0
}
fn default_progress_timeout() -> f32 {
    30.0
}
fn default_potential_scale() -> f32 {
    1e-3
}
fn default_gain_scale() -> f32 {
    1.0
}
fn default_min_frontier_size() -> f32 {
    0.5
}
fn default_blacklist_tolerance_factor() -> f32 {
    5.0
}
fn default_stop_on_complete() -> bool {
    true
}

// Sim defaults
fn default_resolution() -> f32 {
    0.05
}
fn default_extent() -> f32 {
    6.0
}
fn default_regions() -> usize {
    8
}
fn default_unreachable() -> usize {
    1
}
fn default_step() -> f32 {
    0.25
}
fn default_seed() -> u64 {
    7
}

impl Default for AnveshaConfig {
    fn default() -> Self {
        Self {
            exploration: ExplorationConfig::default(),
            sim: SimConfig::default(),
        }
    }
}

impl AnveshaConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AnveshaConfig = toml::from_str(&content)?;
        Ok(config)
    }
}
