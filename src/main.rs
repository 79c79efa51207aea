//! Anvesha - exploration decision core for VacuumTiger
//!
//! Wires the exploration controller to its collaborators and drives the
//! periodic decision loop. This binary runs against the simulated
//! collaborators in [`anvesha::sim`]; a robot deployment provides real
//! implementations of the same traits instead.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use tracing::info;

use anvesha::config::AnveshaConfig;
use anvesha::error::Result;
use anvesha::runner::ExplorationLoop;
use anvesha::sim;
use anvesha::viz::{LogSink, MarkerSink};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("anvesha=info".parse().unwrap()),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    let config = if args.len() > 1 && !args[1].starts_with("--") {
        let config_path = Path::new(&args[1]);
        info!("Loading configuration from {:?}", config_path);
        AnveshaConfig::load(config_path)?
    } else if Path::new("anvesha.toml").exists() {
        info!("Loading configuration from anvesha.toml");
        AnveshaConfig::load(Path::new("anvesha.toml"))?
    } else {
        info!("Using default configuration");
        AnveshaConfig::default()
    };

    info!("Anvesha v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Tick rate {:.1}Hz, progress timeout {:.0}s",
        config.exploration.planner_frequency, config.exploration.progress_timeout_secs
    );

    // Shutdown flag, set by SIGINT/SIGTERM and checked at each tick
    let shutdown = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&shutdown))?;
    signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(&shutdown))?;

    // Build the simulated collaborators
    let params = config.exploration.search_params();
    let (map, search, executor) = sim::spawn(&config.sim, params);

    let sink: Option<Box<dyn MarkerSink>> = if config.exploration.visualize {
        Some(Box::new(LogSink))
    } else {
        None
    };

    let mut exploration = ExplorationLoop::new(
        &config.exploration,
        Box::new(map),
        Box::new(search),
        Box::new(executor),
        sink,
        shutdown,
    );
    exploration.run();

    let controller = exploration.controller();
    info!(
        "final state: {:?}, {} blacklisted goals",
        controller.state(),
        controller.blacklist().len()
    );

    Ok(())
}
