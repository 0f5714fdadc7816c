// src/main.rs
mod args;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use args::{Args, OutputMode};
use hand_pointer::driver;
use hand_pointer::injector::{InputInjector, JsonLinesInjector, LogInjector};
use hand_pointer::source::{ObservationSource, ReplaySource, SimulatedSource};
use hand_pointer::{PointerConfig, PointerPipeline};

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so JSON output on stdout stays clean
    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path = args.config.clone().unwrap_or_else(PointerConfig::default_path);
    if args.write_default_config {
        PointerConfig::default()
            .save(&config_path)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        info!("Wrote default configuration to {}", config_path.display());
        return Ok(());
    }

    let config = PointerConfig::load_or_default(&config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?;
    info!(
        "Screen {}x{}, active margin {}px, smoothing {}",
        config.screen.width,
        config.screen.height,
        config.active_region_margin,
        config.smoothing_factor
    );

    let mut source = open_source(&args, &config)?;
    let mut pipeline = PointerPipeline::new(config)?;
    let mut injector: Box<dyn InputInjector> = match args.output {
        OutputMode::Log => Box::new(LogInjector::new()),
        OutputMode::Json => Box::new(JsonLinesInjector::new(std::io::stdout().lock())),
    };

    let stop = Arc::new(AtomicBool::new(false));
    let stop_handler = stop.clone();
    ctrlc::set_handler(move || {
        stop_handler.store(true, Ordering::SeqCst);
    })?;

    info!("Running... Press Ctrl+C to stop");
    let summary = driver::run(
        source.as_mut(),
        &mut pipeline,
        injector.as_mut(),
        &stop,
        args.max_frames,
    )?;

    info!(
        "{} of {} frames had a hand ({} hands total)",
        summary.frames_with_hands, summary.frames, summary.hands
    );
    Ok(())
}

fn open_source(args: &Args, config: &PointerConfig) -> Result<Box<dyn ObservationSource>> {
    if let Some(path) = &args.replay {
        return Ok(Box::new(ReplaySource::open(path)?));
    }
    if let Some(index) = args.camera {
        warn!("Camera {} frames are captured but landmarks come from the scripted hand", index);
        return open_camera(index);
    }
    info!("Using the scripted hand; pointer actions do not follow any real input");
    Ok(Box::new(SimulatedSource::new(config.frame.width, config.frame.height)))
}

#[cfg(feature = "camera")]
fn open_camera(index: u32) -> Result<Box<dyn ObservationSource>> {
    use hand_pointer::estimator::SimulatedHand;
    use hand_pointer::source::CameraSource;

    // No landmark model ships with the crate; only the scripted estimator is available.
    let source = CameraSource::new(index, Box::new(SimulatedHand::new()))?;
    Ok(Box::new(source))
}

#[cfg(not(feature = "camera"))]
fn open_camera(index: u32) -> Result<Box<dyn ObservationSource>> {
    anyhow::bail!(
        "Camera {} requested but this build has no camera support; rebuild with --features camera",
        index
    )
}
