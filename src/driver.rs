// src/driver.rs - The blocking loop around the per-frame pipeline
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::injector::{dispatch, InputInjector};
use crate::pipeline::{Action, PointerPipeline};
use crate::source::ObservationSource;

/// Tallies for one driver run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub frames: u64,
    pub frames_with_hands: u64,
    pub hands: u64,
    pub moves: u64,
    pub clicks: u64,
    pub double_clicks: u64,
    pub scrolls: u64,
}

impl RunSummary {
    fn record(&mut self, hands: usize, actions: &[Action]) {
        self.frames += 1;
        self.hands += hands as u64;
        if hands > 0 {
            self.frames_with_hands += 1;
        }
        for action in actions {
            match action {
                Action::MoveTo { .. } => self.moves += 1,
                Action::Click => self.clicks += 1,
                Action::DoubleClick => self.double_clicks += 1,
                Action::Scroll { .. } => self.scrolls += 1,
            }
        }
    }
}

/// Pulls frames until the source runs dry, `stop` is raised, or `max_frames` is reached.
///
/// `stop` is checked once per frame, before the next observation is requested.
pub fn run(
    source: &mut dyn ObservationSource,
    pipeline: &mut PointerPipeline,
    injector: &mut dyn InputInjector,
    stop: &AtomicBool,
    max_frames: Option<u64>,
) -> Result<RunSummary> {
    let mut summary = RunSummary::default();
    let start = Instant::now();
    info!("Reading from {}", source.name());

    loop {
        if stop.load(Ordering::SeqCst) {
            info!("Stop requested");
            break;
        }
        if max_frames.is_some_and(|max| summary.frames >= max) {
            info!("Reached frame limit");
            break;
        }

        let observation = match source.next_observation()? {
            Some(observation) => observation,
            None => {
                info!("Source exhausted");
                break;
            }
        };

        let actions = pipeline.process_frame(&observation);
        dispatch(injector, &actions)
            .with_context(|| format!("Injector failed on frame {}", summary.frames + 1))?;
        summary.record(observation.hands.len(), &actions);

        if observation.hands.len() > 1 {
            debug!(
                "{} hands in frame {}; the last one controls the cursor",
                observation.hands.len(),
                summary.frames
            );
        }
    }

    let elapsed = start.elapsed().as_secs_f32();
    debug!(
        "Processed {} frames in {:.2}s ({:.1} fps)",
        summary.frames,
        elapsed,
        if elapsed > 0.0 { summary.frames as f32 / elapsed } else { 0.0 }
    );
    info!(
        "Session done: {} frames, {} clicks, {} double clicks, {} scroll steps",
        summary.frames, summary.clicks, summary.double_clicks, summary.scrolls
    );

    Ok(summary)
}
