// src/source.rs - Where frame observations come from
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;

use crate::estimator::SimulatedHand;
use crate::tracking::FrameObservation;

/// Yields one observation per camera frame. `Ok(None)` means the source is exhausted.
pub trait ObservationSource {
    fn name(&self) -> String;
    fn next_observation(&mut self) -> Result<Option<FrameObservation>>;
}

/// Replays observations stored one JSON object per line.
///
/// Blank lines and lines starting with `#` are skipped. A malformed line is logged and
/// skipped so a single bad record does not end the session.
pub struct ReplaySource<R: BufRead> {
    reader: R,
    label: String,
    line_number: usize,
    skipped: usize,
}

impl ReplaySource<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path: PathBuf = path.as_ref().to_path_buf();
        let file = File::open(&path)
            .with_context(|| format!("Failed to open replay file {}", path.display()))?;
        Ok(Self::from_reader(BufReader::new(file), path.display().to_string()))
    }
}

impl<R: BufRead> ReplaySource<R> {
    pub fn from_reader(reader: R, label: impl Into<String>) -> Self {
        Self {
            reader,
            label: label.into(),
            line_number: 0,
            skipped: 0,
        }
    }

    /// Number of malformed lines passed over so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl<R: BufRead> ObservationSource for ReplaySource<R> {
    fn name(&self) -> String {
        format!("Replay ({})", self.label)
    }

    fn next_observation(&mut self) -> Result<Option<FrameObservation>> {
        let mut line = String::new();
        loop {
            line.clear();
            let read = self
                .reader
                .read_line(&mut line)
                .with_context(|| {
                    format!("Failed to read {} at line {}", self.label, self.line_number + 1)
                })?;
            if read == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            match serde_json::from_str::<FrameObservation>(trimmed) {
                Ok(observation) => return Ok(Some(observation)),
                Err(e) => {
                    warn!("{} line {}: {}, skipping", self.label, self.line_number, e);
                    self.skipped += 1;
                }
            }
        }
    }
}

/// Feeds the simulated hand at a fixed frame geometry, forever.
pub struct SimulatedSource {
    hand: SimulatedHand,
    width: u32,
    height: u32,
}

impl SimulatedSource {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            hand: SimulatedHand::new(),
            width,
            height,
        }
    }
}

impl ObservationSource for SimulatedSource {
    fn name(&self) -> String {
        format!("Simulated Hand ({}x{})", self.width, self.height)
    }

    fn next_observation(&mut self) -> Result<Option<FrameObservation>> {
        Ok(Some(FrameObservation::new(
            self.width,
            self.height,
            vec![self.hand.next_hand()],
        )))
    }
}

#[cfg(feature = "camera")]
pub use camera::CameraSource;

#[cfg(feature = "camera")]
mod camera {
    use anyhow::{anyhow, Context, Result};
    use image::DynamicImage;
    use nokhwa::pixel_format::RgbFormat;
    use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
    use nokhwa::Camera;
    use tracing::info;

    use super::ObservationSource;
    use crate::estimator::PoseEstimator;
    use crate::tracking::FrameObservation;

    /// Live camera frames run through a pose estimator.
    ///
    /// Frames are mirrored before estimation so moving the hand right moves the cursor right.
    pub struct CameraSource {
        camera: Camera,
        estimator: Box<dyn PoseEstimator>,
    }

    impl CameraSource {
        pub fn new(index: u32, estimator: Box<dyn PoseEstimator>) -> Result<Self> {
            let requested =
                RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
            let mut camera = Camera::new(CameraIndex::Index(index), requested)
                .map_err(|e| anyhow!(e))
                .context("Failed to create camera instance")?;
            camera
                .open_stream()
                .map_err(|e| anyhow!(e))
                .context("Failed to open camera stream")?;

            info!(
                "Opened camera {} at {}x{}",
                camera.info().human_name(),
                camera.resolution().width(),
                camera.resolution().height()
            );
            Ok(Self { camera, estimator })
        }
    }

    impl ObservationSource for CameraSource {
        fn name(&self) -> String {
            format!("{} via {}", self.camera.info().human_name(), self.estimator.name())
        }

        fn next_observation(&mut self) -> Result<Option<FrameObservation>> {
            let frame = self
                .camera
                .frame()
                .map_err(|e| anyhow!(e))
                .context("Failed to capture frame")?;
            let decoded = frame
                .decode_image::<RgbFormat>()
                .map_err(|e| anyhow!(e))
                .context("Failed to decode frame")?;

            let (width, height) = (decoded.width(), decoded.height());
            let mirrored = DynamicImage::ImageRgb8(image::imageops::flip_horizontal(&decoded));
            let hands = self.estimator.estimate(&mirrored)?;

            Ok(Some(FrameObservation::new(width, height, hands)))
        }
    }

    impl Drop for CameraSource {
        fn drop(&mut self) {
            let _ = self.camera.stop_stream();
        }
    }
}
