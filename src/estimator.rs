// src/estimator.rs - Pose estimator boundary and a simulated hand for demo runs
use anyhow::Result;
use image::DynamicImage;

use crate::tracking::{HandFrame, HandLandmark};

/// Turns a camera frame into zero or more hands.
pub trait PoseEstimator {
    fn name(&self) -> String;
    fn estimate(&mut self, frame: &DynamicImage) -> Result<Vec<HandFrame>>;
}

/// Scripted hand that ignores the image.
///
/// The index tip sweeps a slow loop across the frame. Every cycle it holds a thumb-index
/// pinch, a thumb-middle pinch, then a scroll pose with the pinky raised and lowered, so a
/// demo run exercises every gesture.
pub struct SimulatedHand {
    sim_time: f64,
    frame_count: u64,
}

/// Seconds per full gesture cycle
const CYCLE: f64 = 8.0;
/// Simulated frame interval
const FRAME_DT: f64 = 0.033;

impl SimulatedHand {
    pub fn new() -> Self {
        Self {
            sim_time: 0.0,
            frame_count: 0,
        }
    }

    /// Produces the next hand without needing an image.
    pub fn next_hand(&mut self) -> HandFrame {
        let t = self.sim_time;
        self.sim_time += FRAME_DT;
        self.frame_count += 1;

        let x = 0.5 + 0.25 * (t * 0.4).cos();
        let y = 0.5 + 0.2 * (t * 0.6).sin();
        let phase = t % CYCLE;

        // Open hand: thumb low and out, fingers spread, pinky level with its knuckle.
        let mut hand = HandFrame::uniform(x, y + 0.15)
            .with(HandLandmark::IndexTip, x, y)
            .with(HandLandmark::ThumbTip, x - 0.18, y + 0.12)
            .with(HandLandmark::MiddleTip, x + 0.08, y)
            .with(HandLandmark::PinkyTip, x + 0.2, y + 0.1)
            .with(HandLandmark::PinkyPip, x + 0.2, y + 0.1);

        match phase {
            p if (2.0..2.5).contains(&p) => {
                hand.set(HandLandmark::ThumbTip, x + 0.01, y + 0.01);
            }
            p if (4.0..4.5).contains(&p) => {
                hand.set(HandLandmark::ThumbTip, x + 0.08, y + 0.02);
            }
            p if (6.0..6.5).contains(&p) => {
                hand.set(HandLandmark::MiddleTip, x + 0.03, y);
                hand.set(HandLandmark::PinkyTip, x + 0.2, y);
            }
            p if (7.0..7.5).contains(&p) => {
                hand.set(HandLandmark::MiddleTip, x + 0.03, y);
                hand.set(HandLandmark::PinkyTip, x + 0.2, y + 0.2);
            }
            _ => {}
        }

        hand
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for SimulatedHand {
    fn default() -> Self {
        Self::new()
    }
}

impl PoseEstimator for SimulatedHand {
    fn name(&self) -> String {
        "Simulated Hand".to_string()
    }

    fn estimate(&mut self, _frame: &DynamicImage) -> Result<Vec<HandFrame>> {
        Ok(vec![self.next_hand()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::{GestureClassifier, GestureEvent};

    fn gestures_over(seconds: f64) -> Vec<GestureEvent> {
        let classifier = GestureClassifier::default();
        let mut sim = SimulatedHand::new();
        let frames = (seconds / FRAME_DT) as usize;
        (0..frames)
            .map(|_| classifier.classify(&sim.next_hand().key_points(0).unwrap()))
            .collect()
    }

    #[test]
    fn one_cycle_shows_every_gesture() {
        let seen = gestures_over(CYCLE);
        for expected in [
            GestureEvent::None,
            GestureEvent::DoubleClick,
            GestureEvent::SingleClick,
            GestureEvent::ScrollUp,
            GestureEvent::ScrollDown,
        ] {
            assert!(seen.contains(&expected), "missing {:?}", expected);
        }
    }

    #[test]
    fn estimate_returns_one_complete_hand() {
        let mut sim = SimulatedHand::new();
        let image = DynamicImage::new_rgb8(4, 4);
        let hands = sim.estimate(&image).unwrap();

        assert_eq!(hands.len(), 1);
        assert!(hands[0].key_points(0).is_ok());
        assert_eq!(sim.frame_count(), 1);
    }
}
