// src/tracking.rs - Hand landmark topology and per-frame observations
use nalgebra::{Vector2, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{PointerError, Result};

/// Number of keypoints in a full hand as produced by the pose estimator.
pub const HAND_LANDMARK_COUNT: usize = 21;

/// Hand landmark indices, matching the estimator's 21-point layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandLandmark {
    Wrist = 0,
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexMcp = 5,
    IndexPip = 6,
    IndexDip = 7,
    IndexTip = 8,
    MiddleMcp = 9,
    MiddlePip = 10,
    MiddleDip = 11,
    MiddleTip = 12,
    RingMcp = 13,
    RingPip = 14,
    RingDip = 15,
    RingTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

impl HandLandmark {
    pub fn index(self) -> usize {
        self as usize
    }
}

/// The five landmarks the pointer pipeline reads from every hand.
pub const REQUIRED_LANDMARKS: [HandLandmark; 5] = [
    HandLandmark::IndexTip,
    HandLandmark::ThumbTip,
    HandLandmark::MiddleTip,
    HandLandmark::PinkyTip,
    HandLandmark::PinkyPip,
];

/// All landmarks of one detected hand, in estimator order.
///
/// Coordinates are normalized to the camera frame: `x` and `y` in `[0, 1]` with `y` growing
/// downward. `z` is kept so frames survive a replay round trip but is never read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandFrame {
    landmarks: Vec<[f64; 3]>,
}

impl HandFrame {
    pub fn new(landmarks: Vec<[f64; 3]>) -> Self {
        Self { landmarks }
    }

    pub fn from_slice(landmarks: &[[f64; 3]]) -> Self {
        Self {
            landmarks: landmarks.to_vec(),
        }
    }

    /// A full hand with every landmark parked at the same point.
    pub fn uniform(x: f64, y: f64) -> Self {
        Self {
            landmarks: vec![[x, y, 0.0]; HAND_LANDMARK_COUNT],
        }
    }

    /// Builder-style setter; ignored when the hand is too short to hold `landmark`.
    pub fn with(mut self, landmark: HandLandmark, x: f64, y: f64) -> Self {
        self.set(landmark, x, y);
        self
    }

    pub fn set(&mut self, landmark: HandLandmark, x: f64, y: f64) {
        if let Some(point) = self.landmarks.get_mut(landmark.index()) {
            point[0] = x;
            point[1] = y;
        }
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    pub fn get(&self, landmark: HandLandmark) -> Option<Vector3<f64>> {
        self.landmarks
            .get(landmark.index())
            .map(|lm| Vector3::new(lm[0], lm[1], lm[2]))
    }

    /// Pulls the five pointer landmarks out as 2D points.
    ///
    /// Every required landmark is checked before anything is returned, so a caller that bails
    /// on error never sees a partially read hand.
    pub fn key_points(&self, hand: usize) -> Result<KeyPoints> {
        let point = |landmark: HandLandmark| -> Result<Vector2<f64>> {
            let lm = self
                .landmarks
                .get(landmark.index())
                .ok_or_else(|| PointerError::IncompleteObservation {
                    hand,
                    landmark,
                    available: self.landmarks.len(),
                })?;
            if !lm[0].is_finite() || !lm[1].is_finite() {
                return Err(PointerError::InvalidLandmark { hand, landmark });
            }
            Ok(Vector2::new(lm[0], lm[1]))
        };

        Ok(KeyPoints {
            index_tip: point(HandLandmark::IndexTip)?,
            thumb_tip: point(HandLandmark::ThumbTip)?,
            middle_tip: point(HandLandmark::MiddleTip)?,
            pinky_tip: point(HandLandmark::PinkyTip)?,
            pinky_pip: point(HandLandmark::PinkyPip)?,
        })
    }
}

/// The landmarks that drive the pointer, projected onto the image plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyPoints {
    pub index_tip: Vector2<f64>,
    pub thumb_tip: Vector2<f64>,
    pub middle_tip: Vector2<f64>,
    pub pinky_tip: Vector2<f64>,
    pub pinky_pip: Vector2<f64>,
}

/// Everything the estimator saw in one camera frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameObservation {
    /// Source image width in pixels
    pub width: u32,
    /// Source image height in pixels
    pub height: u32,
    #[serde(default)]
    pub hands: Vec<HandFrame>,
}

impl FrameObservation {
    pub fn new(width: u32, height: u32, hands: Vec<HandFrame>) -> Self {
        Self {
            width,
            height,
            hands,
        }
    }

    pub fn empty(width: u32, height: u32) -> Self {
        Self::new(width, height, Vec::new())
    }
}
