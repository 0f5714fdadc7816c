// src/gesture.rs - Geometric pose classification
use crate::config::GestureThresholds;
use crate::tracking::KeyPoints;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEvent {
    None,
    SingleClick,
    DoubleClick,
    ScrollUp,
    ScrollDown,
}

impl GestureEvent {
    pub fn is_click(self) -> bool {
        matches!(self, GestureEvent::SingleClick | GestureEvent::DoubleClick)
    }

    pub fn is_scroll(self) -> bool {
        matches!(self, GestureEvent::ScrollUp | GestureEvent::ScrollDown)
    }
}

/// Landmark distances a classification was made from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureMeasurements {
    /// Thumb tip to index tip; also serves as the thumb-away distance for scrolling
    pub thumb_index: f64,
    /// Thumb tip to middle tip
    pub thumb_middle: f64,
    /// Index tip to middle tip
    pub index_middle: f64,
}

impl GestureMeasurements {
    pub fn from_key_points(points: &KeyPoints) -> Self {
        Self {
            thumb_index: (points.thumb_tip - points.index_tip).norm(),
            thumb_middle: (points.thumb_tip - points.middle_tip).norm(),
            index_middle: (points.index_tip - points.middle_tip).norm(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GestureClassifier {
    thresholds: GestureThresholds,
}

impl GestureClassifier {
    pub fn new(thresholds: GestureThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &GestureThresholds {
        &self.thresholds
    }

    pub fn classify(&self, points: &KeyPoints) -> GestureEvent {
        self.classify_with_measurements(points).0
    }

    /// Classifies a hand and returns the distances used to decide.
    ///
    /// Checks run in a fixed order and the first hit wins: index pinch, middle pinch, then
    /// scroll. A pinch therefore always shadows scrolling in the same frame.
    pub fn classify_with_measurements(
        &self,
        points: &KeyPoints,
    ) -> (GestureEvent, GestureMeasurements) {
        let m = GestureMeasurements::from_key_points(points);
        let t = &self.thresholds;

        let event = if m.thumb_index < t.click {
            GestureEvent::DoubleClick
        } else if m.thumb_middle < t.click {
            GestureEvent::SingleClick
        } else if m.index_middle < t.scroll_mode && m.thumb_index > t.thumb_away {
            // Image y grows downward: a tip above its knuckle has the smaller y.
            let (tip, pip) = (points.pinky_tip.y, points.pinky_pip.y);
            if tip < pip {
                GestureEvent::ScrollUp
            } else if tip > pip {
                GestureEvent::ScrollDown
            } else {
                GestureEvent::None
            }
        } else {
            GestureEvent::None
        };

        (event, m)
    }
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new(GestureThresholds::default())
    }
}
