// src/pipeline.rs - Per-frame orchestration from landmarks to pointer actions
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::PointerConfig;
use crate::debounce::ClickDebouncer;
use crate::error::PointerError;
use crate::gesture::{GestureClassifier, GestureEvent, GestureMeasurements};
use crate::mapping::ActiveRegion;
use crate::smoothing::MotionSmoother;
use crate::tracking::{FrameObservation, HandFrame};

/// What the input injector is asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Absolute screen position, already clamped to the screen
    MoveTo { x: f64, y: f64 },
    Click,
    DoubleClick,
    /// Positive scrolls up, negative scrolls down
    Scroll { amount: i32 },
}

/// State that survives from one frame to the next.
#[derive(Debug, Clone)]
pub struct PointerState {
    pub smoother: MotionSmoother,
    pub debouncer: ClickDebouncer,
    pub frames_processed: u64,
}

impl PointerState {
    pub fn new(config: &PointerConfig) -> Self {
        Self {
            smoother: MotionSmoother::new(config.smoothing_factor),
            debouncer: ClickDebouncer::new(),
            frames_processed: 0,
        }
    }
}

/// Runs one camera frame through the pipeline.
///
/// Hands are handled in the order the estimator reported them and all of them write to the
/// same cursor, so with several hands in view the last one decides where the cursor ends up.
/// Click activity is judged for the frame as a whole: if any hand shows a click pose, no hand
/// scrolls and the click lock is held; the lock is released only by a frame with hands but no
/// click pose. A hand that cannot be read is skipped without touching state.
///
/// `config` is expected to have passed [`PointerConfig::validate`].
pub fn step(
    config: &PointerConfig,
    classifier: &GestureClassifier,
    frame: &FrameObservation,
    state: &mut PointerState,
) -> Vec<Action> {
    state.frames_processed += 1;

    if frame.hands.is_empty() {
        return Vec::new();
    }

    let region = active_region(config, frame);
    let readings: Vec<HandReading> = frame
        .hands
        .iter()
        .enumerate()
        .filter_map(|(index, hand)| match read_hand(config, classifier, &region, index, hand) {
            Ok(reading) => Some(reading),
            Err(e) => {
                warn!("Skipping hand: {}", e);
                None
            }
        })
        .collect();

    if readings.is_empty() {
        return Vec::new();
    }

    let click_active = readings.iter().any(|r| r.gesture.is_click());
    let mut actions = Vec::with_capacity(readings.len() * 2);

    for reading in &readings {
        state.smoother.update(reading.target);
        let cursor = state.smoother.emitted(&config.screen);
        actions.push(Action::MoveTo {
            x: cursor.x,
            y: cursor.y,
        });

        let m = &reading.measurements;
        debug!(
            "Hand {} target ({:.1}, {:.1}) cursor ({:.1}, {:.1}) \
             thumb-index {:.3} thumb-middle {:.3} index-middle {:.3} -> {:?}",
            reading.index,
            reading.target.x,
            reading.target.y,
            cursor.x,
            cursor.y,
            m.thumb_index,
            m.thumb_middle,
            m.index_middle,
            reading.gesture
        );

        match reading.gesture {
            GestureEvent::SingleClick | GestureEvent::DoubleClick => {
                match state.debouncer.update(reading.gesture) {
                    Some(GestureEvent::DoubleClick) => {
                        info!("Double click at ({:.0}, {:.0})", cursor.x, cursor.y);
                        actions.push(Action::DoubleClick);
                    }
                    Some(GestureEvent::SingleClick) => {
                        info!("Single click at ({:.0}, {:.0})", cursor.x, cursor.y);
                        actions.push(Action::Click);
                    }
                    _ => {}
                }
            }
            // Scroll is never debounced, but any click pose in the frame blocks it.
            GestureEvent::ScrollUp if !click_active => actions.push(Action::Scroll {
                amount: config.scroll_amount,
            }),
            GestureEvent::ScrollDown if !click_active => actions.push(Action::Scroll {
                amount: -config.scroll_amount,
            }),
            _ => {}
        }
    }

    if !click_active {
        state.debouncer.release();
    }

    actions
}

/// One readable hand, measured but not yet applied to the pointer state.
struct HandReading {
    index: usize,
    target: Vector2<f64>,
    gesture: GestureEvent,
    measurements: GestureMeasurements,
}

fn read_hand(
    config: &PointerConfig,
    classifier: &GestureClassifier,
    region: &ActiveRegion,
    index: usize,
    hand: &HandFrame,
) -> crate::error::Result<HandReading> {
    let points = hand.key_points(index)?;

    let target = region.map_to_screen(points.index_tip, &config.screen);
    if !(target.x.is_finite() && target.y.is_finite()) {
        return Err(PointerError::UnmappableTarget { hand: index });
    }

    let (gesture, measurements) = classifier.classify_with_measurements(&points);
    Ok(HandReading {
        index,
        target,
        gesture,
        measurements,
    })
}

fn active_region(config: &PointerConfig, frame: &FrameObservation) -> ActiveRegion {
    ActiveRegion::for_frame(config.active_region_margin, frame.width, frame.height)
        .or_else(|| {
            warn!(
                "Margin {} leaves no active region in a {}x{} frame, using configured {}x{}",
                config.active_region_margin,
                frame.width,
                frame.height,
                config.frame.width,
                config.frame.height
            );
            ActiveRegion::for_frame(
                config.active_region_margin,
                config.frame.width,
                config.frame.height,
            )
        })
        // Only reachable with an unvalidated config.
        .unwrap_or_else(ActiveRegion::full)
}

/// Owns the configuration and the cross-frame state for one pointer session.
pub struct PointerPipeline {
    config: PointerConfig,
    classifier: GestureClassifier,
    state: PointerState,
}

impl PointerPipeline {
    pub fn new(config: PointerConfig) -> crate::error::Result<Self> {
        config.validate()?;
        Ok(Self {
            classifier: GestureClassifier::new(config.gestures),
            state: PointerState::new(&config),
            config,
        })
    }

    pub fn process_frame(&mut self, frame: &FrameObservation) -> Vec<Action> {
        step(&self.config, &self.classifier, frame, &mut self.state)
    }

    pub fn config(&self) -> &PointerConfig {
        &self.config
    }

    /// Cursor as it was last emitted.
    pub fn cursor(&self) -> Vector2<f64> {
        self.state.smoother.emitted(&self.config.screen)
    }

    pub fn is_click_locked(&self) -> bool {
        self.state.debouncer.is_locked()
    }

    pub fn frames_processed(&self) -> u64 {
        self.state.frames_processed
    }

    pub fn reset(&mut self) {
        self.state = PointerState::new(&self.config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::HandLandmark;

    fn pipeline() -> PointerPipeline {
        PointerPipeline::new(PointerConfig::default()).unwrap()
    }

    /// Open hand with the index tip at `(x, y)` and no gesture.
    fn pointing(x: f64, y: f64) -> HandFrame {
        HandFrame::uniform(0.5, 0.5)
            .with(HandLandmark::IndexTip, x, y)
            .with(HandLandmark::ThumbTip, x - 0.2, y + 0.2)
            .with(HandLandmark::MiddleTip, x + 0.1, y)
            .with(HandLandmark::PinkyTip, x + 0.2, y + 0.2)
            .with(HandLandmark::PinkyPip, x + 0.2, y + 0.2)
    }

    fn frame(hands: Vec<HandFrame>) -> FrameObservation {
        FrameObservation::new(640, 480, hands)
    }

    fn clicks(actions: &[Action]) -> usize {
        actions
            .iter()
            .filter(|a| matches!(a, Action::Click | Action::DoubleClick))
            .count()
    }

    #[test]
    fn empty_frame_emits_nothing_and_keeps_state() {
        let mut p = pipeline();
        p.process_frame(&frame(vec![pointing(0.5, 0.5)]));
        let cursor = p.cursor();

        assert!(p.process_frame(&frame(Vec::new())).is_empty());
        assert_eq!(p.cursor(), cursor);
        assert_eq!(p.frames_processed(), 2);
    }

    #[test]
    fn first_move_is_one_smoothing_step() {
        let mut p = pipeline();
        let actions = p.process_frame(&frame(vec![pointing(0.5, 0.5)]));

        match actions[0] {
            Action::MoveTo { x, y } => {
                assert!((x - 192.0).abs() < 1e-9);
                assert!((y - 108.0).abs() < 1e-9);
            }
            other => panic!("expected MoveTo, got {:?}", other),
        }
        assert_eq!(actions.len(), 1);
    }

    #[test]
    fn held_pinch_clicks_once() {
        let mut p = pipeline();
        let pinch = pointing(0.5, 0.5).with(HandLandmark::ThumbTip, 0.51, 0.5);

        let total: usize = (0..10)
            .map(|_| clicks(&p.process_frame(&frame(vec![pinch.clone()]))))
            .sum();
        assert_eq!(total, 1);
        assert!(p.is_click_locked());

        p.process_frame(&frame(vec![pointing(0.5, 0.5)]));
        assert!(!p.is_click_locked());
    }

    #[test]
    fn scroll_repeats_every_frame() {
        let mut p = pipeline();
        let scroll = pointing(0.5, 0.3)
            .with(HandLandmark::MiddleTip, 0.53, 0.3)
            .with(HandLandmark::PinkyTip, 0.7, 0.65)
            .with(HandLandmark::PinkyPip, 0.7, 0.55);

        for _ in 0..3 {
            let actions = p.process_frame(&frame(vec![scroll.clone()]));
            assert_eq!(actions.last(), Some(&Action::Scroll { amount: -120 }));
        }
    }

    #[test]
    fn incomplete_hand_is_skipped_without_state_change() {
        let mut p = pipeline();
        let broken = HandFrame::new(vec![[0.9, 0.9, 0.0]; 10]);

        let actions = p.process_frame(&frame(vec![broken, pointing(0.5, 0.5)]));
        assert_eq!(actions.len(), 1);
        assert!(matches!(actions[0], Action::MoveTo { .. }));
        assert!((p.cursor().x - 192.0).abs() < 1e-9);
    }

    #[test]
    fn huge_coordinate_is_skipped_and_cursor_stays_finite() {
        let mut p = pipeline();
        let actions = p.process_frame(&frame(vec![pointing(1e306, 0.5)]));
        assert!(actions.is_empty());
        assert_eq!(p.cursor(), Vector2::zeros());

        for _ in 0..4 {
            p.process_frame(&frame(vec![pointing(0.5, 0.5)]));
        }
        let cursor = p.cursor();
        assert!(cursor.x.is_finite() && cursor.y.is_finite());
        assert!(cursor.x > 0.0 && cursor.x < 960.0);
    }

    #[test]
    fn click_on_earlier_hand_holds_lock_for_the_frame() {
        let mut p = pipeline();
        let pinch = pointing(0.5, 0.5).with(HandLandmark::ThumbTip, 0.51, 0.5);

        let mut total = 0;
        for _ in 0..5 {
            let actions = p.process_frame(&frame(vec![pinch.clone(), pointing(0.3, 0.3)]));
            total += clicks(&actions);
        }
        assert_eq!(total, 1);
        assert!(p.is_click_locked());
    }

    #[test]
    fn click_on_later_hand_holds_lock_for_the_frame() {
        let mut p = pipeline();
        let pinch = pointing(0.5, 0.5).with(HandLandmark::ThumbTip, 0.51, 0.5);

        let mut total = 0;
        for _ in 0..5 {
            let actions = p.process_frame(&frame(vec![pointing(0.3, 0.3), pinch.clone()]));
            total += clicks(&actions);
        }
        assert_eq!(total, 1);
    }

    #[test]
    fn click_anywhere_in_frame_blocks_scroll() {
        let scroll = pointing(0.5, 0.3)
            .with(HandLandmark::MiddleTip, 0.53, 0.3)
            .with(HandLandmark::PinkyTip, 0.7, 0.40)
            .with(HandLandmark::PinkyPip, 0.7, 0.55);
        let pinch = pointing(0.5, 0.5).with(HandLandmark::ThumbTip, 0.51, 0.5);

        for hands in [vec![pinch.clone(), scroll.clone()], vec![scroll, pinch]] {
            let mut p = pipeline();
            let actions = p.process_frame(&frame(hands));
            assert!(!actions.iter().any(|a| matches!(a, Action::Scroll { .. })));
            assert_eq!(clicks(&actions), 1);
        }
    }

    #[test]
    fn unvalidated_negative_screen_does_not_panic() {
        let config = PointerConfig {
            screen: crate::config::ScreenGeometry {
                width: -10.0,
                height: 1080.0,
            },
            ..PointerConfig::default()
        };
        let mut state = PointerState::new(&config);
        let classifier = GestureClassifier::new(config.gestures);

        let actions = step(&config, &classifier, &frame(vec![pointing(0.5, 0.5)]), &mut state);
        match actions.as_slice() {
            [Action::MoveTo { x, y }] => {
                assert_eq!(*x, -10.0);
                assert!((y - 108.0).abs() < 1e-9);
            }
            other => panic!("expected one MoveTo, got {:?}", other),
        }
    }

    #[test]
    fn undersized_frame_falls_back_to_configured_geometry() {
        let mut p = pipeline();
        let small = FrameObservation::new(100, 100, vec![pointing(0.5, 0.5)]);
        let actions = p.process_frame(&small);
        assert_eq!(actions.len(), 1);
        assert!((p.cursor().x - 192.0).abs() < 1e-9);
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut p = pipeline();
        let pinch = pointing(0.5, 0.5).with(HandLandmark::ThumbTip, 0.51, 0.5);
        p.process_frame(&frame(vec![pinch]));
        p.reset();

        assert_eq!(p.cursor(), Vector2::zeros());
        assert!(!p.is_click_locked());
        assert_eq!(p.frames_processed(), 0);
    }

    #[test]
    fn rejects_invalid_config() {
        let config = PointerConfig {
            smoothing_factor: 0.0,
            ..PointerConfig::default()
        };
        assert!(PointerPipeline::new(config).is_err());
    }

    #[test]
    fn action_serializes_with_tag() {
        let json = serde_json::to_string(&Action::Scroll { amount: 120 }).unwrap();
        assert_eq!(json, r#"{"action":"scroll","amount":120}"#);
        let json = serde_json::to_string(&Action::Click).unwrap();
        assert_eq!(json, r#"{"action":"click"}"#);
    }
}
