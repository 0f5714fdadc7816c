// src/debounce.rs
use crate::gesture::GestureEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockState {
    #[default]
    Armed,
    Locked,
}

/// Lets a held click pose fire once, then stays quiet until the pose is released.
#[derive(Debug, Clone, Default)]
pub struct ClickDebouncer {
    state: LockState,
}

impl ClickDebouncer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LockState {
        self.state
    }

    pub fn is_locked(&self) -> bool {
        self.state == LockState::Locked
    }

    /// Feeds one frame's gesture and returns the click to fire, if any.
    ///
    /// Switching between single and double click while locked does not re-fire; any
    /// non-click gesture (scrolls included) re-arms.
    pub fn update(&mut self, gesture: GestureEvent) -> Option<GestureEvent> {
        match (self.state, gesture.is_click()) {
            (LockState::Armed, true) => {
                self.state = LockState::Locked;
                Some(gesture)
            }
            (LockState::Locked, true) => None,
            (_, false) => {
                self.state = LockState::Armed;
                None
            }
        }
    }

    /// The click pose has ended; the next click may fire.
    pub fn release(&mut self) {
        self.state = LockState::Armed;
    }

    pub fn reset(&mut self) {
        self.release();
    }
}
