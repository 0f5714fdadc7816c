//! Hand-landmark pointer control.
//!
//! Each camera frame's hand landmarks are mapped onto the screen, smoothed, classified into a
//! gesture and debounced into cursor moves, clicks and scrolls. [`pipeline::PointerPipeline`]
//! is the per-frame core; [`driver::run`] is the loop that feeds it from an
//! [`source::ObservationSource`] and hands the result to an [`injector::InputInjector`].

pub mod config;
pub mod debounce;
pub mod driver;
pub mod error;
pub mod estimator;
pub mod gesture;
pub mod injector;
pub mod mapping;
pub mod pipeline;
pub mod smoothing;
pub mod source;
pub mod tracking;

pub use config::PointerConfig;
pub use error::PointerError;
pub use gesture::GestureEvent;
pub use pipeline::{Action, PointerPipeline};
pub use tracking::{FrameObservation, HandFrame, HandLandmark};
