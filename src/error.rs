// src/error.rs
use thiserror::Error;

use crate::tracking::HandLandmark;

/// Errors raised by the pointer pipeline and its configuration layer.
#[derive(Error, Debug)]
pub enum PointerError {
    /// The pose estimator handed over a hand without one of the landmarks we read
    #[error("Hand {hand} is missing {landmark:?} (only {available} landmarks present)")]
    IncompleteObservation {
        hand: usize,
        landmark: HandLandmark,
        available: usize,
    },

    /// A required landmark carries a NaN or infinite coordinate
    #[error("Hand {hand} has a non-finite coordinate for {landmark:?}")]
    InvalidLandmark { hand: usize, landmark: HandLandmark },

    /// The index tip is finite but too large to land anywhere on screen
    #[error("Hand {hand} maps to a non-finite screen position")]
    UnmappableTarget { hand: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PointerError>;
