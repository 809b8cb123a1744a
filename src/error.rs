// src/error.rs
use thiserror::Error;

/// Errors raised at the edges of the mirror: malformed landmark input,
/// bad viewport dimensions, and session file I/O.
///
/// The per-tick gesture update itself never fails; everything it consumes
/// has already been validated by the constructors that produce these errors.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// A hand arrived with the wrong number of landmarks.
    #[error("malformed hand: expected {expected} landmarks, found {found}")]
    MalformedHand { expected: usize, found: usize },

    #[error("malformed hand: landmark {joint} is not finite")]
    NonFiniteLandmark { joint: usize },

    #[error("invalid gesture config: {0}")]
    InvalidConfig(String),

    #[error("invalid viewport {width}x{height}: dimensions must be positive and finite")]
    InvalidViewport { width: f64, height: f64 },

    #[error("outfit table is empty")]
    NoOutfits,

    /// A recorded session contained no frames to replay.
    #[error("session contains no frames")]
    EmptySession,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, MirrorError>;
