//! Core error type (renderer-agnostic).

use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum CoreError {
    /// yaw/pitch produced a zero-length front or right vector.
    #[error("degenerate camera basis at yaw={yaw}°, pitch={pitch}°")]
    DegenerateBasis { yaw: f32, pitch: f32 },
    #[error("invalid camera configuration: {0}")]
    InvalidConfig(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
