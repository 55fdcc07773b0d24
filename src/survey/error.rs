// src/survey/error.rs
use crate::math::MathError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SurveyError {
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("{stage} rate must be within [0, 1], got {rate}")]
    RateOutOfRange { stage: &'static str, rate: f64 },

    #[error("Insufficient waypoints: expected at least {expected}, got {actual}")]
    InsufficientWaypoints { expected: usize, actual: usize },

    #[error("Invalid spec '{spec}': {reason}")]
    InvalidSpec { spec: String, reason: String },

    #[error("Failed to import '{path}': {reason}")]
    Import { path: PathBuf, reason: String },

    #[error("Emitter '{emitter}' failed: {reason}")]
    Emitter { emitter: String, reason: String },

    #[error(transparent)]
    Math(#[from] MathError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type SurveyResult<T> = Result<T, SurveyError>;
