// src/math/error.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MathError {
    #[error("Insufficient points for operation: expected at least {expected}, got {actual}")]
    InsufficientPoints { expected: usize, actual: usize },

    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("Triangulation failed: {reason}")]
    TriangulationFailed { reason: String },

    #[error("Face {face} references vertex {index}, but the surface only has {vertex_count} vertices")]
    InvalidFace {
        face: usize,
        index: usize,
        vertex_count: usize,
    },
}

pub type MathResult<T> = Result<T, MathError>;
