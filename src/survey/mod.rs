// src/survey/mod.rs
//! Survey layer: error models, vessel paths, reading output and configuration.

pub mod config;
pub mod emitter;
pub mod error;
pub mod error_model;
pub mod path;

pub use config::{PathKind, SurveyConfig};
pub use emitter::{EmitterSpec, VectorEmitter};
pub use error::{SurveyError, SurveyResult};
pub use error_model::{ErrorPipeline, ErrorStage};
pub use path::SurveyPath;
