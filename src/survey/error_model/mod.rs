// src/survey/error_model/mod.rs
//! Sensor error stages applied to raw `[x, y, z]` readings.
//!
//! Each stage owns its mutable state and its own random stream. Passing a
//! seed to `eval` makes that single draw reproducible without touching the
//! stage's stream.

pub mod dropout;
pub mod false_bottom;
pub mod noise;
pub mod pipeline;

pub use dropout::Dropout;
pub use false_bottom::FalseBottom;
pub use noise::Noise;
pub use pipeline::{ErrorPipeline, run_pipeline};

use crate::math::types::*;
use crate::survey::error::{SurveyError, SurveyResult};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fmt;
use std::str::FromStr;

/// Random stream owned by a single stage.
#[derive(Debug, Clone)]
pub(crate) struct StageRng(ChaCha8Rng);

impl StageRng {
    pub(crate) fn from_entropy() -> Self {
        Self(ChaCha8Rng::seed_from_u64(rand::random()))
    }

    pub(crate) fn reseed(&mut self, seed: u64) {
        self.0 = ChaCha8Rng::seed_from_u64(seed);
    }

    /// Runs `draw` on a call-scoped generator if `seed` is given, otherwise
    /// on the stage's own stream.
    pub(crate) fn with<T>(&mut self, seed: Option<u64>, draw: impl FnOnce(&mut ChaCha8Rng) -> T) -> T {
        match seed {
            Some(seed) => draw(&mut ChaCha8Rng::seed_from_u64(seed)),
            None => draw(&mut self.0),
        }
    }
}

/// Closed set of error stages.
#[derive(Debug, Clone)]
pub enum ErrorStage {
    Noise(Noise),
    FalseBottom(FalseBottom),
    Dropout(Dropout),
}

impl ErrorStage {
    pub fn eval(&mut self, vector: Point3D, seed: Option<u64>) -> Point3D {
        match self {
            ErrorStage::Noise(stage) => stage.eval(vector, seed),
            ErrorStage::FalseBottom(stage) => stage.eval(vector, seed),
            ErrorStage::Dropout(stage) => stage.eval(vector, seed),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ErrorStage::Noise(_) => "noise",
            ErrorStage::FalseBottom(_) => "fb",
            ErrorStage::Dropout(_) => "drop",
        }
    }

    /// Replaces the stage's own random stream with one seeded by `seed`.
    pub fn reseed(&mut self, seed: u64) {
        match self {
            ErrorStage::Noise(stage) => stage.rng.reseed(seed),
            ErrorStage::FalseBottom(stage) => stage.rng.reseed(seed),
            ErrorStage::Dropout(stage) => stage.rng.reseed(seed),
        }
    }

    /// Parses `<kind>@<param>`, e.g. `noise@0.05`, `fb@20` or `drop@0.1:0.05`.
    pub fn from_spec(spec: &str) -> SurveyResult<Self> {
        let invalid = |reason: &str| SurveyError::InvalidSpec {
            spec: spec.to_string(),
            reason: reason.to_string(),
        };

        let (kind, param) = spec
            .trim()
            .split_once('@')
            .ok_or_else(|| invalid("expected <kind>@<param>"))?;
        let number = |text: &str| -> SurveyResult<f64> {
            text.trim()
                .parse::<f64>()
                .map_err(|e| invalid(&format!("'{}' is not a number ({})", text, e)))
        };

        match kind.trim().to_ascii_lowercase().as_str() {
            "noise" => Ok(ErrorStage::Noise(Noise::new(number(param)?)?)),
            "fb" => Ok(ErrorStage::FalseBottom(FalseBottom::new(number(param)?, None)?)),
            "drop" => {
                let stage = match param.split_once(':') {
                    Some((rate, decay)) => Dropout::with_decay(number(rate)?, number(decay)?)?,
                    None => Dropout::new(number(param)?)?,
                };
                Ok(ErrorStage::Dropout(stage))
            }
            other => Err(invalid(&format!(
                "unknown error kind '{}' (expected noise, fb or drop)",
                other
            ))),
        }
    }
}

impl FromStr for ErrorStage {
    type Err = SurveyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_spec(s)
    }
}

impl fmt::Display for ErrorStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorStage::Noise(stage) => write!(f, "noise@{}", stage.rate()),
            ErrorStage::FalseBottom(stage) => write!(f, "fb@{}", stage.debris_area_m2()),
            ErrorStage::Dropout(stage) => {
                write!(f, "drop@{}:{}", stage.rate(), stage.decay_rate())
            }
        }
    }
}
