// src/survey/error_model/dropout.rs

use super::StageRng;
use crate::math::types::*;
use crate::survey::error::{SurveyError, SurveyResult};
use rand::Rng;

pub const DEFAULT_DECAY_RATE: f64 = 0.02;

/// Random sensor failure. A dropped reading reports depth 0.
///
/// After a drop the chance of the next drop is raised by
/// `decay_rate / consecutive_drops`, so the bonus shrinks the longer the
/// sensor stays down.
#[derive(Debug, Clone)]
pub struct Dropout {
    rate: f64,
    decay_rate: f64,
    consecutive_drops: u64,
    pub(super) rng: StageRng,
}

impl Dropout {
    pub fn new(rate: f64) -> SurveyResult<Self> {
        Self::with_decay(rate, DEFAULT_DECAY_RATE)
    }

    pub fn with_decay(rate: f64, decay_rate: f64) -> SurveyResult<Self> {
        if !rate.is_finite() || !(0.0..=1.0).contains(&rate) {
            return Err(SurveyError::RateOutOfRange {
                stage: "dropout",
                rate,
            });
        }
        if !decay_rate.is_finite() || decay_rate < 0.0 {
            return Err(SurveyError::InvalidConfiguration {
                message: format!("dropout decay rate must be >= 0, got {}", decay_rate),
            });
        }

        Ok(Self {
            rate,
            decay_rate,
            consecutive_drops: 0,
            rng: StageRng::from_entropy(),
        })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn decay_rate(&self) -> f64 {
        self.decay_rate
    }

    pub fn consecutive_drops(&self) -> u64 {
        self.consecutive_drops
    }

    /// Probability that the next `eval` drops the reading.
    pub fn dropout_chance(&self) -> f64 {
        let bonus = if self.consecutive_drops > 0 {
            self.decay_rate / self.consecutive_drops as f64
        } else {
            0.0
        };
        self.rate + bonus
    }

    pub fn eval(&mut self, vector: Point3D, seed: Option<u64>) -> Point3D {
        let chance = self.dropout_chance();
        let draw: f64 = self.rng.with(seed, |rng| rng.random());

        if draw < chance {
            self.consecutive_drops = self.consecutive_drops.saturating_add(1);
            Point3D::new(vector.x, vector.y, 0.0)
        } else {
            self.consecutive_drops = 0;
            vector
        }
    }
}
