// src/survey/error_model/noise.rs

use super::StageRng;
use crate::math::types::*;
use crate::survey::error::{SurveyError, SurveyResult};
use rand::Rng;
use rand_distr::Normal;

/// Gaussian percentage error on the depth.
///
/// `rate` is the 3-sigma bound of the relative error: with `rate = 0.05`
/// almost every reading stays within ±5% of its true depth.
#[derive(Debug, Clone)]
pub struct Noise {
    rate: f64,
    distribution: Normal<f64>,
    pub(super) rng: StageRng,
}

impl Noise {
    pub fn new(rate: f64) -> SurveyResult<Self> {
        if !rate.is_finite() || !(0.0..=1.0).contains(&rate) {
            return Err(SurveyError::RateOutOfRange {
                stage: "noise",
                rate,
            });
        }

        let distribution =
            Normal::new(0.0, rate / 3.0).map_err(|e| SurveyError::InvalidConfiguration {
                message: format!("noise distribution for rate {}: {}", rate, e),
            })?;

        Ok(Self {
            rate,
            distribution,
            rng: StageRng::from_entropy(),
        })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn eval(&mut self, vector: Point3D, seed: Option<u64>) -> Point3D {
        let distribution = self.distribution;
        let gauss: f64 = self.rng.with(seed, |rng| rng.sample(distribution));

        Point3D::new(vector.x, vector.y, vector.z + vector.z * gauss)
    }
}
