// src/survey/config.rs

use crate::math::geometry::spatial_index::MAX_BINS_PER_AXIS;
use crate::survey::emitter::EmitterSpec;
use crate::survey::error::{SurveyError, SurveyResult};
use crate::survey::error_model::ErrorStage;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Which position generator drives the vessel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathKind {
    /// Lawnmower scan over the surface bounds.
    #[default]
    Parallel,
    /// Walk along waypoints read from a file.
    Drawn,
}

/// Everything a survey run needs, read from flags and an optional JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyConfig {
    /// Seafloor surface file (.stl, .xyz, .txt, .csv).
    pub surface: Option<PathBuf>,
    /// Samples per second, > 0.
    pub sample_rate_hz: f64,
    /// Vessel speed in m/s, > 0.
    pub velocity_m_s: f64,
    pub path: PathKind,
    /// Waypoint file, required for [`PathKind::Drawn`].
    pub waypoints: Option<PathBuf>,
    /// Error stages in application order, e.g. `["noise@0.05", "drop@0.1"]`.
    pub errors: Vec<String>,
    pub emitter: EmitterSpec,
    /// Skip the wall-clock pacing between samples.
    pub no_wait: bool,
    /// Master seed for every error stage. Random when unset.
    pub seed: Option<u64>,
    /// Spatial index resolution. Derived from the face count when unset.
    pub bins_per_axis: Option<usize>,
    /// Track plot written when the survey finishes.
    pub svg_output: Option<PathBuf>,
    pub verbose: bool,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            surface: None,
            sample_rate_hz: 1.0,
            velocity_m_s: 1.0,
            path: PathKind::Parallel,
            waypoints: None,
            errors: Vec::new(),
            emitter: EmitterSpec::StdOut,
            no_wait: false,
            seed: None,
            bins_per_axis: None,
            svg_output: None,
            verbose: false,
        }
    }
}

impl SurveyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> SurveyResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> SurveyResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    pub fn with_surface(mut self, path: impl Into<PathBuf>) -> Self {
        self.surface = Some(path.into());
        self
    }

    pub fn with_sample_rate(mut self, hz: f64) -> Self {
        self.sample_rate_hz = hz;
        self
    }

    pub fn with_velocity(mut self, m_s: f64) -> Self {
        self.velocity_m_s = m_s;
        self
    }

    pub fn with_path(mut self, path: PathKind) -> Self {
        self.path = path;
        self
    }

    pub fn with_waypoints(mut self, path: impl Into<PathBuf>) -> Self {
        self.waypoints = Some(path.into());
        self
    }

    pub fn with_error(mut self, spec: impl Into<String>) -> Self {
        self.errors.push(spec.into());
        self
    }

    pub fn with_emitter(mut self, emitter: EmitterSpec) -> Self {
        self.emitter = emitter;
        self
    }

    pub fn with_no_wait(mut self, no_wait: bool) -> Self {
        self.no_wait = no_wait;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_bins(mut self, bins_per_axis: usize) -> Self {
        self.bins_per_axis = Some(bins_per_axis);
        self
    }

    pub fn with_svg_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.svg_output = Some(path.into());
        self
    }

    /// Distance covered between two samples.
    pub fn step_distance(&self) -> f64 {
        self.velocity_m_s / self.sample_rate_hz
    }

    /// Wall-clock time between two samples, zero with `no_wait`.
    pub fn sample_interval(&self) -> SurveyResult<Duration> {
        if self.no_wait {
            return Ok(Duration::ZERO);
        }
        let unusable = || SurveyError::InvalidConfiguration {
            message: format!("sample rate must be > 0 Hz, got {}", self.sample_rate_hz),
        };
        if !self.sample_rate_hz.is_finite() || self.sample_rate_hz <= 0.0 {
            return Err(unusable());
        }
        Duration::try_from_secs_f64(1.0 / self.sample_rate_hz).map_err(|_| unusable())
    }

    pub fn validate(&self) -> SurveyResult<()> {
        let invalid = |message: String| Err(SurveyError::InvalidConfiguration { message });

        if self.surface.is_none() {
            return invalid("a surface file is required".to_string());
        }
        if !self.sample_rate_hz.is_finite() || self.sample_rate_hz <= 0.0 {
            return invalid(format!(
                "sample rate must be > 0 Hz, got {}",
                self.sample_rate_hz
            ));
        }
        if !self.velocity_m_s.is_finite() || self.velocity_m_s <= 0.0 {
            return invalid(format!("velocity must be > 0 m/s, got {}", self.velocity_m_s));
        }
        if self.path == PathKind::Drawn && self.waypoints.is_none() {
            return invalid("the drawn path needs a waypoint file".to_string());
        }
        if let Some(bins) = self.bins_per_axis {
            if !(1..=MAX_BINS_PER_AXIS).contains(&bins) {
                return invalid(format!(
                    "bins per axis must be within 1..={}, got {}",
                    MAX_BINS_PER_AXIS, bins
                ));
            }
        }
        for spec in &self.errors {
            ErrorStage::from_spec(spec)?;
        }
        Ok(())
    }
}
