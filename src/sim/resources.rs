use crate::math::geometry::spatial_index::SpatialMeshIndex;
use crate::math::types::*;
use crate::survey::{emitter::VectorEmitter, error_model::ErrorPipeline, path::SurveyPath};
use bevy::prelude::*;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Depth lookup over the loaded seafloor.
#[derive(Resource)]
pub struct SurveyMesh(pub SpatialMeshIndex);

/// Error stages of this run. Only the sampling system mutates them.
#[derive(Resource)]
pub struct ActivePipeline(pub ErrorPipeline);

/// Position generator of this run, consumed one position per tick.
#[derive(Resource)]
pub struct ActivePath(pub SurveyPath);

/// Where finished readings go.
#[derive(Resource)]
pub struct ReadingSink(pub Box<dyn VectorEmitter>);

/// Optional SVG file written when the survey finishes.
#[derive(Resource, Debug, Default, Clone)]
pub struct TrackPlotOutput(pub Option<PathBuf>);

/// One visited position and the raw depth found there, if any.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackPoint {
    pub position: Point2D,
    pub depth: Option<f64>,
}

#[derive(Resource, Debug, Default)]
pub struct SurveyStats {
    // --- Zähler ---
    pub positions: usize,
    pub emitted: usize,
    pub misses: usize,
    pub emit_failures: usize,

    // --- Zeitmessung ---
    pub started: Option<Instant>,
    pub processing_time: Duration,

    /// Visited positions, only recorded when a track plot is requested.
    pub track: Vec<TrackPoint>,
}

impl SurveyStats {
    pub fn elapsed(&self) -> Duration {
        self.started.map(|t| t.elapsed()).unwrap_or_default()
    }

    /// Mean processing time per visited position, excluding pacing sleeps.
    pub fn mean_processing_time(&self) -> Duration {
        if self.positions == 0 {
            Duration::ZERO
        } else {
            self.processing_time.div_f64(self.positions as f64)
        }
    }
}
