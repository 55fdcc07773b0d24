// ./src/setup.rs
use crate::io::{load_surface, load_waypoints};
use crate::math::{
    geometry::spatial_index::SpatialMeshIndex, probability::SeedResource, types::Bounds2D,
};
use crate::sim::resources::*;
use crate::survey::{
    config::{PathKind, SurveyConfig},
    emitter::VectorEmitter,
    error::{SurveyError, SurveyResult},
    error_model::ErrorPipeline,
    path::{DrawnPath, ParallelTrack, SurveyPath, movement_vectors},
};
use bevy::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;

/// Everything a survey run needs, built and validated before the app starts.
pub struct SurveySetup {
    pub mesh: SpatialMeshIndex,
    pub pipeline: ErrorPipeline,
    pub path: SurveyPath,
    pub sink: Box<dyn VectorEmitter>,
    pub seed: SeedResource,
    pub plot_output: Option<PathBuf>,
}

impl SurveySetup {
    /// Loads the surface, builds the index, the error pipeline, the path and
    /// opens the emitter. Any configuration error surfaces here, before the
    /// first sample.
    pub fn from_config(config: &SurveyConfig) -> SurveyResult<Self> {
        config.validate()?;

        let surface_path = config
            .surface
            .as_ref()
            .ok_or_else(|| SurveyError::InvalidConfiguration {
                message: "a surface file is required".to_string(),
            })?;
        let surface = Arc::new(load_surface(surface_path)?);

        let mesh = match config.bins_per_axis {
            Some(bins) => SpatialMeshIndex::build(Arc::clone(&surface), bins)?,
            None => SpatialMeshIndex::with_default_bins(Arc::clone(&surface))?,
        };

        let seed = config.seed.map(SeedResource::from_seed).unwrap_or_default();
        let surface_bounds = surface.bounds().xy();
        let mut pipeline = ErrorPipeline::from_specs(&config.errors)?.with_seed(&seed);
        pipeline.init_footprints(surface_bounds);

        let path = build_path(config, surface_bounds)?;
        let sink = config.emitter.open()?;

        info!(
            "Survey ready: {} path at {} Hz / {} m/s ({:.3} m per sample), errors [{}], output {}, seed {}",
            path.kind(),
            config.sample_rate_hz,
            config.velocity_m_s,
            config.step_distance(),
            pipeline,
            sink.describe(),
            seed.seed
        );
        debug!(
            "Spatial index: {} bins per axis, bin size {:?}",
            mesh.bins_per_axis(),
            mesh.bin_size()
        );

        Ok(Self {
            mesh,
            pipeline,
            path,
            sink,
            seed,
            plot_output: config.svg_output.clone(),
        })
    }

    pub fn insert_into(self, app: &mut App) {
        app.insert_resource(SurveyMesh(self.mesh))
            .insert_resource(ActivePipeline(self.pipeline))
            .insert_resource(ActivePath(self.path))
            .insert_resource(ReadingSink(self.sink))
            .insert_resource(TrackPlotOutput(self.plot_output))
            .insert_resource(self.seed);
    }
}

/// Position generator for the configured path type.
///
/// The parallel track covers `bounds`; the drawn path follows the waypoint
/// file. Both advance `velocity / sample_rate` metres per sample.
pub fn build_path(config: &SurveyConfig, bounds: Bounds2D) -> SurveyResult<SurveyPath> {
    match config.path {
        PathKind::Parallel => {
            let (right, up) = movement_vectors(config.sample_rate_hz, config.velocity_m_s);
            Ok(ParallelTrack::from_bounds(bounds, right, up)?.into())
        }
        PathKind::Drawn => {
            let file = config
                .waypoints
                .as_ref()
                .ok_or_else(|| SurveyError::InvalidConfiguration {
                    message: "the drawn path needs a waypoint file".to_string(),
                })?;
            let waypoints = load_waypoints(file)?;
            Ok(DrawnPath::new(waypoints, config.step_distance())?.into())
        }
    }
}
