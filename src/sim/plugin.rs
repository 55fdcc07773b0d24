//! Provides the Bevy `Plugin` that runs a survey as a sampling loop.
//!
//! The plugin expects the survey resources (`SurveyMesh`, `ActivePipeline`,
//! `ActivePath`, `ReadingSink`) to be inserted before the app runs, see
//! `crate::setup`.

use super::{resources::*, state::SurveyState, systems::*};
use bevy::prelude::*;

/// A Bevy `Plugin` that drives one survey from first position to exit.
///
/// - Registers `SurveyState` and `SurveyStats`.
/// - Samples one position per `Update` while surveying.
/// - On `SurveyState::Finished` logs a summary, writes the optional track
///   plot and sends `AppExit`.
pub struct SurveyPlugin;

impl Plugin for SurveyPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<SurveyState>()
            .init_resource::<SurveyStats>()
            .init_resource::<TrackPlotOutput>()
            .add_systems(
                Update,
                sample_next_position_system.run_if(in_state(SurveyState::Surveying)),
            )
            .add_systems(
                OnEnter(SurveyState::Finished),
                (
                    log_survey_summary_system,
                    write_track_plot_system,
                    request_exit_system,
                )
                    .chain(),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::geometry::{spatial_index::SpatialMeshIndex, surface::Surface};
    use crate::math::types::*;
    use crate::survey::{
        emitter::VectorEmitter,
        error::{SurveyError, SurveyResult},
        error_model::{ErrorPipeline, ErrorStage},
        path::{DrawnPath, SurveyPath},
    };
    use bevy::app::AppExit;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct CollectingEmitter(Arc<Mutex<Vec<Point3D>>>);

    impl VectorEmitter for CollectingEmitter {
        fn emit(&mut self, reading: Point3D) -> SurveyResult<()> {
            self.0.lock().unwrap().push(reading);
            Ok(())
        }

        fn describe(&self) -> String {
            "memory".to_string()
        }
    }

    struct FailingEmitter;

    impl VectorEmitter for FailingEmitter {
        fn emit(&mut self, _reading: Point3D) -> SurveyResult<()> {
            Err(SurveyError::Emitter {
                emitter: "test".into(),
                reason: "offline".into(),
            })
        }

        fn describe(&self) -> String {
            "failing".to_string()
        }
    }

    fn flat_floor() -> SpatialMeshIndex {
        let vertices = vec![
            Point3D::new(-10.0, -10.0, -5.0),
            Point3D::new(10.0, -10.0, -5.0),
            Point3D::new(10.0, 10.0, -5.0),
            Point3D::new(-10.0, 10.0, -5.0),
        ];
        let surface = Surface::new(vertices, vec![[0, 1, 2], [0, 2, 3]]).unwrap();
        SpatialMeshIndex::build(Arc::new(surface), 4).unwrap()
    }

    /// Positions x = -17, -12, -7, -2, 3, 8 on y = 0; the first two miss the floor.
    fn crossing_path() -> SurveyPath {
        DrawnPath::new(vec![Point2D::new(-22.0, 0.0), Point2D::new(8.0, 0.0)], 5.0)
            .unwrap()
            .into()
    }

    fn survey_app(pipeline: ErrorPipeline, sink: Box<dyn VectorEmitter>) -> App {
        let mut app = App::new();
        app.add_plugins(SurveyPlugin)
            .insert_resource(SurveyMesh(flat_floor()))
            .insert_resource(ActivePipeline(pipeline))
            .insert_resource(ActivePath(crossing_path()))
            .insert_resource(ReadingSink(sink));
        app
    }

    /// Updates until the survey finishes, returns the number of updates.
    fn run_to_finish(app: &mut App) -> usize {
        for update in 1..=50 {
            app.update();
            if *app.world.resource::<State<SurveyState>>().get() == SurveyState::Finished {
                return update;
            }
        }
        panic!("survey did not finish");
    }

    #[test]
    fn test_one_reading_per_covered_position() {
        let collected = CollectingEmitter::default();
        let mut app = survey_app(ErrorPipeline::default(), Box::new(collected.clone()));

        app.update();
        assert_eq!(app.world.resource::<SurveyStats>().positions, 1);
        assert!(collected.0.lock().unwrap().is_empty());

        run_to_finish(&mut app);

        let readings = collected.0.lock().unwrap().clone();
        let xs: Vec<f64> = readings.iter().map(|r| r.x.round()).collect();
        assert_eq!(xs, vec![-7.0, -2.0, 3.0, 8.0]);
        assert!(readings.iter().all(|r| (r.z + 5.0).abs() < 1e-9));

        let stats = app.world.resource::<SurveyStats>();
        assert_eq!(stats.positions, 6);
        assert_eq!(stats.emitted, 4);
        assert_eq!(stats.misses, 2);
        assert!(stats.track.is_empty());
    }

    #[test]
    fn test_track_recorded_only_for_plot_output() {
        let dir = tempfile::TempDir::new().unwrap();
        let plot = dir.path().join("track.svg");
        let mut app = survey_app(ErrorPipeline::default(), Box::new(CollectingEmitter::default()));
        app.insert_resource(TrackPlotOutput(Some(plot.clone())));
        run_to_finish(&mut app);

        let stats = app.world.resource::<SurveyStats>();
        assert_eq!(stats.track.len(), 6);
        assert_eq!(stats.track[0].depth, None);
        assert!(stats.track[5].depth.is_some());
        assert!(plot.exists());
    }

    #[test]
    fn test_finishing_requests_exit() {
        let mut app = survey_app(ErrorPipeline::default(), Box::new(CollectingEmitter::default()));
        run_to_finish(&mut app);
        assert_eq!(app.world.resource::<Events<AppExit>>().len(), 1);

        // Keine weiteren Samples nach dem Ende
        app.update();
        assert_eq!(app.world.resource::<SurveyStats>().positions, 6);
    }

    #[test]
    fn test_pipeline_applies_to_every_reading() {
        let collected = CollectingEmitter::default();
        let pipeline = ErrorPipeline::new(vec![ErrorStage::from_spec("drop@1").unwrap()]);
        let mut app = survey_app(pipeline, Box::new(collected.clone()));
        run_to_finish(&mut app);

        let readings = collected.0.lock().unwrap();
        assert_eq!(readings.len(), 4);
        assert!(readings.iter().all(|r| r.z == 0.0));
    }

    #[test]
    fn test_emit_failures_do_not_stop_the_survey() {
        let mut app = survey_app(ErrorPipeline::default(), Box::new(FailingEmitter));
        run_to_finish(&mut app);

        let stats = app.world.resource::<SurveyStats>();
        assert_eq!(stats.positions, 6);
        assert_eq!(stats.emitted, 0);
        assert_eq!(stats.emit_failures, 4);
    }
}
