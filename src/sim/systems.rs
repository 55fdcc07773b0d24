use super::resources::*;
use super::state::SurveyState;
use crate::debug::visualization::svg::write_track_plot;
use bevy::app::AppExit;
use bevy::prelude::*;
use std::time::Instant;

/// One sample per tick: next position, depth lookup, error pipeline, emit.
///
/// The schedule runner paces ticks to the sample rate, so this system never
/// sleeps itself.
pub fn sample_next_position_system(
    mesh: Res<SurveyMesh>,
    mut pipeline: ResMut<ActivePipeline>,
    mut path: ResMut<ActivePath>,
    mut sink: ResMut<ReadingSink>,
    mut stats: ResMut<SurveyStats>,
    plot_output: Res<TrackPlotOutput>,
    mut next_state: ResMut<NextState<SurveyState>>,
) {
    let Some(position) = path.0.next() else {
        info!("Path exhausted after {} positions", stats.positions);
        next_state.set(SurveyState::Finished);
        return;
    };

    let tick_start = Instant::now();
    stats.started.get_or_insert(tick_start);
    stats.positions += 1;

    let depth = mesh.0.shallowest_depth(position.x, position.y);
    if plot_output.0.is_some() {
        stats.track.push(TrackPoint { position, depth });
    }

    match depth {
        None => {
            stats.misses += 1;
            debug!(
                "No surface below ({:.3}, {:.3}), skipping sample {}",
                position.x, position.y, stats.positions
            );
        }
        Some(depth) => {
            let reading = pipeline.0.run(position.extend(depth), None);
            match sink.0.emit(reading) {
                Ok(()) => stats.emitted += 1,
                Err(e) => {
                    stats.emit_failures += 1;
                    warn!("Failed to emit reading {:?}: {}", reading, e);
                }
            }
            debug!(
                "Sample {} at ({:.3}, {:.3}): raw {:.3}, reported {:.3}",
                stats.positions, position.x, position.y, depth, reading.z
            );
        }
    }

    stats.processing_time += tick_start.elapsed();
}

pub fn log_survey_summary_system(stats: Res<SurveyStats>, sink: Res<ReadingSink>) {
    info!(
        "Survey finished: {} positions, {} readings to {}, {} without surface, {} emit failures",
        stats.positions,
        stats.emitted,
        sink.0.describe(),
        stats.misses,
        stats.emit_failures
    );
    info!(
        "Elapsed {:.2?}, mean processing time {:.2?} per position",
        stats.elapsed(),
        stats.mean_processing_time()
    );
}

pub fn write_track_plot_system(
    output: Res<TrackPlotOutput>,
    mesh: Res<SurveyMesh>,
    pipeline: Res<ActivePipeline>,
    stats: Res<SurveyStats>,
) {
    let Some(path) = &output.0 else {
        return;
    };

    let footprints: Vec<_> = pipeline
        .0
        .false_bottoms()
        .filter_map(|false_bottom| false_bottom.footprint_corners())
        .collect();

    match write_track_plot(path, mesh.0.surface(), &footprints, &stats.track) {
        Ok(()) => info!("Track plot written to {}", path.display()),
        Err(e) => warn!("Failed to write track plot {}: {}", path.display(), e),
    }
}

pub fn request_exit_system(mut exit: EventWriter<AppExit>) {
    exit.send(AppExit);
}
