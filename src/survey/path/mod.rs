// src/survey/path/mod.rs
//! Position generators for the survey vessel.
//!
//! Both generators are finite iterators over XY positions and cannot be
//! restarted; build a new one for a new run.

pub mod drawn_path;
pub mod parallel_track;

pub use drawn_path::DrawnPath;
pub use parallel_track::ParallelTrack;

use crate::math::types::*;

/// Distance the vessel covers between two samples, as `(right, up)` step vectors.
pub fn movement_vectors(sample_rate_hz: f64, velocity_m_s: f64) -> (Point2D, Point2D) {
    let factor = velocity_m_s / sample_rate_hz;
    (Point2D::new(factor, 0.0), Point2D::new(0.0, factor))
}

#[derive(Debug, Clone)]
pub enum SurveyPath {
    Parallel(ParallelTrack),
    Drawn(DrawnPath),
}

impl SurveyPath {
    pub fn kind(&self) -> &'static str {
        match self {
            SurveyPath::Parallel(_) => "parallel",
            SurveyPath::Drawn(_) => "drawn",
        }
    }
}

impl Iterator for SurveyPath {
    type Item = Point2D;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            SurveyPath::Parallel(track) => track.next(),
            SurveyPath::Drawn(path) => path.next(),
        }
    }
}

impl From<ParallelTrack> for SurveyPath {
    fn from(track: ParallelTrack) -> Self {
        SurveyPath::Parallel(track)
    }
}

impl From<DrawnPath> for SurveyPath {
    fn from(path: DrawnPath) -> Self {
        SurveyPath::Drawn(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_movement_vectors() {
        let (right, up) = movement_vectors(2.0, 3.0);
        assert_relative_eq!(right.x, 1.5);
        assert_eq!(right.y, 0.0);
        assert_eq!(up.x, 0.0);
        assert_relative_eq!(up.y, 1.5);
    }

    #[test]
    fn test_survey_path_delegates() {
        let (right, up) = movement_vectors(1.0, 1.0);
        let track = ParallelTrack::new(0.0, 1.0, 0.0, 1.0, right, up).unwrap();
        let path: SurveyPath = track.into();
        assert_eq!(path.kind(), "parallel");
        assert_eq!(path.count(), 4);

        let drawn: SurveyPath = DrawnPath::new(vec![Point2D::ZERO, Point2D::new(3.0, 0.0)], 1.0)
            .unwrap()
            .into();
        assert_eq!(drawn.kind(), "drawn");
        assert_eq!(drawn.last(), Some(Point2D::new(3.0, 0.0)));
    }
}
