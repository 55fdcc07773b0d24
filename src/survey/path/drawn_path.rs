// src/survey/path/drawn_path.rs

use crate::math::types::*;
use crate::math::utils::constants::EPSILON;
use crate::survey::error::{SurveyError, SurveyResult};

/// Walk along a polyline at constant arc-length steps.
///
/// The first waypoint is the starting position and is not reported itself.
/// Each call to `next` walks `step_distance` along the polyline, carrying
/// leftover distance across waypoints. A final step that would run past the
/// last waypoint ends the walk.
#[derive(Debug, Clone)]
pub struct DrawnPath {
    waypoints: Vec<Point2D>,
    step_distance: f64,
    position: Point2D,
    next_waypoint: usize,
}

impl DrawnPath {
    pub fn new(waypoints: Vec<Point2D>, step_distance: f64) -> SurveyResult<Self> {
        if waypoints.len() < 2 {
            return Err(SurveyError::InsufficientWaypoints {
                expected: 2,
                actual: waypoints.len(),
            });
        }
        if !step_distance.is_finite() || step_distance <= 0.0 {
            return Err(SurveyError::InvalidConfiguration {
                message: format!("step distance must be positive, got {}", step_distance),
            });
        }
        if let Some(bad) = waypoints.iter().find(|p| !p.is_finite()) {
            return Err(SurveyError::InvalidConfiguration {
                message: format!("waypoint {:?} is not finite", bad),
            });
        }

        Ok(Self {
            position: waypoints[0],
            waypoints,
            step_distance,
            next_waypoint: 1,
        })
    }

    pub fn step_distance(&self) -> f64 {
        self.step_distance
    }

    /// Total arc length of the polyline.
    pub fn length(&self) -> f64 {
        self.waypoints.windows(2).map(|w| w[0].distance(w[1])).sum()
    }
}

impl Iterator for DrawnPath {
    type Item = Point2D;

    fn next(&mut self) -> Option<Self::Item> {
        let mut remaining = self.step_distance;

        loop {
            let target = *self.waypoints.get(self.next_waypoint)?;
            let segment = target - self.position;
            let segment_length = segment.length();

            if (segment_length - remaining).abs() <= EPSILON {
                self.position = target;
                self.next_waypoint += 1;
                return Some(target);
            }

            if segment_length < remaining {
                remaining -= segment_length;
                self.position = target;
                self.next_waypoint += 1;
                continue;
            }

            let heading = segment.y.atan2(segment.x);
            self.position += remaining * Point2D::new(heading.cos(), heading.sin());
            return Some(self.position);
        }
    }
}
