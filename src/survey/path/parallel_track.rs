// src/survey/path/parallel_track.rs

use crate::math::types::*;
use crate::survey::error::{SurveyError, SurveyResult};

/// Lawnmower scan over a rectangle.
///
/// Starts in the lower left corner and runs lanes along Y, alternating
/// up and down, shifting one `step_right` to the right between lanes. The
/// scan ends as soon as the position leaves the rectangle to the right or
/// top.
#[derive(Debug, Clone)]
pub struct ParallelTrack {
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
    step_right: Point2D,
    step_up: Point2D,
    position: Point2D,
    direction: f64,
}

impl ParallelTrack {
    pub fn new(
        min_x: f64,
        max_x: f64,
        min_y: f64,
        max_y: f64,
        step_right: Point2D,
        step_up: Point2D,
    ) -> SurveyResult<Self> {
        let invalid = |message: String| Err(SurveyError::InvalidConfiguration { message });

        if ![min_x, max_x, min_y, max_y].iter().all(|v| v.is_finite()) {
            return invalid("parallel track bounds must be finite".into());
        }
        if min_x > max_x || min_y > max_y {
            return invalid(format!(
                "parallel track bounds are inverted: x [{}, {}], y [{}, {}]",
                min_x, max_x, min_y, max_y
            ));
        }
        if !step_right.is_finite() || step_right.x <= 0.0 {
            return invalid(format!("step_right must move right, got {:?}", step_right));
        }
        if !step_up.is_finite() || step_up.y <= 0.0 {
            return invalid(format!("step_up must move up, got {:?}", step_up));
        }

        Ok(Self {
            min_x,
            max_x,
            min_y,
            max_y,
            step_right,
            step_up,
            position: Point2D::new(min_x, min_y),
            direction: 1.0,
        })
    }

    pub fn from_bounds(bounds: Bounds2D, step_right: Point2D, step_up: Point2D) -> SurveyResult<Self> {
        Self::new(
            bounds.min.x,
            bounds.max.x,
            bounds.min.y,
            bounds.max.y,
            step_right,
            step_up,
        )
    }

    pub fn bounds(&self) -> Bounds2D {
        Bounds2D {
            min: Point2D::new(self.min_x, self.min_y),
            max: Point2D::new(self.max_x, self.max_y),
        }
    }

    fn is_exhausted(&self) -> bool {
        self.position.x > self.max_x || self.position.y > self.max_y
    }
}

impl Iterator for ParallelTrack {
    type Item = Point2D;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_exhausted() {
            return None;
        }
        let current = self.position;

        self.position += self.direction * self.step_up;
        if !(self.min_y..=self.max_y).contains(&self.position.y) {
            // switch lanes: step back into the strip, then right
            self.direction = -self.direction;
            self.position += self.direction * self.step_up;
            self.position += self.step_right;
        }

        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_track(max: f64) -> ParallelTrack {
        ParallelTrack::new(0.0, max, 0.0, max, Point2D::X, Point2D::Y).unwrap()
    }

    #[test]
    fn test_ten_by_ten_scan_in_lane_order() {
        let points: Vec<Point2D> = unit_track(9.0).collect();
        assert_eq!(points.len(), 100);

        let expected: Vec<Point2D> = (0..10)
            .flat_map(|lane| {
                let ys: Vec<i32> = if lane % 2 == 0 {
                    (0..10).collect()
                } else {
                    (0..10).rev().collect()
                };
                ys.into_iter()
                    .map(move |y| Point2D::new(lane as f64, y as f64))
            })
            .collect();
        assert_eq!(points, expected);
    }

    #[test]
    fn test_lane_turns() {
        let points: Vec<Point2D> = unit_track(9.0).collect();
        assert_eq!(points[9], Point2D::new(0.0, 9.0));
        assert_eq!(points[10], Point2D::new(1.0, 9.0));
        assert_eq!(points[19], Point2D::new(1.0, 0.0));
        assert_eq!(points[20], Point2D::new(2.0, 0.0));
        assert_eq!(points[99], Point2D::new(9.0, 0.0));
    }

    #[test]
    fn test_points_stay_inside_bounds() {
        let track = ParallelTrack::new(
            -3.0,
            4.5,
            2.0,
            7.25,
            Point2D::new(0.7, 0.0),
            Point2D::new(0.0, 0.4),
        )
        .unwrap();
        let bounds = track.bounds();
        let points: Vec<Point2D> = track.collect();

        assert!(!points.is_empty());
        assert!(points.iter().all(|&p| bounds.contains_point(p)));
    }

    #[test]
    fn test_degenerate_rectangle_yields_one_lane_point_per_column() {
        let points: Vec<Point2D> = ParallelTrack::new(0.0, 2.0, 5.0, 5.0, Point2D::X, Point2D::Y)
            .unwrap()
            .collect();
        assert_eq!(
            points,
            vec![Point2D::new(0.0, 5.0), Point2D::new(1.0, 5.0), Point2D::new(2.0, 5.0)]
        );
    }

    #[test]
    fn test_rejects_non_terminating_configurations() {
        assert!(ParallelTrack::new(0.0, 9.0, 0.0, 9.0, Point2D::ZERO, Point2D::Y).is_err());
        assert!(ParallelTrack::new(0.0, 9.0, 0.0, 9.0, Point2D::X, Point2D::new(0.0, -1.0)).is_err());
        assert!(ParallelTrack::new(9.0, 0.0, 0.0, 9.0, Point2D::X, Point2D::Y).is_err());
        assert!(ParallelTrack::new(0.0, f64::NAN, 0.0, 9.0, Point2D::X, Point2D::Y).is_err());
    }
}
