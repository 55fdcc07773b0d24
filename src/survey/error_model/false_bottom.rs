// src/survey/error_model/false_bottom.rs

use super::StageRng;
use crate::math::geometry::kernel::{point_in_triangle, rotate_2d};
use crate::math::types::*;
use crate::math::utils::constants::TAU;
use crate::survey::error::{SurveyError, SurveyResult};
use bevy::log::debug;
use rand::Rng;

/// A submerged piece of debris that masks the seafloor.
///
/// The debris is an oriented rectangle placed somewhere inside the survey
/// area by [`FalseBottom::init_footprint`]. The first reading that lands on it
/// fixes the apparent depth at half the true depth; every later reading on
/// the footprint reports that same depth.
#[derive(Debug, Clone)]
pub struct FalseBottom {
    debris_area_m2: f64,
    seed: Option<u64>,
    footprint: Option<[Point2D; 4]>,
    cached_depth: Option<f64>,
    pub(super) rng: StageRng,
}

impl FalseBottom {
    pub fn new(debris_area_m2: f64, seed: Option<u64>) -> SurveyResult<Self> {
        if !debris_area_m2.is_finite() || debris_area_m2 <= 1.0 {
            return Err(SurveyError::InvalidConfiguration {
                message: format!(
                    "false bottom debris area must be larger than 1 m², got {}",
                    debris_area_m2
                ),
            });
        }

        Ok(Self {
            debris_area_m2,
            seed,
            footprint: None,
            cached_depth: None,
            rng: StageRng::from_entropy(),
        })
    }

    pub fn debris_area_m2(&self) -> f64 {
        self.debris_area_m2
    }

    /// Places the debris inside the given bounds.
    ///
    /// With a stage seed the placement is fully reproducible; calling this
    /// again re-places the debris and forgets the cached depth.
    pub fn init_footprint(&mut self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) {
        let area = self.debris_area_m2;
        let (length, anchor, theta) = self.rng.with(self.seed, |rng| {
            // (0, area - 1], never zero
            let length = (1.0 - rng.random::<f64>()) * (area - 1.0);
            let anchor = Point2D::new(
                min_x + rng.random::<f64>() * (max_x - min_x),
                min_y + rng.random::<f64>() * (max_y - min_y),
            );
            let theta = rng.random::<f64>() * TAU;
            (length, anchor, theta)
        });
        let width = area / length;

        //  P3 --- P4
        //  |      |
        //  P1 --- P2
        let p1 = anchor;
        let p2 = p1 + rotate_2d(Point2D::new(length, 0.0), theta);
        let p3 = p1 + rotate_2d(Point2D::new(0.0, width), theta);
        let p4 = p1 + rotate_2d(Point2D::new(length, width), theta);

        debug!(
            "False bottom of {:.1} m² placed at ({:.2}, {:.2}), {:.2} x {:.2} m, theta {:.3} rad",
            area, anchor.x, anchor.y, length, width, theta
        );

        self.footprint = Some([p1, p2, p3, p4]);
        self.cached_depth = None;
    }

    /// Rectangle corners `[P1, P2, P3, P4]` once the footprint is placed.
    pub fn footprint_corners(&self) -> Option<[Point2D; 4]> {
        self.footprint
    }

    /// The two triangles covering the footprint.
    pub fn footprint_triangles(&self) -> Option<[[Point2D; 3]; 2]> {
        self.footprint
            .map(|[p1, p2, p3, p4]| [[p1, p2, p4], [p1, p3, p4]])
    }

    pub fn cached_depth(&self) -> Option<f64> {
        self.cached_depth
    }

    pub fn contains(&self, point: Point2D) -> bool {
        self.footprint_triangles().is_some_and(|triangles| {
            triangles.iter().any(|[a, b, c]| {
                point_in_triangle(point, a.extend(0.0), b.extend(0.0), c.extend(0.0))
            })
        })
    }

    pub fn eval(&mut self, vector: Point3D, _seed: Option<u64>) -> Point3D {
        if !self.contains(vector.truncate()) {
            return vector;
        }

        let depth = *self.cached_depth.get_or_insert(vector.z / 2.0);
        Point3D::new(vector.x, vector.y, depth)
    }
}
