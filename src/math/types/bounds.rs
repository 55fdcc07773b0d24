// src/math/types/bounds.rs

use crate::math::{error::*, types::*};
use std::fmt;

/// Achsenparallele Box in der XY-Ebene (Draufsicht auf das Vermessungsgebiet)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds2D {
    pub min: Point2D,
    pub max: Point2D,
}

impl Bounds2D {
    pub fn new(min: Point2D, max: Point2D) -> MathResult<Self> {
        if !(min.is_finite() && max.is_finite()) || min.x > max.x || min.y > max.y {
            return Err(MathError::InvalidConfiguration {
                message: format!("Invalid survey area: min {:?}, max {:?}", min, max),
            });
        }
        Ok(Self { min, max })
    }

    /// Ausdehnung in X (Meter)
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Ausdehnung in Y (Meter)
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Rand gehört dazu
    pub fn contains_point(&self, point: Point2D) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    pub fn expand_to_include_point(&mut self, point: Point2D) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Vergrößert die Box um `margin` auf allen Seiten
    pub fn expand(&self, margin: f64) -> Self {
        Self {
            min: self.min - Point2D::splat(margin),
            max: self.max + Point2D::splat(margin),
        }
    }
}

impl fmt::Display for Bounds2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.3}, {:.3}] x [{:.3}, {:.3}]",
            self.min.x, self.max.x, self.min.y, self.max.y
        )
    }
}

/// Box um alle Vertices einer Oberfläche, Z ist die Höhe (negativ = unter Wasser)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds3D {
    pub min: Point3D,
    pub max: Point3D,
}

impl Bounds3D {
    /// `None` für eine leere Punktmenge
    pub fn from_points_iter<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point3D>,
    {
        let mut points_iter = points.into_iter();
        let first = points_iter.next()?;

        let (min, max) = points_iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self { min, max })
    }

    /// Projektion auf die XY-Ebene
    pub fn xy(&self) -> Bounds2D {
        Bounds2D {
            min: self.min.truncate(),
            max: self.max.truncate(),
        }
    }

    /// Tiefster und höchster Punkt der Oberfläche
    pub fn height_range(&self) -> (f64, f64) {
        (self.min.z, self.max.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_invalid_area_rejected() {
        assert!(Bounds2D::new(Point2D::new(1.0, 0.0), Point2D::new(0.0, 1.0)).is_err());
        assert!(Bounds2D::new(Point2D::new(f64::NAN, 0.0), Point2D::new(1.0, 1.0)).is_err());

        let line = Bounds2D::new(Point2D::new(0.0, 2.0), Point2D::new(5.0, 2.0)).unwrap();
        assert_eq!(line.height(), 0.0);
        assert_eq!(line.width(), 5.0);
    }

    #[test]
    fn test_containment_includes_edges() {
        let area = Bounds2D::new(Point2D::new(-3.0, -2.0), Point2D::new(1.0, 4.0)).unwrap();
        assert!(area.contains_point(Point2D::new(1.0, 4.0)));
        assert!(area.contains_point(Point2D::new(-3.0, 0.0)));
        assert!(!area.contains_point(Point2D::new(1.1, 4.0)));
    }

    #[test]
    fn test_expand() {
        let mut area = Bounds2D::new(Point2D::ZERO, Point2D::new(2.0, 2.0)).unwrap();
        area.expand_to_include_point(Point2D::new(5.0, -1.0));
        assert_eq!(area.min, Point2D::new(0.0, -1.0));
        assert_eq!(area.max, Point2D::new(5.0, 2.0));

        let padded = area.expand(0.5);
        assert_relative_eq!(padded.width(), 6.0);
        assert_relative_eq!(padded.height(), 4.0);
    }

    #[test]
    fn test_surface_box_projection() {
        let bounds = Bounds3D::from_points_iter(vec![
            Point3D::new(-10.0, -5.0, -20.0),
            Point3D::new(4.0, 7.0, -2.0),
            Point3D::new(10.0, 5.0, -8.0),
        ])
        .unwrap();

        assert_eq!(bounds.height_range(), (-20.0, -2.0));
        let xy = bounds.xy();
        assert_eq!(xy.min, Point2D::new(-10.0, -5.0));
        assert_eq!(xy.max, Point2D::new(10.0, 7.0));
        assert_eq!(xy.to_string(), "[-10.000, 10.000] x [-5.000, 7.000]");

        assert!(Bounds3D::from_points_iter(Vec::new()).is_none());
    }
}
