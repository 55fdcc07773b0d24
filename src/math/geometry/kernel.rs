// src/math/geometry/kernel.rs
//! Geometrische Grundprädikate für die Tiefenabfrage.
//!
//! Alle Funktionen sind zustandslos. Dreiecke werden für Enthaltenseins-Tests
//! auf die XY-Ebene projiziert; die Z-Komponente wird nur von
//! [`plane_intercept`] verwendet.

use crate::math::types::*;
use nalgebra::{Rotation2, Vector2};

/// Vorzeichenbehaftetes 2D-Kreuzprodukt `(p - b) x (a - b)`.
///
/// Null bedeutet, dass `p` auf der Geraden durch `a` und `b` liegt.
pub fn line_sign(p: Point2D, a: Point2D, b: Point2D) -> f64 {
    (p.x - b.x) * (a.y - b.y) - (a.x - b.x) * (p.y - b.y)
}

/// Prüft ob `p` innerhalb der XY-Projektion des Dreiecks liegt.
///
/// Punkte auf Kanten und Ecken zählen als enthalten. Für ein Dreieck ohne
/// Fläche (alle drei Vorzeichen null) gilt nur exakte Gleichheit mit `v1`.
pub fn point_in_triangle(p: Point2D, v1: Point3D, v2: Point3D, v3: Point3D) -> bool {
    let (a, b, c) = (v1.truncate(), v2.truncate(), v3.truncate());

    let d1 = line_sign(p, a, b);
    let d2 = line_sign(p, b, c);
    let d3 = line_sign(p, c, a);

    if d1 == 0.0 && d2 == 0.0 && d3 == 0.0 {
        return p == a;
    }

    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;

    !(has_neg && has_pos)
}

/// Höhe der Dreiecksebene an der Stelle `(x, y)`.
///
/// Für senkrechte Flächen (`normal.z == 0`) ist das Ergebnis ±inf oder NaN;
/// Geländeflächen sind nie senkrecht.
pub fn plane_intercept(x: f64, y: f64, v1: Point3D, v2: Point3D, v3: Point3D) -> f64 {
    let coef = (v2 - v1).cross(v3 - v1);
    let intercept = coef.dot(v1);

    (intercept - coef.x * x - coef.y * y) / coef.z
}

/// Rotiert einen 2D-Vektor um `theta` (Radiant, gegen den Uhrzeigersinn).
pub fn rotate_2d(v: Point2D, theta: f64) -> Point2D {
    let rotated = Rotation2::new(theta) * Vector2::new(v.x, v.y);
    Point2D::new(rotated.x, rotated.y)
}

/// Winkel am Scheitel `p2` zwischen den Strahlen nach `p1` und `p3`, in `[0, π]`.
pub fn angle_between(p1: Point2D, p2: Point2D, p3: Point2D) -> f64 {
    let a = p1 - p2;
    let b = p3 - p2;
    let cos_theta = a.dot(b) / (a.length() * b.length());

    cos_theta.clamp(-1.0, 1.0).acos()
}

/// XY-Bounding-Box eines Dreiecks.
pub fn triangle_bounds(v1: Point3D, v2: Point3D, v3: Point3D) -> Bounds2D {
    Bounds2D {
        min: v1.truncate().min(v2.truncate()).min(v3.truncate()),
        max: v1.truncate().max(v2.truncate()).max(v3.truncate()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::utils::constants::{PI, PI_OVER_2};
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn p(x: f64, y: f64) -> Point2D {
        Point2D::new(x, y)
    }

    #[test]
    fn test_line_sign_x_axis() {
        assert!(line_sign(p(0.0, 1.0), p(-2.0, 0.0), p(5.0, 0.0)) > 0.0);
        assert!(line_sign(p(0.0, -1.0), p(-2.0, 0.0), p(5.0, 0.0)) < 0.0);
    }

    #[test]
    fn test_line_sign_arbitrary_line() {
        assert!(line_sign(p(-5.0, 5.0), p(0.0, -3.0), p(1.5, 0.0)) > 0.0);
        assert!(line_sign(p(10.0, 3.0), p(0.0, -3.0), p(1.5, 0.0)) < 0.0);
        assert_eq!(line_sign(p(5.0, 7.0), p(0.0, -3.0), p(1.5, 0.0)), 0.0);
    }

    fn triangle() -> (Point3D, Point3D, Point3D) {
        (
            Point3D::new(0.0, 2.0, 15.0),
            Point3D::new(1.5, 0.2, -6.0),
            Point3D::new(-1.0, -0.5, 0.0),
        )
    }

    #[test]
    fn test_point_in_triangle_inside_edge_vertex() {
        let (v1, v2, v3) = triangle();
        assert!(point_in_triangle(p(0.5, 0.5), v1, v2, v3));
        assert!(point_in_triangle(p(0.5, 1.4), v1, v2, v3));
        assert!(point_in_triangle(v1.truncate(), v1, v2, v3));
        assert!(point_in_triangle(v3.truncate(), v1, v2, v3));
    }

    #[test]
    fn test_point_in_triangle_outside_all_sides() {
        let (v1, v2, v3) = triangle();
        assert!(!point_in_triangle(p(0.5, -0.5), v1, v2, v3));
        assert!(!point_in_triangle(p(0.5, 2.5), v1, v2, v3));
        assert!(!point_in_triangle(p(-0.5, 1.0), v1, v2, v3));
    }

    #[test]
    fn test_point_in_triangle_winding_independent() {
        let (v1, v2, v3) = triangle();
        assert!(point_in_triangle(p(0.5, 0.5), v3, v2, v1));
        assert!(!point_in_triangle(p(0.5, -0.5), v3, v2, v1));
    }

    #[test]
    fn test_degenerate_triangle_only_contains_first_vertex() {
        let v = Point3D::new(1.0, 1.0, 0.0);
        assert!(point_in_triangle(p(1.0, 1.0), v, v, v));
        assert!(!point_in_triangle(p(3.0, 3.0), v, v, v));

        // Kollineare Ecken: die Projektion hat keine Fläche
        let a = Point3D::new(0.0, 0.0, 0.0);
        let b = Point3D::new(1.0, 1.0, 0.0);
        let c = Point3D::new(2.0, 2.0, 0.0);
        assert!(point_in_triangle(p(0.0, 0.0), a, b, c));
        assert!(!point_in_triangle(p(1.0, 1.0), a, b, c));
    }

    #[test]
    fn test_plane_intercept() {
        let v1 = Point3D::new(1.0, 2.0, 3.0);
        let v2 = Point3D::new(1.0, 0.0, 1.0);
        let v3 = Point3D::new(-2.0, 1.0, 0.0);

        assert_relative_eq!(plane_intercept(0.0, 0.0, v1, v2, v3), 1.0 / 3.0, epsilon = 1e-12);
        // Außerhalb des Dreiecks wird die Ebene weiter ausgewertet
        assert_relative_eq!(plane_intercept(7.0, -2.0, v1, v2, v3), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_plane_intercept_vertical_face_is_not_finite() {
        let v1 = Point3D::new(0.0, 0.0, 0.0);
        let v2 = Point3D::new(1.0, 0.0, 0.0);
        let v3 = Point3D::new(0.0, 0.0, 1.0);
        assert!(!plane_intercept(0.5, 0.5, v1, v2, v3).is_finite());
    }

    #[test]
    fn test_rotate_2d() {
        let rotated = rotate_2d(p(1.0, 0.0), PI_OVER_2);
        assert_abs_diff_eq!(rotated.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(rotated.y, 1.0, epsilon = 1e-12);

        let rotated = rotate_2d(p(3.0, 4.0), PI);
        assert_abs_diff_eq!(rotated.x, -3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(rotated.y, -4.0, epsilon = 1e-12);
        assert_relative_eq!(rotated.length(), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_angle_between() {
        assert_relative_eq!(angle_between(p(1.0, 0.0), p(0.0, 0.0), p(0.0, 1.0)), PI_OVER_2);
        assert_relative_eq!(angle_between(p(1.0, 0.0), p(0.0, 0.0), p(-1.0, 0.0)), PI);
        assert_abs_diff_eq!(angle_between(p(2.0, 2.0), p(0.0, 0.0), p(1.0, 1.0)), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_triangle_bounds() {
        let (v1, v2, v3) = triangle();
        let bounds = triangle_bounds(v1, v2, v3);
        assert_eq!(bounds.min, p(-1.0, -0.5));
        assert_eq!(bounds.max, p(1.5, 2.0));
    }
}
