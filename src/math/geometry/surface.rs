// src/math/geometry/surface.rs

use crate::math::{error::*, types::*};
use bevy::log::{debug, warn};
use spade::{DelaunayTriangulation, HasPosition, Triangulation};

/// Unveränderliche, triangulierte Meeresbodenoberfläche.
///
/// Die Oberfläche wird als "2.5D" interpretiert: Flächen werden über die
/// XY-Koordinaten gebildet, Z ist die Höhe des Bodens (negativ = unter dem
/// Wasserspiegel).
#[derive(Debug, Clone)]
pub struct Surface {
    vertices: Vec<Point3D>,
    faces: Vec<[usize; 3]>,
    bounds: Bounds3D,
}

impl Surface {
    /// Erstellt eine Oberfläche aus Ecken und Flächen (Indextripel in `vertices`).
    pub fn new(vertices: Vec<Point3D>, faces: Vec<[usize; 3]>) -> MathResult<Self> {
        let bounds = Bounds3D::from_points_iter(vertices.iter().copied()).ok_or(
            MathError::InsufficientPoints {
                expected: 1,
                actual: 0,
            },
        )?;

        for (face_idx, face) in faces.iter().enumerate() {
            if let Some(&index) = face.iter().find(|&&i| i >= vertices.len()) {
                return Err(MathError::InvalidFace {
                    face: face_idx,
                    index,
                    vertex_count: vertices.len(),
                });
            }
        }

        if faces.is_empty() {
            warn!("Surface with {} vertices has no faces", vertices.len());
        }

        Ok(Self {
            vertices,
            faces,
            bounds,
        })
    }

    /// Trianguliert eine Punktwolke über ihre XY-Koordinaten (Delaunay) und
    /// hebt das Ergebnis anschließend wieder in den Raum.
    ///
    /// Punkte mit identischer XY-Position werden zusammengelegt, der zuletzt
    /// eingefügte Z-Wert gewinnt.
    pub fn triangulate<I>(points: I) -> MathResult<Self>
    where
        I: IntoIterator<Item = Point3D>,
    {
        let mut triangulation: DelaunayTriangulation<SoundingVertex> = DelaunayTriangulation::new();
        let mut inserted = 0;

        for point in points {
            triangulation
                .insert(SoundingVertex {
                    position: SpadePoint::new(point.x, point.y),
                    z: point.z,
                })
                .map_err(|e| MathError::TriangulationFailed {
                    reason: format!("Failed to insert {:?}: {:?}", point, e),
                })?;
            inserted += 1;
        }

        if triangulation.num_vertices() < 3 {
            return Err(MathError::InsufficientPoints {
                expected: 3,
                actual: triangulation.num_vertices(),
            });
        }

        let vertices: Vec<Point3D> = triangulation
            .vertices()
            .map(|v| {
                let data = v.data();
                Point3D::new(data.position.x, data.position.y, data.z)
            })
            .collect();

        let faces: Vec<[usize; 3]> = triangulation
            .inner_faces()
            .map(|face| face.vertices().map(|v| v.fix().index()))
            .collect();

        debug!(
            "Triangulated {} points ({} unique) into {} faces",
            inserted,
            vertices.len(),
            faces.len()
        );

        Self::new(vertices, faces)
    }

    pub fn vertices(&self) -> &[Point3D] {
        &self.vertices
    }

    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    pub fn bounds(&self) -> Bounds3D {
        self.bounds
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Die drei Ecken einer Fläche.
    pub fn face_vertices(&self, face: usize) -> [Point3D; 3] {
        self.faces[face].map(|i| self.vertices[i])
    }
}

/// Ecke der Delaunay-Triangulation: XY-Position plus Höhe.
#[derive(Debug, Clone, Copy)]
struct SoundingVertex {
    position: SpadePoint,
    z: f64,
}

impl HasPosition for SoundingVertex {
    type Scalar = f64;

    fn position(&self) -> SpadePoint {
        self.position
    }
}
