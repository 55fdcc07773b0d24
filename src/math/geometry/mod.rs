// src/math/geometry/mod.rs

// Deklaration der Geometriemodule
pub mod kernel;
pub mod spatial_index;
pub mod surface;

// Re-Exporte für einen schnellen Zugriff auf die Kern-Geometrietypen
pub use self::kernel::{angle_between, line_sign, plane_intercept, point_in_triangle, rotate_2d};
pub use self::spatial_index::SpatialMeshIndex;
pub use self::surface::Surface;
