// src/math/geometry/spatial_index.rs

use super::{kernel, surface::Surface};
use crate::math::{error::*, types::*};
use bevy::log::debug;
use std::sync::Arc;

/// Obergrenze für die automatisch gewählte Bin-Anzahl pro Achse
const MAX_DEFAULT_BINS: usize = 1024;

/// Obergrenze für explizit gesetzte Bins pro Achse (rund 4,2 Mio. Zellen)
pub const MAX_BINS_PER_AXIS: usize = 2048;

/// Uniformes XY-Raster über der Oberfläche zur Beschleunigung der Tiefenabfrage.
///
/// Jede Zelle enthält die Indizes aller Flächen, deren XY-Bounding-Box die
/// Zelle überlappt. Für jeden Punkt innerhalb der Oberflächengrenzen ist die
/// tatsächlich enthaltende Fläche damit immer unter den Kandidaten; falsche
/// Kandidaten werden durch den exakten Dreieckstest aussortiert.
#[derive(Debug, Clone)]
pub struct SpatialMeshIndex {
    surface: Arc<Surface>,
    bins_per_axis: usize,
    origin: Point2D,
    extent: Point2D,
    bin_size: Point2D,
    /// Zeilenweise: `cells[iy * bins_per_axis + ix]`
    cells: Vec<Vec<usize>>,
}

impl SpatialMeshIndex {
    /// Baut den Index mit `bins_per_axis × bins_per_axis` Zellen.
    pub fn build(surface: Arc<Surface>, bins_per_axis: usize) -> MathResult<Self> {
        let cell_count = bins_per_axis
            .checked_mul(bins_per_axis)
            .filter(|_| (1..=MAX_BINS_PER_AXIS).contains(&bins_per_axis))
            .ok_or_else(|| MathError::InvalidConfiguration {
                message: format!(
                    "Spatial index needs 1..={} bins per axis, got {}",
                    MAX_BINS_PER_AXIS, bins_per_axis
                ),
            })?;

        let bounds = surface.bounds().xy();
        let extent = bounds.max - bounds.min;
        // Achsen ohne Ausdehnung (flache oder linienförmige Netze) bekommen Bin-Größe 1
        let bin_size = Point2D::new(
            axis_bin_size(extent.x, bins_per_axis),
            axis_bin_size(extent.y, bins_per_axis),
        );

        let mut index = Self {
            surface,
            bins_per_axis,
            origin: bounds.min,
            extent,
            bin_size,
            cells: vec![Vec::new(); cell_count],
        };

        let mut placements = 0usize;
        for face in 0..index.surface.face_count() {
            let [v1, v2, v3] = index.surface.face_vertices(face);
            let face_bounds = kernel::triangle_bounds(v1, v2, v3);

            let (min_x, min_y) = index.clamped_bin(face_bounds.min);
            let (max_x, max_y) = index.clamped_bin(face_bounds.max);

            for iy in min_y..=max_y {
                for ix in min_x..=max_x {
                    index.cells[iy * bins_per_axis + ix].push(face);
                    placements += 1;
                }
            }
        }

        debug!(
            "Built spatial index: {}x{} bins over {}, {} faces, {} placements",
            bins_per_axis,
            bins_per_axis,
            bounds,
            index.surface.face_count(),
            placements
        );

        Ok(index)
    }

    /// Baut den Index mit einer aus der Flächenanzahl abgeleiteten Bin-Anzahl
    /// (`ceil(sqrt(faces))`, also im Mittel etwa eine Fläche pro Zelle).
    pub fn with_default_bins(surface: Arc<Surface>) -> MathResult<Self> {
        let bins = default_bins_per_axis(surface.face_count());
        Self::build(surface, bins)
    }

    /// Kandidatenflächen für `(x, y)`. Außerhalb der Oberfläche leer.
    pub fn query_candidates(&self, x: f64, y: f64) -> &[usize] {
        match self.bin_of(x, y) {
            Some((ix, iy)) => &self.cells[iy * self.bins_per_axis + ix],
            None => &[],
        }
    }

    /// Höchste (flachste) Bodenhöhe unter `(x, y)`, oder `None` falls keine
    /// Fläche den Punkt enthält.
    pub fn shallowest_depth(&self, x: f64, y: f64) -> Option<f64> {
        let point = Point2D::new(x, y);

        self.query_candidates(x, y)
            .iter()
            .filter_map(|&face| {
                let [v1, v2, v3] = self.surface.face_vertices(face);
                kernel::point_in_triangle(point, v1, v2, v3)
                    .then(|| kernel::plane_intercept(x, y, v1, v2, v3))
            })
            .fold(None, |max_z: Option<f64>, z| match max_z {
                Some(current) if current >= z => Some(current),
                _ => Some(z),
            })
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn bins_per_axis(&self) -> usize {
        self.bins_per_axis
    }

    pub fn bin_size(&self) -> Point2D {
        self.bin_size
    }

    // === Private Helper Methods ===

    /// Bin eines Abfragepunkts. Punkte exakt auf der Maximalkante landen im
    /// letzten Bin, alles außerhalb der Grenzen liefert `None`.
    fn bin_of(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        Some((
            self.axis_bin(x, self.origin.x, self.extent.x, self.bin_size.x)?,
            self.axis_bin(y, self.origin.y, self.extent.y, self.bin_size.y)?,
        ))
    }

    fn axis_bin(&self, value: f64, origin: f64, extent: f64, bin_size: f64) -> Option<usize> {
        let offset = value - origin;
        if !offset.is_finite() || offset < 0.0 || offset > extent {
            return None;
        }

        let bin = (offset / bin_size).floor() as usize;
        Some(bin.min(self.bins_per_axis - 1))
    }

    /// Bin eines Flächen-Eckpunkts, auf das Raster begrenzt.
    fn clamped_bin(&self, point: Point2D) -> (usize, usize) {
        let clamp = |offset: f64, bin_size: f64| -> usize {
            let bin = (offset / bin_size).floor();
            if bin <= 0.0 {
                0
            } else {
                (bin as usize).min(self.bins_per_axis - 1)
            }
        };

        let offset = point - self.origin;
        (clamp(offset.x, self.bin_size.x), clamp(offset.y, self.bin_size.y))
    }
}

fn axis_bin_size(extent: f64, bins_per_axis: usize) -> f64 {
    if extent > 0.0 {
        extent / bins_per_axis as f64
    } else {
        1.0
    }
}

/// Standard-Bin-Anzahl pro Achse für `face_count` Flächen.
pub fn default_bins_per_axis(face_count: usize) -> usize {
    ((face_count as f64).sqrt().ceil() as usize).clamp(1, MAX_DEFAULT_BINS)
}
