// src/io/surface_import.rs
//! Loads seafloor surfaces from disk.
//!
//! Every format is reduced to a point cloud and re-triangulated over XY, so
//! only the vertex positions of an STL file matter, not its facets.

use crate::math::geometry::surface::Surface;
use crate::math::types::*;
use crate::survey::error::{SurveyError, SurveyResult};
use bevy::log::info;
use std::path::Path;

const STL_HEADER_LEN: usize = 80;
const STL_TRIANGLE_LEN: usize = 50;

/// Reads a surface file, choosing the parser by extension.
pub fn load_surface(path: impl AsRef<Path>) -> SurveyResult<Surface> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let points = match extension.as_str() {
        "stl" => parse_stl(&bytes),
        "xyz" | "txt" | "csv" => std::str::from_utf8(&bytes)
            .map_err(|e| format!("not valid UTF-8: {}", e))
            .and_then(parse_xyz),
        other => Err(format!(
            "unsupported surface format '{}' (expected stl, xyz, txt or csv)",
            other
        )),
    }
    .map_err(|reason| SurveyError::Import {
        path: path.to_path_buf(),
        reason,
    })?;

    let point_count = points.len();
    let surface = Surface::triangulate(points)?;
    let (lowest, highest) = surface.bounds().height_range();
    info!(
        "Loaded surface {} ({} points, {} vertices, {} faces) over {}, heights {:.2}..{:.2}",
        path.display(),
        point_count,
        surface.vertices().len(),
        surface.face_count(),
        surface.bounds().xy(),
        lowest,
        highest
    );
    Ok(surface)
}

/// Vertex positions of an ASCII or binary STL file.
pub fn parse_stl(bytes: &[u8]) -> Result<Vec<Point3D>, String> {
    if looks_like_ascii_stl(bytes) {
        let text = std::str::from_utf8(bytes).map_err(|e| format!("ASCII STL: {}", e))?;
        parse_ascii_stl(text)
    } else {
        parse_binary_stl(bytes)
    }
}

/// Points from whitespace or comma separated `x y z` lines. `#` starts a comment.
pub fn parse_xyz(text: &str) -> Result<Vec<Point3D>, String> {
    let mut points = Vec::new();

    for (line_idx, raw_line) in text.lines().enumerate() {
        let line = raw_line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        match parse_numbers(line) {
            Some(values) if values.len() >= 3 => {
                points.push(Point3D::new(values[0], values[1], values[2]))
            }
            // column header before the first point
            None if points.is_empty() && line.chars().any(|c| c.is_alphabetic()) => continue,
            _ => {
                return Err(format!(
                    "line {}: expected 'x y z', got '{}'",
                    line_idx + 1,
                    raw_line.trim()
                ));
            }
        }
    }

    Ok(points)
}

// === Private Helper Methods ===

fn parse_numbers(line: &str) -> Option<Vec<f64>> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| token.parse::<f64>().ok())
        .collect()
}

fn looks_like_ascii_stl(bytes: &[u8]) -> bool {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let head = &bytes[start..bytes.len().min(start + 512)];

    // binary headers may also start with "solid"
    head.starts_with(b"solid")
        && head.windows(5).any(|w| w == b"facet")
        && std::str::from_utf8(bytes).is_ok()
}

fn parse_ascii_stl(text: &str) -> Result<Vec<Point3D>, String> {
    let mut points = Vec::new();

    for (line_idx, line) in text.lines().enumerate() {
        let mut tokens = line.split_whitespace();
        if tokens.next() != Some("vertex") {
            continue;
        }
        let coords: Vec<f64> = tokens
            .map(|t| t.parse::<f64>())
            .collect::<Result<_, _>>()
            .map_err(|e| format!("line {}: invalid vertex ({})", line_idx + 1, e))?;
        if coords.len() != 3 {
            return Err(format!(
                "line {}: vertex needs 3 coordinates, got {}",
                line_idx + 1,
                coords.len()
            ));
        }
        points.push(Point3D::new(coords[0], coords[1], coords[2]));
    }

    if points.is_empty() {
        return Err("ASCII STL contains no vertices".to_string());
    }
    Ok(points)
}

fn parse_binary_stl(bytes: &[u8]) -> Result<Vec<Point3D>, String> {
    let count_bytes = bytes
        .get(STL_HEADER_LEN..STL_HEADER_LEN + 4)
        .ok_or_else(|| format!("binary STL shorter than its {} byte header", STL_HEADER_LEN + 4))?;
    let triangle_count =
        u32::from_le_bytes([count_bytes[0], count_bytes[1], count_bytes[2], count_bytes[3]]) as usize;

    let expected_len = STL_HEADER_LEN + 4 + triangle_count * STL_TRIANGLE_LEN;
    if bytes.len() < expected_len {
        return Err(format!(
            "binary STL declares {} triangles ({} bytes) but has {} bytes",
            triangle_count,
            expected_len,
            bytes.len()
        ));
    }

    let read_f32 = |offset: usize| {
        f32::from_le_bytes([
            bytes[offset],
            bytes[offset + 1],
            bytes[offset + 2],
            bytes[offset + 3],
        ]) as f64
    };

    let mut points = Vec::with_capacity(triangle_count * 3);
    for triangle in 0..triangle_count {
        // skip the facet normal
        let base = STL_HEADER_LEN + 4 + triangle * STL_TRIANGLE_LEN + 12;
        for corner in 0..3 {
            let offset = base + corner * 12;
            points.push(Point3D::new(
                read_f32(offset),
                read_f32(offset + 4),
                read_f32(offset + 8),
            ));
        }
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const ASCII_STL: &str = "solid floor
  facet normal 0 0 1
    outer loop
      vertex 0 0 -10
      vertex 10 0 -12
      vertex 0 10 -11
    endloop
  endfacet
  facet normal 0 0 1
    outer loop
      vertex 10 0 -12
      vertex 10 10 -14
      vertex 0 10 -11
    endloop
  endfacet
endsolid floor
";

    fn binary_stl(triangles: &[[[f32; 3]; 3]]) -> Vec<u8> {
        let mut bytes = vec![0u8; STL_HEADER_LEN];
        bytes[..5].copy_from_slice(b"solid");
        bytes.extend_from_slice(&(triangles.len() as u32).to_le_bytes());
        for triangle in triangles {
            bytes.extend_from_slice(&[0u8; 12]);
            for corner in triangle {
                for value in corner {
                    bytes.extend_from_slice(&value.to_le_bytes());
                }
            }
            bytes.extend_from_slice(&[0u8; 2]);
        }
        bytes
    }

    #[test]
    fn test_parse_ascii_stl() {
        let points = parse_stl(ASCII_STL.as_bytes()).unwrap();
        assert_eq!(points.len(), 6);
        assert_eq!(points[4], Point3D::new(10.0, 10.0, -14.0));
    }

    #[test]
    fn test_parse_binary_stl() {
        let bytes = binary_stl(&[[[0.0, 0.0, -1.0], [2.0, 0.0, -2.0], [0.0, 2.0, -3.5]]]);
        let points = parse_stl(&bytes).unwrap();
        assert_eq!(
            points,
            vec![
                Point3D::new(0.0, 0.0, -1.0),
                Point3D::new(2.0, 0.0, -2.0),
                Point3D::new(0.0, 2.0, -3.5)
            ]
        );
    }

    #[test]
    fn test_truncated_binary_stl_is_rejected() {
        let mut bytes = binary_stl(&[[[0.0; 3]; 3], [[1.0; 3]; 3]]);
        bytes.truncate(bytes.len() - 10);
        assert!(parse_stl(&bytes).is_err());
        assert!(parse_stl(&[0u8; 20]).is_err());
    }

    #[test]
    fn test_parse_xyz_variants() {
        let text = "x,y,z\n# comment\n0,0,-5\n1 0 -6\n\n0\t1\t-7 # inline\n";
        let points = parse_xyz(text).unwrap();
        assert_eq!(
            points,
            vec![
                Point3D::new(0.0, 0.0, -5.0),
                Point3D::new(1.0, 0.0, -6.0),
                Point3D::new(0.0, 1.0, -7.0)
            ]
        );
    }

    #[test]
    fn test_parse_xyz_reports_bad_line() {
        let err = parse_xyz("0 0 -1\n1 2\n").unwrap_err();
        assert!(err.contains("line 2"), "{}", err);
        assert!(parse_xyz("0 0 -1\nx y z\n").is_err());
    }

    #[test]
    fn test_load_surface_by_extension() {
        let dir = TempDir::new().unwrap();

        let stl_path = dir.path().join("floor.STL");
        std::fs::write(&stl_path, ASCII_STL).unwrap();
        let surface = load_surface(&stl_path).unwrap();
        assert_eq!(surface.vertices().len(), 4);
        assert_eq!(surface.face_count(), 2);

        let xyz_path = dir.path().join("floor.xyz");
        let mut file = std::fs::File::create(&xyz_path).unwrap();
        writeln!(file, "0 0 -1\n4 0 -2\n0 4 -3\n4 4 -4").unwrap();
        drop(file);
        let surface = load_surface(&xyz_path).unwrap();
        assert_eq!(surface.face_count(), 2);
        assert_eq!(surface.bounds().min, Point3D::new(0.0, 0.0, -4.0));
    }

    #[test]
    fn test_load_surface_errors() {
        let dir = TempDir::new().unwrap();
        let obj = dir.path().join("floor.obj");
        std::fs::write(&obj, "v 0 0 0\n").unwrap();
        assert!(matches!(load_surface(&obj), Err(SurveyError::Import { .. })));

        assert!(matches!(
            load_surface(dir.path().join("missing.stl")),
            Err(SurveyError::Io(_))
        ));

        let sparse = dir.path().join("sparse.xyz");
        std::fs::write(&sparse, "0 0 -1\n1 1 -1\n").unwrap();
        assert!(matches!(load_surface(&sparse), Err(SurveyError::Math(_))));
    }
}
