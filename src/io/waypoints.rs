// src/io/waypoints.rs

use crate::math::types::*;
use crate::survey::error::{SurveyError, SurveyResult};
use bevy::log::debug;
use std::path::Path;

/// Reads a waypoint file: one `x,y` or `x y` pair per line, `#` comments.
pub fn load_waypoints(path: impl AsRef<Path>) -> SurveyResult<Vec<Point2D>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let waypoints = parse_waypoints(&text).map_err(|reason| SurveyError::Import {
        path: path.to_path_buf(),
        reason,
    })?;

    debug!("Read {} waypoints from {}", waypoints.len(), path.display());
    Ok(waypoints)
}

pub fn parse_waypoints(text: &str) -> Result<Vec<Point2D>, String> {
    text.lines()
        .enumerate()
        .filter_map(|(line_idx, raw)| {
            let line = raw.split('#').next().unwrap_or("").trim();
            (!line.is_empty()).then_some((line_idx, line))
        })
        .map(|(line_idx, line)| {
            let values: Vec<f64> = line
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|token| !token.is_empty())
                .map(|token| token.parse::<f64>())
                .collect::<Result<_, _>>()
                .map_err(|e| format!("line {}: {} in '{}'", line_idx + 1, e, line))?;

            match values.as_slice() {
                [x, y] => Ok(Point2D::new(*x, *y)),
                _ => Err(format!(
                    "line {}: expected 'x,y', got {} values",
                    line_idx + 1,
                    values.len()
                )),
            }
        })
        .collect()
}
