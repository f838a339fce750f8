// src/path.rs - JSON path files
//
// A path file is an array of points in arrival order:
// [{ "x": 0.0, "y": 10.0, "speed": 50.0 }, ...]
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::motion::Waypoint;

#[derive(Debug, Error)]
pub enum PathError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Path file contains no points")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct PathPoint {
    pub x: f64,
    pub y: f64,
    /// Feed rate towards this point (mm/s)
    pub speed: f64,
}

impl From<PathPoint> for Waypoint {
    fn from(point: PathPoint) -> Self {
        Waypoint::new(point.x, point.y, point.speed)
    }
}

pub fn parse_path(json: &str) -> Result<Vec<Waypoint>, PathError> {
    let points: Vec<PathPoint> = serde_json::from_str(json)?;
    if points.is_empty() {
        return Err(PathError::Empty);
    }
    Ok(points.into_iter().map(Waypoint::from).collect())
}

pub fn load_path(path: impl AsRef<Path>) -> Result<Vec<Waypoint>, PathError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|e| {
        tracing::error!("Failed to read path file '{}': {}", path.display(), e);
        e
    })?;
    let waypoints = parse_path(&contents).map_err(|e| {
        tracing::error!("Failed to parse path file '{}': {}", path.display(), e);
        e
    })?;
    tracing::debug!("Loaded {} waypoints from {}", waypoints.len(), path.display());
    Ok(waypoints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::Vector2;
    use tempfile::tempdir;

    #[test]
    fn test_parse_path() {
        let waypoints = parse_path(r#"[{"x": 1.0, "y": 2.0, "speed": 30.0}, {"x": 4.0, "y": 6.0, "speed": 10.0}]"#).unwrap();
        assert_eq!(waypoints.len(), 2);
        assert_eq!(waypoints[1].position, Vector2::new(4.0, 6.0));
        assert_eq!(waypoints[1].desired_speed, 10.0);
    }

    #[test]
    fn test_empty_path_rejected() {
        assert!(matches!(parse_path("[]"), Err(PathError::Empty)));
    }

    #[test]
    fn test_missing_speed_rejected() {
        assert!(matches!(parse_path(r#"[{"x": 1.0, "y": 2.0}]"#), Err(PathError::Json(_))));
    }

    #[test]
    fn test_load_path_from_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("square.json");
        std::fs::write(&file_path, r#"[{"x": 10.0, "y": 0.0, "speed": 50.0}]"#).unwrap();
        let waypoints = load_path(&file_path).unwrap();
        assert_eq!(waypoints, vec![Waypoint::new(10.0, 0.0, 50.0)]);
    }

    #[test]
    fn test_load_path_missing_file() {
        assert!(matches!(load_path("does_not_exist.json"), Err(PathError::Io(_))));
    }
}
