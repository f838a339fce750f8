// src/motion/mod.rs - Look-ahead motion planning for two-axis machines
//
// Pipeline: junction limits -> feasibility resolution -> segment profiles -> time.

pub mod estimator;
pub mod feasibility;
pub mod junction;
pub mod timeline;
pub mod trajectory;
pub mod types;
pub mod vector;

pub use estimator::TimeEstimator;
pub use feasibility::FeasibilityResolver;
pub use junction::JunctionSpeedEstimator;
pub use timeline::{Sample, Timeline};
pub use trajectory::SegmentPlanner;
pub use types::{JunctionPoint, KinematicPrimitive, MachineSettings, Waypoint};
pub use vector::Vector2;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Values smaller than this are floating-point noise.
pub const EPSILON: f64 = 1e-6;

/// Direction components below this impose no axis constraint.
pub const DIRECTION_EPSILON: f64 = 1e-9;

/// Stand-in for "no limit" that keeps arithmetic finite.
pub const UNBOUNDED: f64 = 1e9;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Path is empty")]
    EmptyPath,
    #[error("Invalid waypoint {index}: {reason}")]
    InvalidWaypoint { index: usize, reason: String },
    #[error("Invalid machine settings: {0}")]
    InvalidSettings(String),
    #[error("Infeasible corner at waypoint {index}: candidate speed² {radicand} has no real root")]
    InfeasibleCorner { index: usize, radicand: f64 },
    #[error("No acceleration available along the segment ending at waypoint {index}")]
    NoAcceleration { index: usize },
}

/// Largest magnitude along `unit_dir` whose X and Y components stay within `lim_x`/`lim_y`.
pub fn axis_limited_magnitude(lim_x: f64, lim_y: f64, unit_dir: Vector2) -> f64 {
    let mut magnitude = UNBOUNDED;
    if unit_dir.x.abs() > DIRECTION_EPSILON {
        magnitude = magnitude.min((lim_x / unit_dir.x).abs());
    }
    if unit_dir.y.abs() > DIRECTION_EPSILON {
        magnitude = magnitude.min((lim_y / unit_dir.y).abs());
    }
    magnitude
}

pub(crate) fn snap_to_zero(value: f64) -> f64 {
    if value.abs() < EPSILON { 0.0 } else { value }
}

/// Square root of a speed² that must be real; tiny negative noise snaps to zero.
pub(crate) fn checked_speed(index: usize, radicand: f64) -> Result<f64, PlanError> {
    let radicand = snap_to_zero(radicand);
    if radicand.is_nan() || radicand < 0.0 || radicand.is_infinite() {
        return Err(PlanError::InfeasibleCorner { index, radicand });
    }
    Ok(radicand.sqrt())
}

/// Everything produced by one planning call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionPlan {
    pub start_position: Vector2,
    pub junctions: Vec<JunctionPoint>,
    pub primitives: Vec<KinematicPrimitive>,
    /// Seconds
    pub estimated_time: f64,
}

impl MotionPlan {
    pub fn timeline(&self) -> Timeline {
        Timeline::new(self.start_position, &self.primitives)
    }

    pub fn path_length(&self) -> f64 {
        self.primitives.iter().map(KinematicPrimitive::length).sum()
    }

    pub fn peak_speed(&self) -> f64 {
        self.primitives
            .iter()
            .map(|p| p.speed.max(p.exit_speed()))
            .fold(0.0, f64::max)
    }
}

/// Runs the full planning pipeline for one set of machine limits.
#[derive(Debug, Clone)]
pub struct MotionPlanner {
    settings: MachineSettings,
}

impl MotionPlanner {
    pub fn new(settings: MachineSettings) -> Result<Self, PlanError> {
        settings.validate()?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &MachineSettings {
        &self.settings
    }

    pub fn plan(&self, waypoints: &[Waypoint], start_position: Vector2) -> Result<MotionPlan, PlanError> {
        if waypoints.is_empty() {
            return Err(PlanError::EmptyPath);
        }
        if !start_position.x.is_finite() || !start_position.y.is_finite() {
            return Err(PlanError::InvalidWaypoint {
                index: 0,
                reason: format!("start position {} is not finite", start_position),
            });
        }
        for (index, waypoint) in waypoints.iter().enumerate() {
            waypoint.validate(index)?;
        }

        tracing::debug!("Planning {} waypoints from {}", waypoints.len(), start_position);

        let junction_limits = JunctionSpeedEstimator::new(&self.settings).estimate(waypoints, start_position);
        let junctions = FeasibilityResolver::new(&self.settings).resolve(waypoints, &junction_limits, start_position)?;
        let primitives = SegmentPlanner::new(&self.settings).plan(&junctions, start_position)?;
        let estimated_time = TimeEstimator::estimate(&primitives);

        tracing::info!(
            "Planned {} waypoints into {} primitives, estimated {:.3}s",
            waypoints.len(),
            primitives.len(),
            estimated_time
        );

        Ok(MotionPlan {
            start_position,
            junctions,
            primitives,
            estimated_time,
        })
    }
}

/// Plan `waypoints` from `start_position` under `settings`.
pub fn plan(waypoints: &[Waypoint], settings: &MachineSettings, start_position: Vector2) -> Result<MotionPlan, PlanError> {
    MotionPlanner::new(*settings)?.plan(waypoints, start_position)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_limited_magnitude_single_axis() {
        assert_eq!(axis_limited_magnitude(1000.0, 500.0, Vector2::new(1.0, 0.0)), 1000.0);
        assert_eq!(axis_limited_magnitude(1000.0, 500.0, Vector2::new(0.0, -1.0)), 500.0);
    }

    #[test]
    fn test_axis_limited_magnitude_diagonal() {
        let dir = Vector2::new(1.0, 1.0).unit();
        let magnitude = axis_limited_magnitude(100.0, 100.0, dir);
        assert!((magnitude - 100.0 * 2f64.sqrt()).abs() < 1e-9);
        // The slower axis binds.
        let magnitude = axis_limited_magnitude(100.0, 50.0, dir);
        assert!((magnitude - 50.0 * 2f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_axis_limited_magnitude_zero_direction_is_unbounded() {
        assert_eq!(axis_limited_magnitude(10.0, 10.0, Vector2::ZERO), UNBOUNDED);
    }

    #[test]
    fn test_checked_speed() {
        assert_eq!(checked_speed(0, 25.0).unwrap(), 5.0);
        assert_eq!(checked_speed(0, -1e-9).unwrap(), 0.0);
        assert!(matches!(
            checked_speed(4, -3.0),
            Err(PlanError::InfeasibleCorner { index: 4, .. })
        ));
        assert!(checked_speed(0, f64::NAN).is_err());
    }

    #[test]
    fn test_empty_path_rejected() {
        let result = plan(&[], &MachineSettings::default(), Vector2::ZERO);
        assert!(matches!(result, Err(PlanError::EmptyPath)));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = MachineSettings {
            max_speed_x: f64::INFINITY,
            ..MachineSettings::default()
        };
        assert!(matches!(MotionPlanner::new(settings), Err(PlanError::InvalidSettings(_))));
    }
}
