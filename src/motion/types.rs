// src/motion/types.rs - Planner inputs and outputs
use serde::{Deserialize, Serialize};

use super::vector::Vector2;
use super::{EPSILON, PlanError};

/// One stop on the commanded path, in arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub position: Vector2,
    /// Feed rate of the move arriving at this waypoint (mm/s)
    pub desired_speed: f64,
}

impl Waypoint {
    pub fn new(x: f64, y: f64, desired_speed: f64) -> Self {
        Self {
            position: Vector2::new(x, y),
            desired_speed,
        }
    }

    pub(crate) fn validate(&self, index: usize) -> Result<(), PlanError> {
        if !self.position.x.is_finite() || !self.position.y.is_finite() {
            return Err(PlanError::InvalidWaypoint {
                index,
                reason: format!("position {} is not finite", self.position),
            });
        }
        if !self.desired_speed.is_finite() || self.desired_speed < 0.0 {
            return Err(PlanError::InvalidWaypoint {
                index,
                reason: format!("desired speed {} must be finite and >= 0", self.desired_speed),
            });
        }
        Ok(())
    }
}

/// Per-axis machine limits, constant for one planning call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MachineSettings {
    /// mm/s
    pub max_speed_x: f64,
    pub max_speed_y: f64,
    /// mm/s²
    pub acceleration_x: f64,
    pub acceleration_y: f64,
    pub minimum_junction_speed: f64,
    /// mm
    pub junction_deviation: f64,
}

impl Default for MachineSettings {
    fn default() -> Self {
        Self {
            max_speed_x: 200.0,
            max_speed_y: 200.0,
            acceleration_x: 1000.0,
            acceleration_y: 1000.0,
            minimum_junction_speed: 0.0,
            junction_deviation: 0.05,
        }
    }
}

impl MachineSettings {
    pub fn validate(&self) -> Result<(), PlanError> {
        let fields = [
            ("max_speed_x", self.max_speed_x),
            ("max_speed_y", self.max_speed_y),
            ("acceleration_x", self.acceleration_x),
            ("acceleration_y", self.acceleration_y),
            ("minimum_junction_speed", self.minimum_junction_speed),
            ("junction_deviation", self.junction_deviation),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(PlanError::InvalidSettings(format!(
                    "{} must be finite and >= 0, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Resolved speed the head will have while passing a waypoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JunctionPoint {
    pub position: Vector2,
    pub final_speed: f64,
    pub desired_speed: f64,
}

/// One constant-acceleration leg of the plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KinematicPrimitive {
    pub start: Vector2,
    pub target: Vector2,
    /// Speed at `start` (mm/s)
    pub speed: f64,
    /// Signed acceleration along the leg (mm/s²)
    pub acceleration: f64,
}

impl KinematicPrimitive {
    pub fn new(start: Vector2, target: Vector2, speed: f64, acceleration: f64) -> Self {
        Self {
            start,
            target,
            speed,
            acceleration,
        }
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(self.target)
    }

    pub fn direction(&self) -> Vector2 {
        self.target.sub(self.start).unit()
    }

    /// Speed on arrival at `target`. Tiny negative radicands from rounding clamp to zero.
    pub fn exit_speed(&self) -> f64 {
        let radicand = self.speed * self.speed + 2.0 * self.acceleration * self.length();
        radicand.max(0.0).sqrt()
    }

    pub fn duration(&self) -> f64 {
        let distance = self.length();
        let speed_sum = self.speed + self.exit_speed();
        if speed_sum == 0.0 {
            0.0
        } else {
            2.0 * distance / speed_sum
        }
    }

    pub fn is_acceleration(&self) -> bool {
        self.acceleration > EPSILON
    }

    pub fn is_deceleration(&self) -> bool {
        self.acceleration < -EPSILON
    }

    pub fn is_cruise(&self) -> bool {
        !self.is_acceleration() && !self.is_deceleration()
    }
}
