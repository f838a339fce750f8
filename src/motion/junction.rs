// src/motion/junction.rs - Corner speed limits from junction deviation
use super::types::{MachineSettings, Waypoint};
use super::vector::Vector2;
use super::{EPSILON, UNBOUNDED, axis_limited_magnitude, snap_to_zero};

/// Computes the maximum speed each waypoint's corner can be taken at.
///
/// Uses the junction deviation model: the corner is treated as an arc tangent
/// to both segments whose distance from the sharp corner equals
/// `junction_deviation`, and the speed is the one whose centripetal
/// acceleration along that arc stays within the axis limits.
#[derive(Debug, Clone)]
pub struct JunctionSpeedEstimator<'a> {
    settings: &'a MachineSettings,
}

impl<'a> JunctionSpeedEstimator<'a> {
    pub fn new(settings: &'a MachineSettings) -> Self {
        Self { settings }
    }

    /// One limit per waypoint. The last waypoint is always 0.
    pub fn estimate(&self, waypoints: &[Waypoint], start_position: Vector2) -> Vec<f64> {
        let mut limits = Vec::with_capacity(waypoints.len());
        let mut previous = start_position;

        for pair in waypoints.windows(2) {
            let current = pair[0].position;
            let next = pair[1].position;
            let limit = snap_to_zero(self.corner_limit(current.sub(previous), next.sub(current)));
            limits.push(limit);
            previous = current;
        }
        if !waypoints.is_empty() {
            limits.push(0.0);
        }

        tracing::trace!("Junction limits: {:?}", limits);
        limits
    }

    /// Corner limit between an incoming vector `v1` and an outgoing vector `v2`.
    pub fn corner_limit(&self, v1: Vector2, v2: Vector2) -> f64 {
        let uv1 = v1.unit();
        let uv2 = v2.unit();
        let cos_theta = -uv1.dot(uv2);

        if cos_theta > 1.0 - EPSILON {
            // Full reversal
            return self.settings.minimum_junction_speed;
        }
        if cos_theta < -1.0 + EPSILON {
            // Straight continuation
            return UNBOUNDED;
        }

        let junction_dir = uv2.sub(uv1).unit();
        let junction_accel = axis_limited_magnitude(
            self.settings.acceleration_x,
            self.settings.acceleration_y,
            junction_dir,
        );
        let sin_half = (0.5 * (1.0 - cos_theta)).sqrt();
        let minimum = self.settings.minimum_junction_speed;
        (minimum * minimum).max(
            (junction_accel * self.settings.junction_deviation * sin_half / (1.0 - sin_half)).sqrt(),
        )
    }
}
