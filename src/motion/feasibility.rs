// src/motion/feasibility.rs - Resolve achievable speeds at every waypoint
use super::trajectory::Segment;
use super::types::{JunctionPoint, MachineSettings, Waypoint};
use super::vector::Vector2;
use super::{EPSILON, PlanError, checked_speed, snap_to_zero};

/// Reconciles corner limits with the acceleration available between waypoints.
///
/// The backward pass walks from the final stop towards the start and makes sure
/// every waypoint can brake down to the speed of the one after it. A forward
/// pass from the start position (at rest) then lowers any waypoint that cannot
/// be reached by accelerating from the one before it. After both passes every
/// segment's entry and exit speeds are joinable by a single accel/decel profile.
#[derive(Debug, Clone)]
pub struct FeasibilityResolver<'a> {
    settings: &'a MachineSettings,
}

/// Whether a speed change from `entry` to `exit` fits in `distance` under `accel`.
pub fn can_reach(entry: f64, exit: f64, accel: f64, distance: f64) -> bool {
    let required = (entry * entry - exit * exit).abs();
    required <= 2.0 * accel * distance + EPSILON
}

impl<'a> FeasibilityResolver<'a> {
    pub fn new(settings: &'a MachineSettings) -> Self {
        Self { settings }
    }

    pub fn resolve(
        &self,
        waypoints: &[Waypoint],
        junction_limits: &[f64],
        start_position: Vector2,
    ) -> Result<Vec<JunctionPoint>, PlanError> {
        if waypoints.is_empty() {
            return Err(PlanError::EmptyPath);
        }
        if junction_limits.len() != waypoints.len() {
            return Err(PlanError::InvalidWaypoint {
                index: junction_limits.len().min(waypoints.len()),
                reason: format!(
                    "{} junction limits for {} waypoints",
                    junction_limits.len(),
                    waypoints.len()
                ),
            });
        }

        let mut speeds = vec![0.0; waypoints.len()];
        self.backward_pass(waypoints, junction_limits, start_position, &mut speeds)?;
        self.forward_pass(waypoints, start_position, &mut speeds)?;

        // The path always ends at rest.
        if let Some(final_speed) = speeds.last_mut() {
            *final_speed = 0.0;
        }
        tracing::debug!("Resolved junction speeds: {:?}", speeds);

        let junctions = waypoints
            .iter()
            .zip(speeds)
            .map(|(waypoint, speed)| JunctionPoint {
                position: waypoint.position,
                final_speed: snap_to_zero(speed),
                desired_speed: waypoint.desired_speed,
            })
            .collect();
        Ok(junctions)
    }

    fn backward_pass(
        &self,
        waypoints: &[Waypoint],
        junction_limits: &[f64],
        start_position: Vector2,
        speeds: &mut [f64],
    ) -> Result<(), PlanError> {
        for i in (0..waypoints.len() - 1).rev() {
            let current = &waypoints[i];
            let next = &waypoints[i + 1];
            let previous_position = if i == 0 { start_position } else { waypoints[i - 1].position };

            let incoming = Segment::between(self.settings, previous_position, current.position, current.desired_speed);
            let outgoing = Segment::between(self.settings, current.position, next.position, next.desired_speed);
            if outgoing.is_stalled() {
                return Err(PlanError::NoAcceleration { index: i + 1 });
            }

            let entry = junction_limits[i].min(incoming.cruise_speed).min(outgoing.cruise_speed);
            let exit = speeds[i + 1].min(outgoing.cruise_speed);

            speeds[i] = if can_reach(entry, exit, outgoing.acceleration, outgoing.distance) {
                entry
            } else if entry > exit {
                // Too fast to brake down to the next waypoint in time.
                let candidate = checked_speed(
                    i,
                    exit * exit + 2.0 * outgoing.acceleration * outgoing.distance,
                )?;
                tracing::debug!(
                    "Waypoint {}: braking limits corner speed {:.3} -> {:.3}",
                    i,
                    entry,
                    candidate
                );
                candidate.min(entry)
            } else {
                // Next waypoint is out of reach; the forward pass lowers it.
                tracing::debug!(
                    "Waypoint {}: cannot reach {:.3} from {:.3}, deferring to forward pass",
                    i,
                    exit,
                    entry
                );
                entry
            };
        }
        Ok(())
    }

    fn forward_pass(&self, waypoints: &[Waypoint], start_position: Vector2, speeds: &mut [f64]) -> Result<(), PlanError> {
        let mut previous_position = start_position;
        let mut previous_speed: f64 = 0.0;

        for (i, waypoint) in waypoints.iter().enumerate() {
            let incoming = Segment::between(self.settings, previous_position, waypoint.position, waypoint.desired_speed);
            if incoming.is_stalled() {
                return Err(PlanError::NoAcceleration { index: i });
            }
            let reachable = checked_speed(
                i,
                previous_speed * previous_speed + 2.0 * incoming.acceleration * incoming.distance,
            )?;
            if speeds[i] > reachable {
                tracing::debug!(
                    "Waypoint {}: acceleration limits speed {:.3} -> {:.3}",
                    i,
                    speeds[i],
                    reachable
                );
                speeds[i] = reachable;
            }
            previous_position = waypoint.position;
            previous_speed = speeds[i];
        }
        Ok(())
    }
}
