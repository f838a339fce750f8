// src/motion/trajectory.rs - Trapezoidal/triangular velocity profiles per segment
use super::types::{JunctionPoint, KinematicPrimitive, MachineSettings};
use super::vector::Vector2;
use super::{DIRECTION_EPSILON, PlanError, axis_limited_magnitude};

/// Geometry and limits of a straight move between two points.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Segment {
    pub direction: Vector2,
    pub distance: f64,
    /// Axis-limited acceleration along `direction`
    pub acceleration: f64,
    /// Desired speed clamped by the axis speed limits along `direction`
    pub cruise_speed: f64,
}

impl Segment {
    pub fn between(settings: &MachineSettings, from: Vector2, to: Vector2, desired_speed: f64) -> Self {
        let delta = to.sub(from);
        let direction = delta.unit();
        Self {
            direction,
            distance: delta.mag(),
            acceleration: axis_limited_magnitude(settings.acceleration_x, settings.acceleration_y, direction),
            cruise_speed: axis_limited_magnitude(settings.max_speed_x, settings.max_speed_y, direction)
                .min(desired_speed),
        }
    }

    /// A move that has somewhere to go but no acceleration to get there.
    pub fn is_stalled(&self) -> bool {
        self.distance > DIRECTION_EPSILON && self.acceleration <= 0.0
    }
}

/// Expands resolved junction speeds into constant-acceleration legs.
#[derive(Debug, Clone)]
pub struct SegmentPlanner<'a> {
    settings: &'a MachineSettings,
}

impl<'a> SegmentPlanner<'a> {
    pub fn new(settings: &'a MachineSettings) -> Self {
        Self { settings }
    }

    pub fn plan(&self, junctions: &[JunctionPoint], start_position: Vector2) -> Result<Vec<KinematicPrimitive>, PlanError> {
        let mut primitives = Vec::with_capacity(junctions.len() * 3);
        let mut position = start_position;
        let mut speed = 0.0;

        for (index, target) in junctions.iter().enumerate() {
            let legs = self.plan_segment(index, position, speed, target)?;
            primitives.extend(legs.into_iter().filter(|leg| leg.length() > DIRECTION_EPSILON));
            position = target.position;
            speed = target.final_speed;
        }

        for primitive in &primitives {
            tracing::trace!(
                "Leg {} -> {} v0={:.3} a={:.3}",
                primitive.start,
                primitive.target,
                primitive.speed,
                primitive.acceleration
            );
        }
        Ok(primitives)
    }

    /// Legs for one segment before zero-length filtering.
    fn plan_segment(
        &self,
        index: usize,
        start: Vector2,
        entry_speed: f64,
        target: &JunctionPoint,
    ) -> Result<Vec<KinematicPrimitive>, PlanError> {
        let segment = Segment::between(self.settings, start, target.position, target.desired_speed);
        if segment.distance <= DIRECTION_EPSILON {
            return Ok(Vec::new());
        }
        if segment.is_stalled() {
            return Err(PlanError::NoAcceleration { index });
        }

        let Segment {
            direction,
            distance,
            acceleration: accel,
            cruise_speed,
        } = segment;
        let exit_speed = target.final_speed;

        let accel_distance = (cruise_speed * cruise_speed - entry_speed * entry_speed) / (2.0 * accel);
        let decel_distance = (cruise_speed * cruise_speed - exit_speed * exit_speed) / (2.0 * accel);

        if accel_distance + decel_distance <= distance {
            // Trapezoid: reaches cruise speed
            let p2 = start.add(direction.scale(accel_distance.max(0.0)));
            let p3 = target.position.sub(direction.scale(decel_distance.max(0.0)));
            tracing::trace!("Segment {}: trapezoid cruise {:.3}", index, cruise_speed);
            return Ok(vec![
                KinematicPrimitive::new(start, p2, entry_speed, accel),
                KinematicPrimitive::new(p2, p3, cruise_speed, 0.0),
                KinematicPrimitive::new(p3, target.position, cruise_speed, -accel),
            ]);
        }

        // Triangle: too short to reach cruise speed
        let peak_squared = accel * distance + (entry_speed * entry_speed + exit_speed * exit_speed) / 2.0;
        let accel_distance = ((peak_squared - entry_speed * entry_speed) / (2.0 * accel)).clamp(0.0, distance);
        let peak_speed = (entry_speed * entry_speed + 2.0 * accel * accel_distance).sqrt();
        let p2 = start.add(direction.scale(accel_distance));
        tracing::trace!("Segment {}: triangle peak {:.3}", index, peak_speed);

        Ok(vec![
            KinematicPrimitive::new(start, p2, entry_speed, accel),
            KinematicPrimitive::new(p2, target.position, peak_speed, -accel),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(max_speed: f64) -> MachineSettings {
        MachineSettings {
            max_speed_x: max_speed,
            max_speed_y: max_speed,
            acceleration_x: 1000.0,
            acceleration_y: 1000.0,
            minimum_junction_speed: 0.0,
            junction_deviation: 0.05,
        }
    }

    fn stop_at(x: f64, y: f64, desired_speed: f64) -> JunctionPoint {
        JunctionPoint {
            position: Vector2::new(x, y),
            final_speed: 0.0,
            desired_speed,
        }
    }

    #[test]
    fn test_trapezoid_profile() {
        let settings = settings(200.0);
        let legs = SegmentPlanner::new(&settings)
            .plan(&[stop_at(100.0, 0.0, 50.0)], Vector2::ZERO)
            .unwrap();
        assert_eq!(legs.len(), 3);
        assert!((legs[0].target.x - 1.25).abs() < 1e-9);
        assert!((legs[1].target.x - 98.75).abs() < 1e-9);
        assert_eq!(legs[0].acceleration, 1000.0);
        assert_eq!(legs[1].acceleration, 0.0);
        assert_eq!(legs[2].acceleration, -1000.0);
        assert_eq!(legs[1].speed, 50.0);
    }

    #[test]
    fn test_triangle_profile() {
        let settings = settings(2000.0);
        let legs = SegmentPlanner::new(&settings)
            .plan(&[stop_at(10.0, 0.0, 1000.0)], Vector2::ZERO)
            .unwrap();
        assert_eq!(legs.len(), 2);
        assert!((legs[0].target.x - 5.0).abs() < 1e-9);
        assert!((legs[1].speed - 100.0).abs() < 1e-9);
        assert!(legs[1].exit_speed().abs() < 1e-6);
    }

    #[test]
    fn test_cruise_entry_drops_accel_leg() {
        let settings = settings(200.0);
        let junctions = [
            JunctionPoint {
                position: Vector2::new(50.0, 0.0),
                final_speed: 50.0,
                desired_speed: 50.0,
            },
            stop_at(100.0, 0.0, 50.0),
        ];
        let legs = SegmentPlanner::new(&settings).plan(&junctions, Vector2::ZERO).unwrap();
        // accel, cruise | cruise, decel
        assert_eq!(legs.len(), 4);
        assert!(legs[1].is_cruise() && legs[2].is_cruise());
        assert!(legs[0].target.approx_eq(Vector2::new(1.25, 0.0), 1e-9));
        assert!(legs[3].target.approx_eq(Vector2::new(100.0, 0.0), 1e-12));
    }

    #[test]
    fn test_diagonal_respects_axis_speed() {
        let settings = MachineSettings {
            max_speed_x: 100.0,
            max_speed_y: 10.0,
            ..settings(100.0)
        };
        let legs = SegmentPlanner::new(&settings)
            .plan(&[stop_at(100.0, 100.0, 500.0)], Vector2::ZERO)
            .unwrap();
        let cruise = legs.iter().find(|leg| leg.is_cruise()).unwrap();
        assert!((cruise.speed * cruise.direction().y - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_duplicate_point_yields_no_legs() {
        let settings = settings(200.0);
        let legs = SegmentPlanner::new(&settings)
            .plan(&[stop_at(0.0, 0.0, 50.0)], Vector2::ZERO)
            .unwrap();
        assert!(legs.is_empty());
    }

    #[test]
    fn test_stalled_axis() {
        let settings = MachineSettings {
            acceleration_x: 0.0,
            ..settings(200.0)
        };
        let result = SegmentPlanner::new(&settings).plan(&[stop_at(5.0, 0.0, 50.0)], Vector2::ZERO);
        assert!(matches!(result, Err(PlanError::NoAcceleration { index: 0 })));
    }
}
