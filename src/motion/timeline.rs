// src/motion/timeline.rs - Time-indexed replay of a planned primitive sequence
use serde::Serialize;

use super::types::KinematicPrimitive;
use super::vector::Vector2;

/// Head state at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub time: f64,
    pub position: Vector2,
    pub speed: f64,
}

#[derive(Debug, Clone)]
struct TimedLeg {
    primitive: KinematicPrimitive,
    start_time: f64,
    duration: f64,
}

impl TimedLeg {
    fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }
}

/// Maps elapsed time to position and speed along a plan.
#[derive(Debug, Clone)]
pub struct Timeline {
    start_position: Vector2,
    legs: Vec<TimedLeg>,
    duration: f64,
}

impl Timeline {
    pub fn new(start_position: Vector2, primitives: &[KinematicPrimitive]) -> Self {
        let mut legs = Vec::with_capacity(primitives.len());
        let mut elapsed = 0.0;
        for primitive in primitives {
            let duration = primitive.duration();
            legs.push(TimedLeg {
                primitive: *primitive,
                start_time: elapsed,
                duration,
            });
            elapsed += duration;
        }
        Self {
            start_position,
            legs,
            duration: elapsed,
        }
    }

    /// Total duration in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn sample(&self, time: f64) -> Sample {
        let time = time.clamp(0.0, self.duration);
        let index = self.legs.partition_point(|leg| leg.end_time() <= time);

        let Some(leg) = self.legs.get(index) else {
            let position = self.legs.last().map_or(self.start_position, |leg| leg.primitive.target);
            return Sample {
                time,
                position,
                speed: 0.0,
            };
        };

        let primitive = &leg.primitive;
        let dt = time - leg.start_time;
        let displacement =
            (primitive.speed * dt + 0.5 * primitive.acceleration * dt * dt).clamp(0.0, primitive.length());
        Sample {
            time,
            position: primitive.start.add(primitive.direction().scale(displacement)),
            speed: (primitive.speed + primitive.acceleration * dt).max(0.0),
        }
    }

    /// Evenly spaced samples at `rate` Hz, always including both ends.
    pub fn samples(&self, rate: f64) -> Vec<Sample> {
        if rate <= 0.0 || !rate.is_finite() {
            return vec![self.sample(0.0), self.sample(self.duration)];
        }
        let step = 1.0 / rate;
        let count = (self.duration * rate).floor() as usize;
        let mut samples: Vec<Sample> = (0..=count).map(|i| self.sample(i as f64 * step)).collect();
        if samples.last().is_some_and(|last| last.time < self.duration) {
            samples.push(self.sample(self.duration));
        }
        samples
    }
}
