// src/motion/estimator.rs - Cycle time estimation
use super::types::KinematicPrimitive;

pub struct TimeEstimator;

impl TimeEstimator {
    /// Total duration in seconds of a primitive sequence.
    pub fn estimate(primitives: &[KinematicPrimitive]) -> f64 {
        primitives.iter().map(KinematicPrimitive::duration).sum()
    }
}
