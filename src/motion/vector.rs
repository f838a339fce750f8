// src/motion/vector.rs - Immutable 2D vector used by the planner
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// Planar position, direction or velocity (mm, mm/s).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(self, other: Vector2) -> Vector2 {
        Vector2::new(self.x + other.x, self.y + other.y)
    }

    pub fn sub(self, other: Vector2) -> Vector2 {
        Vector2::new(self.x - other.x, self.y - other.y)
    }

    pub fn negate(self) -> Vector2 {
        Vector2::new(-self.x, -self.y)
    }

    pub fn scale(self, s: f64) -> Vector2 {
        Vector2::new(self.x * s, self.y * s)
    }

    pub fn mag(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Unit vector in the same direction. The zero vector maps to itself.
    pub fn unit(self) -> Vector2 {
        let mag = self.mag();
        if mag > 0.0 {
            Vector2::new(self.x / mag, self.y / mag)
        } else {
            Vector2::ZERO
        }
    }

    pub fn dot(self, other: Vector2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the 3D cross product.
    pub fn cross(self, other: Vector2) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Clamp the magnitude to `max`, keeping the direction.
    pub fn limit(self, max: f64) -> Vector2 {
        if self.mag() > max {
            self.unit().scale(max)
        } else {
            self
        }
    }

    pub fn distance_to(self, other: Vector2) -> f64 {
        other.sub(self).mag()
    }

    pub fn approx_eq(self, other: Vector2, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }
}

impl Add for Vector2 {
    type Output = Vector2;

    fn add(self, rhs: Vector2) -> Vector2 {
        Vector2::add(self, rhs)
    }
}

impl Sub for Vector2 {
    type Output = Vector2;

    fn sub(self, rhs: Vector2) -> Vector2 {
        Vector2::sub(self, rhs)
    }
}

impl Mul<f64> for Vector2 {
    type Output = Vector2;

    fn mul(self, rhs: f64) -> Vector2 {
        self.scale(rhs)
    }
}

impl Neg for Vector2 {
    type Output = Vector2;

    fn neg(self) -> Vector2 {
        self.negate()
    }
}

impl std::fmt::Display for Vector2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}
