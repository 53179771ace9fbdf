use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// A 2D pair of reals used for both lattice positions (as whole numbers) and world positions.
///
/// Every operation returns a new value, nothing is mutated in place.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };
    pub const UP: Vec2 = Vec2 { x: 0.0, y: -1.0 };
    pub const DOWN: Vec2 = Vec2 { x: 0.0, y: 1.0 };
    pub const LEFT: Vec2 = Vec2 { x: -1.0, y: 0.0 };
    pub const RIGHT: Vec2 = Vec2 { x: 1.0, y: 0.0 };
    pub const FLIP_X: Vec2 = Vec2 { x: -1.0, y: 1.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Vec2 {
        Vec2 { x, y }
    }

    #[inline]
    pub fn add(self, b: Vec2) -> Vec2 {
        Vec2::new(self.x + b.x, self.y + b.y)
    }

    #[inline]
    pub fn sub(self, b: Vec2) -> Vec2 {
        Vec2::new(self.x - b.x, self.y - b.y)
    }

    #[inline]
    pub fn scale(self, s: f64) -> Vec2 {
        Vec2::new(self.x * s, self.y * s)
    }

    /// Component-wise multiplication.
    #[inline]
    pub fn mul(self, v: Vec2) -> Vec2 {
        Vec2::new(self.x * v.x, self.y * v.y)
    }

    #[inline]
    pub fn sqr_magnitude(self) -> f64 {
        (self.x * self.x) + (self.y * self.y)
    }

    /// The canonical `"(x, y)"` form.
    ///
    /// Floats are neither `Eq` nor `Hash`, so this string is the key to use when a vector has to
    /// live in a set or map, e.g. a set of connection directions.
    pub fn key(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::add(self, rhs)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::sub(self, rhs)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f64) -> Vec2 {
        self.scale(rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

impl From<(f64, f64)> for Vec2 {
    fn from(x_y_pair: (f64, f64)) -> Vec2 {
        Vec2::new(x_y_pair.0, x_y_pair.1)
    }
}
