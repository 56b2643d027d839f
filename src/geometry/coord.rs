//! Time-stamped position and orientation samples.

use super::vector::Vec3;
use std::ops::{Add, Mul, Sub};

/// A position at an instant. Collections of these are kept sorted by `t`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coord {
    pub pos: Vec3,
    pub t: f64,
}

impl Coord {
    pub fn new(pos: Vec3, t: f64) -> Self {
        Coord { pos, t }
    }
}

impl Add for Coord {
    type Output = Coord;
    fn add(self, rhs: Coord) -> Coord {
        Coord::new(self.pos + rhs.pos, self.t + rhs.t)
    }
}

impl Sub for Coord {
    type Output = Coord;
    fn sub(self, rhs: Coord) -> Coord {
        Coord::new(self.pos - rhs.pos, self.t - rhs.t)
    }
}

impl Mul<f64> for Coord {
    type Output = Coord;
    fn mul(self, rhs: f64) -> Coord {
        Coord::new(self.pos * rhs, self.t * rhs)
    }
}

/// An orientation at an instant: azimuth/elevation in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RotationCoord {
    pub azimuth: f64,
    pub elevation: f64,
    pub t: f64,
}

impl RotationCoord {
    pub fn new(azimuth: f64, elevation: f64, t: f64) -> Self {
        RotationCoord { azimuth, elevation, t }
    }
}

impl Add for RotationCoord {
    type Output = RotationCoord;
    fn add(self, rhs: RotationCoord) -> RotationCoord {
        RotationCoord::new(self.azimuth + rhs.azimuth, self.elevation + rhs.elevation, self.t + rhs.t)
    }
}

impl Sub for RotationCoord {
    type Output = RotationCoord;
    fn sub(self, rhs: RotationCoord) -> RotationCoord {
        RotationCoord::new(self.azimuth - rhs.azimuth, self.elevation - rhs.elevation, self.t - rhs.t)
    }
}

impl Mul<f64> for RotationCoord {
    type Output = RotationCoord;
    fn mul(self, rhs: f64) -> RotationCoord {
        RotationCoord::new(self.azimuth * rhs, self.elevation * rhs, self.t * rhs)
    }
}
