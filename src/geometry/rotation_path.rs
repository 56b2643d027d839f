//! Orientation path: azimuth/elevation over time.

use std::f64::consts::PI;

use thiserror::Error;

use super::coord::RotationCoord;
use super::spline1d::{cubic_eval, linear_eval, natural_spline_second_derivs};

#[derive(Debug, Error, PartialEq)]
pub enum RotationPathError {
    #[error("RotationPath::position called before finalise()")]
    NotFinalized,
    #[error("rotation path has no coordinates")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[allow(clippy::derive_partial_eq_without_eq)]
pub enum RotationPathInterp {
    Static,
    Linear,
    Cubic,
    /// Fixed azimuth/elevation rate starting from the first coordinate.
    /// Extrapolates linearly rather than clamping.
    Constant { start: RotationCoord, rate_az: f64, rate_el: f64 },
}

fn reduce_mod_2pi(x: f64) -> f64 {
    let mut r = x % (2.0 * PI);
    if r < 0.0 {
        r += 2.0 * PI;
    }
    r
}

/// A platform's orientation over time.
#[derive(Debug, Clone)]
pub struct RotationPath {
    coords: Vec<RotationCoord>,
    interp: RotationPathInterp,
    dd: Option<(Vec<f64>, Vec<f64>)>,
    finalized: bool,
}

impl RotationPath {
    pub fn new(interp: RotationPathInterp) -> Self {
        RotationPath { coords: Vec::new(), interp, dd: None, finalized: false }
    }

    pub fn add_coord(&mut self, coord: RotationCoord) {
        let idx = self.coords.partition_point(|c| c.t < coord.t);
        self.coords.insert(idx, coord);
        self.finalized = false;
    }

    pub fn set_interp(&mut self, interp: RotationPathInterp) {
        self.interp = interp;
        self.finalized = false;
    }

    pub fn interp(&self) -> RotationPathInterp {
        self.interp
    }

    pub fn coords(&self) -> &[RotationCoord] {
        &self.coords
    }

    pub fn finalize(&mut self) -> Result<(), RotationPathError> {
        if self.finalized {
            return Ok(());
        }
        if matches!(self.interp, RotationPathInterp::Constant { .. }) {
            self.finalized = true;
            return Ok(());
        }
        if self.coords.is_empty() {
            return Err(RotationPathError::Empty);
        }
        self.coords.sort_by(|a, b| a.t.partial_cmp(&b.t).unwrap());
        if self.interp == RotationPathInterp::Cubic {
            let ts: Vec<f64> = self.coords.iter().map(|c| c.t).collect();
            let azs: Vec<f64> = self.coords.iter().map(|c| c.azimuth).collect();
            let els: Vec<f64> = self.coords.iter().map(|c| c.elevation).collect();
            self.dd = Some((
                natural_spline_second_derivs(&ts, &azs),
                natural_spline_second_derivs(&ts, &els),
            ));
        }
        self.finalized = true;
        Ok(())
    }

    /// Azimuth/elevation at time `t`, in radians. `Static`/`Linear`/`Cubic`
    /// clamp to the nearest endpoint outside the knot domain; `Constant`
    /// extrapolates linearly and reduces both components `mod 2*PI` —
    /// preserved from the source behaviour even though elevation outside
    /// `[-PI/2, PI/2]` is not physically meaningful.
    pub fn position(&self, t: f64) -> Result<(f64, f64), RotationPathError> {
        if !self.finalized {
            return Err(RotationPathError::NotFinalized);
        }
        match self.interp {
            RotationPathInterp::Constant { start, rate_az, rate_el } => {
                let az = reduce_mod_2pi(start.azimuth + rate_az * t);
                let el = reduce_mod_2pi(start.elevation + rate_el * t);
                Ok((az, el))
            }
            RotationPathInterp::Static => {
                if self.coords.is_empty() {
                    return Err(RotationPathError::Empty);
                }
                Ok((self.coords[0].azimuth, self.coords[0].elevation))
            }
            RotationPathInterp::Linear => {
                if self.coords.is_empty() {
                    return Err(RotationPathError::Empty);
                }
                let ts: Vec<f64> = self.coords.iter().map(|c| c.t).collect();
                let azs: Vec<f64> = self.coords.iter().map(|c| c.azimuth).collect();
                let els: Vec<f64> = self.coords.iter().map(|c| c.elevation).collect();
                Ok((linear_eval(t, &ts, &azs), linear_eval(t, &ts, &els)))
            }
            RotationPathInterp::Cubic => {
                if self.coords.is_empty() {
                    return Err(RotationPathError::Empty);
                }
                let (dd_az, dd_el) = self.dd.as_ref().expect("finalize() populates dd for Cubic");
                let ts: Vec<f64> = self.coords.iter().map(|c| c.t).collect();
                let azs: Vec<f64> = self.coords.iter().map(|c| c.azimuth).collect();
                let els: Vec<f64> = self.coords.iter().map(|c| c.elevation).collect();
                Ok((
                    cubic_eval(t, &ts, &azs, dd_az),
                    cubic_eval(t, &ts, &els, dd_el),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_returns_first_point() {
        let mut p = RotationPath::new(RotationPathInterp::Static);
        p.add_coord(RotationCoord::new(1.0, 0.5, 0.0));
        p.add_coord(RotationCoord::new(9.0, 9.0, 5.0));
        p.finalize().unwrap();
        assert_eq!(p.position(3.0).unwrap(), (1.0, 0.5));
    }

    #[test]
    fn constant_extrapolates_and_wraps() {
        let start = RotationCoord::new(0.0, 0.0, 0.0);
        let p = RotationPath::new(RotationPathInterp::Constant { start, rate_az: PI, rate_el: PI });
        // can't query before finalize
        assert_eq!(p.position(1.0), Err(RotationPathError::NotFinalized));
    }

    #[test]
    fn constant_mode_applies_mod_2pi_to_elevation_too() {
        let start = RotationCoord::new(0.0, 0.0, 0.0);
        let mut p = RotationPath::new(RotationPathInterp::Constant { start, rate_az: 0.0, rate_el: 3.0 * PI });
        p.finalize().unwrap();
        let (_, el) = p.position(1.0).unwrap();
        // 3*PI mod 2*PI == PI, not clamped into [-PI/2, PI/2]
        assert!((el - PI).abs() < 1e-9);
    }

    #[test]
    fn linear_clamps_outside_domain() {
        let mut p = RotationPath::new(RotationPathInterp::Linear);
        p.add_coord(RotationCoord::new(0.0, 0.0, 0.0));
        p.add_coord(RotationCoord::new(1.0, 1.0, 1.0));
        p.finalize().unwrap();
        assert_eq!(p.position(-1.0).unwrap(), (0.0, 0.0));
        assert_eq!(p.position(5.0).unwrap(), (1.0, 1.0));
    }
}
