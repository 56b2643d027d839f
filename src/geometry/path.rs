//! Motion path: a time-ordered sequence of positions with a chosen
//! interpolation mode, immutable once finalised.

use thiserror::Error;

use super::coord::Coord;
use super::spline1d::{cubic_eval, linear_eval, natural_spline_second_derivs};
use super::vector::Vec3;

#[derive(Debug, Error, PartialEq)]
pub enum PathError {
    #[error("Path::position called before finalise()")]
    NotFinalized,
    #[error("path has no coordinates")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathInterp {
    Static,
    Linear,
    Cubic,
}

/// A platform's motion over time.
#[derive(Debug, Clone)]
pub struct Path {
    coords: Vec<Coord>,
    interp: PathInterp,
    dd: Option<(Vec<f64>, Vec<f64>, Vec<f64>)>,
    finalized: bool,
}

impl Path {
    pub fn new(interp: PathInterp) -> Self {
        Path { coords: Vec::new(), interp, dd: None, finalized: false }
    }

    /// Inserts a coordinate, preserving sort order by `t`. Invalidates
    /// finalisation.
    pub fn add_coord(&mut self, coord: Coord) {
        let idx = self.coords.partition_point(|c| c.t < coord.t);
        self.coords.insert(idx, coord);
        self.finalized = false;
    }

    pub fn set_interp(&mut self, interp: PathInterp) {
        self.interp = interp;
        self.finalized = false;
    }

    pub fn interp(&self) -> PathInterp {
        self.interp
    }

    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }

    /// Sorts coordinates and, for `Cubic`, precomputes the natural-spline
    /// second derivatives. Idempotent.
    pub fn finalize(&mut self) -> Result<(), PathError> {
        if self.finalized {
            return Ok(());
        }
        if self.coords.is_empty() {
            return Err(PathError::Empty);
        }
        self.coords.sort_by(|a, b| a.t.partial_cmp(&b.t).unwrap());
        if self.interp == PathInterp::Cubic {
            let ts: Vec<f64> = self.coords.iter().map(|c| c.t).collect();
            let xs: Vec<f64> = self.coords.iter().map(|c| c.pos.x).collect();
            let ys: Vec<f64> = self.coords.iter().map(|c| c.pos.y).collect();
            let zs: Vec<f64> = self.coords.iter().map(|c| c.pos.z).collect();
            self.dd = Some((
                natural_spline_second_derivs(&ts, &xs),
                natural_spline_second_derivs(&ts, &ys),
                natural_spline_second_derivs(&ts, &zs),
            ));
        }
        self.finalized = true;
        Ok(())
    }

    /// Position at time `t`. Out-of-domain queries clamp to the nearest
    /// endpoint (Static/Linear/Cubic never extrapolate).
    pub fn position(&self, t: f64) -> Result<Vec3, PathError> {
        if !self.finalized {
            return Err(PathError::NotFinalized);
        }
        if self.coords.is_empty() {
            return Err(PathError::Empty);
        }
        let pos = match self.interp {
            PathInterp::Static => self.coords[0].pos,
            PathInterp::Linear => {
                let ts: Vec<f64> = self.coords.iter().map(|c| c.t).collect();
                let xs: Vec<f64> = self.coords.iter().map(|c| c.pos.x).collect();
                let ys: Vec<f64> = self.coords.iter().map(|c| c.pos.y).collect();
                let zs: Vec<f64> = self.coords.iter().map(|c| c.pos.z).collect();
                Vec3::new(
                    linear_eval(t, &ts, &xs),
                    linear_eval(t, &ts, &ys),
                    linear_eval(t, &ts, &zs),
                )
            }
            PathInterp::Cubic => {
                let (ddx, ddy, ddz) = self.dd.as_ref().expect("finalize() populates dd for Cubic");
                let ts: Vec<f64> = self.coords.iter().map(|c| c.t).collect();
                let xs: Vec<f64> = self.coords.iter().map(|c| c.pos.x).collect();
                let ys: Vec<f64> = self.coords.iter().map(|c| c.pos.y).collect();
                let zs: Vec<f64> = self.coords.iter().map(|c| c.pos.z).collect();
                Vec3::new(
                    cubic_eval(t, &ts, &xs, ddx),
                    cubic_eval(t, &ts, &ys, ddy),
                    cubic_eval(t, &ts, &zs, ddz),
                )
            }
        };
        Ok(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_returns_first_point() {
        let mut p = Path::new(PathInterp::Static);
        p.add_coord(Coord::new(Vec3::new(1.0, 2.0, 3.0), 0.0));
        p.add_coord(Coord::new(Vec3::new(9.0, 9.0, 9.0), 5.0));
        p.finalize().unwrap();
        let pos = p.position(3.0).unwrap();
        assert_eq!(pos, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn position_before_finalize_is_error() {
        let mut p = Path::new(PathInterp::Static);
        p.add_coord(Coord::new(Vec3::ZERO, 0.0));
        assert_eq!(p.position(0.0), Err(PathError::NotFinalized));
    }

    #[test]
    fn linear_clamps_outside_domain() {
        let mut p = Path::new(PathInterp::Linear);
        p.add_coord(Coord::new(Vec3::new(0.0, 0.0, 0.0), 0.0));
        p.add_coord(Coord::new(Vec3::new(10.0, 0.0, 0.0), 1.0));
        p.finalize().unwrap();
        assert_eq!(p.position(-1.0).unwrap(), Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(p.position(2.0).unwrap(), Vec3::new(10.0, 0.0, 0.0));
        let mid = p.position(0.5).unwrap();
        assert!((mid.x - 5.0).abs() < 1e-9);
    }

    #[test]
    fn cubic_passes_through_knots() {
        // Knots at (0,0,0)/(10,0,0)/(20,10,0)/(30,0,0)
        let knots = [
            (Vec3::new(0.0, 0.0, 0.0), 0.0),
            (Vec3::new(10.0, 0.0, 0.0), 1.0),
            (Vec3::new(20.0, 10.0, 0.0), 2.0),
            (Vec3::new(30.0, 0.0, 0.0), 3.0),
        ];
        let mut p = Path::new(PathInterp::Cubic);
        for (pos, t) in knots {
            p.add_coord(Coord::new(pos, t));
        }
        p.finalize().unwrap();
        for (pos, t) in knots {
            let got = p.position(t).unwrap();
            assert!((got.x - pos.x).abs() < 1e-9);
            assert!((got.y - pos.y).abs() < 1e-9);
            assert!((got.z - pos.z).abs() < 1e-9);
        }
        let mid = p.position(0.5).unwrap();
        assert!(mid.x > 0.0 && mid.x < 10.0);
    }
}
