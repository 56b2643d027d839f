//! Antenna gain models, dispatched through a single tagged enum rather
//! than a trait object.

use std::f64::consts::PI;

use thiserror::Error;

use crate::geometry::{angle_between, SVec3, Vec3};
use crate::interp::InterpSet;

#[derive(Debug, Error, PartialEq)]
pub enum AntennaError {
    #[error("antenna efficiency {0} is not in (0, inf)")]
    InvalidEfficiency(f64),
    #[error("file-pattern antenna table is empty")]
    EmptyTable,
}

fn sinc_c(x: f64) -> f64 {
    x.sin() / (x + f64::EPSILON)
}

/// First-kind Bessel function `J1`, Numerical-Recipes rational/polynomial
/// approximation (matches the precision class of this crate's `besselI0`).
pub fn bessel_j1(x: f64) -> f64 {
    let ax = x.abs();
    let result = if ax < 8.0 {
        let y = x * x;
        let p1 = x
            * (72362614232.0
                + y * (-7895059235.0
                    + y * (242396853.1 + y * (-2972611.439 + y * (15704.48260 + y * -30.16036606)))));
        let p2 = 144725228442.0
            + y * (2300535178.0
                + y * (18583304.74 + y * (99447.43394 + y * (376.9991397 + y))));
        p1 / p2
    } else {
        let z = 8.0 / ax;
        let y = z * z;
        let xx = ax - 2.356194491;
        let p1 = 1.0
            + y * (0.183105e-2
                + y * (-0.3516396496e-4 + y * (0.2457520174e-5 + y * -0.240337019e-6)));
        let p2 = 0.04687499995
            + y * (-0.2002690873e-3
                + y * (0.8449199096e-5 + y * (-0.88228987e-6 + y * 0.105787412e-6)));
        let mut ans = (2.0 / (PI * ax)).sqrt() * (xx.cos() * p1 - z * xx.sin() * p2);
        if x < 0.0 {
            ans = -ans;
        }
        ans
    };
    result
}

/// A bilinear-interpolated azimuth-by-elevation gain table, normalised to
/// `[0, 1]^2` with wrap-around on the azimuth axis.
#[derive(Debug, Clone)]
pub struct GainTable2D {
    /// `rows[el_idx][az_idx]`, azimuth-major per row.
    rows: Vec<Vec<f64>>,
}

impl GainTable2D {
    pub fn new(rows: Vec<Vec<f64>>) -> Self {
        GainTable2D { rows }
    }

    fn sample(&self, az_norm: f64, el_norm: f64) -> f64 {
        if self.rows.is_empty() || self.rows[0].is_empty() {
            return 0.0;
        }
        let n_el = self.rows.len();
        let n_az = self.rows[0].len();

        let az = az_norm.rem_euclid(1.0) * n_az as f64;
        let el = el_norm.clamp(0.0, 1.0) * (n_el - 1) as f64;

        let az0 = az.floor() as usize % n_az;
        let az1 = (az0 + 1) % n_az;
        let el0 = (el.floor() as usize).min(n_el - 1);
        let el1 = (el0 + 1).min(n_el - 1);

        let az_frac = az - az.floor();
        let el_frac = el - el.floor();

        let top = self.rows[el0][az0] * (1.0 - az_frac) + self.rows[el0][az1] * az_frac;
        let bottom = self.rows[el1][az0] * (1.0 - az_frac) + self.rows[el1][az1] * az_frac;
        top * (1.0 - el_frac) + bottom * el_frac
    }
}

/// Polymorphic antenna gain model. All variants carry an efficiency factor
/// `eta`, applied multiplicatively to the raw pattern gain.
#[derive(Debug, Clone)]
pub enum Antenna {
    Isotropic { eta: f64 },
    Sinc { alpha: f64, beta: f64, gamma: f64, eta: f64 },
    Gaussian { azscale: f64, elscale: f64 },
    SquareHorn { dimension: f64, eta: f64 },
    Parabolic { diameter: f64, eta: f64 },
    File { table: GainTable2D, eta: f64 },
    Xml { az_axis: InterpSet, el_axis: InterpSet, max_gain: f64, eta: f64 },
}

impl Antenna {
    pub fn efficiency(&self) -> f64 {
        match self {
            Antenna::Isotropic { eta }
            | Antenna::Sinc { eta, .. }
            | Antenna::SquareHorn { eta, .. }
            | Antenna::Parabolic { eta, .. }
            | Antenna::File { eta, .. }
            | Antenna::Xml { eta, .. } => *eta,
            Antenna::Gaussian { .. } => 1.0,
        }
    }

    /// Gain toward `angle` given the antenna's current boresight `refangle`,
    /// at wavelength `wavelength` (metres).
    pub fn gain(&self, angle: &Vec3, refangle: &Vec3, wavelength: f64) -> f64 {
        match self {
            Antenna::Isotropic { eta } => *eta,
            Antenna::Sinc { alpha, beta, gamma, eta } => {
                let theta = angle_between(angle, refangle);
                alpha.abs() * sinc_c(beta * theta).abs().powf(*gamma) * eta
            }
            Antenna::Gaussian { azscale, elscale } => {
                let delta = SVec3::from(*angle) - SVec3::from(*refangle);
                (-delta.azimuth * delta.azimuth * azscale).exp()
                    * (-delta.elevation * delta.elevation * elscale).exp()
            }
            Antenna::SquareHorn { dimension, eta } => {
                let theta = angle_between(angle, refangle);
                let ge = 4.0 * PI * dimension * dimension / (wavelength * wavelength);
                let x = PI * dimension * theta.sin() / wavelength;
                ge * sinc_c(x).powi(2) * eta
            }
            Antenna::Parabolic { diameter, eta } => {
                let theta = angle_between(angle, refangle);
                let ge = (PI * diameter / wavelength).powi(2);
                let x = PI * diameter * theta.sin() / wavelength;
                let pattern = if x.abs() < f64::EPSILON { 1.0 } else { (2.0 * bessel_j1(x) / x).powi(2) };
                ge * pattern * eta
            }
            Antenna::File { table, eta } => {
                let s = SVec3::from(*angle);
                let az_norm = s.azimuth / (2.0 * PI);
                let el_norm = (s.elevation + PI / 2.0) / PI;
                table.sample(az_norm, el_norm) * eta
            }
            Antenna::Xml { az_axis, el_axis, max_gain, eta } => {
                let delta = SVec3::from(*angle) - SVec3::from(*refangle);
                az_axis.value(delta.azimuth.abs()) * el_axis.value(delta.elevation.abs()) * max_gain * eta
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isotropic_gain_is_efficiency() {
        let a = Antenna::Isotropic { eta: 0.8 };
        let g = a.gain(&Vec3::new(1.0, 0.0, 0.0), &Vec3::new(0.0, 1.0, 0.0), 0.3);
        assert!((g - 0.8).abs() < 1e-12);
    }

    #[test]
    fn parabolic_gain_at_boresight_uses_limit() {
        let a = Antenna::Parabolic { diameter: 1.0, eta: 1.0 };
        let boresight = Vec3::new(1.0, 0.0, 0.0);
        let g = a.gain(&boresight, &boresight, 0.3);
        let ge = (PI * 1.0_f64 / 0.3).powi(2);
        assert!((g - ge).abs() < 1e-6 * ge);
    }

    #[test]
    fn gaussian_gain_peaks_at_boresight() {
        let a = Antenna::Gaussian { azscale: 1.0, elscale: 1.0 };
        let boresight = Vec3::new(1.0, 0.0, 0.0);
        let g = a.gain(&boresight, &boresight, 0.3);
        assert!((g - 1.0).abs() < 1e-12);
    }

    #[test]
    fn bessel_j1_matches_known_value() {
        // J1(1) ~= 0.4400505857
        assert!((bessel_j1(1.0) - 0.4400505857).abs() < 1e-6);
    }
}
