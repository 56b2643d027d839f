//! Kaiser-windowed sinc fractional-delay filter bank: a process-wide table
//! of 1000 FIR rows, one per quantised fractional delay in `[-1, 1)`, built
//! once from the zeroth-order modified Bessel function.

use std::f64::consts::PI;

use lazy_static::lazy_static;
use thiserror::Error;

const TABLE_ROWS: usize = 1000;
const KAISER_BETA: f64 = 5.0;

#[derive(Debug, Error, PartialEq)]
pub enum InterpError {
    #[error("fractional delay {0} is outside the filter bank's supported range [-1, 1]")]
    DelayOutOfRange(f64),
}

/// Zeroth-order modified Bessel function of the first kind, Abramowitz &
/// Stegun section 9.8 polynomial approximation (split at `x/3.75 = 1`).
pub fn bessel_i0(x: f64) -> f64 {
    let ax = x.abs();
    if ax < 3.75 {
        let t = (x / 3.75).powi(2);
        1.0 + t
            * (3.5156229
                + t * (3.0899424
                    + t * (1.2067492 + t * (0.2659732 + t * (0.0360768 + t * 0.0045813)))))
    } else {
        let t = 3.75 / ax;
        (ax.exp() / ax.sqrt())
            * (0.39894228
                + t * (0.01328592
                    + t * (0.00225319
                        + t * (-0.00157565
                            + t * (0.00916281
                                + t * (-0.02057706
                                    + t * (0.02635537
                                        + t * (-0.01647633 + t * 0.00392377))))))))
    }
}

fn sinc(x: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        1.0
    } else {
        (PI * x).sin() / (PI * x)
    }
}

/// Kaiser window evaluated at `x` over support `[0, 2*alpha]`.
fn kaiser_window(x: f64, alpha: f64) -> f64 {
    if x < 0.0 || x > 2.0 * alpha {
        return 0.0;
    }
    let ratio = (x - alpha) / alpha;
    let arg = (1.0 - ratio * ratio).max(0.0).sqrt();
    bessel_i0(KAISER_BETA * arg) / bessel_i0(KAISER_BETA)
}

/// One row of the filter bank: `filter_length` taps for a single quantised
/// fractional delay.
#[derive(Debug, Clone)]
pub struct FilterRow {
    pub taps: Vec<f64>,
}

/// The process-wide Kaiser-sinc fractional-delay filter bank.
#[derive(Debug)]
pub struct FilterBank {
    alpha: i64,
    rows: Vec<FilterRow>,
}

impl FilterBank {
    /// Builds the full 1000-row table for the given tap count (`filter_length`,
    /// conventionally odd; `alpha = filter_length / 2`, taps span `[-alpha, alpha]`).
    pub fn build(filter_length: usize) -> Self {
        let alpha = (filter_length / 2) as i64;
        let mut rows = Vec::with_capacity(TABLE_ROWS);
        for i in 0..TABLE_ROWS {
            let delta = (i as f64 - 500.0) / 500.0;
            let mut taps = Vec::with_capacity(filter_length);
            for j in -alpha..=alpha {
                let x = j as f64 - delta;
                let w = kaiser_window(x + alpha as f64, alpha as f64);
                taps.push(w * sinc(x));
            }
            rows.push(FilterRow { taps });
        }
        FilterBank { alpha, rows }
    }

    pub fn filter_length(&self) -> usize {
        (2 * self.alpha + 1) as usize
    }

    /// Returns the filter row nearest to fractional delay `delta`.
    pub fn get_filter(&self, delta: f64) -> Result<&FilterRow, InterpError> {
        if !(-1.0..=1.0).contains(&delta) {
            return Err(InterpError::DelayOutOfRange(delta));
        }
        let idx = ((delta + 1.0) * 500.0).floor() as usize;
        let idx = idx.min(TABLE_ROWS - 1);
        Ok(&self.rows[idx])
    }
}

lazy_static! {
    /// Default-length (33-tap) filter bank, built once on first access.
    /// Scenarios that configure a non-default `render_filter_length` build
    /// their own `FilterBank::build` instead of using this singleton.
    pub static ref DEFAULT_FILTER_BANK: FilterBank = FilterBank::build(33);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bessel_i0_matches_known_values() {
        assert!((bessel_i0(0.0) - 1.0).abs() < 1e-9);
        // I0(5) ~= 27.2398718236
        assert!((bessel_i0(5.0) - 27.2398718236).abs() < 1e-6);
    }

    #[test]
    fn delay_out_of_range_is_error() {
        let bank = FilterBank::build(33);
        assert_eq!(bank.get_filter(1.5), Err(InterpError::DelayOutOfRange(1.5)));
        assert_eq!(bank.get_filter(-1.5), Err(InterpError::DelayOutOfRange(-1.5)));
    }

    #[test]
    fn zero_delay_row_is_symmetric() {
        let bank = FilterBank::build(33);
        let row = bank.get_filter(0.0).unwrap();
        let n = row.taps.len();
        for k in 0..n / 2 {
            assert!((row.taps[k] - row.taps[n - 1 - k]).abs() < 1e-9, "tap {k} not symmetric");
        }
    }

    #[test]
    fn every_row_has_finite_energy() {
        let bank = FilterBank::build(33);
        for row in &bank.rows {
            let energy: f64 = row.taps.iter().map(|t| t * t).sum();
            assert!(energy.is_finite());
            assert!(energy > 0.0);
        }
    }

    #[test]
    fn filter_length_matches_requested() {
        let bank = FilterBank::build(17);
        assert_eq!(bank.filter_length(), 17); // alpha = 8, 2*alpha+1 = 17
        let row = bank.get_filter(0.3).unwrap();
        assert_eq!(row.taps.len(), 17);
    }
}
