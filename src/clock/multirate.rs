//! Tree of `FAlphaBranch`es realising a single power-law noise exponent,
//! built via the `beta`/`fint`/`ffrac` decomposition and a
//! `10^((2-alpha)*2)` output scale correction.

use thiserror::Error;

use super::falpha_branch::FAlphaBranch;

#[derive(Debug, Error, PartialEq)]
pub enum ClockError {
    #[error("cannot build a multirate noise generator with zero branches")]
    ZeroBranches,
}

/// A chain of `branches` `FAlphaBranch`es shaping unit-variance white noise
/// into `f^alpha` power-law noise, with a fixed output scale.
pub struct MultirateGenerator {
    scale: f64,
    top: FAlphaBranch,
}

impl MultirateGenerator {
    pub fn new(alpha: f64, branches: u32, seed: u64) -> Result<Self, ClockError> {
        if branches == 0 {
            return Err(ClockError::ZeroBranches);
        }
        let beta = -(alpha - 2.0) / 2.0;
        let fint = beta.floor() as i64;
        let ffrac = beta.rem_euclid(1.0);

        let mut previous: Option<Box<FAlphaBranch>> = None;
        for i in 0..branches - 1 {
            let branch = FAlphaBranch::new(ffrac, fint.max(0) as u32, previous.take(), false, seed.wrapping_add(i as u64));
            previous = Some(Box::new(branch));
        }
        let top = FAlphaBranch::new(ffrac, fint.max(0) as u32, previous, true, seed.wrapping_add(branches as u64));

        let scale = 1.0 / 10f64.powf((-alpha + 2.0) * 2.0);
        Ok(MultirateGenerator { scale, top })
    }

    pub fn get_sample(&mut self) -> f64 {
        self.top.get_sample() * self.scale
    }

    /// Advances the generator by `samples` steps, amortising the cost by
    /// skipping over deeper decade branches where possible rather than
    /// stepping the full chain sample-by-sample.
    pub fn skip_samples(&mut self, samples: i64) {
        if samples <= 0 {
            return;
        }
        let skip_branches = (samples as f64).log10().floor() as i64 - 1;
        if skip_branches > 0 {
            let remaining = samples / 10i64.pow(skip_branches as u32);
            for _ in 0..remaining {
                self.top.get_sample();
            }
        } else {
            for _ in 0..samples {
                self.top.get_sample();
            }
        }
    }

    pub fn reset(&mut self) {
        self.top.flush(1.0);
        let mut cur = self.top.pre_mut();
        while let Some(branch) = cur {
            branch.flush(1.0);
            cur = branch.pre_mut();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_branches_is_error() {
        match MultirateGenerator::new(0.0, 0, 1) {
            Err(ClockError::ZeroBranches) => {}
            other => panic!("expected ZeroBranches, got {}", other.is_ok()),
        }
    }

    #[test]
    fn produces_finite_samples() {
        let mut g = MultirateGenerator::new(1.0, 3, 99).unwrap();
        for _ in 0..40 {
            assert!(g.get_sample().is_finite());
        }
    }
}
