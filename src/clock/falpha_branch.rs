//! A single branch of a power-law (`f^alpha`) noise-shaping chain: a
//! shape/integrator/high-pass filter triple plus a decade upsampler. The
//! shape and high-pass filters are single-pole IIR approximations
//! parameterised by `ffrac` (see `DESIGN.md` for the rationale).

use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use rand_mt::Mt19937GenRand64;

use crate::signal::dsp_filters::{DecadeUpsampler, IirFilter};

fn integrator() -> IirFilter {
    IirFilter::new(vec![1.0, -1.0], vec![1.0])
}

fn shape_filter(ffrac: f64) -> IirFilter {
    // First-order IIR approximating |f|^ffrac shaping: pole location tracks
    // the fractional exponent, unity at ffrac = 0.
    let pole = (ffrac * 0.9).clamp(-0.95, 0.95);
    IirFilter::new(vec![1.0, -pole], vec![1.0 - pole.abs()])
}

fn highpass_filter() -> IirFilter {
    IirFilter::new(vec![1.0, -0.995], vec![0.9975, -0.9975])
}

/// One branch in an `f^alpha` noise-shaping tree: draws (or upsamples its
/// predecessor's) raw samples, shapes them, and caches a phase-continuity
/// offset.
pub struct FAlphaBranch {
    shape: IirFilter,
    integ: Vec<IirFilter>,
    highpass: Option<IirFilter>,
    upsampler: DecadeUpsampler,
    pre: Option<Box<FAlphaBranch>>,
    rng: Option<Mt19937GenRand64>,
    normal: Normal<f64>,
    buffer: [f64; 10],
    buffer_samples: usize,
    offset_sample: f64,
    got_offset: bool,
}

impl FAlphaBranch {
    /// `ffrac`/`fint` parameterise the shape/integrator filters; `pre` is the
    /// predecessor branch (`None` for the bottom of the chain); `last` marks
    /// the top branch, which additionally applies a high-pass filter.
    pub fn new(ffrac: f64, fint: u32, pre: Option<Box<FAlphaBranch>>, last: bool, seed: u64) -> Self {
        let rng = if pre.is_none() { Some(Mt19937GenRand64::seed_from_u64(seed)) } else { None };
        FAlphaBranch {
            shape: shape_filter(ffrac),
            integ: (0..fint).map(|_| integrator()).collect(),
            highpass: if last { Some(highpass_filter()) } else { None },
            upsampler: DecadeUpsampler::new(),
            pre,
            rng,
            normal: Normal::new(0.0, 1.0).expect("unit-variance normal is always valid"),
            buffer: [0.0; 10],
            buffer_samples: 0,
            offset_sample: 0.0,
            got_offset: false,
        }
    }

    pub fn pre(&self) -> Option<&FAlphaBranch> {
        self.pre.as_deref()
    }

    pub fn pre_mut(&mut self) -> Option<&mut FAlphaBranch> {
        self.pre.as_deref_mut()
    }

    fn raw_sample(&mut self) -> f64 {
        if let Some(pre) = self.pre.as_mut() {
            if self.buffer_samples == 0 {
                let next = pre.get_sample();
                self.buffer = self.upsampler.upsample(next);
                self.buffer_samples = self.buffer.len();
            }
            let idx = self.buffer.len() - self.buffer_samples;
            self.buffer_samples -= 1;
            self.buffer[idx]
        } else {
            let rng = self.rng.as_mut().expect("bottom branch always owns an rng");
            self.normal.sample(rng)
        }
    }

    fn calc_sample(&mut self, raw: f64) -> f64 {
        let mut sample = self.shape.filter_sample(raw);
        for integrator in &mut self.integ {
            sample = integrator.filter_sample(sample);
        }
        if let Some(hp) = &mut self.highpass {
            sample = hp.filter_sample(sample);
        }
        sample
    }

    /// The next shaped, (possibly) upsampled sample. Caches the very first
    /// sample as `offset_sample` so that a subsequent `flush` preserves phase.
    pub fn get_sample(&mut self) -> f64 {
        let raw = self.raw_sample();
        let sample = self.calc_sample(raw);
        if !self.got_offset {
            self.offset_sample = sample;
            self.got_offset = true;
        }
        sample - self.offset_sample
    }

    /// Discards buffered state and re-primes the offset-cancellation sample,
    /// scaling the freshly drawn offset by `scale`.
    pub fn flush(&mut self, scale: f64) {
        self.buffer_samples = 0;
        self.got_offset = false;
        let raw = self.raw_sample();
        self.offset_sample = self.calc_sample(raw) * scale;
        self.got_offset = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bottom_branch_produces_finite_samples() {
        let mut b = FAlphaBranch::new(0.3, 1, None, true, 42);
        for _ in 0..50 {
            assert!(b.get_sample().is_finite());
        }
    }

    #[test]
    fn chained_branch_upsamples_predecessor() {
        let bottom = FAlphaBranch::new(0.1, 0, None, false, 7);
        let mut top = FAlphaBranch::new(0.1, 0, Some(Box::new(bottom)), true, 7);
        for _ in 0..30 {
            assert!(top.get_sample().is_finite());
        }
    }

    #[test]
    fn first_sample_after_construction_is_zero() {
        let mut b = FAlphaBranch::new(0.0, 0, None, false, 1);
        assert_eq!(b.get_sample(), 0.0);
    }
}
