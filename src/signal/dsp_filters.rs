//! Shared DSP building blocks: direct-form-II IIR filter, Blackman-windowed
//! sinc FIR design, and whole-ratio up/downsampling over
//! `num_complex::Complex64` buffers.

use std::f64::consts::PI;

use num_complex::Complex64;

const BLACKMAN_A0: f64 = 0.42;
const BLACKMAN_A1: f64 = 0.5;
const BLACKMAN_A2: f64 = 0.08;

fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        (x * PI).sin() / (x * PI)
    }
}

/// A Blackman-windowed sinc low-pass FIR, `2 * render_filter_length` taps,
/// designed for normalised cutoff `cutoff` (`1/ratio` for a rate change of
/// `ratio`).
pub fn blackman_fir(cutoff: f64, render_filter_length: usize) -> Vec<f64> {
    let filt_length = render_filter_length * 2;
    let n = filt_length as f64 / 2.0;
    (0..filt_length)
        .map(|i| {
            let filt = sinc(cutoff * (i as f64 - n));
            let window = BLACKMAN_A0 - BLACKMAN_A1 * (PI * i as f64 / n).cos()
                + BLACKMAN_A2 * (2.0 * PI * i as f64 / n).cos();
            filt * window
        })
        .collect()
}

fn fir_filter(coeffs: &[f64], input: &[Complex64]) -> Vec<Complex64> {
    let order = coeffs.len();
    let mut w = vec![Complex64::new(0.0, 0.0); order];
    let mut out = Vec::with_capacity(input.len());
    for &sample in input {
        w.rotate_right(1);
        w[0] = sample;
        let mut acc = Complex64::new(0.0, 0.0);
        for (c, x) in coeffs.iter().zip(w.iter()) {
            acc += x * *c;
        }
        out.push(acc);
    }
    out
}

/// Upsamples `input` by an integer `ratio` using a Blackman FIR designed for
/// cutoff `1/ratio`, zero-stuffing then filtering.
pub fn upsample(input: &[Complex64], ratio: usize, render_filter_length: usize) -> Vec<Complex64> {
    let coeffs = blackman_fir(1.0 / ratio as f64, render_filter_length);
    let filt_length = coeffs.len();
    let mut stuffed = vec![Complex64::new(0.0, 0.0); input.len() * ratio + filt_length];
    for (i, &x) in input.iter().enumerate() {
        stuffed[i * ratio] = x;
    }
    let filtered = fir_filter(&coeffs, &stuffed);
    let offset = filt_length / 2 - 1;
    filtered[offset..offset + input.len() * ratio].to_vec()
}

/// Downsamples `input` by an integer `ratio`, matching `upsample`'s filter.
pub fn downsample(input: &[Complex64], ratio: usize, render_filter_length: usize) -> Vec<Complex64> {
    let coeffs = blackman_fir(1.0 / ratio as f64, render_filter_length);
    let filt_length = coeffs.len();
    let mut padded = input.to_vec();
    padded.resize(input.len() + filt_length, Complex64::new(0.0, 0.0));
    let filtered = fir_filter(&coeffs, &padded);
    (0..input.len() / ratio)
        .map(|i| filtered[i * ratio + filt_length / 2] / ratio as f64)
        .collect()
}

/// A direct-form-II transposed IIR filter: `a[0]*y[n] = sum(b[k]*x[n-k]) -
/// sum(a[k]*y[n-k], k>=1)`.
#[derive(Debug, Clone)]
pub struct IirFilter {
    a: Vec<f64>,
    b: Vec<f64>,
    w: Vec<f64>,
}

impl IirFilter {
    pub fn new(den_coeffs: Vec<f64>, num_coeffs: Vec<f64>) -> Self {
        let order = den_coeffs.len().max(num_coeffs.len());
        IirFilter { a: den_coeffs, b: num_coeffs, w: vec![0.0; order] }
    }

    pub fn filter_sample(&mut self, sample: f64) -> f64 {
        self.w.rotate_right(1);
        self.w[0] = 0.0;
        let a0 = self.a.first().copied().unwrap_or(1.0);
        let feedback: f64 = self
            .a
            .iter()
            .enumerate()
            .skip(1)
            .map(|(k, &ak)| ak * self.w.get(k).copied().unwrap_or(0.0))
            .sum();
        self.w[0] = (sample - feedback) / a0;
        self.b
            .iter()
            .enumerate()
            .map(|(k, &bk)| bk * self.w.get(k).copied().unwrap_or(0.0))
            .sum()
    }

    pub fn filter(&mut self, samples: &mut [f64]) {
        for s in samples.iter_mut() {
            *s = self.filter_sample(*s);
        }
    }
}

/// Upsamples scalar real samples by exactly 10, the building block for
/// `FAlphaBranch`'s decade chain: zero-stuff then low-pass with a fixed IIR
/// matching a half-Nyquist Butterworth-style roll-off at the new rate.
#[derive(Debug, Clone)]
pub struct DecadeUpsampler {
    filter: IirFilter,
}

impl Default for DecadeUpsampler {
    fn default() -> Self {
        // 4th-order Butterworth low-pass at Fc = 0.1 (normalised to the
        // upsampled rate), matching the cutoff a factor-of-10 decade upsampler
        // needs to suppress imaging.
        let b = vec![0.0004166, 0.0016664, 0.0024996, 0.0016664, 0.0004166];
        let a = vec![1.0, -3.18063855, 3.86119435, -2.11215536, 0.43826514];
        DecadeUpsampler { filter: IirFilter::new(a, b) }
    }
}

impl DecadeUpsampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsamples one input sample into 10 output samples.
    pub fn upsample(&mut self, sample: f64) -> [f64; 10] {
        let mut out = [0.0; 10];
        out[0] = self.filter.filter_sample(sample * 10.0);
        for slot in out.iter_mut().skip(1) {
            *slot = self.filter.filter_sample(0.0);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blackman_fir_has_requested_length() {
        let coeffs = blackman_fir(0.5, 33);
        assert_eq!(coeffs.len(), 66);
    }

    #[test]
    fn upsample_preserves_length_ratio() {
        let input: Vec<Complex64> = (0..16).map(|i| Complex64::new(i as f64, 0.0)).collect();
        let out = upsample(&input, 4, 8);
        assert_eq!(out.len(), input.len() * 4);
    }

    #[test]
    fn downsample_preserves_length_ratio() {
        let input: Vec<Complex64> = (0..64).map(|i| Complex64::new(i as f64, 0.0)).collect();
        let out = downsample(&input, 4, 8);
        assert_eq!(out.len(), input.len() / 4);
    }

    #[test]
    fn iir_filter_passes_dc_gain_one_for_identity_coeffs() {
        let mut f = IirFilter::new(vec![1.0], vec![1.0]);
        assert_eq!(f.filter_sample(5.0), 5.0);
    }

    #[test]
    fn decade_upsampler_produces_ten_samples() {
        let mut u = DecadeUpsampler::new();
        let out = u.upsample(1.0);
        assert_eq!(out.len(), 10);
        assert!(out.iter().all(|v| v.is_finite()));
    }
}
