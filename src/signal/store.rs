//! Oversampled baseband signal storage and fractional-delay rendering.

use num_complex::Complex64;
use thiserror::Error;

use crate::interp::FilterBank;
use crate::response::InterpPoint;

use super::dsp_filters::upsample;

#[derive(Debug, Error, PartialEq)]
pub enum SignalError {
    #[error("cannot render against an empty point sequence")]
    EmptyPoints,
    #[error("signal data is empty after load")]
    EmptySignal,
}

fn lerp(a: f64, b: f64, w: f64) -> f64 {
    a * (1.0 - w) + b * w
}

/// A stored, oversampled complex baseband waveform and its render operation.
#[derive(Debug, Clone)]
pub struct Signal {
    data: Vec<Complex64>,
    rate: f64,
}

impl Signal {
    /// Stores `data` (sampled at `sample_rate`) upsampled by `oversample_ratio`.
    pub fn load(data: &[Complex64], sample_rate: f64, oversample_ratio: u32, render_filter_length: usize) -> Result<Self, SignalError> {
        if data.is_empty() {
            return Err(SignalError::EmptySignal);
        }
        let upsampled = if oversample_ratio <= 1 {
            data.to_vec()
        } else {
            upsample(data, oversample_ratio as usize, render_filter_length)
        };
        Ok(Signal { data: upsampled, rate: sample_rate * oversample_ratio as f64 })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Renders `points` into a complex vector the same length as the stored
    /// data, using fractional-delay interpolation against `filter_bank`.
    pub fn render(&self, points: &[InterpPoint], frac_win_delay: f64, filter_bank: &FilterBank) -> Result<Vec<Complex64>, SignalError> {
        if points.is_empty() {
            return Err(SignalError::EmptyPoints);
        }
        let size = self.data.len();
        let mut out = vec![Complex64::new(0.0, 0.0); size];
        let t0 = points[0].time;
        let base_delay_taps = (self.rate * points[0].delay).round();

        let mut cursor = 0usize;
        for n in 0..size {
            let t_n = t0 + n as f64 / self.rate;
            while cursor + 1 < points.len() && points[cursor + 1].time < t_n {
                cursor += 1;
            }
            let (iter_pt, next_pt, bw) = if cursor + 1 < points.len() {
                let iter_pt = &points[cursor];
                let next_pt = &points[cursor + 1];
                let span = next_pt.time - iter_pt.time;
                let bw = if span > f64::EPSILON { (t_n - iter_pt.time) / span } else { 0.0 };
                (iter_pt, next_pt, bw)
            } else {
                (&points[cursor], &points[cursor], 0.0)
            };

            let amplitude = lerp(iter_pt.power.sqrt(), next_pt.power.sqrt(), bw);
            let phase = lerp(iter_pt.phase, next_pt.phase, bw);
            let delay_samples = lerp(iter_pt.delay, next_pt.delay, bw) * self.rate;
            let d = -(delay_samples - base_delay_taps + frac_win_delay);
            let k = d.floor();
            let delta = d - k;
            let k = k as i64;

            let row = filter_bank.get_filter(delta.clamp(-1.0, 1.0))?;
            let taps = &row.taps;
            let l = taps.len() as i64;
            let half = l / 2;

            let jmin = (-half).max(-(n as i64));
            let jmax = half.min(size as i64 - n as i64) - 1;

            let mut acc = Complex64::new(0.0, 0.0);
            let mut j = jmin;
            while j <= jmax {
                let idx = n as i64 + j + k;
                if idx >= 0 && (idx as usize) < size {
                    let tap = taps[(j + half) as usize];
                    acc += self.data[idx as usize] * tap;
                }
                j += 1;
            }

            let phasor = Complex64::from_polar(amplitude, phase);
            out[n] = phasor * acc;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::FilterBank;

    fn unit_signal(len: usize) -> Signal {
        let data: Vec<Complex64> = (0..len).map(|i| Complex64::new(if i == len / 2 { 1.0 } else { 0.0 }, 0.0)).collect();
        Signal { data, rate: 1e6 }
    }

    #[test]
    fn load_rejects_empty_data() {
        assert_eq!(Signal::load(&[], 1e6, 1, 33), Err(SignalError::EmptySignal));
    }

    #[test]
    fn load_without_oversample_keeps_length() {
        let data = vec![Complex64::new(1.0, 0.0); 10];
        let s = Signal::load(&data, 1e6, 1, 33).unwrap();
        assert_eq!(s.len(), 10);
        assert_eq!(s.rate(), 1e6);
    }

    #[test]
    fn load_with_oversample_scales_length_and_rate() {
        let data = vec![Complex64::new(1.0, 0.0); 16];
        let s = Signal::load(&data, 1e6, 4, 8).unwrap();
        assert_eq!(s.len(), 16 * 4);
        assert_eq!(s.rate(), 4e6);
    }

    #[test]
    fn render_rejects_empty_points() {
        let s = unit_signal(64);
        let bank = FilterBank::build(33);
        assert_eq!(s.render(&[], 0.0, &bank), Err(SignalError::EmptyPoints));
    }

    #[test]
    fn single_point_render_scales_by_sqrt_power_and_preserves_length() {
        let s = unit_signal(64);
        let bank = FilterBank::build(33);
        let pt = InterpPoint::new(4.0, 0.0, 0.0, 1.0, 0.0, 0.0);
        let out = s.render(&[pt], 0.0, &bank).unwrap();
        assert_eq!(out.len(), 64);
        // amplitude = sqrt(4.0) = 2.0, phase = 0 -> real-valued scale of the stored impulse
        let peak = out.iter().map(|c| c.norm()).fold(0.0_f64, f64::max);
        assert!((peak - 2.0).abs() < 1e-6, "peak={peak}");
    }
}
