//! The reception-window assembler. Per receiver, slices accumulated
//! responses into fixed-length IQ windows, injecting thermal noise and
//! phase noise, downsampling, and quantising to the ADC's bit depth.

use std::f64::consts::PI;

use num_complex::Complex64;
use rayon::prelude::*;
use thiserror::Error;

use crate::interp::FilterBank;
use crate::noise::{noise_temperature_to_power, wgn_sample};
use crate::params::GlobalParams;
use crate::signal::dsp_filters::downsample;
use crate::signal::SignalError;
use crate::world::{Receiver, Transmitter, World};

#[derive(Debug, Error)]
pub enum WindowError {
    #[error(transparent)]
    Render(#[from] SignalError),
    #[error("non-finite sample produced during window assembly")]
    NonFinite,
}

/// One assembled reception window, ready for serialisation.
#[derive(Debug, Clone)]
pub struct Window {
    pub start_time: f64,
    pub rate: f64,
    pub fullscale: f64,
    pub index: u64,
    pub iq: Vec<Complex64>,
}

/// Every window produced for one receiver, tagged with its name for the
/// serialiser.
pub struct ReceiverWindows {
    pub receiver_name: String,
    pub windows: Vec<Window>,
}

/// Assembles reception windows for every receiver in `world`. Each
/// receiver is assembled on its own thread, and within each window the
/// responses contributing to it are themselves rendered and folded together
/// in parallel (see `assemble`'s per-window loop).
pub fn run(world: &World, params: &GlobalParams, filter_bank: &FilterBank) -> Result<Vec<ReceiverWindows>, WindowError> {
    world
        .receivers
        .par_iter()
        .map(|lock| {
            let mut receiver = lock.lock().expect("receiver mutex poisoned");
            let name = receiver.name().to_string();
            let windows = assemble(&mut receiver, &world.transmitters, params, filter_bank)?;
            Ok(ReceiverWindows { receiver_name: name, windows })
        })
        .collect()
}

/// Assembles every reception window for a single receiver.
pub fn assemble(
    receiver: &mut Receiver,
    transmitters: &[Transmitter],
    params: &GlobalParams,
    filter_bank: &FilterBank,
) -> Result<Vec<Window>, WindowError> {
    receiver
        .responses_mut()
        .sort_by(|a, b| a.start_time().partial_cmp(&b.start_time()).unwrap_or(std::cmp::Ordering::Equal));

    let w_prf = receiver.window_prf();
    let w_l = receiver.window_length();
    let w_s = receiver.window_skip();
    let rate = params.rate;
    let oversample = params.oversample_ratio;

    let n_w = ((params.end_time - params.start_time) * w_prf).ceil().max(0.0) as u64;
    let mut windows = Vec::with_capacity(n_w as usize);

    // The clock/WGN sources are physical-rate processes tied to the
    // receiver's actual output, so their sample counts are derived from the
    // post-downsample (base) rate rather than the oversampled render buffer,
    // even though step (c) of the window algorithm names them both `S`.
    let s_up = (w_l * rate * oversample as f64).ceil().max(1.0) as usize;
    let s_base = (w_l * rate).ceil().max(1.0) as usize;

    for w in 0..n_w {
        let mut buffer = vec![Complex64::new(0.0, 0.0); s_up];

        if receiver.noise_temperature() > 0.0 {
            let noise_power =
                noise_temperature_to_power(params.boltzmann_k, receiver.noise_temperature(), rate * oversample as f64 / 2.0);
            let stddev = (noise_power / 2.0).sqrt();
            let rng = receiver.wgn_rng();
            for sample in buffer.iter_mut() {
                let i = wgn_sample(rng, stddev);
                let q = wgn_sample(rng, stddev);
                *sample = Complex64::new(i, q);
            }
        }

        let timing_enabled = receiver.timing().enabled();
        let carrier = receiver.timing().frequency();
        let mut phase_noise = vec![0.0f64; s_base];
        if timing_enabled {
            for p in phase_noise.iter_mut() {
                *p = receiver.timing().get_sample();
            }
            if receiver.timing().sync_on_pulse() {
                receiver.timing().reset();
                receiver.timing().skip_samples((rate * w_s).floor() as i64);
            } else {
                let skip = (rate / w_prf - rate * w_l).floor();
                receiver.timing().skip_samples(skip.max(0.0) as i64);
            }
        }

        let raw_start = w as f64 / w_prf + w_s + phase_noise[0] / (2.0 * PI * carrier);
        let scaled = raw_start * rate;
        let frac_win_delay = scaled - scaled.round();
        let t_w = scaled.round() / rate;

        // Per-thread local buffers then a reduction: each response is
        // rendered independently and folded into a thread-local
        // accumulator, which rayon then reduces pairwise.
        let rendered_sum = receiver
            .responses()
            .par_iter()
            .try_fold(
                || vec![Complex64::new(0.0, 0.0); s_up],
                |mut acc, response| -> Result<Vec<Complex64>, WindowError> {
                    let start = match response.start_time() {
                        Some(s) => s,
                        None => return Ok(acc),
                    };
                    if start > t_w + w_l {
                        return Ok(acc);
                    }
                    let tx = match transmitters.iter().find(|t| t.name() == response.transmitter_name()) {
                        Some(tx) => tx,
                        None => return Ok(acc),
                    };
                    let rendered = tx.signal().render(response.points(), frac_win_delay, filter_bank)?;
                    let offset = (rate * oversample as f64 * (start - t_w)).round() as i64;
                    for (i, sample) in rendered.iter().enumerate() {
                        let idx = offset + i as i64;
                        if idx >= 0 && (idx as usize) < acc.len() {
                            acc[idx as usize] += sample;
                        }
                    }
                    Ok(acc)
                },
            )
            .try_reduce(
                || vec![Complex64::new(0.0, 0.0); s_up],
                |mut a, b| {
                    for (x, y) in a.iter_mut().zip(b.iter()) {
                        *x += y;
                    }
                    Ok(a)
                },
            )?;
        for (sample, contribution) in buffer.iter_mut().zip(rendered_sum.iter()) {
            *sample += contribution;
        }

        let mut samples = if oversample > 1 {
            downsample(&buffer, oversample as usize, params.render_filter_length)
        } else {
            buffer
        };

        for (n, sample) in samples.iter_mut().enumerate() {
            let phi = phase_noise.get(n).copied().unwrap_or(0.0);
            *sample *= Complex64::from_polar(1.0, phi);
        }

        if samples.iter().any(|c| !c.re.is_finite() || !c.im.is_finite()) {
            return Err(WindowError::NonFinite);
        }

        let fullscale = samples.iter().fold(0.0f64, |acc, c| acc.max(c.re.abs()).max(c.im.abs()));
        if params.adc_bits > 0 {
            let levels = 2f64.powi(params.adc_bits as i32 - 1);
            for sample in samples.iter_mut() {
                let (re, im) = if fullscale > 0.0 {
                    (
                        ((levels * sample.re / fullscale).floor() / levels).clamp(-1.0, 1.0),
                        ((levels * sample.im / fullscale).floor() / levels).clamp(-1.0, 1.0),
                    )
                } else {
                    (0.0, 0.0)
                };
                *sample = Complex64::new(re, im);
            }
        } else if fullscale > 0.0 {
            for sample in samples.iter_mut() {
                *sample /= fullscale;
            }
        }

        windows.push(Window { start_time: t_w, rate, fullscale, index: w, iq: samples });
    }

    Ok(windows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::antenna::Antenna;
    use crate::clock::ClockModelGenerator;
    use crate::response::{InterpPoint, Response};
    use crate::signal::RadarSignal;
    use crate::world::{ReceiverFlags, TransmitterMode};
    use std::sync::Arc;

    fn idle_timing() -> ClockModelGenerator {
        ClockModelGenerator::new(&[], 1e9, 0.0, 0.0, 1, 1e6, false, 1).unwrap()
    }

    fn build_receiver() -> Receiver {
        let antenna = Arc::new(Antenna::Isotropic { eta: 1.0 });
        Receiver::new("rx", 0, antenna, 0.0, 1e-4, 1e3, 0.0, idle_timing(), ReceiverFlags::NONE, None, 9)
    }

    fn build_transmitter() -> Transmitter {
        let data = vec![Complex64::new(1.0, 0.0); 8];
        let signal = crate::signal::Signal::load(&data, 1e6, 1, 9).unwrap();
        let radar_signal = Arc::new(RadarSignal::new("pulse", 1.0, 1e9, signal));
        let antenna = Arc::new(Antenna::Isotropic { eta: 1.0 });
        Transmitter::new("tx", 0, antenna, radar_signal, TransmitterMode::Cw, idle_timing(), None)
    }

    #[test]
    fn empty_receiver_produces_quiet_windows() {
        let mut rx = build_receiver();
        let params = GlobalParams { start_time: 0.0, end_time: 1e-3, ..GlobalParams::default() };
        let bank = FilterBank::build(17);
        let windows = assemble(&mut rx, &[], &params, &bank).unwrap();
        assert!(!windows.is_empty());
        for window in &windows {
            assert!(window.iq.iter().all(|c| c.re == 0.0 && c.im == 0.0));
        }
    }

    #[test]
    fn response_is_rendered_into_its_window() {
        let mut rx = build_receiver();
        let tx = build_transmitter();
        let mut response = Response::new("tx", "pulse", 1e9);
        response.add_point(InterpPoint::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)).unwrap();
        rx.add_response(response);

        let params = GlobalParams { start_time: 0.0, end_time: 1e-3, ..GlobalParams::default() };
        let bank = FilterBank::build(17);
        let windows = assemble(&mut rx, std::slice::from_ref(&tx), &params, &bank).unwrap();
        let energy: f64 = windows.iter().flat_map(|w| w.iq.iter()).map(|c| c.norm()).sum();
        assert!(energy > 0.0);
    }

    #[test]
    fn quantisation_stays_within_unit_range() {
        let mut rx = build_receiver();
        let tx = build_transmitter();
        let mut response = Response::new("tx", "pulse", 1e9);
        response.add_point(InterpPoint::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)).unwrap();
        rx.add_response(response);

        let params = GlobalParams { start_time: 0.0, end_time: 1e-3, adc_bits: 8, ..GlobalParams::default() };
        let bank = FilterBank::build(17);
        let windows = assemble(&mut rx, std::slice::from_ref(&tx), &params, &bank).unwrap();
        for window in &windows {
            for c in &window.iq {
                assert!(c.re.abs() <= 1.0 + 1e-9);
                assert!(c.im.abs() <= 1.0 + 1e-9);
            }
        }
    }
}
