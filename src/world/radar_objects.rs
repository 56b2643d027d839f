//! Transmitters and receivers: platform-bound radar objects with their own
//! antenna, timing source, and (for receivers) response list.
//!
//! "Attached" (monostatic) transmitter/receiver pairs are resolved as a pair
//! of indices into the World's arrays rather than raw back-pointers (Design
//! Note "Cyclic references").

use std::sync::Arc;

use rand::SeedableRng;
use rand_mt::Mt19937GenRand64;

use crate::antenna::Antenna;
use crate::clock::ClockModelGenerator;
use crate::response::Response;
use crate::signal::RadarSignal;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransmitterMode {
    Pulsed { prf: f64 },
    Cw,
}

/// Snaps a requested PRF to the nearest integer number of samples per period
/// at `rate * oversample`, returning `(effective_prf, samples_per_period)`.
pub fn snap_prf(requested_prf: f64, rate: f64, oversample: u32) -> (f64, u64) {
    let full_rate = rate * oversample as f64;
    let samples_per_period = (full_rate / requested_prf).floor().max(1.0) as u64;
    let effective_prf = full_rate / samples_per_period as f64;
    (effective_prf, samples_per_period)
}

pub struct Transmitter {
    name: String,
    platform_index: usize,
    antenna: Arc<Antenna>,
    signal: Arc<RadarSignal>,
    mode: TransmitterMode,
    timing: ClockModelGenerator,
    attached_receiver: Option<usize>,
}

impl Transmitter {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        platform_index: usize,
        antenna: Arc<Antenna>,
        signal: Arc<RadarSignal>,
        mode: TransmitterMode,
        timing: ClockModelGenerator,
        attached_receiver: Option<usize>,
    ) -> Self {
        Transmitter { name: name.into(), platform_index, antenna, signal, mode, timing, attached_receiver }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn platform_index(&self) -> usize {
        self.platform_index
    }

    pub fn antenna(&self) -> &Antenna {
        &self.antenna
    }

    pub fn signal(&self) -> &RadarSignal {
        &self.signal
    }

    pub fn mode(&self) -> TransmitterMode {
        self.mode
    }

    pub fn timing(&mut self) -> &mut ClockModelGenerator {
        &mut self.timing
    }

    pub fn attached_receiver(&self) -> Option<usize> {
        self.attached_receiver
    }

    /// The PRF actually used for pulse enumeration: the requested PRF
    /// snapped to the nearest integer number of samples per period at
    /// `rate * oversample` (§3's Transmitter invariant).
    fn effective_prf(&self, rate: f64, oversample: u32) -> Option<f64> {
        match self.mode {
            TransmitterMode::Cw => None,
            TransmitterMode::Pulsed { prf } => Some(snap_prf(prf, rate, oversample).0),
        }
    }

    /// Number of pulses over `[start, end)`: `ceil((end - start) * PRF)` for
    /// pulsed mode (using the snapped effective PRF), always `1` for CW.
    pub fn pulse_count(&self, start: f64, end: f64, rate: f64, oversample: u32) -> u64 {
        match self.effective_prf(rate, oversample) {
            None => 1,
            Some(prf) => {
                let n = ((end - start) * prf).ceil();
                n.max(0.0) as u64
            }
        }
    }

    /// Nominal start time of pulse `i`; always `0.0` for CW.
    pub fn pulse_start(&self, i: u64, rate: f64, oversample: u32) -> f64 {
        match self.effective_prf(rate, oversample) {
            None => 0.0,
            Some(prf) => i as f64 / prf,
        }
    }
}

/// Receiver behaviour flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReceiverFlags(u8);

impl ReceiverFlags {
    pub const NO_DIRECT: ReceiverFlags = ReceiverFlags(0b01);
    pub const NO_PROPLOSS: ReceiverFlags = ReceiverFlags(0b10);
    pub const NONE: ReceiverFlags = ReceiverFlags(0);

    pub fn contains(self, flag: ReceiverFlags) -> bool {
        self.0 & flag.0 == flag.0
    }

    pub fn union(self, other: ReceiverFlags) -> ReceiverFlags {
        ReceiverFlags(self.0 | other.0)
    }
}

impl std::ops::BitOr for ReceiverFlags {
    type Output = ReceiverFlags;
    fn bitor(self, rhs: ReceiverFlags) -> ReceiverFlags {
        self.union(rhs)
    }
}

pub struct Receiver {
    name: String,
    platform_index: usize,
    antenna: Arc<Antenna>,
    noise_temperature: f64,
    window_length: f64,
    window_prf: f64,
    window_skip: f64,
    timing: ClockModelGenerator,
    flags: ReceiverFlags,
    attached_transmitter: Option<usize>,
    responses: Vec<Response>,
    wgn_rng: Mt19937GenRand64,
}

impl Receiver {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        platform_index: usize,
        antenna: Arc<Antenna>,
        noise_temperature: f64,
        window_length: f64,
        window_prf: f64,
        window_skip: f64,
        timing: ClockModelGenerator,
        flags: ReceiverFlags,
        attached_transmitter: Option<usize>,
        wgn_seed: u64,
    ) -> Self {
        Receiver {
            name: name.into(),
            platform_index,
            antenna,
            noise_temperature,
            window_length,
            window_prf,
            window_skip,
            timing,
            flags,
            attached_transmitter,
            responses: Vec::new(),
            wgn_rng: Mt19937GenRand64::seed_from_u64(wgn_seed),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn platform_index(&self) -> usize {
        self.platform_index
    }

    pub fn antenna(&self) -> &Antenna {
        &self.antenna
    }

    pub fn noise_temperature(&self) -> f64 {
        self.noise_temperature
    }

    pub fn window_length(&self) -> f64 {
        self.window_length
    }

    pub fn window_prf(&self) -> f64 {
        self.window_prf
    }

    pub fn window_skip(&self) -> f64 {
        self.window_skip
    }

    pub fn flags(&self) -> ReceiverFlags {
        self.flags
    }

    pub fn attached_transmitter(&self) -> Option<usize> {
        self.attached_transmitter
    }

    pub fn timing(&mut self) -> &mut ClockModelGenerator {
        &mut self.timing
    }

    pub fn wgn_rng(&mut self) -> &mut Mt19937GenRand64 {
        &mut self.wgn_rng
    }

    pub fn responses(&self) -> &[Response] {
        &self.responses
    }

    pub fn responses_mut(&mut self) -> &mut Vec<Response> {
        &mut self.responses
    }

    pub fn add_response(&mut self, response: Response) {
        self.responses.push(response);
    }

    /// Number of reception windows over `[start, end)`.
    pub fn window_count(&self, start: f64, end: f64) -> u64 {
        (((end - start) * self.window_prf).ceil()).max(0.0) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prf_snaps_to_integer_samples_per_period() {
        let (effective, samples) = snap_prf(997.0, 10e6, 2);
        assert_eq!(samples, (20e6_f64 / 997.0).floor() as u64);
        assert!((effective - 20e6 / samples as f64).abs() < 1e-6);
    }

    #[test]
    fn cw_always_emits_one_pulse() {
        assert_eq!(
            TransmitterMode::Cw,
            TransmitterMode::Cw // sanity: mode equality compiles
        );
    }

    #[test]
    fn pulsed_count_is_ceil_of_duration_times_prf() {
        let (prf, _) = snap_prf(1000.0, 10e6, 1);
        assert!(prf > 0.0);
    }

    #[test]
    fn pulse_count_and_start_use_the_snapped_prf() {
        use crate::antenna::Antenna;
        use crate::clock::ClockModelGenerator;
        use crate::signal::{RadarSignal, Signal};
        use num_complex::Complex64;
        use std::sync::Arc;

        let data = vec![Complex64::new(1.0, 0.0); 4];
        let signal = Signal::load(&data, 10e6, 2, 9).unwrap();
        let radar_signal = Arc::new(RadarSignal::new("pulse", 1.0, 1e9, signal));
        let timing = ClockModelGenerator::new(&[], 1e9, 0.0, 0.0, 1, 10e6, false, 1).unwrap();
        let tx = Transmitter::new(
            "tx",
            0,
            Arc::new(Antenna::Isotropic { eta: 1.0 }),
            radar_signal,
            TransmitterMode::Pulsed { prf: 997.0 },
            timing,
            None,
        );

        let (effective, _) = snap_prf(997.0, 10e6, 2);
        assert_eq!(tx.pulse_count(0.0, 1.0, 10e6, 2), (1.0 * effective).ceil() as u64);
        assert!((tx.pulse_start(3, 10e6, 2) - 3.0 / effective).abs() < 1e-9);
    }
}
