//! A named, power/carrier-tagged `Signal`, shared by reference across every
//! `Response` that uses it.

use std::sync::Arc;

use num_complex::Complex64;

use crate::interp::FilterBank;
use crate::response::InterpPoint;

use super::store::{Signal, SignalError};

/// `(name, power, carrier, length, signal)`. Cheaply `Clone`-able: the
/// underlying `Signal` is reference-counted, never duplicated.
#[derive(Debug, Clone)]
pub struct RadarSignal {
    name: String,
    power: f64,
    carrier: f64,
    signal: Arc<Signal>,
}

impl RadarSignal {
    pub fn new(name: impl Into<String>, power: f64, carrier: f64, signal: Signal) -> Self {
        RadarSignal { name: name.into(), power, carrier, signal: Arc::new(signal) }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn power(&self) -> f64 {
        self.power
    }

    pub fn carrier(&self) -> f64 {
        self.carrier
    }

    pub fn length(&self) -> usize {
        self.signal.len()
    }

    pub fn rate(&self) -> f64 {
        self.signal.rate()
    }

    /// Renders the bound signal against `points`, then scales by `sqrt(power)`
    /// (the global signal power, on top of each point's own power term).
    pub fn render(&self, points: &[InterpPoint], frac_win_delay: f64, filter_bank: &FilterBank) -> Result<Vec<Complex64>, SignalError> {
        let rendered = self.signal.render(points, frac_win_delay, filter_bank)?;
        let scale = self.power.sqrt();
        Ok(rendered.into_iter().map(|c| c * scale).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::FilterBank;

    #[test]
    fn render_scales_by_sqrt_global_power() {
        let data = vec![Complex64::new(1.0, 0.0); 16];
        let signal = Signal::load(&data, 1e6, 1, 8).unwrap();
        let rs = RadarSignal::new("pulse1", 4.0, 1e9, signal);
        assert_eq!(rs.power(), 4.0);
        assert_eq!(rs.name(), "pulse1");
        let bank = FilterBank::build(17);
        let pt = InterpPoint::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
        let out = rs.render(&[pt], 0.0, &bank).unwrap();
        assert_eq!(out.len(), rs.length());
    }
}
