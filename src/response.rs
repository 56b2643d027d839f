//! A single radar response: a time-ordered sequence of interpolation points
//! sampled along one pulse/target/transmitter-receiver path.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ResponseError {
    #[error("interpolation points must be appended in non-decreasing time order (got {new} after {last})")]
    OutOfOrder { last: f64, new: f64 },
}

/// One sampled point along a response: arrival power, arrival time, path
/// delay, Doppler factor, phase, and noise temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterpPoint {
    pub power: f64,
    pub time: f64,
    pub delay: f64,
    pub doppler: f64,
    pub phase: f64,
    pub noise_temperature: f64,
}

impl InterpPoint {
    #[allow(clippy::too_many_arguments)]
    pub fn new(power: f64, time: f64, delay: f64, doppler: f64, phase: f64, noise_temperature: f64) -> Self {
        InterpPoint { power, time, delay, doppler, phase, noise_temperature }
    }
}

/// A time-ordered sequence of `InterpPoint`s produced by one transmitter
/// against one target (or the direct path), for one pulse.
#[derive(Debug, Clone)]
pub struct Response {
    transmitter_name: String,
    wave_name: String,
    carrier: f64,
    points: Vec<InterpPoint>,
}

impl Response {
    pub fn new(transmitter_name: impl Into<String>, wave_name: impl Into<String>, carrier: f64) -> Self {
        Response { transmitter_name: transmitter_name.into(), wave_name: wave_name.into(), carrier, points: Vec::new() }
    }

    pub fn transmitter_name(&self) -> &str {
        &self.transmitter_name
    }

    /// The waveform (`RadarSignal`) name, as emitted in the `<name>` element
    /// of the XML output contract.
    pub fn wave_name(&self) -> &str {
        &self.wave_name
    }

    pub fn carrier(&self) -> f64 {
        self.carrier
    }

    pub fn points(&self) -> &[InterpPoint] {
        &self.points
    }

    pub fn start_time(&self) -> Option<f64> {
        self.points.first().map(|p| p.time)
    }

    /// Appends a point; fatal if it would break the non-decreasing time
    /// invariant.
    pub fn add_point(&mut self, point: InterpPoint) -> Result<(), ResponseError> {
        if let Some(last) = self.points.last() {
            if point.time < last.time {
                return Err(ResponseError::OutOfOrder { last: last.time, new: point.time });
            }
        }
        self.points.push(point);
        Ok(())
    }
}
