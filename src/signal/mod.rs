//! Signal storage and fractional-delay rendering.

pub mod dsp_filters;
mod radar_signal;
mod store;

pub use radar_signal::RadarSignal;
pub use store::{Signal, SignalError};
