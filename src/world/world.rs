//! Owned collections of platforms, transmitters, receivers, targets, pulses,
//! antennas, and timing prototypes. Name uniqueness is enforced within each
//! keyed collection.

use std::sync::{Arc, Mutex};

use indexmap::IndexMap;
use thiserror::Error;

use crate::antenna::Antenna;
use crate::clock::{AlphaWeight, ClockError, ClockModelGenerator};
use crate::signal::RadarSignal;

use super::platform::Platform;
use super::radar_objects::{Receiver, Transmitter};
use super::target::Target;

#[derive(Debug, Error, PartialEq)]
pub enum WorldError {
    #[error("duplicate {kind} name {name:?}")]
    DuplicateName { kind: &'static str, name: String },
    #[error("no {kind} named {name:?} is registered in the world")]
    MissingReference { kind: &'static str, name: String },
    #[error("receiver noise temperature must be >= 0, got {0}")]
    NonPositiveNoiseTemperature(f64),
    #[error(transparent)]
    Clock(#[from] ClockError),
}

/// A named clock-model definition; transmitters/receivers instantiate their
/// own `ClockModelGenerator` from one of these plus a per-object seed, rather
/// than sharing a single mutable generator.
#[derive(Debug, Clone)]
pub struct TimingPrototype {
    pub alphas: Vec<AlphaWeight>,
    pub frequency: f64,
    pub phase_offset: f64,
    pub freq_offset: f64,
    pub branches: u32,
    pub sync_on_pulse: bool,
}

/// Owns every scenario object. `targets`/`receivers` are wrapped in a
/// `Mutex` because the scheduler samples them from multiple
/// transmitter-pair threads concurrently: a target's fluctuation RNG and a
/// receiver's response list are each mutated by whichever pair thread
/// currently holds them — a plain `std::sync::Mutex`, no separate
/// synchronisation crate is warranted for this.
#[derive(Default)]
pub struct World {
    pub platforms: Vec<Platform>,
    pub targets: Vec<Mutex<Target>>,
    pub transmitters: Vec<Transmitter>,
    pub receivers: Vec<Mutex<Receiver>>,
    antennas: IndexMap<String, Arc<Antenna>>,
    pulses: IndexMap<String, Arc<RadarSignal>>,
    timings: IndexMap<String, TimingPrototype>,
}

impl World {
    pub fn new() -> Self {
        World::default()
    }

    pub fn add_antenna(&mut self, name: impl Into<String>, antenna: Antenna) -> Result<(), WorldError> {
        let name = name.into();
        if self.antennas.contains_key(&name) {
            return Err(WorldError::DuplicateName { kind: "antenna", name });
        }
        self.antennas.insert(name, Arc::new(antenna));
        Ok(())
    }

    pub fn antenna(&self, name: &str) -> Result<Arc<Antenna>, WorldError> {
        self.antennas
            .get(name)
            .cloned()
            .ok_or_else(|| WorldError::MissingReference { kind: "antenna", name: name.to_string() })
    }

    pub fn add_pulse(&mut self, name: impl Into<String>, signal: RadarSignal) -> Result<(), WorldError> {
        let name = name.into();
        if self.pulses.contains_key(&name) {
            return Err(WorldError::DuplicateName { kind: "pulse", name });
        }
        self.pulses.insert(name, Arc::new(signal));
        Ok(())
    }

    pub fn pulse(&self, name: &str) -> Result<Arc<RadarSignal>, WorldError> {
        self.pulses
            .get(name)
            .cloned()
            .ok_or_else(|| WorldError::MissingReference { kind: "pulse", name: name.to_string() })
    }

    pub fn add_timing(&mut self, name: impl Into<String>, prototype: TimingPrototype) -> Result<(), WorldError> {
        let name = name.into();
        if self.timings.contains_key(&name) {
            return Err(WorldError::DuplicateName { kind: "timing", name });
        }
        self.timings.insert(name, prototype);
        Ok(())
    }

    /// Instantiates a fresh `ClockModelGenerator` from the named prototype,
    /// seeded independently for the calling object.
    pub fn build_timing(&self, name: &str, seed: u64, sample_rate: f64) -> Result<ClockModelGenerator, WorldError> {
        let proto = self
            .timings
            .get(name)
            .ok_or_else(|| WorldError::MissingReference { kind: "timing", name: name.to_string() })?;
        let gen = ClockModelGenerator::new(
            &proto.alphas,
            proto.frequency,
            proto.phase_offset,
            proto.freq_offset,
            proto.branches,
            sample_rate,
            proto.sync_on_pulse,
            seed,
        )?;
        Ok(gen)
    }

    pub fn add_platform(&mut self, platform: Platform) -> usize {
        self.platforms.push(platform);
        self.platforms.len() - 1
    }

    pub fn add_target(&mut self, target: Target) -> usize {
        self.targets.push(Mutex::new(target));
        self.targets.len() - 1
    }

    pub fn add_transmitter(&mut self, transmitter: Transmitter) -> usize {
        self.transmitters.push(transmitter);
        self.transmitters.len() - 1
    }

    pub fn add_receiver(&mut self, receiver: Receiver) -> Result<usize, WorldError> {
        if receiver.noise_temperature() < 0.0 {
            return Err(WorldError::NonPositiveNoiseTemperature(receiver.noise_temperature()));
        }
        self.receivers.push(Mutex::new(receiver));
        Ok(self.receivers.len() - 1)
    }
}
