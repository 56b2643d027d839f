//! Process-wide, read-only simulation configuration. Built once during
//! scenario load and passed by reference into the scheduler and renderer.

pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;
pub const BOLTZMANN_K: f64 = 1.380_650_3e-23;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Xml,
    Csv,
    Binary,
}

/// Export-format selection; more than one may be active at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExportFlags {
    pub xml: bool,
    pub csv: bool,
    pub binary: bool,
}

#[derive(Debug, Clone)]
pub struct GlobalParams {
    pub c: f64,
    pub boltzmann_k: f64,
    pub start_time: f64,
    pub end_time: f64,
    pub rate: f64,
    pub cw_sample_rate: f64,
    pub oversample_ratio: u32,
    pub render_filter_length: usize,
    pub adc_bits: u32,
    pub random_seed: u64,
    pub render_threads: usize,
    pub export: ExportFlags,
}

impl Default for GlobalParams {
    fn default() -> Self {
        GlobalParams {
            c: SPEED_OF_LIGHT,
            boltzmann_k: BOLTZMANN_K,
            start_time: 0.0,
            end_time: 1.0,
            rate: 10e6,
            cw_sample_rate: 10e6,
            oversample_ratio: 1,
            render_filter_length: 33,
            adc_bits: 0,
            random_seed: 0,
            render_threads: num_cpus(),
            export: ExportFlags::default(),
        }
    }
}

fn num_cpus() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

impl GlobalParams {
    pub fn wavelength(&self, carrier: f64) -> f64 {
        self.c / carrier
    }
}
