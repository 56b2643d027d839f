//! Output and pulse-load data contracts: CSV/XML response export, the
//! HDF5 per-window record shape (behind the `hdf5-output` feature), and the
//! CSV half of the inbound pulse-file format. Scenario description parsing
//! (XML/JSON) is an external collaborator and out of scope here.

mod binary_contract;
mod csv_out;
mod pulse_load;
mod xml_out;

pub use binary_contract::{WindowRecord, WindowSink};
#[cfg(feature = "hdf5-output")]
pub use binary_contract::Hdf5Sink;
pub use csv_out::write_csv;
#[cfg(feature = "hdf5-output")]
pub use pulse_load::load_pulse_hdf5;
pub use pulse_load::load_pulse_csv;
pub use xml_out::write_xml;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed pulse file: {0}")]
    MalformedPulseFile(String),
}
