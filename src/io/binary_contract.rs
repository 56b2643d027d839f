//! Per-window binary record contract: `chunk_<w:06>_I`/`_Q` datasets with
//! `time`/`rate`/`fullscale` attributes, plus a `WindowSink` seam so the
//! contract is testable without linking libhdf5. The real writer lives
//! behind the `hdf5-output` feature using the `hdf5-metno` crate.

use super::IoError;

/// One receiver window's I/Q payload plus the attributes the HDF5 writer
/// attaches to each dataset pair.
#[derive(Debug, Clone)]
pub struct WindowRecord {
    pub index: u64,
    pub time: f64,
    pub rate: f64,
    pub fullscale: f64,
    pub i: Vec<f64>,
    pub q: Vec<f64>,
}

/// A sink that can persist one receiver's windows.
pub trait WindowSink {
    fn write_window(&mut self, record: &WindowRecord) -> Result<(), IoError>;
}

#[cfg(feature = "hdf5-output")]
pub use hdf5_sink::Hdf5Sink;

#[cfg(feature = "hdf5-output")]
mod hdf5_sink {
    use std::path::Path;

    use super::{IoError, WindowRecord, WindowSink};

    fn to_io_err(e: hdf5::Error) -> IoError {
        IoError::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
    }

    /// Writes one `<receiverName>_results.h5` file, two datasets per window.
    pub struct Hdf5Sink {
        file: hdf5::File,
    }

    impl Hdf5Sink {
        pub fn create(path: &Path) -> Result<Self, IoError> {
            let file = hdf5::File::create(path).map_err(to_io_err)?;
            Ok(Hdf5Sink { file })
        }

        fn write_channel(&self, name: &str, data: &[f64], record: &WindowRecord) -> Result<(), IoError> {
            let dataset = self
                .file
                .new_dataset::<f64>()
                .shape(data.len())
                .create(name)
                .map_err(to_io_err)?;
            dataset.write(data).map_err(to_io_err)?;
            dataset.new_attr::<f64>().create("time").map_err(to_io_err)?.write_scalar(&record.time).map_err(to_io_err)?;
            dataset.new_attr::<f64>().create("rate").map_err(to_io_err)?.write_scalar(&record.rate).map_err(to_io_err)?;
            dataset
                .new_attr::<f64>()
                .create("fullscale")
                .map_err(to_io_err)?
                .write_scalar(&record.fullscale)
                .map_err(to_io_err)?;
            Ok(())
        }
    }

    impl WindowSink for Hdf5Sink {
        fn write_window(&mut self, record: &WindowRecord) -> Result<(), IoError> {
            self.write_channel(&format!("chunk_{:06}_I", record.index), &record.i, record)?;
            self.write_channel(&format!("chunk_{:06}_Q", record.index), &record.q, record)?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RecordingSink {
        records: Vec<WindowRecord>,
    }

    impl WindowSink for RecordingSink {
        fn write_window(&mut self, record: &WindowRecord) -> Result<(), IoError> {
            self.records.push(record.clone());
            Ok(())
        }
    }

    #[test]
    fn sink_trait_accepts_a_plain_implementation() {
        let mut sink = RecordingSink { records: Vec::new() };
        let record = WindowRecord { index: 0, time: 0.0, rate: 1e6, fullscale: 1.0, i: vec![0.0; 4], q: vec![0.0; 4] };
        sink.write_window(&record).unwrap();
        assert_eq!(sink.records.len(), 1);
        assert_eq!(sink.records[0].i.len(), 4);
    }
}
