//! Inbound pulse-file contract: the CSV half (header `"<length> <rate>"` plus
//! one complex sample per line) fully implemented; the HDF5 half exposed as
//! a signature behind `hdf5-output`.

use std::io::{BufRead, BufReader, Read};

use num_complex::Complex64;

use super::IoError;

/// Parses the CSV pulse-file contract.
pub fn load_pulse_csv<R: Read>(reader: R) -> Result<(Vec<Complex64>, f64), IoError> {
    let mut lines = BufReader::new(reader).lines();

    let header = lines.next().ok_or_else(|| IoError::MalformedPulseFile("missing header line".into()))??;
    let mut header_fields = header.split_whitespace();
    let length: usize = header_fields
        .next()
        .ok_or_else(|| IoError::MalformedPulseFile("missing length field".into()))?
        .parse()
        .map_err(|_| IoError::MalformedPulseFile("length field is not an integer".into()))?;
    let rate: f64 = header_fields
        .next()
        .ok_or_else(|| IoError::MalformedPulseFile("missing rate field".into()))?
        .parse()
        .map_err(|_| IoError::MalformedPulseFile("rate field is not a number".into()))?;

    let mut data = Vec::with_capacity(length);
    for line in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.split_whitespace();
        let re: f64 = fields
            .next()
            .ok_or_else(|| IoError::MalformedPulseFile("sample line missing real part".into()))?
            .parse()
            .map_err(|_| IoError::MalformedPulseFile("sample real part is not a number".into()))?;
        let im: f64 = fields
            .next()
            .ok_or_else(|| IoError::MalformedPulseFile("sample line missing imaginary part".into()))?
            .parse()
            .map_err(|_| IoError::MalformedPulseFile("sample imaginary part is not a number".into()))?;
        data.push(Complex64::new(re, im));
    }

    if data.len() != length {
        return Err(IoError::MalformedPulseFile(format!(
            "header declared {length} samples but {} were present",
            data.len()
        )));
    }

    Ok((data, rate))
}

/// Signature for the HDF5 half of the pulse-load contract (`/I`, `/Q` groups
/// each holding a 1-D `value` dataset of equal length); implemented behind
/// `hdf5-output` since it requires linking libhdf5.
#[cfg(feature = "hdf5-output")]
pub fn load_pulse_hdf5(path: &std::path::Path) -> Result<Vec<Complex64>, IoError> {
    let to_io_err = |e: hdf5::Error| IoError::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
    let file = hdf5::File::open(path).map_err(to_io_err)?;
    let i_values: Vec<f64> = file.group("I").map_err(to_io_err)?.dataset("value").map_err(to_io_err)?.read_raw().map_err(to_io_err)?;
    let q_values: Vec<f64> = file.group("Q").map_err(to_io_err)?.dataset("value").map_err(to_io_err)?.read_raw().map_err(to_io_err)?;
    if i_values.len() != q_values.len() {
        return Err(IoError::MalformedPulseFile("I/Q dataset length mismatch".into()));
    }
    Ok(i_values.into_iter().zip(q_values).map(|(i, q)| Complex64::new(i, q)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_and_samples() {
        let text = "3 1000000.0\n1.0 0.0\n0.0 1.0\n-1.0 0.5\n";
        let (data, rate) = load_pulse_csv(text.as_bytes()).unwrap();
        assert_eq!(rate, 1_000_000.0);
        assert_eq!(data.len(), 3);
        assert_eq!(data[1], Complex64::new(0.0, 1.0));
    }

    #[test]
    fn rejects_sample_count_mismatch() {
        let text = "2 1000.0\n1.0 0.0\n";
        let err = load_pulse_csv(text.as_bytes());
        assert!(err.is_err());
    }
}
