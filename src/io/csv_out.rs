//! CSV response export: `<receiver>_results_<transmitter>.csv`, one file per
//! contributing transmitter, rows `time,power,phase,doppler_hz` in response
//! order then point order.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::response::Response;

use super::IoError;

pub fn write_csv(out_dir: &Path, receiver_name: &str, responses: &[Response]) -> Result<Vec<PathBuf>, IoError> {
    let transmitters: BTreeSet<&str> = responses.iter().map(|r| r.transmitter_name()).collect();
    let mut paths = Vec::with_capacity(transmitters.len());

    for tx_name in transmitters {
        let path = out_dir.join(format!("{receiver_name}_results_{tx_name}.csv"));
        let mut file = File::create(&path)?;
        for response in responses.iter().filter(|r| r.transmitter_name() == tx_name) {
            let carrier = response.carrier();
            for point in response.points() {
                let doppler_hz = carrier * (point.doppler - 1.0);
                writeln!(file, "{},{},{},{}", point.time, point.power, point.phase, doppler_hz)?;
            }
        }
        paths.push(path);
    }

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::InterpPoint;

    #[test]
    fn writes_one_file_per_transmitter_in_point_order() {
        let dir = std::env::temp_dir().join(format!("fers_csv_test_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let mut r1 = Response::new("tx1", "pulse", 1e9);
        r1.add_point(InterpPoint::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)).unwrap();
        r1.add_point(InterpPoint::new(1.0, 1.0, 0.0, 1.01, 0.0, 0.0)).unwrap();
        let mut r2 = Response::new("tx2", "pulse2", 2e9);
        r2.add_point(InterpPoint::new(2.0, 0.5, 0.0, 1.0, 0.0, 0.0)).unwrap();

        let paths = write_csv(&dir, "rx1", &[r1, r2]).unwrap();
        assert_eq!(paths.len(), 2);

        let tx1_path = dir.join("rx1_results_tx1.csv");
        let contents = std::fs::read_to_string(&tx1_path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("0,1,0,0"));

        for path in &paths {
            std::fs::remove_file(path).unwrap();
        }
    }
}
