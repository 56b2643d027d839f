//! XML response export: one `<receiver>` document with a `<Response>` per
//! response and an `<InterpolationPoint>` per sampled point, all floats at
//! ten significant digits.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::response::Response;

use super::IoError;

fn fmt10(x: f64) -> String {
    format!("{x:.9e}")
}

/// Writes `<receiverName>_results.xml`. `signal_power` resolves a response's
/// transmitter name to its wave's global power term (`P_signal`), needed for
/// `<amplitude> = sqrt(power * P_signal)`.
pub fn write_xml(
    out_dir: &Path,
    receiver_name: &str,
    responses: &[Response],
    signal_power: impl Fn(&str) -> f64,
) -> Result<PathBuf, IoError> {
    let path = out_dir.join(format!("{receiver_name}_results.xml"));
    let mut file = File::create(&path)?;

    writeln!(file, "<receiver name=\"{receiver_name}\">")?;
    for response in responses {
        let p_signal = signal_power(response.transmitter_name());
        writeln!(file, "  <Response transmitter=\"{}\">", response.transmitter_name())?;
        if let Some(start) = response.start_time() {
            writeln!(file, "    <start>{}</start>", fmt10(start))?;
        }
        writeln!(file, "    <name>{}</name>", response.wave_name())?;
        for point in response.points() {
            let amplitude = (point.power * p_signal).sqrt();
            let doppler_hz = response.carrier() * (point.doppler - 1.0);
            writeln!(file, "    <InterpolationPoint>")?;
            writeln!(file, "      <time>{}</time>", fmt10(point.time))?;
            writeln!(file, "      <amplitude>{}</amplitude>", fmt10(amplitude))?;
            writeln!(file, "      <phase>{}</phase>", fmt10(point.phase))?;
            writeln!(file, "      <doppler>{}</doppler>", fmt10(doppler_hz))?;
            writeln!(file, "      <power>{}</power>", fmt10(point.power))?;
            writeln!(file, "      <Iamplitude>{}</Iamplitude>", fmt10(amplitude * point.phase.cos()))?;
            writeln!(file, "      <Qamplitude>{}</Qamplitude>", fmt10(amplitude * point.phase.sin()))?;
            writeln!(file, "      <noise_temperature>{}</noise_temperature>", fmt10(point.noise_temperature))?;
            writeln!(file, "      <phasedeg>{}</phasedeg>", fmt10(point.phase.to_degrees()))?;
            writeln!(file, "    </InterpolationPoint>")?;
        }
        writeln!(file, "  </Response>")?;
    }
    writeln!(file, "</receiver>")?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::InterpPoint;

    #[test]
    fn writes_a_well_formed_document() {
        let dir = std::env::temp_dir().join(format!("fers_xml_test_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let mut response = Response::new("tx1", "pulse", 1e9);
        response.add_point(InterpPoint::new(1.0, 0.0, 0.0, 1.0, 0.0, 290.0)).unwrap();

        let path = write_xml(&dir, "rx1", std::slice::from_ref(&response), |_| 1.0).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("<receiver"));
        assert!(contents.contains("<InterpolationPoint>"));
        assert!(contents.contains("transmitter=\"tx1\""));
        assert!(contents.contains("<name>pulse</name>"));

        std::fs::remove_file(&path).unwrap();
    }
}
