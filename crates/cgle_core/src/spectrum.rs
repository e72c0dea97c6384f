//! Frequency content of a sampled trace.

use crate::error::{CgleError, Result};
use num_complex::Complex64;
use rustfft::FftPlanner;

/// One-sided power spectrum of `trace` with its mean removed.
///
/// Entry `b` corresponds to angular frequency `2π·b / (len·dt)`.
pub fn power_spectrum(trace: &[f64]) -> Vec<f64> {
    if trace.is_empty() {
        return Vec::new();
    }
    let mean = trace.iter().sum::<f64>() / trace.len() as f64;
    let mut buffer: Vec<Complex64> = trace
        .iter()
        .map(|&value| Complex64::new(value - mean, 0.0))
        .collect();

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(buffer.len());
    fft.process(&mut buffer);

    buffer[..trace.len() / 2 + 1]
        .iter()
        .map(|bin| bin.norm_sqr())
        .collect()
}

/// Angular frequency of the strongest non-constant spectral bin.
pub fn dominant_frequency(trace: &[f64], dt: f64) -> Result<f64> {
    if dt <= 0.0 {
        return Err(CgleError::Analysis("dt must be positive.".to_string()));
    }
    if trace.len() < 4 {
        return Err(CgleError::Analysis(format!(
            "need at least 4 samples for a spectrum, got {}",
            trace.len()
        )));
    }
    if trace.iter().any(|value| !value.is_finite()) {
        return Err(CgleError::Analysis(
            "trace contains non-finite samples.".to_string(),
        ));
    }

    let spectrum = power_spectrum(trace);
    let (bin, _) = spectrum
        .iter()
        .enumerate()
        .skip(1)
        .fold((0, f64::NEG_INFINITY), |best, (bin, &power)| {
            if power > best.1 {
                (bin, power)
            } else {
                best
            }
        });
    Ok(2.0 * std::f64::consts::PI * bin as f64 / (trace.len() as f64 * dt))
}
