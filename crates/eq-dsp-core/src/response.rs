//! Cascaded frequency response
//!
//! Each stage of a cascade is designed, its transfer function evaluated on a
//! shared frequency grid, and the complex values multiplied together. The
//! linear grid spans DC to Nyquist inclusive; [`log_frequency_grid`] gives
//! the 20 Hz .. 20 kHz spacing used for display.

use core::f64::consts::PI;

use log::debug;
use num_complex::Complex64;

use crate::config::{DISPLAY_FREQ_RATIO, DISPLAY_MIN_FREQ_HZ};
use crate::error::ConfigError;
use crate::filter::{design, BiquadCoeffs, FilterSpec};
use crate::level::magnitude_to_db;
use crate::stage::StageConfig;

/// Combined response of a cascade: frequency in Hz paired with the product
/// of every stage's transfer-function value there.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrequencyResponse {
    frequencies: Vec<f64>,
    values: Vec<Complex64>,
}

impl FrequencyResponse {
    /// Frequencies in Hz, ascending.
    #[must_use]
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Complex response at each frequency.
    #[must_use]
    pub fn values(&self) -> &[Complex64] {
        &self.values
    }

    /// Iterate `(frequency_hz, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, Complex64)> + '_ {
        self.frequencies
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }

    /// Number of grid points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True for an empty grid.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Linear magnitude at each frequency.
    #[must_use]
    pub fn magnitudes(&self) -> Vec<f64> {
        self.values.iter().map(|h| h.norm()).collect()
    }

    /// Magnitude in dB, floored at -120 dB.
    #[must_use]
    pub fn magnitudes_db(&self) -> Vec<f64> {
        magnitude_to_db(self.magnitudes())
    }

    /// Phase in degrees, wrapped to (-180, 180].
    #[must_use]
    pub fn phases_degrees(&self) -> Vec<f64> {
        self.values.iter().map(|h| h.arg().to_degrees()).collect()
    }

    /// Frequency and dB level of the largest magnitude.
    ///
    /// Returns `None` for an empty response.
    #[must_use]
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.iter()
            .map(|(f, h)| (f, h.norm()))
            .fold(None, |best: Option<(f64, f64)>, (f, m)| match best {
                Some((_, bm)) if bm >= m => best,
                _ => Some((f, m)),
            })
            .map(|(f, m)| (f, magnitude_to_db(m)))
    }
}

/// `n` angular frequencies linearly spaced over `[0, pi]`, both ends
/// included. `n = 1` yields `[0]`.
#[must_use]
pub fn linear_omega_grid(n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let step = PI / (n - 1) as f64;
            let mut grid: Vec<f64> = (0..n).map(|i| i as f64 * step).collect();
            grid[n - 1] = PI;
            grid
        }
    }
}

/// `n` frequencies in Hz spaced logarithmically from `f_min` to
/// `f_min * ratio`. `n = 1` yields `[f_min]`.
#[must_use]
pub fn log_frequency_grid(n: usize, f_min: f64, ratio: f64) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![f_min],
        _ => (0..n)
            .map(|i| f_min * ratio.powf(i as f64 / (n - 1) as f64))
            .collect(),
    }
}

/// The default 20 Hz .. 20 kHz display grid.
#[must_use]
pub fn display_frequency_grid(n: usize) -> Vec<f64> {
    log_frequency_grid(n, DISPLAY_MIN_FREQ_HZ, DISPLAY_FREQ_RATIO)
}

/// Multiply every stage's response at each `omega`, in cascade order.
fn accumulate(stages: &[BiquadCoeffs], omegas: &[f64]) -> Vec<Complex64> {
    let mut total = vec![Complex64::new(1.0, 0.0); omegas.len()];
    for coeffs in stages {
        for (h, &w) in total.iter_mut().zip(omegas) {
            *h *= coeffs.response_at(w);
        }
    }
    total
}

fn design_all(specs: &[FilterSpec], sample_rate: f64) -> Vec<BiquadCoeffs> {
    specs.iter().map(|spec| design(spec, sample_rate)).collect()
}

/// Response of a typed cascade on a linear grid of `grid_size` points
/// from DC to Nyquist.
#[must_use]
pub fn cascade_response(
    specs: &[FilterSpec],
    sample_rate: f64,
    grid_size: usize,
) -> FrequencyResponse {
    debug!(
        "evaluating {} stage cascade at {sample_rate} Hz on {grid_size} points",
        specs.len()
    );
    let stages = design_all(specs, sample_rate);
    let omegas = linear_omega_grid(grid_size);
    let values = accumulate(&stages, &omegas);
    let frequencies = omegas
        .iter()
        .map(|w| w * sample_rate / (2.0 * PI))
        .collect();

    FrequencyResponse {
        frequencies,
        values,
    }
}

/// Response of a typed cascade at caller-chosen frequencies in Hz.
#[must_use]
pub fn evaluate_at(specs: &[FilterSpec], sample_rate: f64, freqs_hz: &[f64]) -> FrequencyResponse {
    debug!(
        "evaluating {} stage cascade at {} frequencies",
        specs.len(),
        freqs_hz.len()
    );
    let stages = design_all(specs, sample_rate);
    let omegas: Vec<f64> = freqs_hz
        .iter()
        .map(|f| 2.0 * PI * f / sample_rate)
        .collect();

    FrequencyResponse {
        frequencies: freqs_hz.to_vec(),
        values: accumulate(&stages, &omegas),
    }
}

/// Response of a cascade given as loosely-typed stage records.
///
/// Every stage is resolved before any evaluation; the first unknown kind or
/// missing parameter aborts the whole call.
///
/// # Errors
///
/// Returns [`ConfigError`] if any stage cannot be resolved.
pub fn evaluate_cascade(
    stages: &[StageConfig],
    sample_rate: f64,
    grid_size: usize,
) -> Result<FrequencyResponse, ConfigError> {
    let specs = stages
        .iter()
        .map(StageConfig::resolve)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(cascade_response(&specs, sample_rate, grid_size))
}
