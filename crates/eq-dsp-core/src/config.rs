//! Defaults and response settings
//!
//! Numeric constants used by the designer and the response evaluator are
//! centralized here, along with [`ResponseConfig`] for callers that read
//! their evaluation settings from JSON.

use serde::{Deserialize, Serialize};

/// Default sample rate in Hz
pub const DEFAULT_SAMPLE_RATE: f64 = 48_000.0;

/// Default number of points in the linear response grid
pub const DEFAULT_GRID_SIZE: usize = 512;

/// Gain ceiling for peaking and shelving stages in dB
pub const MAX_BOOST_DB: f64 = 18.0;

/// Smallest magnitude considered by `magnitude_to_db` (-120 dB)
pub const MAGNITUDE_FLOOR: f64 = 1e-6;

/// Floor substituted for `sin(w0)` in the bandpass bandwidth term
pub const BANDPASS_SIN_EPSILON: f64 = 1e-8;

/// Lowest frequency of the logarithmic display grid in Hz
pub const DISPLAY_MIN_FREQ_HZ: f64 = 20.0;

/// Ratio between highest and lowest display frequency (20 Hz .. 20 kHz)
pub const DISPLAY_FREQ_RATIO: f64 = 1000.0;

/// Number of band slots in a [`crate::ParametricEq`]
pub const EQ_BAND_COUNT: usize = 8;

/// Center frequency used when a pure gain band is lowered to a peaking stage
pub const GAIN_BAND_FREQ_HZ: f64 = 1000.0;

/// Butterworth Q, used where the band model carries no Q of its own
pub const NEUTRAL_Q: f64 = 0.707;

/// Settings for one response evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseConfig {
    /// Sample rate in Hz
    pub sample_rate: f64,
    /// Number of grid points between DC and Nyquist (inclusive)
    pub grid_size: usize,
}

impl ResponseConfig {
    /// Create a config with explicit values.
    #[must_use]
    pub const fn new(sample_rate: f64, grid_size: usize) -> Self {
        Self {
            sample_rate,
            grid_size,
        }
    }

    /// Nyquist frequency for this sample rate.
    #[must_use]
    pub fn nyquist(&self) -> f64 {
        self.sample_rate / 2.0
    }
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE, DEFAULT_GRID_SIZE)
    }
}
