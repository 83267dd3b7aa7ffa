//! Parameter saturation applied before coefficient design.
//!
//! Out-of-range requests are clamped rather than rejected. Only the upper
//! end is guarded; zero or negative values pass through unchanged.

use log::debug;

/// Saturate a design frequency at Nyquist (`sample_rate / 2`).
#[must_use]
pub fn clamp_frequency(freq: f64, sample_rate: f64) -> f64 {
    let nyquist = sample_rate / 2.0;
    if freq > nyquist {
        debug!("filter frequency {freq} Hz clamped to Nyquist {nyquist} Hz");
        nyquist
    } else {
        freq
    }
}

/// Saturate a gain at `max_gain_db`.
#[must_use]
pub fn clamp_gain(gain_db: f64, max_gain_db: f64) -> f64 {
    if gain_db > max_gain_db {
        debug!("filter gain {gain_db} dB clamped to {max_gain_db} dB");
        max_gain_db
    } else {
        gain_db
    }
}
