//! Magnitude / decibel conversion.
//!
//! Both directions work on a single value or element-wise on a sequence,
//! keeping the input's shape: `f64 -> f64`, `[f64; N] -> [f64; N]`,
//! `Vec<f64>` and `&[f64] -> Vec<f64>`.

use crate::config::MAGNITUDE_FLOOR;

#[inline]
fn scalar_to_db(magnitude: f64) -> f64 {
    20.0 * magnitude.abs().max(MAGNITUDE_FLOOR).log10()
}

#[inline]
fn scalar_from_db(db: f64) -> f64 {
    10.0_f64.powf(db / 20.0)
}

/// Values that can be converted between linear magnitude and dB.
pub trait Decibels {
    /// Result shape of a conversion
    type Output;

    /// Linear magnitude to dB, floored at `MAGNITUDE_FLOOR` (-120 dB).
    fn to_db(self) -> Self::Output;

    /// dB to linear magnitude.
    fn to_magnitude(self) -> Self::Output;
}

impl Decibels for f64 {
    type Output = f64;

    fn to_db(self) -> f64 {
        scalar_to_db(self)
    }

    fn to_magnitude(self) -> f64 {
        scalar_from_db(self)
    }
}

impl<const N: usize> Decibels for [f64; N] {
    type Output = [f64; N];

    fn to_db(self) -> [f64; N] {
        self.map(scalar_to_db)
    }

    fn to_magnitude(self) -> [f64; N] {
        self.map(scalar_from_db)
    }
}

impl Decibels for Vec<f64> {
    type Output = Vec<f64>;

    fn to_db(mut self) -> Vec<f64> {
        for v in &mut self {
            *v = scalar_to_db(*v);
        }
        self
    }

    fn to_magnitude(mut self) -> Vec<f64> {
        for v in &mut self {
            *v = scalar_from_db(*v);
        }
        self
    }
}

impl Decibels for &[f64] {
    type Output = Vec<f64>;

    fn to_db(self) -> Vec<f64> {
        self.iter().copied().map(scalar_to_db).collect()
    }

    fn to_magnitude(self) -> Vec<f64> {
        self.iter().copied().map(scalar_from_db).collect()
    }
}

/// Convert dB to linear magnitude: `10^(db/20)`.
#[must_use]
pub fn db_to_magnitude<T: Decibels>(db: T) -> T::Output {
    db.to_magnitude()
}

/// Convert linear magnitude to dB: `20·log10(max(|m|, 1e-6))`.
///
/// Never returns `-inf` or NaN for zero input; the floor maps to -120 dB.
#[must_use]
pub fn magnitude_to_db<T: Decibels>(magnitude: T) -> T::Output {
    magnitude.to_db()
}
