//! Biquad filter design
//!
//! Coefficient calculation for the ten stage kinds an equalizer cascade is
//! built from, using the RBJ audio-EQ cookbook formulas. Every design
//! function clamps its frequency at Nyquist (and its gain at
//! [`MAX_BOOST_DB`] where applicable) and returns coefficients normalized
//! so that `a0 = 1`.
//!
//! # Supported Filter Types
//!
//! - Bypass (identity)
//! - Low-pass, high-pass (Q)
//! - Band-pass, band-stop (bandwidth in octaves)
//! - Notch, all-pass (Q)
//! - Peaking EQ, low shelf, high shelf (Q and gain)

use core::f64::consts::{LN_2, PI};
use core::fmt;
use core::str::FromStr;

use log::trace;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::config::{BANDPASS_SIN_EPSILON, MAX_BOOST_DB};
use crate::error::ConfigError;
use crate::guard::{clamp_frequency, clamp_gain};

/// Closed set of biquad stage kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    /// Identity stage
    Bypass,
    /// 12 dB/oct low-pass
    Lowpass,
    /// 12 dB/oct high-pass
    Highpass,
    /// Band-pass, constant skirt gain
    Bandpass,
    /// Band-stop (band-reject)
    Bandstop,
    /// Notch
    Notch,
    /// All-pass (phase only)
    Allpass,
    /// Peaking EQ bell
    Peaking,
    /// Low shelf
    #[serde(rename = "lowshelf")]
    LowShelf,
    /// High shelf
    #[serde(rename = "highshelf")]
    HighShelf,
}

impl FilterKind {
    /// All kinds, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::Bypass,
        Self::Lowpass,
        Self::Highpass,
        Self::Bandpass,
        Self::Bandstop,
        Self::Notch,
        Self::Allpass,
        Self::Peaking,
        Self::LowShelf,
        Self::HighShelf,
    ];

    /// Lowercase name used in stage descriptions.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Bypass => "bypass",
            Self::Lowpass => "lowpass",
            Self::Highpass => "highpass",
            Self::Bandpass => "bandpass",
            Self::Bandstop => "bandstop",
            Self::Notch => "notch",
            Self::Allpass => "allpass",
            Self::Peaking => "peaking",
            Self::LowShelf => "lowshelf",
            Self::HighShelf => "highshelf",
        }
    }

    /// Whether the kind is designed from a center/cutoff frequency.
    #[must_use]
    pub const fn uses_frequency(&self) -> bool {
        !matches!(self, Self::Bypass)
    }

    /// Whether the kind is designed from a Q factor.
    #[must_use]
    pub const fn uses_q(&self) -> bool {
        matches!(
            self,
            Self::Lowpass
                | Self::Highpass
                | Self::Notch
                | Self::Allpass
                | Self::Peaking
                | Self::LowShelf
                | Self::HighShelf
        )
    }

    /// Whether the kind is designed from a bandwidth in octaves.
    #[must_use]
    pub const fn uses_bandwidth(&self) -> bool {
        matches!(self, Self::Bandpass | Self::Bandstop)
    }

    /// Whether the kind is designed from a gain.
    #[must_use]
    pub const fn uses_gain(&self) -> bool {
        matches!(self, Self::Peaking | Self::LowShelf | Self::HighShelf)
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterKind {
    type Err = ConfigError;

    /// Case-insensitive parse of the lowercase kind names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == lower)
            .ok_or_else(|| ConfigError::UnknownFilterKind(lower))
    }
}

/// One requested stage of a cascade.
///
/// Fields a kind does not consume are ignored by [`design`]; the per-kind
/// constructors fill them with neutral values so callers never have to.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Stage kind
    pub kind: FilterKind,
    /// Center or cutoff frequency in Hz
    pub center_freq_hz: f64,
    /// Quality factor
    pub q_factor: f64,
    /// Bandwidth in octaves (band-pass / band-stop)
    pub bandwidth_octaves: f64,
    /// Gain in dB (peaking / shelves)
    pub gain_db: f64,
}

impl FilterSpec {
    const fn with(kind: FilterKind, freq: f64, q: f64, bandwidth: f64, gain_db: f64) -> Self {
        Self {
            kind,
            center_freq_hz: freq,
            q_factor: q,
            bandwidth_octaves: bandwidth,
            gain_db,
        }
    }

    /// Identity stage.
    #[must_use]
    pub const fn bypass() -> Self {
        Self::with(FilterKind::Bypass, 0.0, 0.0, 0.0, 0.0)
    }

    /// Low-pass stage.
    #[must_use]
    pub const fn lowpass(freq: f64, q: f64) -> Self {
        Self::with(FilterKind::Lowpass, freq, q, 0.0, 0.0)
    }

    /// High-pass stage.
    #[must_use]
    pub const fn highpass(freq: f64, q: f64) -> Self {
        Self::with(FilterKind::Highpass, freq, q, 0.0, 0.0)
    }

    /// Band-pass stage, bandwidth in octaves.
    #[must_use]
    pub const fn bandpass(freq: f64, bandwidth: f64) -> Self {
        Self::with(FilterKind::Bandpass, freq, 0.0, bandwidth, 0.0)
    }

    /// Band-stop stage, bandwidth in octaves.
    #[must_use]
    pub const fn bandstop(freq: f64, bandwidth: f64) -> Self {
        Self::with(FilterKind::Bandstop, freq, 0.0, bandwidth, 0.0)
    }

    /// Notch stage.
    #[must_use]
    pub const fn notch(freq: f64, q: f64) -> Self {
        Self::with(FilterKind::Notch, freq, q, 0.0, 0.0)
    }

    /// All-pass stage.
    #[must_use]
    pub const fn allpass(freq: f64, q: f64) -> Self {
        Self::with(FilterKind::Allpass, freq, q, 0.0, 0.0)
    }

    /// Peaking EQ stage.
    #[must_use]
    pub const fn peaking(freq: f64, q: f64, gain_db: f64) -> Self {
        Self::with(FilterKind::Peaking, freq, q, 0.0, gain_db)
    }

    /// Low shelf stage.
    #[must_use]
    pub const fn low_shelf(freq: f64, q: f64, gain_db: f64) -> Self {
        Self::with(FilterKind::LowShelf, freq, q, 0.0, gain_db)
    }

    /// High shelf stage.
    #[must_use]
    pub const fn high_shelf(freq: f64, q: f64, gain_db: f64) -> Self {
        Self::with(FilterKind::HighShelf, freq, q, 0.0, gain_db)
    }

    /// Design the normalized coefficients for this stage.
    #[must_use]
    pub fn coeffs(&self, sample_rate: f64) -> BiquadCoeffs {
        design(self, sample_rate)
    }
}

/// Normalized biquad coefficients
///
/// Transfer function: H(z) = (b0 + b1*z^-1 + b2*z^-2) / (1 + a1*z^-1 + a2*z^-2)
///
/// Only obtainable from the design functions, so a0 has always been divided
/// out.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BiquadCoeffs {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
}

impl BiquadCoeffs {
    /// Unity (pass-through) coefficients
    pub const UNITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    /// Divide raw `[b0, b1, b2, a0, a1, a2]` by `a0`.
    ///
    /// `a0` is not checked: a zero leading term propagates as inf/NaN.
    /// The cookbook forms keep it strictly positive for sane inputs.
    #[must_use]
    pub fn normalize(raw: [f64; 6]) -> Self {
        let [b0, b1, b2, a0, a1, a2] = raw;
        let coeffs = Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        };
        trace!("biquad coefficients {coeffs:?}");
        coeffs
    }

    /// Feedforward coefficient b0
    #[must_use]
    pub const fn b0(&self) -> f64 {
        self.b0
    }

    /// Feedforward coefficient b1
    #[must_use]
    pub const fn b1(&self) -> f64 {
        self.b1
    }

    /// Feedforward coefficient b2
    #[must_use]
    pub const fn b2(&self) -> f64 {
        self.b2
    }

    /// Feedback coefficient a1
    #[must_use]
    pub const fn a1(&self) -> f64 {
        self.a1
    }

    /// Feedback coefficient a2
    #[must_use]
    pub const fn a2(&self) -> f64 {
        self.a2
    }

    /// Coefficients as `(b0, b1, b2, a1, a2)`.
    #[must_use]
    pub const fn as_tuple(&self) -> (f64, f64, f64, f64, f64) {
        (self.b0, self.b1, self.b2, self.a1, self.a2)
    }

    /// Numerator `[b0, b1, b2]`.
    #[must_use]
    pub const fn numerator(&self) -> [f64; 3] {
        [self.b0, self.b1, self.b2]
    }

    /// Denominator `[1, a1, a2]`.
    #[must_use]
    pub const fn denominator(&self) -> [f64; 3] {
        [1.0, self.a1, self.a2]
    }

    /// Identity filter. The sample rate is not used.
    #[must_use]
    pub const fn bypass(_sample_rate: f64) -> Self {
        Self::UNITY
    }

    /// Design a low-pass filter
    ///
    /// # Arguments
    /// * `fs` - Sample rate in Hz
    /// * `fc` - Cutoff frequency in Hz
    /// * `q` - Quality factor (0.707 for Butterworth)
    #[must_use]
    pub fn lowpass(fs: f64, fc: f64, q: f64) -> Self {
        let (sin_omega, cos_omega) = omega(fc, fs).sin_cos();
        let alpha = sin_omega / (2.0 * q);

        let b0 = (1.0 - cos_omega) / 2.0;
        let b1 = 1.0 - cos_omega;
        let b2 = (1.0 - cos_omega) / 2.0;
        let a0 = 1.0 + alpha;
        let a1 = -2.0 * cos_omega;
        let a2 = 1.0 - alpha;

        Self::normalize([b0, b1, b2, a0, a1, a2])
    }

    /// Design a high-pass filter
    ///
    /// # Arguments
    /// * `fs` - Sample rate in Hz
    /// * `fc` - Cutoff frequency in Hz
    /// * `q` - Quality factor (0.707 for Butterworth)
    #[must_use]
    pub fn highpass(fs: f64, fc: f64, q: f64) -> Self {
        let (sin_omega, cos_omega) = omega(fc, fs).sin_cos();
        let alpha = sin_omega / (2.0 * q);

        let b0 = (1.0 + cos_omega) / 2.0;
        let b1 = -(1.0 + cos_omega);
        let b2 = (1.0 + cos_omega) / 2.0;
        let a0 = 1.0 + alpha;
        let a1 = -2.0 * cos_omega;
        let a2 = 1.0 - alpha;

        Self::normalize([b0, b1, b2, a0, a1, a2])
    }

    /// Design a band-pass filter (constant skirt gain)
    ///
    /// `bandwidth` is in octaves. The `sin(w0)` divisor inside the bandwidth
    /// term is floored at [`BANDPASS_SIN_EPSILON`], so a design frequency of
    /// 0 Hz gives a finite all-stop result. At exactly Nyquist the floored
    /// divisor overflows `sinh` and the coefficients are NaN.
    #[must_use]
    pub fn bandpass(fs: f64, fc: f64, bandwidth: f64) -> Self {
        let w0 = omega(fc, fs);
        let (sin_omega, cos_omega) = w0.sin_cos();
        let denom = if sin_omega.abs() > BANDPASS_SIN_EPSILON {
            sin_omega
        } else {
            BANDPASS_SIN_EPSILON
        };
        let alpha = sin_omega * (LN_2 / 2.0 * bandwidth * w0 / denom).sinh();

        let b0 = alpha;
        let b1 = 0.0;
        let b2 = -alpha;
        let a0 = 1.0 + alpha;
        let a1 = -2.0 * cos_omega;
        let a2 = 1.0 - alpha;

        Self::normalize([b0, b1, b2, a0, a1, a2])
    }

    /// Design a band-stop filter
    ///
    /// `bandwidth` is in octaves. Unlike [`Self::bandpass`] the `sin(w0)`
    /// divisor is not floored; a design frequency of exactly 0 Hz yields NaN.
    #[must_use]
    pub fn bandstop(fs: f64, fc: f64, bandwidth: f64) -> Self {
        let w0 = omega(fc, fs);
        let (sin_omega, cos_omega) = w0.sin_cos();
        let alpha = sin_omega * (LN_2 / 2.0 * bandwidth * w0 / sin_omega).sinh();

        let b0 = 1.0;
        let b1 = -2.0 * cos_omega;
        let b2 = 1.0;
        let a0 = 1.0 + alpha;
        let a1 = -2.0 * cos_omega;
        let a2 = 1.0 - alpha;

        Self::normalize([b0, b1, b2, a0, a1, a2])
    }

    /// Design a notch filter
    ///
    /// # Arguments
    /// * `fs` - Sample rate in Hz
    /// * `fc` - Center frequency in Hz
    /// * `q` - Quality factor (higher = narrower notch)
    #[must_use]
    pub fn notch(fs: f64, fc: f64, q: f64) -> Self {
        let (sin_omega, cos_omega) = omega(fc, fs).sin_cos();
        let alpha = sin_omega / (2.0 * q);

        let b0 = 1.0;
        let b1 = -2.0 * cos_omega;
        let b2 = 1.0;
        let a0 = 1.0 + alpha;
        let a1 = -2.0 * cos_omega;
        let a2 = 1.0 - alpha;

        Self::normalize([b0, b1, b2, a0, a1, a2])
    }

    /// Design an all-pass filter
    #[must_use]
    pub fn allpass(fs: f64, fc: f64, q: f64) -> Self {
        let (sin_omega, cos_omega) = omega(fc, fs).sin_cos();
        let alpha = sin_omega / (2.0 * q);

        let b0 = 1.0 - alpha;
        let b1 = -2.0 * cos_omega;
        let b2 = 1.0 + alpha;
        let a0 = 1.0 + alpha;
        let a1 = -2.0 * cos_omega;
        let a2 = 1.0 - alpha;

        Self::normalize([b0, b1, b2, a0, a1, a2])
    }

    /// Design a peaking EQ filter
    ///
    /// # Arguments
    /// * `fs` - Sample rate in Hz
    /// * `fc` - Center frequency in Hz
    /// * `q` - Quality factor
    /// * `gain_db` - Gain at center frequency in dB, capped at [`MAX_BOOST_DB`]
    #[must_use]
    pub fn peaking(fs: f64, fc: f64, q: f64, gain_db: f64) -> Self {
        let (sin_omega, cos_omega) = omega(fc, fs).sin_cos();
        let a = shelf_amplitude(gain_db);
        let alpha = sin_omega / (2.0 * q);

        let b0 = 1.0 + alpha * a;
        let b1 = -2.0 * cos_omega;
        let b2 = 1.0 - alpha * a;
        let a0 = 1.0 + alpha / a;
        let a1 = -2.0 * cos_omega;
        let a2 = 1.0 - alpha / a;

        Self::normalize([b0, b1, b2, a0, a1, a2])
    }

    /// Design a low-shelf filter
    ///
    /// # Arguments
    /// * `fs` - Sample rate in Hz
    /// * `fc` - Corner frequency in Hz
    /// * `q` - Quality factor of the shelf transition
    /// * `gain_db` - Shelf gain in dB, capped at [`MAX_BOOST_DB`]
    #[must_use]
    pub fn low_shelf(fs: f64, fc: f64, q: f64, gain_db: f64) -> Self {
        let (sin_omega, cos_omega) = omega(fc, fs).sin_cos();
        let a = shelf_amplitude(gain_db);
        let alpha = sin_omega / (2.0 * q);
        let beta = 2.0 * a.sqrt() * alpha;

        let b0 = a * ((a + 1.0) - (a - 1.0) * cos_omega + beta);
        let b1 = 2.0 * a * ((a - 1.0) - (a + 1.0) * cos_omega);
        let b2 = a * ((a + 1.0) - (a - 1.0) * cos_omega - beta);
        let a0 = (a + 1.0) + (a - 1.0) * cos_omega + beta;
        let a1 = -2.0 * ((a - 1.0) + (a + 1.0) * cos_omega);
        let a2 = (a + 1.0) + (a - 1.0) * cos_omega - beta;

        Self::normalize([b0, b1, b2, a0, a1, a2])
    }

    /// Design a high-shelf filter
    ///
    /// # Arguments
    /// * `fs` - Sample rate in Hz
    /// * `fc` - Corner frequency in Hz
    /// * `q` - Quality factor of the shelf transition
    /// * `gain_db` - Shelf gain in dB, capped at [`MAX_BOOST_DB`]
    #[must_use]
    pub fn high_shelf(fs: f64, fc: f64, q: f64, gain_db: f64) -> Self {
        let (sin_omega, cos_omega) = omega(fc, fs).sin_cos();
        let a = shelf_amplitude(gain_db);
        let alpha = sin_omega / (2.0 * q);
        let beta = 2.0 * a.sqrt() * alpha;

        let b0 = a * ((a + 1.0) + (a - 1.0) * cos_omega + beta);
        let b1 = -2.0 * a * ((a - 1.0) + (a + 1.0) * cos_omega);
        let b2 = a * ((a + 1.0) + (a - 1.0) * cos_omega - beta);
        let a0 = (a + 1.0) - (a - 1.0) * cos_omega + beta;
        let a1 = 2.0 * ((a - 1.0) - (a + 1.0) * cos_omega);
        let a2 = (a + 1.0) - (a - 1.0) * cos_omega - beta;

        Self::normalize([b0, b1, b2, a0, a1, a2])
    }

    /// Complex response `H(e^{jw})` at angular frequency `w` (rad/sample).
    #[must_use]
    pub fn response_at(&self, w: f64) -> Complex64 {
        let z1 = Complex64::from_polar(1.0, -w);
        let z2 = z1 * z1;
        let num = z1 * self.b1 + z2 * self.b2 + self.b0;
        let den = z1 * self.a1 + z2 * self.a2 + 1.0;
        num / den
    }

    /// Calculate magnitude response in dB at a given frequency
    #[must_use]
    pub fn magnitude_db_at(&self, freq: f64, fs: f64) -> f64 {
        crate::level::magnitude_to_db(self.response_at(2.0 * PI * freq / fs).norm())
    }
}

impl Default for BiquadCoeffs {
    fn default() -> Self {
        Self::UNITY
    }
}

/// Design the coefficients for `spec`, passing only the parameters its kind
/// consumes.
#[must_use]
pub fn design(spec: &FilterSpec, sample_rate: f64) -> BiquadCoeffs {
    let fs = sample_rate;
    let fc = spec.center_freq_hz;
    let q = spec.q_factor;
    let bw = spec.bandwidth_octaves;
    let gain = spec.gain_db;

    match spec.kind {
        FilterKind::Bypass => BiquadCoeffs::bypass(fs),
        FilterKind::Lowpass => BiquadCoeffs::lowpass(fs, fc, q),
        FilterKind::Highpass => BiquadCoeffs::highpass(fs, fc, q),
        FilterKind::Bandpass => BiquadCoeffs::bandpass(fs, fc, bw),
        FilterKind::Bandstop => BiquadCoeffs::bandstop(fs, fc, bw),
        FilterKind::Notch => BiquadCoeffs::notch(fs, fc, q),
        FilterKind::Allpass => BiquadCoeffs::allpass(fs, fc, q),
        FilterKind::Peaking => BiquadCoeffs::peaking(fs, fc, q, gain),
        FilterKind::LowShelf => BiquadCoeffs::low_shelf(fs, fc, q, gain),
        FilterKind::HighShelf => BiquadCoeffs::high_shelf(fs, fc, q, gain),
    }
}

/// Bilinear-transform angular frequency of the clamped design frequency.
#[inline]
fn omega(fc: f64, fs: f64) -> f64 {
    2.0 * PI * clamp_frequency(fc, fs) / fs
}

/// `A = sqrt(10^(gain/20))` after capping the gain.
#[inline]
fn shelf_amplitude(gain_db: f64) -> f64 {
    10.0_f64.powf(clamp_gain(gain_db, MAX_BOOST_DB) / 20.0).sqrt()
}
