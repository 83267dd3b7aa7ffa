//! Parametric EQ band model
//!
//! An equalizer is a fixed bank of [`EQ_BAND_COUNT`] band slots. Each band
//! lowers to one or two biquad stages:
//!
//! - `constant_q` becomes a peaking stage
//! - `gain` becomes a peaking stage at 1 kHz with neutral Q
//! - `linkwitz` becomes two 0 dB peaking stages at `f0` and `fp`
//! - every other band maps to the stage of the same kind
//!
//! Bands serialize with a `type` tag:
//!
//! ```
//! use eq_dsp_core::EqBand;
//!
//! let band: EqBand = serde_json::from_str(
//!     r#"{"type": "peaking", "filter_freq": 500, "q_factor": 0.8, "boost_db": -4}"#,
//! ).unwrap();
//! assert_eq!(band.to_specs().len(), 1);
//! ```

use heapless::Vec as BandVec;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::{ResponseConfig, EQ_BAND_COUNT, GAIN_BAND_FREQ_HZ, NEUTRAL_Q};
use crate::error::ConfigError;
use crate::filter::FilterSpec;
use crate::response::{
    cascade_response, display_frequency_grid, evaluate_at, FrequencyResponse,
};

/// One band of a parametric equalizer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EqBand {
    /// Band disabled
    #[default]
    Bypass,
    /// Low-pass
    Lowpass {
        /// Cutoff in Hz
        filter_freq: f64,
        /// Quality factor
        q_factor: f64,
    },
    /// High-pass
    Highpass {
        /// Cutoff in Hz
        filter_freq: f64,
        /// Quality factor
        q_factor: f64,
    },
    /// Band-pass
    Bandpass {
        /// Center in Hz
        filter_freq: f64,
        /// Bandwidth in octaves
        bw: f64,
    },
    /// Band-stop
    Bandstop {
        /// Center in Hz
        filter_freq: f64,
        /// Bandwidth in octaves
        bw: f64,
    },
    /// Notch
    Notch {
        /// Center in Hz
        filter_freq: f64,
        /// Quality factor
        q_factor: f64,
    },
    /// All-pass
    Allpass {
        /// Center in Hz
        filter_freq: f64,
        /// Quality factor
        q_factor: f64,
    },
    /// Peaking bell
    Peaking {
        /// Center in Hz
        filter_freq: f64,
        /// Quality factor
        q_factor: f64,
        /// Gain at center in dB
        boost_db: f64,
    },
    /// Constant-Q bell, rendered as a peaking stage
    ConstantQ {
        /// Center in Hz
        filter_freq: f64,
        /// Quality factor
        q_factor: f64,
        /// Gain at center in dB
        boost_db: f64,
    },
    /// Low shelf
    Lowshelf {
        /// Corner in Hz
        filter_freq: f64,
        /// Quality factor
        q_factor: f64,
        /// Shelf gain in dB
        boost_db: f64,
    },
    /// High shelf
    Highshelf {
        /// Corner in Hz
        filter_freq: f64,
        /// Quality factor
        q_factor: f64,
        /// Shelf gain in dB
        boost_db: f64,
    },
    /// Broadband gain
    Gain {
        /// Gain in dB
        gain_db: f64,
    },
    /// Linkwitz transform, approximated by a pair of peaking stages
    Linkwitz {
        /// Driver resonance in Hz
        f0: f64,
        /// Driver Q
        q0: f64,
        /// Target resonance in Hz
        fp: f64,
        /// Target Q
        qp: f64,
    },
}

impl EqBand {
    /// Stages this band contributes to a cascade, in order.
    #[must_use]
    pub fn to_specs(&self) -> BandVec<FilterSpec, 2> {
        let mut specs = BandVec::new();
        match *self {
            Self::Linkwitz { f0, q0, fp, qp } => {
                // TODO: derive the stage gains from the f0/fp ratio instead of 0 dB.
                specs.extend([
                    FilterSpec::peaking(f0, q0, 0.0),
                    FilterSpec::peaking(fp, qp, 0.0),
                ]);
            }
            single => specs.extend([single.to_single_spec()]),
        }
        specs
    }

    fn to_single_spec(self) -> FilterSpec {
        match self {
            Self::Bypass | Self::Linkwitz { .. } => FilterSpec::bypass(),
            Self::Lowpass { filter_freq, q_factor } => FilterSpec::lowpass(filter_freq, q_factor),
            Self::Highpass { filter_freq, q_factor } => {
                FilterSpec::highpass(filter_freq, q_factor)
            }
            Self::Bandpass { filter_freq, bw } => FilterSpec::bandpass(filter_freq, bw),
            Self::Bandstop { filter_freq, bw } => FilterSpec::bandstop(filter_freq, bw),
            Self::Notch { filter_freq, q_factor } => FilterSpec::notch(filter_freq, q_factor),
            Self::Allpass { filter_freq, q_factor } => FilterSpec::allpass(filter_freq, q_factor),
            Self::Peaking {
                filter_freq,
                q_factor,
                boost_db,
            }
            | Self::ConstantQ {
                filter_freq,
                q_factor,
                boost_db,
            } => FilterSpec::peaking(filter_freq, q_factor, boost_db),
            Self::Lowshelf {
                filter_freq,
                q_factor,
                boost_db,
            } => FilterSpec::low_shelf(filter_freq, q_factor, boost_db),
            Self::Highshelf {
                filter_freq,
                q_factor,
                boost_db,
            } => FilterSpec::high_shelf(filter_freq, q_factor, boost_db),
            Self::Gain { gain_db } => FilterSpec::peaking(GAIN_BAND_FREQ_HZ, NEUTRAL_Q, gain_db),
        }
    }

    /// True if the band contributes nothing but identity stages.
    #[must_use]
    pub const fn is_bypass(&self) -> bool {
        matches!(self, Self::Bypass)
    }
}

/// Fixed bank of equalizer bands, evaluated as one cascade in slot order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EqFile")]
pub struct ParametricEq {
    filters: BandVec<EqBand, EQ_BAND_COUNT>,
}

/// Serialized form; may list fewer bands than there are slots.
#[derive(Deserialize)]
struct EqFile {
    filters: BandVec<EqBand, EQ_BAND_COUNT>,
}

impl TryFrom<EqFile> for ParametricEq {
    type Error = ConfigError;

    fn try_from(file: EqFile) -> Result<Self, Self::Error> {
        Self::from_bands(&file.filters)
    }
}

impl Default for ParametricEq {
    fn default() -> Self {
        Self::new()
    }
}

impl ParametricEq {
    /// All slots bypassed.
    #[must_use]
    pub fn new() -> Self {
        let mut filters = BandVec::new();
        filters.extend([EqBand::Bypass; EQ_BAND_COUNT]);
        Self { filters }
    }

    /// Fill slots from `bands`; remaining slots are bypassed.
    ///
    /// # Errors
    ///
    /// [`ConfigError::BandIndexOutOfRange`] if more than [`EQ_BAND_COUNT`]
    /// bands are given.
    pub fn from_bands(bands: &[EqBand]) -> Result<Self, ConfigError> {
        let mut eq = Self::new();
        for (index, band) in bands.iter().enumerate() {
            eq.set_band(index, *band)?;
        }
        Ok(eq)
    }

    /// Parse the `{"filters": [...]}` form.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidJson`] for malformed input, unknown band types,
    /// or more than [`EQ_BAND_COUNT`] bands.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Replace the band in slot `index`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::BandIndexOutOfRange`] if `index >= EQ_BAND_COUNT`.
    pub fn set_band(&mut self, index: usize, band: EqBand) -> Result<(), ConfigError> {
        let slot = self
            .filters
            .get_mut(index)
            .ok_or(ConfigError::BandIndexOutOfRange {
                index,
                capacity: EQ_BAND_COUNT,
            })?;
        *slot = band;
        Ok(())
    }

    /// Bands in slot order.
    #[must_use]
    pub fn bands(&self) -> &[EqBand] {
        &self.filters
    }

    /// Number of slots not bypassed.
    #[must_use]
    pub fn active_bands(&self) -> usize {
        self.filters.iter().filter(|b| !b.is_bypass()).count()
    }

    /// Lower every band to its stages, in slot order.
    #[must_use]
    pub fn to_cascade(&self) -> Vec<FilterSpec> {
        self.filters.iter().flat_map(EqBand::to_specs).collect()
    }

    /// Response on the linear DC..Nyquist grid.
    #[must_use]
    pub fn response(&self, config: &ResponseConfig) -> FrequencyResponse {
        debug!("parametric EQ with {} active bands", self.active_bands());
        cascade_response(&self.to_cascade(), config.sample_rate, config.grid_size)
    }

    /// Response on the logarithmic 20 Hz .. 20 kHz display grid.
    #[must_use]
    pub fn display_response(&self, sample_rate: f64, points: usize) -> FrequencyResponse {
        evaluate_at(&self.to_cascade(), sample_rate, &display_frequency_grid(points))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gain_band_lowers_to_peaking() {
        let specs = EqBand::Gain { gain_db: -6.0 }.to_specs();
        assert_eq!(specs.as_slice(), &[FilterSpec::peaking(1000.0, 0.707, -6.0)]);
    }

    #[test]
    fn linkwitz_lowers_to_two_stages() {
        let band = EqBand::Linkwitz {
            f0: 40.0,
            q0: 0.9,
            fp: 25.0,
            qp: 0.5,
        };
        assert_eq!(
            band.to_specs().as_slice(),
            &[
                FilterSpec::peaking(40.0, 0.9, 0.0),
                FilterSpec::peaking(25.0, 0.5, 0.0)
            ]
        );
    }

    #[test]
    fn new_eq_is_all_bypass() {
        let eq = ParametricEq::new();
        assert_eq!(eq.bands().len(), EQ_BAND_COUNT);
        assert_eq!(eq.active_bands(), 0);
    }

    #[test]
    fn set_band_past_capacity() {
        let mut eq = ParametricEq::new();
        assert_eq!(
            eq.set_band(EQ_BAND_COUNT, EqBand::Gain { gain_db: 1.0 }),
            Err(ConfigError::BandIndexOutOfRange {
                index: EQ_BAND_COUNT,
                capacity: EQ_BAND_COUNT
            })
        );
    }
}
