//! Loosely-typed stage records.
//!
//! Stage lists arriving from outside (JSON, UI state) name their kind as a
//! string and carry only the fields that kind needs:
//!
//! ```json
//! [
//!     {"type": "highpass", "freq": 60, "q": 0.707},
//!     {"type": "peaking", "freq": 3000, "q": 1.2, "gain": 4.0},
//!     {"type": "bandstop", "freq": 50, "bandwidth": 0.3}
//! ]
//! ```
//!
//! [`StageConfig::resolve`] turns a record into a typed [`FilterSpec`].

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::filter::{FilterKind, FilterSpec};

/// One stage as described by an external caller.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StageConfig {
    /// Kind name, matched case-insensitively
    #[serde(rename = "type")]
    pub kind: String,
    /// Center or cutoff frequency in Hz
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freq: Option<f64>,
    /// Quality factor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<f64>,
    /// Bandwidth in octaves
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bandwidth: Option<f64>,
    /// Gain in dB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gain: Option<f64>,
}

impl StageConfig {
    /// A record with only its kind set.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// Set the frequency.
    #[must_use]
    pub fn freq(mut self, freq: f64) -> Self {
        self.freq = Some(freq);
        self
    }

    /// Set the Q factor.
    #[must_use]
    pub fn q(mut self, q: f64) -> Self {
        self.q = Some(q);
        self
    }

    /// Set the bandwidth in octaves.
    #[must_use]
    pub fn bandwidth(mut self, bandwidth: f64) -> Self {
        self.bandwidth = Some(bandwidth);
        self
    }

    /// Set the gain in dB.
    #[must_use]
    pub fn gain(mut self, gain_db: f64) -> Self {
        self.gain = Some(gain_db);
        self
    }

    /// Resolve to a typed spec, checking that every field the kind consumes
    /// is present. Extra fields are ignored.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownFilterKind`] for an unrecognized kind name,
    /// [`ConfigError::MissingParameter`] for an absent required field.
    pub fn resolve(&self) -> Result<FilterSpec, ConfigError> {
        let kind: FilterKind = self.kind.parse()?;
        let require = |value: Option<f64>, parameter: &'static str| {
            value.ok_or_else(|| ConfigError::MissingParameter {
                kind: kind.name().to_owned(),
                parameter,
            })
        };

        let spec = match kind {
            FilterKind::Bypass => FilterSpec::bypass(),
            FilterKind::Lowpass => {
                FilterSpec::lowpass(require(self.freq, "freq")?, require(self.q, "q")?)
            }
            FilterKind::Highpass => {
                FilterSpec::highpass(require(self.freq, "freq")?, require(self.q, "q")?)
            }
            FilterKind::Notch => {
                FilterSpec::notch(require(self.freq, "freq")?, require(self.q, "q")?)
            }
            FilterKind::Allpass => {
                FilterSpec::allpass(require(self.freq, "freq")?, require(self.q, "q")?)
            }
            FilterKind::Bandpass => FilterSpec::bandpass(
                require(self.freq, "freq")?,
                require(self.bandwidth, "bandwidth")?,
            ),
            FilterKind::Bandstop => FilterSpec::bandstop(
                require(self.freq, "freq")?,
                require(self.bandwidth, "bandwidth")?,
            ),
            FilterKind::Peaking => FilterSpec::peaking(
                require(self.freq, "freq")?,
                require(self.q, "q")?,
                require(self.gain, "gain")?,
            ),
            FilterKind::LowShelf => FilterSpec::low_shelf(
                require(self.freq, "freq")?,
                require(self.q, "q")?,
                require(self.gain, "gain")?,
            ),
            FilterKind::HighShelf => FilterSpec::high_shelf(
                require(self.freq, "freq")?,
                require(self.q, "q")?,
                require(self.gain, "gain")?,
            ),
        };
        Ok(spec)
    }
}

impl From<&FilterSpec> for StageConfig {
    fn from(spec: &FilterSpec) -> Self {
        let kind = spec.kind;
        Self {
            kind: kind.name().to_owned(),
            freq: kind.uses_frequency().then_some(spec.center_freq_hz),
            q: kind.uses_q().then_some(spec.q_factor),
            bandwidth: kind.uses_bandwidth().then_some(spec.bandwidth_octaves),
            gain: kind.uses_gain().then_some(spec.gain_db),
        }
    }
}

/// Parse a JSON array of stage records.
///
/// Kinds are not checked here; that happens on resolve.
///
/// # Errors
///
/// [`ConfigError::InvalidJson`] if the text is not an array of stage objects.
pub fn stages_from_json(json: &str) -> Result<Vec<StageConfig>, ConfigError> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_peaking() {
        let spec = StageConfig::new("Peaking")
            .freq(80.0)
            .q(1.0)
            .gain(3.0)
            .resolve()
            .expect("complete stage");
        assert_eq!(spec, FilterSpec::peaking(80.0, 1.0, 3.0));
    }

    #[test]
    fn resolve_reports_missing_field() {
        let err = StageConfig::new("bandpass").freq(1000.0).q(2.0).resolve();
        assert_eq!(
            err,
            Err(ConfigError::MissingParameter {
                kind: "bandpass".into(),
                parameter: "bandwidth",
            })
        );
    }

    #[test]
    fn bypass_needs_nothing() {
        assert_eq!(StageConfig::new("bypass").resolve(), Ok(FilterSpec::bypass()));
    }

    #[test]
    fn spec_round_trips_through_record() {
        let spec = FilterSpec::bandstop(50.0, 0.3);
        let record = StageConfig::from(&spec);
        assert_eq!(record.q, None);
        assert_eq!(record.resolve(), Ok(spec));
    }

    #[test]
    fn json_parse_error() {
        assert!(matches!(
            stages_from_json(r#"[{"freq": 100}]"#),
            Err(ConfigError::InvalidJson(_))
        ));
    }
}
