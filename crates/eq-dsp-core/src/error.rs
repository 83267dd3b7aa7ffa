//! Configuration errors.
//!
//! Numeric edge cases (frequency above Nyquist, gain above the boost
//! ceiling, vanishing `sin(w0)`) saturate silently and never reach this
//! type. Only malformed stage descriptions do.

use core::fmt;

/// Error raised when a filter cascade cannot be built from its description.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The stage names a filter type that is not one of the supported kinds.
    UnknownFilterKind(String),
    /// A parameter the filter kind requires was not supplied.
    MissingParameter {
        /// Filter kind name as written in the stage
        kind: String,
        /// Name of the missing field
        parameter: &'static str,
    },
    /// The stage list could not be parsed.
    InvalidJson(String),
    /// A parametric EQ band index past the last slot.
    BandIndexOutOfRange {
        /// Requested slot
        index: usize,
        /// Number of slots available
        capacity: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownFilterKind(kind) => write!(f, "unknown filter type: {kind}"),
            Self::MissingParameter { kind, parameter } => {
                write!(f, "{kind} filter requires parameter `{parameter}`")
            }
            Self::InvalidJson(msg) => write!(f, "invalid filter description: {msg}"),
            Self::BandIndexOutOfRange { index, capacity } => {
                write!(f, "band index {index} out of range (capacity {capacity})")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidJson(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = ConfigError::UnknownFilterKind("comb".into());
        assert_eq!(err.to_string(), "unknown filter type: comb");

        let err = ConfigError::MissingParameter {
            kind: "lowpass".into(),
            parameter: "q",
        };
        assert_eq!(err.to_string(), "lowpass filter requires parameter `q`");
    }
}
