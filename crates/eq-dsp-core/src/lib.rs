//! EQ DSP Core Library
//!
//! Biquad coefficient design and cascaded frequency-response evaluation
//! for parametric and graphic equalizers. Everything here is a pure
//! function of its inputs: coefficients and theoretical response curves,
//! no running filter state.
//!
//! # Modules
//!
//! - [`guard`] - Frequency and gain saturation
//! - [`filter`] - Filter kinds, stage specs, RBJ biquad design
//! - [`response`] - Cascade evaluation, frequency grids, `FrequencyResponse`
//! - [`level`] - Magnitude / decibel conversion
//! - [`stage`] - Loosely-typed stage records and JSON input
//! - [`eq`] - Parametric EQ band model
//! - [`config`] - Defaults and response settings
//! - [`error`] - Configuration errors
//!
//! # Example
//!
//! ```
//! use eq_dsp_core::{cascade_response, magnitude_to_db, FilterSpec};
//!
//! let stages = [
//!     FilterSpec::highpass(60.0, 0.707),
//!     FilterSpec::peaking(3000.0, 1.2, 4.0),
//! ];
//! let response = cascade_response(&stages, 48_000.0, 512);
//! let db = magnitude_to_db(response.magnitudes());
//! assert_eq!(db.len(), 512);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

pub mod config;
pub mod eq;
pub mod error;
pub mod filter;
pub mod guard;
pub mod level;
pub mod response;
pub mod stage;

// Re-export commonly used types
pub use config::ResponseConfig;
pub use eq::{EqBand, ParametricEq};
pub use error::ConfigError;
pub use filter::{design, BiquadCoeffs, FilterKind, FilterSpec};
pub use guard::{clamp_frequency, clamp_gain};
pub use level::{db_to_magnitude, magnitude_to_db, Decibels};
pub use response::{
    cascade_response, display_frequency_grid, evaluate_at, evaluate_cascade, linear_omega_grid,
    log_frequency_grid, FrequencyResponse,
};
pub use stage::{stages_from_json, StageConfig};

pub use num_complex::Complex64;
