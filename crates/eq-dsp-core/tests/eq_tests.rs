//! Parametric EQ Tests
//!
//! Band lowering, slot handling, and JSON input for the 8-band equalizer.
//! Run with: cargo test --test eq_tests

use eq_dsp_core::config::{EQ_BAND_COUNT, GAIN_BAND_FREQ_HZ};
use eq_dsp_core::{
    cascade_response, ConfigError, EqBand, FilterKind, FilterSpec, ParametricEq, ResponseConfig,
};

fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() < tol
}

const EQ_JSON: &str = r#"{
    "filters": [
        {"type": "highpass", "filter_freq": 60, "q_factor": 0.707},
        {"type": "constant_q", "filter_freq": 80, "q_factor": 1.0, "boost_db": 3.0},
        {"type": "peaking", "filter_freq": 500, "q_factor": 0.8, "boost_db": -4.0},
        {"type": "bandstop", "filter_freq": 50, "bw": 0.2},
        {"type": "gain", "gain_db": 2.0},
        {"type": "linkwitz", "f0": 40, "q0": 0.9, "fp": 25, "qp": 0.5},
        {"type": "highshelf", "filter_freq": 8000, "q_factor": 0.707, "boost_db": 3.0},
        {"type": "bypass"}
    ]
}"#;

// =============================================================================
// Band Lowering Tests
// =============================================================================

#[test]
fn test_constant_q_is_peaking() {
    let band = EqBand::ConstantQ {
        filter_freq: 80.0,
        q_factor: 1.0,
        boost_db: 3.0,
    };
    assert_eq!(band.to_specs().as_slice(), &[FilterSpec::peaking(80.0, 1.0, 3.0)]);
}

#[test]
fn test_one_to_one_bands() {
    let cases = [
        (
            EqBand::Lowpass {
                filter_freq: 8000.0,
                q_factor: 0.707,
            },
            FilterKind::Lowpass,
        ),
        (
            EqBand::Bandpass {
                filter_freq: 1000.0,
                bw: 1.0,
            },
            FilterKind::Bandpass,
        ),
        (
            EqBand::Notch {
                filter_freq: 60.0,
                q_factor: 10.0,
            },
            FilterKind::Notch,
        ),
        (
            EqBand::Allpass {
                filter_freq: 500.0,
                q_factor: 0.707,
            },
            FilterKind::Allpass,
        ),
        (
            EqBand::Lowshelf {
                filter_freq: 100.0,
                q_factor: 0.707,
                boost_db: 4.0,
            },
            FilterKind::LowShelf,
        ),
        (EqBand::Bypass, FilterKind::Bypass),
    ];
    for (band, kind) in cases {
        let specs = band.to_specs();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].kind, kind);
    }
}

#[test]
fn test_gain_band_peaks_at_reference_frequency() {
    let eq = ParametricEq::from_bands(&[EqBand::Gain { gain_db: 5.0 }]).expect("one band");
    let response = eq.display_response(48_000.0, 2048);
    let (freq, db) = response.peak().expect("non-empty");
    assert!((freq / GAIN_BAND_FREQ_HZ).log2().abs() < 0.01, "peak at {freq} Hz");
    assert!(approx_eq(db, 5.0, 0.01));
}

// =============================================================================
// Slot Handling Tests
// =============================================================================

#[test]
fn test_from_bands_pads_with_bypass() {
    let eq = ParametricEq::from_bands(&[EqBand::Gain { gain_db: 1.0 }]).expect("fits");
    assert_eq!(eq.bands().len(), EQ_BAND_COUNT);
    assert_eq!(eq.active_bands(), 1);
    assert!(eq.bands()[1..].iter().all(EqBand::is_bypass));
}

#[test]
fn test_too_many_bands() {
    let bands = [EqBand::Bypass; EQ_BAND_COUNT + 1];
    assert_eq!(
        ParametricEq::from_bands(&bands),
        Err(ConfigError::BandIndexOutOfRange {
            index: EQ_BAND_COUNT,
            capacity: EQ_BAND_COUNT,
        })
    );
}

#[test]
fn test_set_band_replaces_slot() {
    let mut eq = ParametricEq::new();
    let band = EqBand::Highpass {
        filter_freq: 30.0,
        q_factor: 0.707,
    };
    eq.set_band(3, band).expect("in range");
    assert_eq!(eq.bands()[3], band);
    assert_eq!(eq.to_cascade()[3], FilterSpec::highpass(30.0, 0.707));
}

#[test]
fn test_bypassed_eq_is_unity() {
    let response = ParametricEq::new().response(&ResponseConfig::default());
    assert_eq!(response.len(), 512);
    assert!(response.magnitudes_db().iter().all(|db| db.abs() < 1e-12));
}

// =============================================================================
// JSON Input Tests
// =============================================================================

#[test]
fn test_parse_full_eq() {
    let eq = ParametricEq::from_json(EQ_JSON).expect("valid eq");
    assert_eq!(eq.active_bands(), 7);

    let cascade = eq.to_cascade();
    // linkwitz contributes two stages
    assert_eq!(cascade.len(), EQ_BAND_COUNT + 1);
    assert_eq!(cascade[4], FilterSpec::peaking(1000.0, 0.707, 2.0));
    assert_eq!(cascade[5], FilterSpec::peaking(40.0, 0.9, 0.0));
    assert_eq!(cascade[6], FilterSpec::peaking(25.0, 0.5, 0.0));
}

#[test]
fn test_eq_response_matches_cascade() {
    let eq = ParametricEq::from_json(EQ_JSON).expect("valid eq");
    let config = ResponseConfig::new(44_100.0, 256);
    assert_eq!(
        eq.response(&config),
        cascade_response(&eq.to_cascade(), 44_100.0, 256)
    );
}

#[test]
fn test_short_json_is_padded() {
    let eq = ParametricEq::from_json(r#"{"filters": [{"type": "gain", "gain_db": -3}]}"#)
        .expect("valid eq");
    assert_eq!(eq.bands().len(), EQ_BAND_COUNT);
}

#[test]
fn test_unknown_band_type_rejected() {
    let result = ParametricEq::from_json(r#"{"filters": [{"type": "comb", "delay": 3}]}"#);
    assert!(matches!(result, Err(ConfigError::InvalidJson(_))));
}

#[test]
fn test_json_round_trip() {
    let eq = ParametricEq::from_json(EQ_JSON).expect("valid eq");
    let text = serde_json::to_string(&eq).expect("serializable");
    assert_eq!(ParametricEq::from_json(&text), Ok(eq));
}
