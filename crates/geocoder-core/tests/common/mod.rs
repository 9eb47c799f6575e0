//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use geocoder_core::{GeoObjectId, GeocodeResult, Geocoder, GeocoderConfig, Hierarchy};

// ============================================================================
// FIXTURE HIERARCHY
// ============================================================================

/// A small gazetteer covering the Netherlands and a slice of the US,
/// including two towns both called Springfield and two called Amsterdam.
pub const HIERARCHY_JSONL: &[&str] = &[
    // Netherlands
    r#"{"id": 1, "type": "country", "name": "Nederland", "names": {"en": "Netherlands"}, "bbox": [3.3, 50.7, 7.3, 53.6]}"#,
    r#"{"id": 2, "address": {"country": "Nederland", "region": "Noord-Holland"}, "bbox": [4.4, 52.2, 5.4, 53.2]}"#,
    r#"{"id": 3, "address": {"country": "Nederland", "region": "Noord-Holland", "locality": "Amsterdam"}, "bbox": [4.72, 52.27, 5.07, 52.43]}"#,
    // Amsterdam, New York
    r#"{"id": 4, "address": {"country": "United States", "region": "New York", "locality": "Amsterdam"}, "point": [-74.19, 42.94]}"#,
    // United States
    r#"{"id": 100, "type": "country", "name": "United States"}"#,
    r#"{"id": 101, "address": {"country": "United States", "region": "Illinois"}}"#,
    r#"{"id": 102, "address": {"country": "United States", "region": "Illinois", "locality": "Springfield"}}"#,
    r#"{"id": 103, "address": {"country": "United States", "region": "Missouri"}}"#,
    r#"{"id": 104, "address": {"country": "United States", "region": "Missouri", "locality": "Springfield"}}"#,
    r#"{"id": 105, "address": {"country": "United States", "region": "New York"}}"#,
    r#"{"id": 110, "type": "street", "name": "Main Street", "parent": 102}"#,
    r#"0x6f {"address": {"country": "United States", "region": "Illinois", "locality": "Springfield", "street": "Oak Avenue"}}"#,
    r#"{"id": 120, "type": "building", "address": {"country": "United States", "region": "Illinois", "locality": "Springfield", "street": "Main Street", "building": "84"}}"#,
    r#"{"id": 121, "type": "building", "parent": 110, "address": {"building": "86"}}"#,
];

pub const NEDERLAND: u64 = 1;
pub const NOORD_HOLLAND: u64 = 2;
pub const AMSTERDAM_NL: u64 = 3;
pub const AMSTERDAM_NY: u64 = 4;
pub const SPRINGFIELD_IL: u64 = 102;
pub const MISSOURI: u64 = 103;
pub const SPRINGFIELD_MO: u64 = 104;
pub const MAIN_STREET: u64 = 110;
pub const OAK_AVENUE: u64 = 111;
pub const HOUSE_84: u64 = 120;
pub const HOUSE_86: u64 = 121;

pub fn fixture_hierarchy() -> Hierarchy {
    let (hierarchy, stats) =
        Hierarchy::from_jsonl_lines(HIERARCHY_JSONL, 2).expect("fixture hierarchy loads");
    assert_eq!(stats.skipped, 0, "fixture lines are all valid");
    hierarchy
}

pub fn fixture_geocoder() -> Geocoder {
    let _ = geocoder_core::init_logging(tracing::Level::WARN);
    Geocoder::new(fixture_hierarchy(), GeocoderConfig::default()).expect("fixture geocoder builds")
}

// ============================================================================
// RESULT HELPERS
// ============================================================================

pub fn ids(results: &[GeocodeResult]) -> Vec<u64> {
    results.iter().map(|r| r.osm_id.get()).collect()
}

pub fn certainty_of(results: &[GeocodeResult], id: u64) -> Option<f64> {
    results
        .iter()
        .find(|r| r.osm_id == GeoObjectId(id))
        .map(|r| r.certainty)
}

pub fn assert_sorted(results: &[GeocodeResult]) {
    for pair in results.windows(2) {
        assert!(
            pair[0].certainty >= pair[1].certainty,
            "results out of order: {} before {}",
            pair[0],
            pair[1]
        );
    }
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected certainty {expected}, got {actual}"
    );
}
