//! Property tests for the beam and for query result ordering.

mod common;

use common::*;
use geocoder_core::Beam;
use proptest::prelude::*;

// =============================================================================
// BEAM
// =============================================================================

/// Oracle: stable sort by value descending, keep the first `capacity`.
fn oracle_top_k(values: &[u32], capacity: usize) -> Vec<(usize, u32)> {
    let mut all: Vec<(usize, u32)> = values.iter().copied().enumerate().collect();
    all.sort_by(|a, b| b.1.cmp(&a.1));
    all.truncate(capacity);
    all
}

proptest! {
    #[test]
    fn beam_never_exceeds_capacity(
        values in prop::collection::vec(0u32..50, 0..200),
        capacity in 0usize..20,
    ) {
        let mut beam = Beam::new(capacity);
        for (i, v) in values.iter().enumerate() {
            beam.add(i, *v);
            prop_assert!(beam.len() <= capacity);
        }
        prop_assert_eq!(beam.len(), values.len().min(capacity));
    }

    #[test]
    fn beam_keeps_the_stable_top_k(
        values in prop::collection::vec(0u32..50, 0..200),
        capacity in 1usize..20,
    ) {
        let mut beam = Beam::new(capacity);
        for (i, v) in values.iter().enumerate() {
            beam.add(i, *v);
        }
        let got: Vec<(usize, u32)> = beam.entries().iter().map(|e| (e.key, e.value)).collect();
        prop_assert_eq!(got, oracle_top_k(&values, capacity));
    }
}

// =============================================================================
// QUERIES
// =============================================================================

const VOCABULARY: &[&str] = &[
    "Nederland", "Netherlands", "Noord-Holland", "Amsterdam", "United", "States",
    "Illinois", "Missouri", "New", "York", "Springfield", "Main", "Street", "St",
    "Oak", "Avenue", "84", "85", "86", "Atlantis",
];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn results_are_sorted_and_unique(words in prop::collection::vec(prop::sample::select(VOCABULARY), 0..6)) {
        let geocoder = fixture_geocoder();
        let query = words.join(" ");
        let results = geocoder.process_query(&query);

        assert_sorted(&results);
        let mut seen = std::collections::HashSet::new();
        for r in &results {
            prop_assert!(seen.insert(r.osm_id), "duplicate {} for {:?}", r.osm_id, query);
            prop_assert!(r.certainty > 0.0 && r.certainty <= 1.0);
        }
        prop_assert_eq!(results, geocoder.process_query(&query));
    }
}
