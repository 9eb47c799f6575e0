//! Basic usage example for geocoder-rs
//!
//! This example demonstrates how to:
//! - Load a hierarchy from JSON Lines
//! - Geocode free-text queries
//! - Save and reopen the binary index

use geocoder_rs::{init_logging, Geocoder, GeocoderConfig, Hierarchy, Result};

const HIERARCHY: &[&str] = &[
    r#"{"id": 1, "type": "country", "name": "Nederland", "names": {"en": "Netherlands"}}"#,
    r#"{"id": 2, "address": {"country": "Nederland", "region": "Noord-Holland"}}"#,
    r#"{"id": 3, "address": {"country": "Nederland", "region": "Noord-Holland", "locality": "Amsterdam"}}"#,
    r#"{"id": 4, "type": "street", "name": "Damrak", "parent": 3}"#,
    r#"{"id": 5, "type": "building", "parent": 4, "address": {"building": "1"}}"#,
    r#"{"id": 6, "address": {"country": "United States", "region": "New York", "locality": "Amsterdam"}}"#,
];

fn main() -> Result<()> {
    init_logging(tracing::Level::INFO)?;
    println!("=== geocoder-rs Basic Usage Example ===\n");

    // Load the hierarchy
    let (hierarchy, stats) = Hierarchy::from_jsonl_lines(HIERARCHY, 2)?;
    println!("✓ Loaded {} entries ({} skipped)\n", stats.loaded, stats.skipped);
    let geocoder = Geocoder::new(hierarchy, GeocoderConfig::builder().max_results(5).build())?;

    // Example 1: Ambiguous and disambiguated queries
    for query in ["Amsterdam", "Amsterdam Netherlands", "Damrak 1 Amsterdam"] {
        println!("--- {query} ---");
        for r in geocoder.process_query(query) {
            let name = geocoder
                .hierarchy()
                .find_entry(r.osm_id)
                .map(|e| e.name.as_str())
                .unwrap_or("?");
            println!("{:.3}  {:<10} {}", r.certainty, r.kind, name);
        }
        println!();
    }

    // Example 2: Binary index round trip
    let path = std::env::temp_dir().join("geocoder-basic-usage.bin");
    geocoder.save_to_binary_index(&path)?;
    let reopened = Geocoder::load_from_binary_index(&path)?;
    assert_eq!(
        reopened.process_query("Damrak 1"),
        geocoder.process_query("Damrak 1")
    );
    println!("✓ Binary index at {} answers identically", path.display());
    std::fs::remove_file(&path)?;

    Ok(())
}
