//! On-disk formats: JSON Lines ingestion and the binary index.

mod common;

use common::*;
use geocoder_core::loader::binary::MAGIC;
use geocoder_core::{GeoObjectId, Geocoder, GeocoderConfig, GeocoderError, INDEX_FORMAT_VERSION};
use std::fs;
use std::io::Write;

const QUERIES: &[&str] = &[
    "Noord-Holland Amsterdam",
    "84 Main Street",
    "85 Main Street",
    "Springfield",
    "Oak Avenue Springfield",
    "Atlantis",
];

#[test]
fn save_then_load_answers_identically() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("geocoder.bin");

    let original = fixture_geocoder();
    original.save_to_binary_index(&path).unwrap();
    let loaded = Geocoder::load_from_binary_index(&path).unwrap();

    assert_eq!(loaded.hierarchy().len(), original.hierarchy().len());
    assert_eq!(loaded.index().stats(), original.index().stats());
    for query in QUERIES {
        assert_eq!(
            loaded.process_query(query),
            original.process_query(query),
            "{query:?} differs after reload"
        );
    }
}

#[test]
fn foreign_and_stale_files_are_refused() {
    let dir = tempfile::tempdir().unwrap();

    let foreign = dir.path().join("foreign.bin");
    fs::write(&foreign, b"PK\x03\x04 definitely not an index").unwrap();
    let err = Geocoder::load_from_binary_index(&foreign).unwrap_err();
    assert!(matches!(err, GeocoderError::BadMagic));
    assert!(err.is_open_failure());

    let stale = dir.path().join("stale.bin");
    let mut bytes = MAGIC.to_vec();
    bytes.extend_from_slice(&(INDEX_FORMAT_VERSION + 7).to_le_bytes());
    fs::write(&stale, bytes).unwrap();
    let err = Geocoder::load_from_binary_index(&stale).unwrap_err();
    assert!(matches!(
        err,
        GeocoderError::VersionMismatch { found, .. } if found == INDEX_FORMAT_VERSION + 7
    ));

    let missing = dir.path().join("missing.bin");
    let err = Geocoder::load_from_binary_index(&missing).unwrap_err();
    assert!(matches!(err, GeocoderError::NotFound(_)));
}

#[test]
fn corrupt_section_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("geocoder.bin");
    fixture_geocoder().save_to_binary_index(&path).unwrap();

    let mut bytes = fs::read(&path).unwrap();
    let cut = bytes.len() / 2;
    bytes.truncate(cut);
    fs::write(&path, bytes).unwrap();

    let err = Geocoder::load_from_binary_index(&path).unwrap_err();
    assert!(matches!(
        err,
        GeocoderError::InvalidData(_) | GeocoderError::Bincode(_)
    ));
}

#[test]
fn jsonl_file_with_bad_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hierarchy.jsonl");
    let mut file = fs::File::create(&path).unwrap();
    for line in HIERARCHY_JSONL {
        writeln!(file, "{line}").unwrap();
    }
    writeln!(file, "{{ broken").unwrap();
    writeln!(file).unwrap();
    writeln!(file, r#"{{"id": 3, "type": "city", "name": "Amsterdam again"}}"#).unwrap();
    drop(file);

    let (geocoder, stats) = Geocoder::load_from_jsonl(&path, 3).unwrap();
    assert_eq!(stats.lines, HIERARCHY_JSONL.len() + 2);
    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.duplicates, 1);
    assert_eq!(stats.loaded, HIERARCHY_JSONL.len());

    let reference = fixture_geocoder();
    for query in QUERIES {
        assert_eq!(geocoder.process_query(query), reference.process_query(query));
    }
}

#[test]
fn jsonl_line_with_invalid_utf8_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hierarchy.jsonl");
    let mut file = fs::File::create(&path).unwrap();
    for line in HIERARCHY_JSONL {
        writeln!(file, "{line}").unwrap();
    }
    file.write_all(b"{\"id\": 999, \"type\": \"city\", \"name\": \"Bad\xff\xfe\"}\n")
        .unwrap();
    drop(file);

    let (geocoder, stats) = Geocoder::load_from_jsonl(&path, 2).unwrap();
    assert_eq!(stats.lines, HIERARCHY_JSONL.len() + 1);
    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.loaded, HIERARCHY_JSONL.len());
    assert!(geocoder.hierarchy().find_entry(GeoObjectId(999)).is_none());
    assert_eq!(ids(&geocoder.process_query("84 Main Street")), vec![HOUSE_84]);
}

#[test]
fn jsonl_load_keeps_the_given_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hierarchy.jsonl");
    fs::write(&path, HIERARCHY_JSONL.join("\n")).unwrap();

    let config = GeocoderConfig::builder()
        .beam_size(7)
        .max_results(1)
        .load_threads(3)
        .build();
    let (geocoder, _) = Geocoder::load_from_jsonl_with_config(&path, config.clone()).unwrap();
    assert_eq!(geocoder.config(), &config);
    assert_eq!(ids(&geocoder.process_query("Springfield")), vec![SPRINGFIELD_IL]);
}

#[cfg(feature = "compact")]
#[test]
fn gzip_jsonl_is_decoded() {
    use flate2::write::GzEncoder;
    use flate2::Compression;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hierarchy.jsonl.gz");
    let mut encoder = GzEncoder::new(fs::File::create(&path).unwrap(), Compression::default());
    for line in HIERARCHY_JSONL {
        writeln!(encoder, "{line}").unwrap();
    }
    encoder.finish().unwrap();

    let (geocoder, stats) = Geocoder::load_from_jsonl(&path, 2).unwrap();
    assert_eq!(stats.loaded, HIERARCHY_JSONL.len());
    assert_eq!(ids(&geocoder.process_query("84 Main Street")), vec![HOUSE_84]);
}
