// crates/geocoder-core/src/model/raw.rs
use serde::Deserialize;
use std::collections::BTreeMap;

/// Raw hierarchy record as it comes from one JSON Lines line.
///
/// This type mirrors the upstream dump and is not part of the public model;
/// [`super::convert::entry_from_raw`] turns it into an [`super::Entry`].
#[derive(Debug, Default, Deserialize)]
pub struct EntryRaw {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// locale names: { "en": "The Hague", "nl": "Den Haag" }
    #[serde(default)]
    pub names: BTreeMap<String, String>,
    /// address parts keyed by level name: { "country": "Nederland", "locality": "Amsterdam" }
    #[serde(default)]
    pub address: BTreeMap<String, String>,
    #[serde(default)]
    pub parent: Option<u64>,
    /// [min_lon, min_lat, max_lon, max_lat]
    #[serde(default)]
    pub bbox: Option<[f64; 4]>,
    /// [lon, lat]
    #[serde(default)]
    pub point: Option<[f64; 2]>,
}
