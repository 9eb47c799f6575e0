// crates/geocoder-core/src/model/convert.rs
use super::raw::EntryRaw;
use super::{BoundingBox, Entry, Geometry, Type};
use crate::common::GeoObjectId;
use crate::error::{GeocoderError, Result};
use crate::text::tokenize;

/// **Standard Converter:** Raw -> Entry.
///
/// `id_override` wins over the record's own `id` (the `<id> <json>` line form).
/// The level is taken from `type` when present, otherwise it is the deepest
/// level found in the address.
pub fn entry_from_raw(raw: EntryRaw, id_override: Option<u64>) -> Result<Entry> {
    let id = id_override
        .or(raw.id)
        .ok_or_else(|| GeocoderError::InvalidData("missing id".into()))?;

    let mut address: [Vec<String>; Type::COUNT] = Default::default();
    let mut display: [Option<&str>; Type::COUNT] = [None; Type::COUNT];
    for (level, value) in &raw.address {
        // Unknown parts (postcode, ...) are not part of the hierarchy.
        let Some(kind) = Type::from_name(level) else {
            continue;
        };
        let tokens = tokenize(value);
        if !tokens.is_empty() {
            address[kind.index()] = tokens;
            display[kind.index()] = Some(value.as_str());
        }
    }

    let kind = match raw.kind.as_deref() {
        Some(name) => Type::from_name(name)
            .ok_or_else(|| GeocoderError::InvalidData(format!("unknown type {name:?}")))?,
        None => Type::ALL
            .iter()
            .rev()
            .copied()
            .find(|t| !address[t.index()].is_empty())
            .ok_or_else(|| GeocoderError::InvalidData("no type and empty address".into()))?,
    };

    let name = raw
        .name
        .as_deref()
        .or(display[kind.index()])
        .map(str::trim)
        .unwrap_or_default()
        .to_owned();

    if address[kind.index()].is_empty() {
        address[kind.index()] = tokenize(&name);
    }
    if address[kind.index()].is_empty() {
        return Err(GeocoderError::InvalidData(format!(
            "empty {kind} name for id {id}"
        )));
    }

    let mut alt_names: Vec<String> = raw
        .names
        .into_values()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty() && *v != name)
        .collect();
    alt_names.sort();
    alt_names.dedup();

    let geometry = match (raw.bbox, raw.point) {
        (Some([min_lon, min_lat, max_lon, max_lat]), _) => {
            let bbox = BoundingBox::new(min_lon, min_lat, max_lon, max_lat);
            if !bbox.is_valid() {
                return Err(GeocoderError::InvalidData(format!(
                    "inverted bbox for id {id}"
                )));
            }
            Some(Geometry::Rect(bbox))
        }
        (None, Some([lon, lat])) => Some(Geometry::Point { lon, lat }),
        (None, None) => None,
    };

    Ok(Entry {
        osm_id: GeoObjectId(id),
        kind,
        name,
        alt_names,
        address,
        parent: raw.parent.map(GeoObjectId),
        geometry,
    })
}
