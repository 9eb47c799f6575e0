// crates/geocoder-core/src/model/entry.rs
use super::Type;
use crate::common::GeoObjectId;
use crate::text::tokenize;
use serde::{Deserialize, Serialize};

/// Axis-aligned lon/lat rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.min_lon <= self.max_lon && self.min_lat <= self.max_lat
    }

    /// Inclusive containment of another rectangle.
    pub fn contains_box(&self, other: &BoundingBox) -> bool {
        self.min_lon <= other.min_lon
            && self.min_lat <= other.min_lat
            && other.max_lon <= self.max_lon
            && other.max_lat <= self.max_lat
    }
}

/// Geometry of an entry. Only used for containment tests, never for ranking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Point { lon: f64, lat: f64 },
    Rect(BoundingBox),
}

impl Geometry {
    pub fn bounds(&self) -> BoundingBox {
        match *self {
            Geometry::Point { lon, lat } => BoundingBox::new(lon, lat, lon, lat),
            Geometry::Rect(bbox) => bbox,
        }
    }

    /// Whether `self` can geometrically hold `inner`.
    ///
    /// Returns `None` when the answer is unknown: a point has no extent, so
    /// it can neither confirm nor rule out containment.
    pub fn contains(&self, inner: &Geometry) -> Option<bool> {
        match self {
            Geometry::Point { .. } => None,
            Geometry::Rect(bbox) => Some(bbox.contains_box(&inner.bounds())),
        }
    }
}

/// One gazetteer record.
///
/// `address` holds the normalized tokens of every level the record knows
/// about, including its own (`address[kind]` is the record's own name; for
/// a building it is the house number).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub osm_id: GeoObjectId,
    pub kind: Type,
    /// Display name, as found in the source.
    pub name: String,
    /// Alternate and locale names, display form.
    pub alt_names: Vec<String>,
    pub address: [Vec<String>; Type::COUNT],
    /// Explicit parent recorded by the upstream pipeline.
    pub parent: Option<GeoObjectId>,
    pub geometry: Option<Geometry>,
}

impl Entry {
    /// Normalized tokens of the level `kind`, empty if unknown.
    pub fn address_at(&self, kind: Type) -> &[String] {
        self.address
            .get(kind.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Normalized tokens of the entry's own name.
    pub fn name_tokens(&self) -> &[String] {
        self.address_at(self.kind)
    }

    /// Whether one of the entry's names holds every token of `tokens` at
    /// least as often as `tokens` repeats it.
    ///
    /// Postings only record that a token occurs in a name, so "amsterdam
    /// amsterdam" intersects to Amsterdam while only "Baden-Baden" spells it.
    pub fn spells_repeats<S: AsRef<str>>(&self, tokens: &[S]) -> bool {
        let repeats = tokens
            .iter()
            .enumerate()
            .any(|(i, t)| tokens[..i].iter().any(|u| u.as_ref() == t.as_ref()));
        if !repeats {
            return true;
        }
        let covers = |name: &[String]| {
            tokens.iter().all(|t| {
                let wanted = tokens.iter().filter(|u| u.as_ref() == t.as_ref()).count();
                name.iter().filter(|n| n.as_str() == t.as_ref()).count() >= wanted
            })
        };
        covers(self.name_tokens())
            || std::iter::once(&self.name)
                .chain(&self.alt_names)
                .any(|n| covers(&tokenize(n)))
    }

    /// Address-based ancestry: every level `self` knows about must be
    /// spelled identically in `other`'s address.
    pub fn is_parent_to(&self, other: &Entry) -> bool {
        self.address
            .iter()
            .zip(other.address.iter())
            .filter(|(mine, _)| !mine.is_empty())
            .all(|(mine, theirs)| mine == theirs)
    }
}
