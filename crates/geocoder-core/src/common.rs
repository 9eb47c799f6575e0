// crates/geocoder-core/src/common.rs
use crate::model::Type;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Offset of an entry in the hierarchy's id-sorted entry array.
///
/// The index refers to entries exclusively through `DocId`s, so it never
/// duplicates hierarchy data.
pub type DocId = u32;

/// Stable geo-object identifier shared by the hierarchy, the index and the
/// query results.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct GeoObjectId(pub u64);

impl GeoObjectId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for GeoObjectId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

impl fmt::Display for GeoObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Outcome of a JSON Lines ingestion run.
///
/// Malformed lines do not abort the load; they are logged and counted here
/// so the caller can decide whether the resulting hierarchy is good enough.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadStats {
    /// Non-blank lines seen.
    pub lines: usize,
    /// Entries that made it into the hierarchy.
    pub loaded: usize,
    /// Lines rejected as malformed.
    pub skipped: usize,
    /// Entries dropped because an earlier line carried the same id.
    pub duplicates: usize,
}

/// Entry counts per hierarchy level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyStats {
    pub entries: usize,
    pub by_type: [usize; Type::COUNT],
}

impl HierarchyStats {
    pub fn count(&self, kind: Type) -> usize {
        self.by_type.get(kind.index()).copied().unwrap_or(0)
    }
}

/// Size of the token index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Distinct normalized tokens.
    pub tokens: usize,
    /// Total `(token, doc)` pairs.
    pub postings: usize,
    /// Streets and localities that own at least one building.
    pub building_owners: usize,
    /// Buildings reachable through their street or locality.
    pub related_buildings: usize,
}
