// crates/geocoder-core/src/search/result.rs
use crate::common::GeoObjectId;
use crate::model::Type;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One ranked answer to a query.
///
/// `certainty` is in `(0, 1]` and only meaningful relative to the other
/// results of the same query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub osm_id: GeoObjectId,
    pub kind: Type,
    pub certainty: f64,
}

impl fmt::Display for GeocodeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {:.3}", self.osm_id, self.kind, self.certainty)
    }
}
