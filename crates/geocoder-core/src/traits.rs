// crates/geocoder-core/src/traits.rs
use crate::common::{DocId, GeoObjectId};
use crate::model::Entry;

/// Read-only view of a loaded hierarchy.
///
/// The index is built against this trait rather than a concrete store, so
/// anything that can hand out entries by [`DocId`] and answer containment
/// questions can be indexed. Implementors must be `Sync`: the index build
/// fans out over worker threads that all read the same store.
pub trait EntryStore: Sync {
    /// Number of entries; valid doc ids are `0..len()`.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entry_at(&self, doc_id: DocId) -> &Entry;

    fn find(&self, osm_id: GeoObjectId) -> Option<DocId>;

    /// Whether `outer` geographically contains `inner`.
    fn contains(&self, outer: DocId, inner: DocId) -> bool;
}
