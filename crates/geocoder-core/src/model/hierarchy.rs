// crates/geocoder-core/src/model/hierarchy.rs
use super::{Entry, Type};
use crate::common::{DocId, GeoObjectId, HierarchyStats};
use crate::error::{GeocoderError, Result};
use crate::traits::EntryStore;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// The master entry store.
///
/// Entries live in one contiguous vector sorted by `osm_id`; a [`DocId`] is
/// an offset into it. Immutable once built, so it can be shared freely
/// between query threads.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Hierarchy {
    entries: Vec<Entry>,
}

impl Hierarchy {
    /// Builds the store from entries in any order.
    ///
    /// Entries are stably sorted by id; when an id repeats, the first
    /// occurrence wins. Returns the store and the number of dropped duplicates.
    ///
    /// Fails with [`GeocoderError::InvalidData`] when the entries would not
    /// all be addressable by a [`DocId`].
    pub fn from_entries(mut entries: Vec<Entry>) -> Result<(Self, usize)> {
        if DocId::try_from(entries.len()).is_err() {
            return Err(GeocoderError::InvalidData(format!(
                "{} entries exceed the {} addressable by a doc id",
                entries.len(),
                DocId::MAX
            )));
        }
        entries.sort_by_key(|e| e.osm_id);
        let before = entries.len();
        entries.dedup_by(|later, earlier| {
            let dup = later.osm_id == earlier.osm_id;
            if dup {
                warn!(osm_id = %later.osm_id, "duplicate id, keeping the first entry");
            }
            dup
        });
        let duplicates = before - entries.len();
        Ok((Self { entries }, duplicates))
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry behind a doc id. Panics on an id that did not come from this store.
    pub fn entry_at(&self, doc_id: DocId) -> &Entry {
        &self.entries[doc_id as usize]
    }

    pub fn get(&self, doc_id: DocId) -> Option<&Entry> {
        self.entries.get(doc_id as usize)
    }

    /// Ordered lookup by geo-object id.
    pub fn find(&self, osm_id: GeoObjectId) -> Option<DocId> {
        self.entries
            .binary_search_by_key(&osm_id, |e| e.osm_id)
            .ok()
            .map(|i| i as DocId)
    }

    pub fn find_entry(&self, osm_id: GeoObjectId) -> Option<&Entry> {
        self.find(osm_id).map(|d| self.entry_at(d))
    }

    /// Whether `outer` geographically contains `inner`.
    ///
    /// Explicit parent links are followed first. Once the chain ends, the
    /// address of the last node decides, and geometry can still veto when
    /// both sides carry one.
    pub fn contains(&self, outer: DocId, inner: DocId) -> bool {
        let Some(outer_entry) = self.get(outer) else {
            return false;
        };
        let mut node = inner;
        // Every hop climbs at least one level, so the chain is short.
        for _ in 0..Type::COUNT {
            let Some(node_entry) = self.get(node) else {
                return false;
            };
            if outer_entry.kind >= node_entry.kind {
                return false;
            }
            match node_entry.parent.and_then(|p| self.find(p)) {
                Some(parent) if parent == outer => return true,
                Some(parent) => node = parent,
                None => return self.address_contains(outer_entry, node_entry),
            }
        }
        false
    }

    fn address_contains(&self, outer: &Entry, inner: &Entry) -> bool {
        if !outer.is_parent_to(inner) {
            return false;
        }
        match (&outer.geometry, &inner.geometry) {
            (Some(o), Some(i)) => o.contains(i).unwrap_or(true),
            _ => true,
        }
    }

    pub fn stats(&self) -> HierarchyStats {
        let mut stats = HierarchyStats {
            entries: self.entries.len(),
            ..Default::default()
        };
        for e in &self.entries {
            if let Some(slot) = stats.by_type.get_mut(e.kind.index()) {
                *slot += 1;
            }
        }
        stats
    }
}

impl EntryStore for Hierarchy {
    fn len(&self) -> usize {
        Hierarchy::len(self)
    }

    fn entry_at(&self, doc_id: DocId) -> &Entry {
        Hierarchy::entry_at(self, doc_id)
    }

    fn find(&self, osm_id: GeoObjectId) -> Option<DocId> {
        Hierarchy::find(self, osm_id)
    }

    fn contains(&self, outer: DocId, inner: DocId) -> bool {
        Hierarchy::contains(self, outer, inner)
    }
}
