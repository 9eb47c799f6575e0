// crates/geocoder-core/src/index.rs

//! Inverted token index over the hierarchy.
//!
//! Every non-building entry is posted under each normalized token of its own
//! name and of its locale names. Buildings are reached through the street
//! (or, lacking a street, the locality) that holds them.

use crate::common::{DocId, IndexStats};
use crate::error::{GeocoderError, Result};
use crate::model::Type;
use crate::traits::EntryStore;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, instrument};

/// One `(doc, type)` pair in a token's posting list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub kind: Type,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Index {
    /// Posting lists sorted by `doc_id`, no duplicates.
    postings: BTreeMap<String, Vec<Posting>>,
    /// Street / locality doc -> buildings it holds, ascending.
    related_buildings: BTreeMap<DocId, Vec<DocId>>,
}

impl Index {
    /// Builds the index once from a loaded store.
    ///
    /// Token postings are collected in a single pass; the building ownership
    /// pass is spread over `threads` workers, each producing its own pairs,
    /// which are merged after the join.
    #[instrument(skip_all, fields(entries = store.len(), threads = threads))]
    pub fn build<S: EntryStore>(store: &S, threads: usize) -> Result<Self> {
        let mut postings: BTreeMap<String, BTreeSet<Posting>> = BTreeMap::new();
        let mut buildings = Vec::new();

        let len = DocId::try_from(store.len()).map_err(|_| {
            GeocoderError::InvalidData(format!("{} entries do not fit a doc id", store.len()))
        })?;
        for doc_id in 0..len {
            let entry = store.entry_at(doc_id);
            if entry.kind == Type::Building {
                buildings.push(doc_id);
                continue;
            }
            let posting = Posting {
                doc_id,
                kind: entry.kind,
            };
            let locale_tokens = entry
                .alt_names
                .iter()
                .chain(std::iter::once(&entry.name))
                .flat_map(|n| crate::text::tokenize(n));
            for token in entry.name_tokens().iter().cloned().chain(locale_tokens) {
                postings.entry(token).or_default().insert(posting);
            }
        }

        let mut index = Index {
            postings: postings
                .into_iter()
                .map(|(token, docs)| (token, docs.into_iter().collect()))
                .collect(),
            related_buildings: BTreeMap::new(),
        };

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads.max(1))
            .build()?;
        let pairs: Vec<(DocId, DocId)> = pool.install(|| {
            buildings
                .par_iter()
                .flat_map_iter(|&building| index.building_owners(store, building))
                .collect()
        });
        for (owner, building) in pairs {
            index
                .related_buildings
                .entry(owner)
                .or_default()
                .push(building);
        }
        for list in index.related_buildings.values_mut() {
            list.sort_unstable();
            list.dedup();
        }

        let stats = index.stats();
        info!(
            tokens = stats.tokens,
            postings = stats.postings,
            related_buildings = stats.related_buildings,
            "index built"
        );
        Ok(index)
    }

    /// Streets or localities that hold `building`, paired with it.
    fn building_owners<S: EntryStore>(&self, store: &S, building: DocId) -> Vec<(DocId, DocId)> {
        let entry = store.entry_at(building);

        if let Some(parent) = entry.parent.and_then(|p| store.find(p)) {
            let kind = store.entry_at(parent).kind;
            if kind == Type::Street || kind == Type::Locality {
                return vec![(parent, building)];
            }
        }

        let (owner_kind, owner_name) = if !entry.address_at(Type::Street).is_empty() {
            (Type::Street, entry.address_at(Type::Street))
        } else if !entry.address_at(Type::Locality).is_empty() {
            (Type::Locality, entry.address_at(Type::Locality))
        } else {
            return Vec::new();
        };

        self.candidates(owner_name, owner_kind)
            .into_iter()
            .filter(|&owner| store.contains(owner, building))
            .map(|owner| (owner, building))
            .collect()
    }

    /// Docs of type `kind` whose name contains every token of `tokens`.
    ///
    /// Intersection, not union: a multi-token subquery only matches entries
    /// that every one of its tokens resolves to. Ascending by doc id.
    pub fn candidates<S: AsRef<str>>(&self, tokens: &[S], kind: Type) -> Vec<DocId> {
        let mut lists = Vec::with_capacity(tokens.len());
        for token in tokens {
            match self.postings.get(token.as_ref()) {
                Some(list) => lists.push(list.as_slice()),
                None => return Vec::new(),
            }
        }
        lists.sort_by_key(|l| l.len());
        let Some((shortest, rest)) = lists.split_first() else {
            return Vec::new();
        };

        shortest
            .iter()
            .filter(|p| p.kind == kind)
            .filter(|p| {
                rest.iter()
                    .all(|l| l.binary_search_by_key(&p.doc_id, |q| q.doc_id).is_ok())
            })
            .map(|p| p.doc_id)
            .collect()
    }

    /// Raw posting list for one token.
    pub fn postings(&self, token: &str) -> &[Posting] {
        self.postings.get(token).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn for_each_related_building<F: FnMut(DocId)>(&self, doc_id: DocId, mut f: F) {
        if let Some(list) = self.related_buildings.get(&doc_id) {
            for &b in list {
                f(b);
            }
        }
    }

    /// Largest doc id referenced anywhere, used to validate a loaded index
    /// against its hierarchy.
    pub fn max_doc_id(&self) -> Option<DocId> {
        let from_postings = self
            .postings
            .values()
            .filter_map(|l| l.last().map(|p| p.doc_id));
        let from_buildings = self
            .related_buildings
            .iter()
            .flat_map(|(owner, list)| std::iter::once(*owner).chain(list.last().copied()));
        from_postings.chain(from_buildings).max()
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            tokens: self.postings.len(),
            postings: self.postings.values().map(Vec::len).sum(),
            building_owners: self.related_buildings.len(),
            related_buildings: self.related_buildings.values().map(Vec::len).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::GeoObjectId;
    use crate::model::{Entry, Hierarchy};
    use crate::text::tokenize;

    fn entry(id: u64, kind: Type, parts: &[(Type, &str)]) -> Entry {
        let mut address: [Vec<String>; Type::COUNT] = Default::default();
        for (t, v) in parts {
            address[t.index()] = tokenize(v);
        }
        let name = parts
            .iter()
            .find(|(t, _)| *t == kind)
            .map(|(_, v)| (*v).to_owned())
            .unwrap_or_default();
        Entry {
            osm_id: GeoObjectId(id),
            kind,
            name,
            alt_names: Vec::new(),
            address,
            parent: None,
            geometry: None,
        }
    }

    fn sample() -> Hierarchy {
        let city = [(Type::Locality, "Springfield")];
        let main = [(Type::Locality, "Springfield"), (Type::Street, "Main Street")];
        let oak = [(Type::Locality, "Springfield"), (Type::Street, "Oak Street")];
        let mut house = main.to_vec();
        house.push((Type::Building, "84"));
        let mut den = entry(2, Type::Locality, &[(Type::Locality, "Den Haag")]);
        den.alt_names.push("The Hague".into());
        Hierarchy::from_entries(vec![
            entry(1, Type::Locality, &city),
            den,
            entry(10, Type::Street, &main),
            entry(11, Type::Street, &oak),
            entry(20, Type::Building, &house),
        ])
        .unwrap()
        .0
    }

    #[test]
    fn multi_token_lookup_intersects() {
        let h = sample();
        let index = Index::build(&h, 2).unwrap();
        let doc = |id| h.find(GeoObjectId(id)).unwrap();

        assert_eq!(index.candidates(&["street"], Type::Street), vec![doc(10), doc(11)]);
        assert_eq!(index.candidates(&["main", "street"], Type::Street), vec![doc(10)]);
        assert_eq!(index.candidates(&["street", "main"], Type::Street), vec![doc(10)]);
        assert!(index.candidates(&["main", "nowhere"], Type::Street).is_empty());
        assert!(index.candidates(&["main"], Type::Locality).is_empty());
        assert!(index.candidates::<&str>(&[], Type::Street).is_empty());
    }

    #[test]
    fn locale_names_are_indexed() {
        let h = sample();
        let index = Index::build(&h, 1).unwrap();
        let den = h.find(GeoObjectId(2)).unwrap();
        assert_eq!(index.candidates(&["hague"], Type::Locality), vec![den]);
        assert_eq!(index.candidates(&["den", "haag"], Type::Locality), vec![den]);
    }

    #[test]
    fn buildings_hang_off_their_street() {
        let h = sample();
        let index = Index::build(&h, 4).unwrap();
        let doc = |id| h.find(GeoObjectId(id)).unwrap();

        assert!(index.postings("84").is_empty());
        let mut related = Vec::new();
        index.for_each_related_building(doc(10), |b| related.push(b));
        assert_eq!(related, vec![doc(20)]);
        let mut none = Vec::new();
        index.for_each_related_building(doc(11), |b| none.push(b));
        assert!(none.is_empty());

        let stats = index.stats();
        assert_eq!(stats.building_owners, 1);
        assert_eq!(stats.related_buildings, 1);
        assert_eq!(index.max_doc_id(), Some(doc(20)));
    }

    /// Claims more entries than a doc id can address.
    struct Oversized;

    impl EntryStore for Oversized {
        fn len(&self) -> usize {
            DocId::MAX as usize + 1
        }

        fn entry_at(&self, _: DocId) -> &Entry {
            unreachable!("an oversized store is rejected before any lookup")
        }

        fn find(&self, _: GeoObjectId) -> Option<DocId> {
            None
        }

        fn contains(&self, _: DocId, _: DocId) -> bool {
            false
        }
    }

    #[test]
    fn oversized_store_is_rejected() {
        let err = Index::build(&Oversized, 1).unwrap_err();
        assert!(matches!(err, crate::GeocoderError::InvalidData(_)));
    }
}
