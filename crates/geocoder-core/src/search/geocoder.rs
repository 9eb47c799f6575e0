// crates/geocoder-core/src/search/geocoder.rs

//! Query orchestration.
//!
//! A query is matched level by level, broad to narrow. At every level each
//! contiguous run of still-unused tokens is tried as a name of that level;
//! a match is only accepted when an entry of the previously accepted level
//! contains it. Accepted matches are scored into the context's beam and the
//! search descends with their tokens marked, so the deepest consistent
//! chain wins.

use super::context::{Context, Layer};
use super::result::GeocodeResult;
use crate::common::DocId;
use crate::config::GeocoderConfig;
use crate::error::Result;
use crate::index::Index;
use crate::model::{Hierarchy, Type};
use crate::text::{house_numbers_match, is_street_synonym, looks_like_house_number};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, instrument};

/// How much an ambiguous layer costs, in tokens. An answer that consumes
/// one more token always outranks any amount of ambiguity.
const AMBIGUITY_PENALTY: f64 = 0.5;

/// Score of an entry accepted in a layer of `layer_size` entries while
/// `used_tokens` of `num_tokens` query tokens are consumed.
pub fn certainty(used_tokens: usize, num_tokens: usize, layer_size: usize) -> f64 {
    if num_tokens == 0 || layer_size == 0 {
        return 0.0;
    }
    let ambiguity = AMBIGUITY_PENALTY * (1.0 - 1.0 / layer_size as f64);
    (used_tokens as f64 - ambiguity) / num_tokens as f64
}

/// Read-only geocoding engine: a hierarchy, its token index and the query
/// settings.
///
/// `process_query` takes `&self`, so one instance can serve any number of
/// threads at once.
#[derive(Debug, Clone)]
pub struct Geocoder {
    hierarchy: Hierarchy,
    index: Index,
    config: GeocoderConfig,
}

impl Geocoder {
    /// Indexes `hierarchy` and wraps both into a geocoder.
    pub fn new(hierarchy: Hierarchy, config: GeocoderConfig) -> Result<Self> {
        let index = Index::build(&hierarchy, config.load_threads)?;
        Ok(Self {
            hierarchy,
            index,
            config,
        })
    }

    pub(crate) fn from_parts(hierarchy: Hierarchy, index: Index, config: GeocoderConfig) -> Self {
        Self {
            hierarchy,
            index,
            config,
        }
    }

    /// Loads a JSON Lines hierarchy dump (optionally gzip-compressed) using
    /// `threads` parse workers, then builds the index.
    ///
    /// Every other setting is the default; use
    /// [`Geocoder::load_from_jsonl_with_config`] to choose them.
    #[cfg(feature = "json")]
    pub fn load_from_jsonl<P: AsRef<Path>>(
        path: P,
        threads: usize,
    ) -> Result<(Self, crate::common::LoadStats)> {
        let config = GeocoderConfig::builder().load_threads(threads).build();
        Self::load_from_jsonl_with_config(path, config)
    }

    /// Like [`Geocoder::load_from_jsonl`], with `config.load_threads`
    /// workers and `config` kept for queries.
    #[cfg(feature = "json")]
    pub fn load_from_jsonl_with_config<P: AsRef<Path>>(
        path: P,
        config: GeocoderConfig,
    ) -> Result<(Self, crate::common::LoadStats)> {
        let (hierarchy, stats) = Hierarchy::load_from_jsonl(path.as_ref(), config.load_threads)?;
        let geocoder = Self::new(hierarchy, config)?;
        log_summary(&geocoder, path.as_ref());
        Ok((geocoder, stats))
    }

    /// Opens a binary index written by [`Geocoder::save_to_binary_index`].
    pub fn load_from_binary_index<P: AsRef<Path>>(path: P) -> Result<Self> {
        let (hierarchy, index) = crate::loader::binary::read_index(path.as_ref())?;
        let geocoder = Self::from_parts(hierarchy, index, GeocoderConfig::default());
        log_summary(&geocoder, path.as_ref());
        Ok(geocoder)
    }

    pub fn save_to_binary_index<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        crate::loader::binary::write_index(path.as_ref(), &self.hierarchy, &self.index)
    }

    pub fn with_config(mut self, config: GeocoderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn config(&self) -> &GeocoderConfig {
        &self.config
    }

    /// Entries containing `doc_id`, nearest first.
    ///
    /// Explicit parent links are followed as far as they go; the levels
    /// above are looked up through the index by the names in the address
    /// of the last linked entry.
    pub fn ancestors(&self, doc_id: DocId) -> Vec<DocId> {
        let mut out = Vec::new();
        let Some(mut node) = self.hierarchy.get(doc_id) else {
            return out;
        };
        for _ in 0..Type::COUNT {
            match node.parent.and_then(|p| self.hierarchy.find(p)) {
                Some(parent) if self.hierarchy.entry_at(parent).kind < node.kind => {
                    out.push(parent);
                    node = self.hierarchy.entry_at(parent);
                }
                _ => break,
            }
        }

        let mut by_address = Vec::new();
        for kind in Type::ALL.into_iter().filter(|&k| k < node.kind) {
            let name = node.address_at(kind);
            if name.is_empty() {
                continue;
            }
            for candidate in self.index.candidates(name, kind) {
                if !out.contains(&candidate) && self.hierarchy.contains(candidate, doc_id) {
                    by_address.push(candidate);
                }
            }
        }
        by_address.reverse();
        out.extend(by_address);
        out
    }

    /// Geocodes a free-text query, best match first.
    ///
    /// Never fails: empty or unmatched queries give an empty list.
    #[instrument(level = "debug", skip(self))]
    pub fn process_query(&self, query: &str) -> Vec<GeocodeResult> {
        let mut ctx = Context::new(query, self.config.beam_size);
        self.go(&mut ctx, Type::Country);
        let results = ctx.fill_results(self.config.max_results);
        debug!(
            tokens = ctx.num_tokens(),
            candidates = ctx.beam().len(),
            results = results.len(),
            "query processed"
        );
        results
    }

    fn go(&self, ctx: &mut Context, kind: Type) {
        if ctx.num_tokens() == 0 || ctx.all_tokens_used() || kind == Type::Count {
            return;
        }

        for i in 0..ctx.num_tokens() {
            let mut subquery: Vec<String> = Vec::new();
            let mut subquery_ids: Vec<usize> = Vec::new();
            for j in i..ctx.num_tokens() {
                if ctx.is_token_used(j) {
                    break;
                }
                subquery.push(ctx.token(j).to_owned());
                subquery_ids.push(j);

                let mut layer = Layer::new(kind);
                if kind == Type::Building {
                    self.fill_buildings_layer(ctx, &subquery, &subquery_ids, &mut layer);
                } else {
                    self.fill_regular_layer(ctx, kind, &subquery, &mut layer);
                }
                if layer.entries.is_empty() {
                    continue;
                }

                let mut marked = ctx.mark_scoped(&subquery_ids, kind);
                if kind == Type::Street {
                    let synonym = (0..marked.num_tokens())
                        .find(|&id| !marked.is_token_used(id) && is_street_synonym(marked.token(id)));
                    if let Some(id) = synonym {
                        marked.also_mark(id, Type::Street);
                    }
                }

                let score = certainty(marked.num_used_tokens(), marked.num_tokens(), layer.entries.len());
                let token_ids = marked.used_token_ids();
                let mut all_types: Vec<Type> = marked.layers().iter().map(|l| l.kind).collect();
                all_types.push(kind);
                for &doc_id in &layer.entries {
                    let osm_id = self.hierarchy.entry_at(doc_id).osm_id;
                    marked.add_result(osm_id, score, kind, token_ids.clone(), all_types.clone());
                }

                marked.layers_mut().push(layer);
                self.go(&mut marked, kind.next());
                marked.layers_mut().pop();
            }
        }

        self.go(ctx, kind.next());
    }

    /// Buildings held by the nearest street or locality on the path whose
    /// house number spells `subquery`.
    fn fill_buildings_layer(
        &self,
        ctx: &mut Context,
        subquery: &[String],
        subquery_ids: &[usize],
        layer: &mut Layer,
    ) {
        if ctx.layers().is_empty() || !looks_like_house_number(subquery) {
            return;
        }
        let Some(owner) = ctx
            .layers()
            .iter()
            .rposition(|l| l.kind == Type::Street || l.kind == Type::Locality)
        else {
            return;
        };

        ctx.mark_house_number_positions_in_query(subquery_ids);

        let mut seen = HashSet::new();
        for &doc_id in &ctx.layers()[owner].entries {
            self.index.for_each_related_building(doc_id, |building| {
                let entry = self.hierarchy.entry_at(building);
                if house_numbers_match(entry.address_at(Type::Building), subquery)
                    && seen.insert(building)
                {
                    layer.entries.push(building);
                }
            });
        }
    }

    fn fill_regular_layer(&self, ctx: &Context, kind: Type, subquery: &[String], layer: &mut Layer) {
        if kind == Type::Street && subquery.iter().all(|t| is_street_synonym(t)) {
            return;
        }
        for doc_id in self.index.candidates(subquery, kind) {
            if !self.hierarchy.entry_at(doc_id).spells_repeats(subquery) {
                continue;
            }
            if !ctx.layers().is_empty() && !self.has_parent(ctx.layers(), doc_id) {
                continue;
            }
            if kind > Type::Locality && !self.is_relevant_locality_member(ctx, doc_id, subquery) {
                continue;
            }
            layer.entries.push(doc_id);
        }
    }

    /// A bare number below the locality level ("84" in "Block 84") is too
    /// weak on its own: it only names `member` when the path already holds
    /// the locality `member` belongs to.
    fn is_relevant_locality_member(
        &self,
        ctx: &Context,
        member: DocId,
        subquery: &[String],
    ) -> bool {
        let numeric = matches!(subquery, [single] if single.bytes().all(|b| b.is_ascii_digit()));
        !numeric || self.has_member_locality_in_matching(ctx.layers(), member)
    }

    /// Whether a Locality layer on the path contains `member`. A region
    /// counts as well when `member` lies in a city state.
    fn has_member_locality_in_matching(&self, layers: &[Layer], member: DocId) -> bool {
        layers
            .iter()
            .take_while(|l| l.kind <= Type::Locality)
            .filter(|l| {
                l.kind == Type::Locality || (l.kind == Type::Region && self.in_city_state(member))
            })
            .flat_map(|l| &l.entries)
            .any(|&matched| self.hierarchy.contains(matched, member))
    }

    /// City states (Singapore, Berlin, Moscow) are regions with no locality
    /// level below them: their members carry a region but no locality.
    fn in_city_state(&self, member: DocId) -> bool {
        let entry = self.hierarchy.entry_at(member);
        !entry.address_at(Type::Region).is_empty() && entry.address_at(Type::Locality).is_empty()
    }

    /// Whether an entry of the latest layer contains `doc_id`.
    fn has_parent(&self, layers: &[Layer], doc_id: DocId) -> bool {
        layers.last().is_some_and(|layer| {
            layer
                .entries
                .iter()
                .any(|&parent| self.hierarchy.contains(parent, doc_id))
        })
    }
}

/// Logs a one-line summary of a freshly loaded geocoder.
fn log_summary(geocoder: &Geocoder, source: &Path) {
    let index = geocoder.index.stats();
    info!(
        source = %source.display(),
        entries = geocoder.hierarchy.len(),
        tokens = index.tokens,
        "geocoder ready"
    );
}
