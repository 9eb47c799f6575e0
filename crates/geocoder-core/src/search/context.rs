// crates/geocoder-core/src/search/context.rs

//! Per-query search state.

use super::result::GeocodeResult;
use crate::beam::Beam;
use crate::common::{DocId, GeoObjectId};
use crate::model::Type;
use crate::text::tokenize;
use std::collections::{BTreeSet, HashSet};
use std::ops::{Deref, DerefMut};

/// Identity of one scored candidate in the beam.
#[derive(Debug, Clone, PartialEq)]
pub struct BeamKey {
    pub osm_id: GeoObjectId,
    pub kind: Type,
    /// Query positions consumed on the path that produced this candidate,
    /// ascending.
    pub token_ids: Vec<usize>,
    /// Every type seen along the path, ascending and without repeats.
    pub all_types: Vec<Type>,
}

impl BeamKey {
    pub fn new(
        osm_id: GeoObjectId,
        kind: Type,
        mut token_ids: Vec<usize>,
        mut all_types: Vec<Type>,
    ) -> Self {
        token_ids.sort_unstable();
        all_types.sort_unstable();
        all_types.dedup();
        Self {
            osm_id,
            kind,
            token_ids,
            all_types,
        }
    }

    fn has_type(&self, kind: Type) -> bool {
        debug_assert!(self.all_types.windows(2).all(|w| w[0] < w[1]));
        self.all_types.binary_search(&kind).is_ok()
    }
}

/// All entries of one type matched by one subquery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    pub kind: Type,
    pub entries: Vec<DocId>,
}

impl Layer {
    pub fn new(kind: Type) -> Self {
        Self {
            kind,
            entries: Vec::new(),
        }
    }
}

/// State of one query: tokens and their marks, the running beam and the
/// stack of layers accepted on the current search path.
///
/// Created per query and never shared between threads.
#[derive(Debug)]
pub struct Context {
    tokens: Vec<String>,
    /// `Type::Count` marks an unused token.
    token_types: Vec<Type>,
    num_used_tokens: usize,
    /// Positions where the query carries a house number next to a street or
    /// locality. Once set, only building-level answers are wanted.
    house_number_positions: BTreeSet<usize>,
    beam: Beam<BeamKey, f64>,
    layers: Vec<Layer>,
}

impl Context {
    pub fn new(query: &str, beam_size: usize) -> Self {
        let tokens = tokenize(query);
        let token_types = vec![Type::Count; tokens.len()];
        Self {
            tokens,
            token_types,
            num_used_tokens: 0,
            house_number_positions: BTreeSet::new(),
            beam: Beam::new(beam_size),
            layers: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.token_types.fill(Type::Count);
        self.num_used_tokens = 0;
        self.house_number_positions.clear();
        self.beam.clear();
        self.layers.clear();
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn token(&self, id: usize) -> &str {
        &self.tokens[id]
    }

    pub fn num_tokens(&self) -> usize {
        self.tokens.len()
    }

    pub fn num_used_tokens(&self) -> usize {
        self.num_used_tokens
    }

    pub fn token_type(&self, id: usize) -> Type {
        self.token_types[id]
    }

    /// Mark of every token, by position.
    pub fn token_types(&self) -> &[Type] {
        &self.token_types
    }

    /// Sets the mark of token `id`; `Type::Count` releases it.
    pub fn mark_token(&mut self, id: usize, kind: Type) {
        let was_used = self.is_token_used(id);
        self.token_types[id] = kind;
        match (was_used, self.is_token_used(id)) {
            (false, true) => self.num_used_tokens += 1,
            (true, false) => self.num_used_tokens -= 1,
            _ => {}
        }
    }

    pub fn is_token_used(&self, id: usize) -> bool {
        self.token_types[id] != Type::Count
    }

    pub fn all_tokens_used(&self) -> bool {
        self.num_used_tokens == self.tokens.len()
    }

    /// Positions of every marked token, ascending.
    pub fn used_token_ids(&self) -> Vec<usize> {
        (0..self.tokens.len())
            .filter(|&id| self.is_token_used(id))
            .collect()
    }

    pub fn add_result(
        &mut self,
        osm_id: GeoObjectId,
        certainty: f64,
        kind: Type,
        token_ids: Vec<usize>,
        all_types: Vec<Type>,
    ) {
        let key = BeamKey::new(osm_id, kind, token_ids, all_types);
        self.beam.add(key, certainty);
    }

    pub fn beam(&self) -> &Beam<BeamKey, f64> {
        &self.beam
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut Vec<Layer> {
        &mut self.layers
    }

    pub fn mark_house_number_positions_in_query(&mut self, token_ids: &[usize]) {
        self.house_number_positions.extend(token_ids.iter().copied());
    }

    pub fn house_number_positions(&self) -> &BTreeSet<usize> {
        &self.house_number_positions
    }

    /// Drains the beam into at most `max_results` results, one per geo
    /// object, best first.
    ///
    /// When the query carries a house number, candidates that ignore it are
    /// dropped. If that leaves nothing, the unfiltered candidates are kept so
    /// a missing building still yields its street.
    pub fn fill_results(&self, max_results: usize) -> Vec<GeocodeResult> {
        let mut seen = HashSet::new();
        let unique: Vec<_> = self
            .beam
            .entries()
            .iter()
            .filter(|e| seen.insert(e.key.osm_id))
            .collect();

        let mut picked: Vec<_> = if self.house_number_positions.is_empty() {
            unique
        } else {
            let filtered: Vec<_> = unique
                .iter()
                .copied()
                .filter(|e| self.is_good_for_potential_house_number_at(&e.key))
                .collect();
            if filtered.is_empty() {
                unique
            } else {
                filtered
            }
        };

        // Beam order already breaks ties by discovery; the stable sort keeps it.
        picked.sort_by(|a, b| {
            b.value
                .total_cmp(&a.value)
                .then_with(|| b.key.kind.cmp(&a.key.kind))
        });

        picked
            .into_iter()
            .take(max_results)
            .map(|e| GeocodeResult {
                osm_id: e.key.osm_id,
                kind: e.key.kind,
                certainty: e.value,
            })
            .collect()
    }

    fn is_good_for_potential_house_number_at(&self, key: &BeamKey) -> bool {
        if key.token_ids.len() == self.tokens.len() {
            return true;
        }
        if self.is_building_with_address(key) {
            return true;
        }
        self.has_locality_or_region(key) && self.contains_token_ids(key, &self.house_number_positions)
    }

    fn is_building_with_address(&self, key: &BeamKey) -> bool {
        if key.kind != Type::Building {
            return false;
        }
        let has_place = [Type::Region, Type::Subregion, Type::Locality]
            .into_iter()
            .any(|t| key.has_type(t));
        has_place && key.has_type(Type::Street) && key.has_type(Type::Building)
    }

    fn has_locality_or_region(&self, key: &BeamKey) -> bool {
        key.has_type(Type::Locality) || key.has_type(Type::Region)
    }

    fn contains_token_ids(&self, key: &BeamKey, needed: &BTreeSet<usize>) -> bool {
        needed
            .iter()
            .all(|id| key.token_ids.binary_search(id).is_ok())
    }

    /// Marks `ids` with `kind` for as long as the returned guard lives.
    ///
    /// Only positions that are still unused are taken, and only those are
    /// released again when the guard drops, so sibling branches of the
    /// search always start from the same marks.
    pub fn mark_scoped(&mut self, ids: &[usize], kind: Type) -> MarkedTokens<'_> {
        let mut marked = Vec::with_capacity(ids.len());
        for &id in ids {
            if !self.is_token_used(id) {
                self.mark_token(id, kind);
                marked.push(id);
            }
        }
        MarkedTokens { ctx: self, marked }
    }
}

/// Scoped token marks, see [`Context::mark_scoped`].
pub struct MarkedTokens<'a> {
    ctx: &'a mut Context,
    marked: Vec<usize>,
}

impl MarkedTokens<'_> {
    /// Marks one more position under the same scope.
    pub fn also_mark(&mut self, id: usize, kind: Type) {
        if !self.ctx.is_token_used(id) {
            self.ctx.mark_token(id, kind);
            self.marked.push(id);
        }
    }
}

impl Deref for MarkedTokens<'_> {
    type Target = Context;

    fn deref(&self) -> &Context {
        self.ctx
    }
}

impl DerefMut for MarkedTokens<'_> {
    fn deref_mut(&mut self) -> &mut Context {
        self.ctx
    }
}

impl Drop for MarkedTokens<'_> {
    fn drop(&mut self) {
        for &id in &self.marked {
            self.ctx.mark_token(id, Type::Count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_and_marks() {
        let mut ctx = Context::new("84, Main St.", 10);
        assert_eq!(ctx.tokens(), ["84", "main", "st"]);
        assert_eq!(ctx.num_tokens(), 3);
        assert!(!ctx.all_tokens_used());

        ctx.mark_token(1, Type::Street);
        ctx.mark_token(1, Type::Street);
        assert_eq!(ctx.num_used_tokens(), 1);
        assert_eq!(ctx.token_type(1), Type::Street);
        assert_eq!(ctx.token_types(), [Type::Count, Type::Street, Type::Count]);
        ctx.mark_token(1, Type::Count);
        assert_eq!(ctx.num_used_tokens(), 0);
    }

    #[test]
    fn scoped_marks_are_released() {
        let mut ctx = Context::new("main street springfield", 10);
        ctx.mark_token(2, Type::Locality);
        {
            let mut guard = ctx.mark_scoped(&[0, 2], Type::Street);
            guard.also_mark(1, Type::Street);
            assert!(guard.all_tokens_used());
            // Already taken by the locality, not overwritten.
            assert_eq!(guard.token_type(2), Type::Locality);
        }
        assert_eq!(ctx.used_token_ids(), vec![2]);
        assert_eq!(ctx.token_type(2), Type::Locality);
    }

    #[test]
    fn beam_key_normalizes_types() {
        let key = BeamKey::new(
            GeoObjectId(1),
            Type::Building,
            vec![2, 0, 1],
            vec![Type::Street, Type::Locality, Type::Street, Type::Building],
        );
        assert_eq!(key.token_ids, vec![0, 1, 2]);
        assert_eq!(key.all_types, vec![Type::Locality, Type::Street, Type::Building]);
    }

    #[test]
    fn results_dedup_and_order() {
        let mut ctx = Context::new("a b c", 10);
        ctx.add_result(GeoObjectId(1), 0.5, Type::Locality, vec![0], vec![Type::Locality]);
        ctx.add_result(GeoObjectId(2), 0.5, Type::Street, vec![1], vec![Type::Street]);
        ctx.add_result(GeoObjectId(1), 0.9, Type::Locality, vec![0, 1], vec![Type::Locality]);
        ctx.add_result(GeoObjectId(3), 0.7, Type::Country, vec![2], vec![Type::Country]);

        let results = ctx.fill_results(10);
        let ids: Vec<u64> = results.iter().map(|r| r.osm_id.get()).collect();
        assert_eq!(ids, vec![1, 3, 2]);
        assert_eq!(results[0].certainty, 0.9);
        assert_eq!(ctx.fill_results(2).len(), 2);
    }

    #[test]
    fn equal_certainty_prefers_narrower_type() {
        let mut ctx = Context::new("a b", 10);
        ctx.add_result(GeoObjectId(1), 0.5, Type::Locality, vec![0], vec![Type::Locality]);
        ctx.add_result(GeoObjectId(2), 0.5, Type::Street, vec![1], vec![Type::Street]);
        let ids: Vec<u64> = ctx.fill_results(10).iter().map(|r| r.osm_id.get()).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn house_number_filter_with_fallback() {
        let mut ctx = Context::new("springfield main street 84", 10);
        ctx.mark_house_number_positions_in_query(&[3]);
        ctx.add_result(
            GeoObjectId(10),
            0.75,
            Type::Street,
            vec![0, 1, 2],
            vec![Type::Locality, Type::Street],
        );
        let only_street = ctx.fill_results(10);
        assert_eq!(only_street.len(), 1, "falls back to the unfiltered list");

        ctx.add_result(
            GeoObjectId(20),
            1.0,
            Type::Building,
            vec![0, 1, 2, 3],
            vec![Type::Locality, Type::Street, Type::Building],
        );
        let results = ctx.fill_results(10);
        let ids: Vec<u64> = results.iter().map(|r| r.osm_id.get()).collect();
        assert_eq!(ids, vec![20]);
    }

    #[test]
    fn clear_resets_everything() {
        let mut ctx = Context::new("a b", 10);
        ctx.mark_token(0, Type::Country);
        ctx.mark_house_number_positions_in_query(&[1]);
        ctx.layers_mut().push(Layer::new(Type::Country));
        ctx.add_result(GeoObjectId(1), 1.0, Type::Country, vec![0], vec![Type::Country]);
        ctx.clear();
        assert_eq!(ctx.num_used_tokens(), 0);
        assert!(ctx.layers().is_empty());
        assert!(ctx.house_number_positions().is_empty());
        assert!(ctx.fill_results(10).is_empty());
        assert_eq!(ctx.num_tokens(), 2);
    }
}
