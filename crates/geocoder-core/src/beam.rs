// crates/geocoder-core/src/beam.rs

/// One surviving candidate of a [`Beam`].
#[derive(Debug, Clone, PartialEq)]
pub struct BeamEntry<K, V> {
    pub key: K,
    pub value: V,
}

/// Bounded top-K container.
///
/// Keeps at most `capacity` entries sorted by value, highest first. Entries
/// with equal values stay in insertion order, which keeps everything built
/// on top of the beam deterministic.
#[derive(Debug, Clone)]
pub struct Beam<K, V> {
    capacity: usize,
    entries: Vec<BeamEntry<K, V>>,
}

impl<K, V: PartialOrd + Copy> Beam<K, V> {
    /// Storage grows on demand; `capacity` is only the bound.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::new(),
        }
    }

    /// Offers `key` with score `value`.
    ///
    /// Below capacity the entry is always kept. At capacity it must beat the
    /// current minimum strictly, which is then evicted. Returns whether the
    /// entry was kept.
    pub fn add(&mut self, key: K, value: V) -> bool {
        if self.capacity == 0 {
            return false;
        }
        if self.entries.len() == self.capacity {
            match self.entries.last() {
                Some(min) if value > min.value => {}
                _ => return false,
            }
        }

        // After every entry that is at least as good: ties keep arrival order.
        let pos = self.entries.partition_point(|e| e.value >= value);
        self.entries.insert(pos, BeamEntry { key, value });
        if self.entries.len() > self.capacity {
            self.entries.pop();
        }
        true
    }

    /// Entries, highest value first.
    pub fn entries(&self) -> &[BeamEntry<K, V>] {
        &self.entries
    }

    /// Lowest surviving value.
    pub fn min_value(&self) -> Option<V> {
        self.entries.last().map(|e| e.value)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() == self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
