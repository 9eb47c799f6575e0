// crates/geocoder-core/src/model/types.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Level of an entry in the address hierarchy.
///
/// The declaration order is the search order: the geocoder always tries
/// wider levels before narrower ones, and `Ord` follows it. `Count` is the
/// sentinel for "no level" (an unused query token, the end of the search).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Type {
    Country,
    Region,
    Subregion,
    Locality,
    Suburb,
    Sublocality,
    Street,
    Building,
    Count,
}

/// Name ↔ level table used by the JSON Lines reader.
/// The first spelling of each level is its canonical name.
static TYPE_NAMES: &[(&str, Type)] = &[
    ("country", Type::Country),
    ("region", Type::Region),
    ("subregion", Type::Subregion),
    ("locality", Type::Locality),
    ("suburb", Type::Suburb),
    ("sublocality", Type::Sublocality),
    ("street", Type::Street),
    ("building", Type::Building),
    // aliases
    ("state", Type::Region),
    ("province", Type::Region),
    ("county", Type::Subregion),
    ("district", Type::Subregion),
    ("city", Type::Locality),
    ("town", Type::Locality),
    ("village", Type::Locality),
    ("hamlet", Type::Locality),
    ("neighbourhood", Type::Sublocality),
    ("neighborhood", Type::Sublocality),
    ("house", Type::Building),
    ("housenumber", Type::Building),
];

impl Type {
    /// Number of real levels (everything but `Count`).
    pub const COUNT: usize = 8;

    /// All real levels, broad to narrow.
    pub const ALL: [Type; Type::COUNT] = [
        Type::Country,
        Type::Region,
        Type::Subregion,
        Type::Locality,
        Type::Suburb,
        Type::Sublocality,
        Type::Street,
        Type::Building,
    ];

    /// Position of the level in [`Type::ALL`]; `Count` maps to `Type::COUNT`.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The next narrower level, `Count` after `Building`.
    pub fn next(self) -> Type {
        match self {
            Type::Count => Type::Count,
            other => Type::ALL.get(other.index() + 1).copied().unwrap_or(Type::Count),
        }
    }

    pub fn is_valid(self) -> bool {
        self != Type::Count
    }

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        TYPE_NAMES
            .iter()
            .find(|(_, t)| *t == self)
            .map(|(n, _)| *n)
            .unwrap_or("count")
    }

    /// Parses a level name or one of its aliases, case-insensitively.
    pub fn from_name(name: &str) -> Option<Type> {
        let name = name.trim();
        TYPE_NAMES
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, t)| *t)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_is_broad_to_narrow() {
        for pair in Type::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert_eq!(pair[0].next(), pair[1]);
        }
        assert_eq!(Type::Building.next(), Type::Count);
        assert_eq!(Type::Count.next(), Type::Count);
        assert!(Type::Building < Type::Count);
    }

    #[test]
    fn names_round_trip() {
        for t in Type::ALL {
            assert_eq!(Type::from_name(t.name()), Some(t));
        }
        assert_eq!(Type::from_name("City"), Some(Type::Locality));
        assert_eq!(Type::from_name(" STATE "), Some(Type::Region));
        assert_eq!(Type::from_name("postcode"), None);
    }
}
