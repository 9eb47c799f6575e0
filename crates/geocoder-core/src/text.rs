// crates/geocoder-core/src/text.rs

//! Text normalization shared by index build and query time.
//!
//! Both sides go through [`tokenize`], so a name and a query only ever
//! meet as identical folded tokens.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Convert a string into a folded key suitable for indexing and comparison.
///
/// This performs:
/// 1\) Transliterate Unicode → ASCII (e.g. `Łódź` -> `Lodz`)
/// 2\) Normalize to lowercase
///
/// # Examples
///
/// ```rust
/// use geocoder_core::text::fold_key;
///
/// assert_eq!(fold_key("Łódź"), "lodz");
/// assert_eq!(fold_key("Straße"), "strasse");
/// ```
pub fn fold_key(s: &str) -> String {
    deunicode::deunicode(s).to_lowercase()
}

/// Splits a folded string into tokens on every non-alphanumeric character.
///
/// Deterministic and locale-independent: punctuation, whitespace and symbols
/// all act as separators and never survive into a token.
///
/// ```rust
/// use geocoder_core::text::tokenize;
///
/// assert_eq!(tokenize("Noord-Holland"), vec!["noord", "holland"]);
/// assert_eq!(tokenize("  84, Main St. "), vec!["84", "main", "st"]);
/// assert!(tokenize(" ,;- ").is_empty());
/// ```
pub fn tokenize(s: &str) -> Vec<String> {
    fold_key(s)
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Street-type words. They are part of street names but carry no identity
/// on their own ("Main Street" vs "Main St").
static STREET_SYNONYMS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "street", "st", "avenue", "ave", "av", "road", "rd", "boulevard", "blvd", "lane", "ln",
        "drive", "dr", "way", "place", "pl", "court", "ct", "terrace", "highway", "hwy",
        "square", "sq", "strasse", "str", "gasse", "weg", "platz", "straat", "laan", "gracht",
        "rue", "calle", "via", "ulitsa", "ul", "prospekt", "pr", "pereulok", "per",
    ]
    .into_iter()
    .collect()
});

/// True if `token` (already normalized) is a street-type word.
pub fn is_street_synonym(token: &str) -> bool {
    STREET_SYNONYMS.contains(token)
}

/// Longest digit run accepted at the start of a house number.
const MAX_HOUSE_NUMBER_DIGITS: usize = 5;
/// Longest alphabetic suffix accepted after the digits ("12b", "7 bis").
const MAX_HOUSE_NUMBER_SUFFIX: usize = 3;

/// True if the tokens look like a house number: digits, optionally followed
/// by a short alphabetic suffix, either glued (`84a`) or as a separate token
/// (`84 a`), or a `/`-separated building part (`7/2` tokenizes to `7 2`).
///
/// ```rust
/// use geocoder_core::text::looks_like_house_number;
///
/// assert!(looks_like_house_number(&["84"]));
/// assert!(looks_like_house_number(&["12b"]));
/// assert!(looks_like_house_number(&["7", "bis"]));
/// assert!(looks_like_house_number(&["7", "2"]));
/// assert!(!looks_like_house_number(&["main"]));
/// assert!(!looks_like_house_number(&["12", "st"]));
/// ```
pub fn looks_like_house_number<S: AsRef<str>>(tokens: &[S]) -> bool {
    match tokens {
        [single] => is_house_number_token(single.as_ref()),
        [number, suffix] => {
            let (number, suffix) = (number.as_ref(), suffix.as_ref());
            is_digits(number)
                && (is_digits(suffix)
                    || (is_house_number_suffix(suffix) && !is_street_synonym(suffix)))
        }
        _ => false,
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.len() <= MAX_HOUSE_NUMBER_DIGITS && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_house_number_suffix(s: &str) -> bool {
    !s.is_empty() && s.len() <= MAX_HOUSE_NUMBER_SUFFIX && s.bytes().all(|b| b.is_ascii_alphabetic())
}

fn is_house_number_token(token: &str) -> bool {
    let split = token
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(token.len());
    let (digits, suffix) = token.split_at(split);
    is_digits(digits) && (suffix.is_empty() || is_house_number_suffix(suffix))
}

/// Canonical form of a house number: its tokens glued together.
pub fn house_number_key<S: AsRef<str>>(tokens: &[S]) -> String {
    tokens.iter().map(AsRef::as_ref).collect()
}

/// Compares a building's stored house number with a query subsequence,
/// ignoring separators and case (`84A` == `84 a` == `84-a`).
pub fn house_numbers_match<A: AsRef<str>, B: AsRef<str>>(building: &[A], query: &[B]) -> bool {
    let building = house_number_key(building);
    !building.is_empty() && building == house_number_key(query)
}
