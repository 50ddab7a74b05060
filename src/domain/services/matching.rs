//! Name normalization and item-reference parsing
//!
//! Catalog names and the free-text references found in class data rarely
//! agree on case, accents or spacing. Everything that compares names goes
//! through [`normalize`] first.

use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Patterns compiled once, used for every lookup
static PATTERNS: OnceLock<MatchingPatterns> = OnceLock::new();

#[derive(Debug)]
struct MatchingPatterns {
    /// `"Javeline x5"`, `"Flèches (20)"`
    quantity_suffix: Regex,
    /// Any `(qualifier)` group
    parenthetical: Regex,
    /// `"Name (Qualifier)"` spanning the whole string
    qualified_name: Regex,
}

impl MatchingPatterns {
    fn new() -> Self {
        Self {
            quantity_suffix: Regex::new(r"(?i)^(.+?)\s*(?:x(\d+)|\((\d+)\))$")
                .expect("quantity_suffix regex must compile"),
            parenthetical: Regex::new(r"\s*\([^)]*\)").expect("parenthetical regex must compile"),
            qualified_name: Regex::new(r"^(.+?)\s*\((.+)\)$")
                .expect("qualified_name regex must compile"),
        }
    }

    fn get() -> &'static Self {
        PATTERNS.get_or_init(Self::new)
    }
}

/// Lowercase, strip diacritics, collapse whitespace runs and trim
pub fn normalize(s: &str) -> String {
    let stripped: String = s
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Item name without its trailing quantity marker
pub fn extract_item_name(raw: &str) -> String {
    let raw = raw.trim();
    match MatchingPatterns::get().quantity_suffix.captures(raw) {
        Some(caps) => caps[1].trim().to_string(),
        None => raw.to_string(),
    }
}

/// Quantity carried by the trailing marker, 1 when there is none
pub fn extract_quantity(raw: &str) -> u32 {
    MatchingPatterns::get()
        .quantity_suffix
        .captures(raw.trim())
        .and_then(|caps| caps.get(2).or_else(|| caps.get(3)))
        .and_then(|digits| digits.as_str().parse().ok())
        .unwrap_or(1)
}

/// Remove every parenthetical qualifier, e.g. `"arc long (martial)"` -> `"arc long"`
pub fn strip_parentheticals(s: &str) -> String {
    MatchingPatterns::get()
        .parenthetical
        .replace_all(s, "")
        .trim()
        .to_string()
}

/// Split `"Name (Qualifier)"` into its two parts.
///
/// Strings without a trailing qualifier come back whole with `None`.
pub fn split_qualified_name(s: &str) -> (String, Option<String>) {
    match MatchingPatterns::get().qualified_name.captures(s.trim()) {
        Some(caps) => (caps[1].trim().to_string(), Some(caps[2].trim().to_string())),
        None => (s.trim().to_string(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_accents_and_spacing() {
        assert_eq!(normalize("Épée à deux mains"), normalize("epee a deux mains"));
        assert_eq!(normalize("  Cotte   de\tmailles "), "cotte de mailles");
        assert_eq!(normalize("Bâton de QUARTERSTAFF"), "baton de quarterstaff");
    }

    #[test]
    fn test_extract_item_name_and_quantity() {
        assert_eq!(extract_item_name("Javeline x5"), "Javeline");
        assert_eq!(extract_quantity("Javeline x5"), 5);
        assert_eq!(extract_item_name("Flèches (20)"), "Flèches");
        assert_eq!(extract_quantity("Flèches (20)"), 20);
    }

    #[test]
    fn test_reference_without_marker() {
        assert_eq!(extract_item_name("  Sac à dos "), "Sac à dos");
        assert_eq!(extract_quantity("Sac à dos"), 1);
        assert_eq!(extract_quantity("Rations (5 jours)"), 1);
        assert_eq!(extract_item_name("Dague X2"), "Dague");
    }

    #[test]
    fn test_strip_parentheticals() {
        assert_eq!(strip_parentheticals("arc long (martial)"), "arc long");
        assert_eq!(strip_parentheticals("outils (voleur) de base"), "outils de base");
    }

    #[test]
    fn test_split_qualified_name() {
        assert_eq!(
            split_qualified_name("Elfe (Elfe des bois)"),
            ("Elfe".to_string(), Some("Elfe des bois".to_string()))
        );
        assert_eq!(split_qualified_name("Humain"), ("Humain".to_string(), None));
    }
}
