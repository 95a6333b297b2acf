//! TLD extraction and localized-TLD lookup.
//!
//! Classification is pure: a domain maps to a `(tld, localized_tld)` pair
//! through an immutable [`LocalizationTable`]. The built-in table is created
//! once on first use and never mutated; callers that need extra pairs build
//! their own table with [`LocalizationTable::with_overrides`].

use crate::error::TldFilterError;
use crate::types::Classification;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Built-in global -> localized (Indonesian) TLD pairs.
const BUILTIN_PAIRS: &[(&str, &str)] = &[
    (".com", ".co.id"),
    (".org", ".org.id"),
    (".gov", ".go.id"),
];

lazy_static::lazy_static! {
    static ref DEFAULT_TABLE: Arc<LocalizationTable> = Arc::new(LocalizationTable::builtin());
}

/// Immutable mapping from global TLDs to their localized equivalents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizationTable {
    pairs: HashMap<String, String>,
}

impl LocalizationTable {
    /// Table holding only the built-in pairs.
    pub fn builtin() -> Self {
        Self {
            pairs: BUILTIN_PAIRS
                .iter()
                .map(|(tld, localized)| (tld.to_string(), localized.to_string()))
                .collect(),
        }
    }

    /// Shared handle to the process-wide built-in table.
    pub fn shared_default() -> Arc<LocalizationTable> {
        Arc::clone(&*DEFAULT_TABLE)
    }

    /// Built-in table extended with `overrides`; an override replaces a
    /// built-in pair with the same key.
    ///
    /// # Errors
    ///
    /// Returns a config error if a key or value does not look like a TLD
    /// (must start with `.` and have something after it).
    pub fn with_overrides(overrides: &BTreeMap<String, String>) -> Result<Self, TldFilterError> {
        let mut table = Self::builtin();
        for (tld, localized) in overrides {
            validate_tld_entry(tld)?;
            validate_tld_entry(localized)?;
            table.pairs.insert(tld.clone(), localized.clone());
        }
        Ok(table)
    }

    /// Localized TLD for `tld`, if the table knows it.
    pub fn lookup(&self, tld: &str) -> Option<&str> {
        self.pairs.get(tld).map(String::as_str)
    }

    /// Classify a domain against this table.
    pub fn classify(&self, domain: &str) -> Classification {
        let tld = extract_tld(domain);
        let localized_tld = self.lookup(tld).unwrap_or(tld);
        Classification::new(tld, localized_tld)
    }

    /// All pairs, sorted by global TLD.
    pub fn entries(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self
            .pairs
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        entries.sort();
        entries
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl Default for LocalizationTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// TLD of a domain: the substring from the last `.` (inclusive) to the end.
///
/// A domain without any dot has an empty TLD.
pub fn extract_tld(domain: &str) -> &str {
    match domain.rfind('.') {
        Some(idx) => &domain[idx..],
        None => "",
    }
}

/// Classify a domain with the built-in table.
///
/// Returns `(tld, localized_tld)`; both are empty for a domain with no dot.
///
/// ```rust
/// use tld_filter_lib::classify;
///
/// assert_eq!(classify("google.com"), (".com".to_string(), ".co.id".to_string()));
/// assert_eq!(classify("rust-lang.io"), (".io".to_string(), ".io".to_string()));
/// ```
pub fn classify(domain: &str) -> (String, String) {
    let Classification { tld, localized_tld } = DEFAULT_TABLE.classify(domain);
    (tld, localized_tld)
}

/// Reject a table key or value that does not look like `.tld`.
pub(crate) fn validate_tld_entry(entry: &str) -> Result<(), TldFilterError> {
    if !entry.starts_with('.') || entry.len() < 2 || entry.chars().any(char::is_whitespace) {
        return Err(TldFilterError::config(format!(
            "invalid localized TLD entry '{}': must start with '.' and contain no spaces",
            entry
        )));
    }
    Ok(())
}
