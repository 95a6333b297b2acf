//! Core data types for TLD classification.
//!
//! This module defines the record under evaluation, the classification
//! written onto it, and the configuration used by [`crate::TldFilter`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reference-count sentinel meaning "unknown/invalid reference count".
pub const UNKNOWN_REF_COUNT: i64 = -1;

/// The TLD pair computed for a domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Suffix from the last dot to the end, e.g. ".com" (empty when the domain has no dot)
    pub tld: String,

    /// Region-specific equivalent of `tld`, or `tld` itself when none is known
    pub localized_tld: String,
}

impl Classification {
    pub fn new<T: Into<String>, L: Into<String>>(tld: T, localized_tld: L) -> Self {
        Self {
            tld: tld.into(),
            localized_tld: localized_tld.into(),
        }
    }
}

/// One domain entry under evaluation.
///
/// Everything except the classification is fixed at construction. The
/// classification is written once by the worker that owns the record, and
/// both halves of it land together because they live in a single `Option`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RecordRepr", into = "RecordRepr")]
pub struct Record {
    /// Position of the record in its source list (informational only)
    pub rank: u32,

    /// Domain name, may be empty
    pub domain: String,

    /// Caller-asserted validity
    pub valid: bool,

    /// Reference count; [`UNKNOWN_REF_COUNT`] marks it as unusable
    pub ref_count: i64,

    classification: Option<Classification>,
}

impl Record {
    /// Create an unclassified record.
    pub fn new<D: Into<String>>(rank: u32, domain: D, valid: bool, ref_count: i64) -> Self {
        Self {
            rank,
            domain: domain.into(),
            valid,
            ref_count,
            classification: None,
        }
    }

    /// Whether a worker has classified this record.
    pub fn is_classified(&self) -> bool {
        self.classification.is_some()
    }

    pub fn classification(&self) -> Option<&Classification> {
        self.classification.as_ref()
    }

    /// The computed TLD, empty until classified.
    pub fn tld(&self) -> &str {
        self.classification
            .as_ref()
            .map(|c| c.tld.as_str())
            .unwrap_or("")
    }

    /// The computed localized TLD, empty until classified.
    pub fn localized_tld(&self) -> &str {
        self.classification
            .as_ref()
            .map(|c| c.localized_tld.as_str())
            .unwrap_or("")
    }

    /// Store the classification. Only workers call this, once per record.
    pub(crate) fn assign_classification(&mut self, classification: Classification) {
        debug_assert!(
            self.classification.is_none(),
            "record #{} classified twice",
            self.rank
        );
        self.classification = Some(classification);
    }
}

/// Serialized shape of a [`Record`]: flat `tld` / `localized_tld` fields.
#[derive(Serialize, Deserialize)]
struct RecordRepr {
    #[serde(default)]
    rank: u32,
    #[serde(default)]
    domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tld: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    localized_tld: Option<String>,
    #[serde(default = "default_valid")]
    valid: bool,
    #[serde(default)]
    ref_count: i64,
}

fn default_valid() -> bool {
    true
}

impl From<RecordRepr> for Record {
    fn from(repr: RecordRepr) -> Self {
        // A half-filled pair is treated as unclassified.
        let classification = match (repr.tld, repr.localized_tld) {
            (Some(tld), Some(localized_tld)) => Some(Classification { tld, localized_tld }),
            _ => None,
        };
        Self {
            rank: repr.rank,
            domain: repr.domain,
            valid: repr.valid,
            ref_count: repr.ref_count,
            classification,
        }
    }
}

impl From<Record> for RecordRepr {
    fn from(record: Record) -> Self {
        let (tld, localized_tld) = match record.classification {
            Some(c) => (Some(c.tld), Some(c.localized_tld)),
            None => (None, None),
        };
        Self {
            rank: record.rank,
            domain: record.domain,
            tld,
            localized_tld,
            valid: record.valid,
            ref_count: record.ref_count,
        }
    }
}

/// Configuration for a [`crate::TldFilter`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Suffix that a record's TLD must end with to be accepted
    /// Default: ".com"
    pub target_suffix: String,

    /// Extra global -> localized TLD pairs, applied over the built-in table
    /// Default: empty
    pub localized_tlds: BTreeMap<String, String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            target_suffix: ".com".to_string(),
            localized_tlds: BTreeMap::new(),
        }
    }
}

impl FilterConfig {
    /// Set the suffix records must match.
    pub fn with_target_suffix<S: Into<String>>(mut self, suffix: S) -> Self {
        self.target_suffix = suffix.into();
        self
    }

    /// Add (or override) one localized TLD pair.
    pub fn with_localized_tld<T: Into<String>, L: Into<String>>(
        mut self,
        tld: T,
        localized: L,
    ) -> Self {
        self.localized_tlds.insert(tld.into(), localized.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_is_unclassified() {
        let record = Record::new(1, "google.com", true, 100);
        assert!(!record.is_classified());
        assert_eq!(record.tld(), "");
        assert_eq!(record.localized_tld(), "");
    }

    #[test]
    fn test_assign_classification_sets_both() {
        let mut record = Record::new(1, "google.com", true, 100);
        record.assign_classification(Classification::new(".com", ".co.id"));
        assert!(record.is_classified());
        assert_eq!(record.tld(), ".com");
        assert_eq!(record.localized_tld(), ".co.id");
    }

    #[test]
    fn test_record_json_defaults() {
        let record: Record = serde_json::from_str(r#"{"rank": 3, "domain": "golang.org"}"#).unwrap();
        assert_eq!(record.rank, 3);
        assert!(record.valid);
        assert_eq!(record.ref_count, 0);
        assert!(!record.is_classified());
    }

    #[test]
    fn test_record_json_half_classification_ignored() {
        let record: Record =
            serde_json::from_str(r#"{"domain": "golang.org", "tld": ".org"}"#).unwrap();
        assert!(!record.is_classified());
    }

    #[test]
    fn test_classified_record_serializes_flat() {
        let mut record = Record::new(2, "facebook.com", true, 100);
        record.assign_classification(Classification::new(".com", ".co.id"));
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["tld"], ".com");
        assert_eq!(value["localized_tld"], ".co.id");
        assert_eq!(value["ref_count"], 100);

        let unclassified = serde_json::to_value(Record::new(1, "x.com", true, 0)).unwrap();
        assert!(unclassified.get("tld").is_none());
    }

    #[test]
    fn test_filter_config_builders() {
        let config = FilterConfig::default()
            .with_target_suffix(".org")
            .with_localized_tld(".net", ".net.id");
        assert_eq!(config.target_suffix, ".org");
        assert_eq!(config.localized_tlds.get(".net").map(String::as_str), Some(".net.id"));
        assert_eq!(FilterConfig::default().target_suffix, ".com");
    }
}
