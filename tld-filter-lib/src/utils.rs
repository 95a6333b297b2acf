//! Utility functions for record validation and batch input.
//!
//! This module contains the per-record precondition checks used by workers,
//! the suffix predicate used by the collector, and helpers that build record
//! batches from files, plain domain lists, or the bundled sample.

use crate::error::{FailureKind, TldFilterError};
use crate::types::{Record, UNKNOWN_REF_COUNT};
use std::fs;
use std::path::Path;

/// Check the preconditions a record must meet before it is classified.
///
/// Checks run in a fixed order and the first failing one wins:
/// empty domain, then the validity flag, then the reference-count sentinel.
pub fn validate_record(record: &Record) -> Result<(), FailureKind> {
    if record.domain.is_empty() {
        return Err(FailureKind::EmptyDomain);
    }
    if !record.valid {
        return Err(FailureKind::InvalidDomain);
    }
    if record.ref_count == UNKNOWN_REF_COUNT {
        return Err(FailureKind::InvalidReferenceCount);
    }
    Ok(())
}

/// Whether a classified TLD is accepted for `target_suffix`.
pub fn matches_suffix(tld: &str, target_suffix: &str) -> bool {
    tld.ends_with(target_suffix)
}

/// Build valid records from bare domain names, ranked 1..N.
pub fn records_from_domains(domains: &[String]) -> Vec<Record> {
    domains
        .iter()
        .enumerate()
        .map(|(i, domain)| Record::new(i as u32 + 1, domain.trim(), true, 0))
        .collect()
}

/// The six-record demonstration batch.
///
/// Three records are valid (two `.com`, one `.org`) and three fail
/// validation, one for each failure kind.
pub fn sample_batch() -> Vec<Record> {
    vec![
        Record::new(1, "google.com", true, 100),
        Record::new(2, "facebook.com", true, 100),
        Record::new(3, "golang.org", true, 100),
        Record::new(4, "", true, 100),
        Record::new(5, "invalid.com", false, 100),
        Record::new(6, "noRefIPs.com", true, UNKNOWN_REF_COUNT),
    ]
}

/// Read a batch of records from a file.
///
/// `.json` files must hold an array of records. Any other file is read as
/// text, one record per line (see [`parse_records_text`]). Records without a
/// rank get their 1-based position in the file.
///
/// # Errors
///
/// Returns `FileError` if the file cannot be read and `ParseError` if its
/// contents are malformed.
pub fn load_records_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<Record>, TldFilterError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        TldFilterError::file_error(path.to_string_lossy(), format!("Failed to read file: {}", e))
    })?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let mut records = if is_json {
        serde_json::from_str::<Vec<Record>>(&content).map_err(|e| {
            TldFilterError::parse(format!("{}: invalid JSON batch: {}", path.display(), e))
        })?
    } else {
        parse_records_text(&content)?
    };

    for (i, record) in records.iter_mut().enumerate() {
        if record.rank == 0 {
            record.rank = i as u32 + 1;
        }
    }

    Ok(records)
}

/// Parse the line-based batch format.
///
/// Each non-blank line that does not start with `#` is one record:
/// `domain[,valid[,ref_count]]`. `valid` defaults to `true` and `ref_count`
/// to `0`. The domain field may be empty (`,true,100`); such a record is kept
/// and will fail validation in the batch.
pub fn parse_records_text(content: &str) -> Result<Vec<Record>, TldFilterError> {
    let mut records = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        if fields.len() > 3 {
            return Err(TldFilterError::parse(format!(
                "line {}: expected at most 3 fields, found {}",
                line_num + 1,
                fields.len()
            )));
        }

        let valid = match fields.get(1) {
            Some(field) => parse_bool(field).ok_or_else(|| {
                TldFilterError::parse(format!(
                    "line {}: invalid valid flag '{}', use true/false",
                    line_num + 1,
                    field
                ))
            })?,
            None => true,
        };

        let ref_count = match fields.get(2) {
            Some(field) => field.parse::<i64>().map_err(|_| {
                TldFilterError::parse(format!(
                    "line {}: invalid reference count '{}'",
                    line_num + 1,
                    field
                ))
            })?,
            None => 0,
        };

        let rank = records.len() as u32 + 1;
        records.push(Record::new(rank, fields[0], valid, ref_count));
    }

    Ok(records)
}

/// Parse the boolean spellings accepted in batch files and `TF_*` variables.
pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
