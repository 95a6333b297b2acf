//! Main filter implementation.
//!
//! This module provides the [`TldFilter`] struct that ties a
//! [`FilterConfig`] to a localization table and a [`BatchProcessor`], plus
//! the [`filter_and_classify`] shortcut that uses the built-in defaults.

use crate::classifier::LocalizationTable;
use crate::concurrent::BatchProcessor;
use crate::error::TldFilterError;
use crate::types::{Classification, FilterConfig, Record};
use std::sync::Arc;

/// Classifies and filters record batches according to a configuration.
///
/// # Example
///
/// ```rust,no_run
/// use tld_filter_lib::{Record, TldFilter};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let filter = TldFilter::new();
///     let records = vec![
///         Record::new(1, "google.com", true, 100),
///         Record::new(2, "golang.org", true, 100),
///     ];
///     for record in filter.filter_and_classify(records).await? {
///         println!("{} -> {}", record.domain, record.localized_tld());
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct TldFilter {
    /// Configuration settings for this filter instance
    config: FilterConfig,
    /// Table shared by every worker this filter dispatches
    table: Arc<LocalizationTable>,
    processor: BatchProcessor,
}

impl TldFilter {
    /// Create a filter with the default configuration.
    ///
    /// Default settings:
    /// - Target suffix: ".com"
    /// - Localization table: built-in pairs only
    pub fn new() -> Self {
        let table = LocalizationTable::shared_default();
        Self {
            config: FilterConfig::default(),
            processor: BatchProcessor::with_table(Arc::clone(&table)),
            table,
        }
    }

    /// Create a filter with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `config.localized_tlds` holds an entry that
    /// is not a TLD.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tld_filter_lib::{FilterConfig, TldFilter};
    ///
    /// let config = FilterConfig::default()
    ///     .with_target_suffix(".net")
    ///     .with_localized_tld(".net", ".net.id");
    /// let filter = TldFilter::with_config(config).unwrap();
    /// assert_eq!(filter.classify("example.net").localized_tld, ".net.id");
    /// ```
    pub fn with_config(config: FilterConfig) -> Result<Self, TldFilterError> {
        let table = if config.localized_tlds.is_empty() {
            LocalizationTable::shared_default()
        } else {
            Arc::new(LocalizationTable::with_overrides(&config.localized_tlds)?)
        };
        Ok(Self {
            config,
            processor: BatchProcessor::with_table(Arc::clone(&table)),
            table,
        })
    }

    /// Classify one domain with this filter's table.
    pub fn classify(&self, domain: &str) -> Classification {
        self.table.classify(domain)
    }

    /// Classify `records` concurrently and keep those matching the configured
    /// target suffix.
    ///
    /// See [`BatchProcessor::process`] for ordering and failure semantics.
    pub async fn filter_and_classify(
        &self,
        records: Vec<Record>,
    ) -> Result<Vec<Record>, TldFilterError> {
        self.processor
            .process(&self.config.target_suffix, records)
            .await
    }

    /// Same as [`TldFilter::filter_and_classify`] with an explicit suffix.
    pub async fn filter_and_classify_with(
        &self,
        target_suffix: &str,
        records: Vec<Record>,
    ) -> Result<Vec<Record>, TldFilterError> {
        self.processor.process(target_suffix, records).await
    }

    /// Get the current configuration for this filter.
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// The localization table in use.
    pub fn table(&self) -> &LocalizationTable {
        &self.table
    }
}

impl Default for TldFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify `records` concurrently with the built-in table and keep those
/// whose TLD ends with `target_suffix`.
///
/// If any record fails validation the whole call fails and the error's
/// message is every failure message joined with `", "`.
pub async fn filter_and_classify(
    target_suffix: &str,
    records: Vec<Record>,
) -> Result<Vec<Record>, TldFilterError> {
    BatchProcessor::new().process(target_suffix, records).await
}
