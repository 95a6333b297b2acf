//! # TLD Filter Library
//!
//! Classifies domain records by top-level domain and filters a batch down to
//! the records whose TLD ends with a requested suffix.
//!
//! Each record in a batch is validated and classified on its own tokio task.
//! A single collector receives exactly one report per record and decides the
//! outcome for the whole batch: either every record passed validation and the
//! matching ones are returned, or the batch fails with every failure listed.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tld_filter_lib::{filter_and_classify, Record};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let records = vec![
//!         Record::new(1, "google.com", true, 100),
//!         Record::new(2, "golang.org", true, 100),
//!     ];
//!     let accepted = filter_and_classify(".com", records).await?;
//!
//!     for record in accepted {
//!         println!("{}: {} -> {}", record.domain, record.tld(), record.localized_tld());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Pure classification**: [`classify`] maps a domain to `(tld, localized_tld)`
//! - **Concurrent batches**: one task per record, one collector, no lost reports
//! - **All-or-nothing results**: any rejected record fails the batch
//! - **Attributed failures**: every failure names the record that caused it
//! - **Configurable**: TOML files and `TF_*` environment variables

// Re-export main public API types and functions
// This makes them available as tld_filter_lib::TypeName
pub use classifier::{classify, extract_tld, LocalizationTable};
pub use concurrent::{validate_and_classify, BatchProcessor, WorkerReport};
pub use config::{
    load_env_config, validate_suffix, ConfigManager, DefaultsConfig, EnvConfig, FileConfig,
    OutputConfig,
};
pub use error::{FailureKind, RecordFailure, TldFilterError};
pub use filter::{filter_and_classify, TldFilter};
pub use types::{Classification, FilterConfig, Record, UNKNOWN_REF_COUNT};
pub use utils::{
    load_records_from_file, matches_suffix, parse_records_text, records_from_domains,
    sample_batch, validate_record,
};

// Internal modules - their public items are re-exported above
mod classifier;
mod concurrent;
mod config;
mod error;
mod filter;
mod types;
mod utils;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, TldFilterError>;

// Library version and metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
