//! Error handling for classification and batch filtering.
//!
//! Two layers live here: [`FailureKind`] / [`RecordFailure`] describe why a
//! single record was rejected by its worker, and [`TldFilterError`] is the
//! crate-wide error returned from batch, configuration and file operations.

use std::fmt;

/// Why a single record could not be classified.
///
/// These are precondition failures on the record itself; classification
/// proper never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The record's domain string is empty
    EmptyDomain,

    /// The caller marked the record as not valid
    InvalidDomain,

    /// The record carries the `-1` reference-count sentinel
    InvalidReferenceCount,
}

impl FailureKind {
    /// The message text reported for this failure.
    pub fn message(&self) -> &'static str {
        match self {
            Self::EmptyDomain => "domain name is empty",
            Self::InvalidDomain => "domain not valid",
            Self::InvalidReferenceCount => "domain RefIPs not valid",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// A rejected record: the failure kind plus the identity of the record
/// that produced it.
///
/// `Display` prints only the kind message so that joined batch errors read
/// the same as an unattributed list. Use [`RecordFailure::describe`] when the
/// offending record should be named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFailure {
    /// Rank of the rejected record
    pub rank: u32,
    /// Domain of the rejected record (possibly empty)
    pub domain: String,
    /// What went wrong
    pub kind: FailureKind,
}

impl RecordFailure {
    pub fn new<D: Into<String>>(rank: u32, domain: D, kind: FailureKind) -> Self {
        Self {
            rank,
            domain: domain.into(),
            kind,
        }
    }

    /// Attributed description, e.g. `#5 invalid.com: domain not valid`.
    pub fn describe(&self) -> String {
        if self.domain.is_empty() {
            format!("#{} <empty>: {}", self.rank, self.kind)
        } else {
            format!("#{} {}: {}", self.rank, self.domain, self.kind)
        }
    }
}

impl fmt::Display for RecordFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)
    }
}

impl std::error::Error for RecordFailure {}

/// Main error type for tld-filter operations.
#[derive(Debug, Clone)]
pub enum TldFilterError {
    /// One or more records in a batch failed validation.
    ///
    /// Failures are kept in the order the collector received them.
    BatchFailed { failures: Vec<RecordFailure> },

    /// Configuration errors (invalid settings, malformed TOML, etc.)
    ConfigError { message: String },

    /// File I/O errors when reading record batches or config files
    FileError { path: String, message: String },

    /// Malformed batch input (bad JSON, bad text line)
    ParseError { message: String },

    /// Internal errors such as a worker exiting without reporting
    Internal { message: String },
}

impl TldFilterError {
    /// Create a batch failure from collected record failures.
    pub fn batch_failed(failures: Vec<RecordFailure>) -> Self {
        Self::BatchFailed { failures }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::FileError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new parse error.
    pub fn parse<M: Into<String>>(message: M) -> Self {
        Self::ParseError {
            message: message.into(),
        }
    }

    /// Create a new internal error.
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Record failures carried by a batch error, empty for every other kind.
    pub fn failures(&self) -> &[RecordFailure] {
        match self {
            Self::BatchFailed { failures } => failures,
            _ => &[],
        }
    }

    /// Number of records that failed in a batch error.
    pub fn failure_count(&self) -> usize {
        self.failures().len()
    }
}

impl fmt::Display for TldFilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BatchFailed { failures } => {
                let messages: Vec<String> = failures.iter().map(|e| e.to_string()).collect();
                write!(f, "{}", messages.join(", "))
            }
            Self::ConfigError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            Self::FileError { path, message } => {
                write!(f, "File error at '{}': {}", path, message)
            }
            Self::ParseError { message } => {
                write!(f, "Parse error: {}", message)
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for TldFilterError {}

impl From<serde_json::Error> for TldFilterError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError {
            message: format!("JSON parsing failed: {}", err),
        }
    }
}

impl From<tokio::task::JoinError> for TldFilterError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Internal {
            message: format!("worker task failed: {}", err),
        }
    }
}
