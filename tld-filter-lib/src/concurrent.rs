//! Concurrent batch processing.
//!
//! [`BatchProcessor::process`] fans a batch out to one tokio task per record
//! and fans the outcomes back in over a single channel of
//! `Result<Record, RecordFailure>`. The collector reads exactly one message
//! per dispatched record, keeps classified records whose TLD ends with the
//! target suffix, and fails the whole batch if any record failed.
//!
//! The channel is created with one slot per record, so no worker ever waits
//! on the collector. There is no pool or cap: a batch of N records spawns N
//! tasks.

use crate::classifier::LocalizationTable;
use crate::error::{RecordFailure, TldFilterError};
use crate::types::Record;
use crate::utils::{matches_suffix, validate_record};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// What a worker sends back: the classified record or why it was rejected.
pub type WorkerReport = Result<Record, RecordFailure>;

type WorkerFn = dyn Fn(Record) -> WorkerReport + Send + Sync;

/// Validate one record and, if it passes, classify it against `table`.
///
/// This is the default per-record worker. It consumes the record: on success
/// the record comes back with its classification set, on failure only the
/// attributed [`RecordFailure`] remains.
pub fn validate_and_classify(table: &LocalizationTable, mut record: Record) -> WorkerReport {
    if let Err(kind) = validate_record(&record) {
        return Err(RecordFailure::new(record.rank, record.domain, kind));
    }
    let classification = table.classify(&record.domain);
    record.assign_classification(classification);
    Ok(record)
}

/// Dispatches one worker per record and collects their reports.
#[derive(Clone)]
pub struct BatchProcessor {
    worker: Arc<WorkerFn>,
}

impl BatchProcessor {
    /// Processor using the built-in localization table.
    pub fn new() -> Self {
        Self::with_table(LocalizationTable::shared_default())
    }

    /// Processor whose workers classify against `table`.
    pub fn with_table(table: Arc<LocalizationTable>) -> Self {
        Self::with_worker(move |record| validate_and_classify(&table, record))
    }

    /// Processor running a custom per-record worker.
    ///
    /// The worker is called once per record, each call on its own task.
    /// Whatever it returns is what the collector sees.
    pub fn with_worker<F>(worker: F) -> Self
    where
        F: Fn(Record) -> WorkerReport + Send + Sync + 'static,
    {
        Self {
            worker: Arc::new(worker),
        }
    }

    /// Classify `records` concurrently and keep those whose TLD ends with
    /// `target_suffix`.
    ///
    /// Accepted records are returned in the order their workers reported,
    /// which varies between runs. An empty batch returns `Ok(vec![])`.
    ///
    /// # Errors
    ///
    /// - `BatchFailed` if any record failed validation. No accepted records
    ///   are returned in that case, even if others classified fine.
    /// - `Internal` if a worker task ended without reporting (it panicked).
    pub async fn process(
        &self,
        target_suffix: &str,
        records: Vec<Record>,
    ) -> Result<Vec<Record>, TldFilterError> {
        let expected = records.len();
        if expected == 0 {
            debug!("empty batch, nothing to dispatch");
            return Ok(Vec::new());
        }

        debug!(records = expected, suffix = target_suffix, "dispatching batch");

        let (tx, mut rx) = mpsc::channel::<WorkerReport>(expected);
        let mut handles = Vec::with_capacity(expected);

        for record in records {
            let tx = tx.clone();
            let worker = Arc::clone(&self.worker);
            handles.push(tokio::spawn(async move {
                let report = worker(record);
                // One slot per worker, so this never waits. The receiver
                // outlives every sender, so it cannot fail either.
                let _ = tx.send(report).await;
            }));
        }

        // Only worker senders remain: the channel closes once every worker
        // has reported or died.
        drop(tx);

        let mut accepted = Vec::new();
        let mut failures = Vec::new();
        let mut received = 0usize;

        while received < expected {
            match rx.recv().await {
                Some(Ok(record)) => {
                    let keep = matches_suffix(record.tld(), target_suffix);
                    trace!(rank = record.rank, tld = record.tld(), keep, "record classified");
                    if keep {
                        accepted.push(record);
                    }
                }
                Some(Err(failure)) => {
                    trace!(rank = failure.rank, reason = %failure.kind, "record rejected");
                    failures.push(failure);
                }
                None => break,
            }
            received += 1;
        }

        let outcomes = futures::future::join_all(handles).await;

        if received < expected {
            let missing = expected - received;
            debug!(missing, expected, "workers exited without reporting");
            return Err(TldFilterError::internal(format!(
                "{} of {} workers exited without reporting",
                missing, expected
            )));
        }

        for outcome in outcomes {
            outcome?;
        }

        if !failures.is_empty() {
            debug!(
                failed = failures.len(),
                discarded = accepted.len(),
                "batch rejected"
            );
            return Err(TldFilterError::batch_failed(failures));
        }

        debug!(accepted = accepted.len(), "batch accepted");
        Ok(accepted)
    }
}

impl Default for BatchProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BatchProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchProcessor").finish_non_exhaustive()
    }
}
