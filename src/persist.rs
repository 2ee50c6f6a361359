//! Persistence boundary.
//!
//! The core never talks to storage itself; callers implement [`EntrySink`]
//! over their store and hand it to [`persist_entries`], which batches
//! inserts and reports how far it got on a partial failure. There is no
//! automatic retry: a failed batch leaves prior batches committed and the
//! caller decides whether to re-run or patch manually.

use log::warn;
use thiserror::Error;

use crate::models::TimetableEntry;

/// Destination for materialized entries.
///
/// `insert_batch` must be transactional per batch: either the whole batch
/// lands or none of it does, and the returned count is the rows written.
pub trait EntrySink {
    /// Storage-side error type.
    type Error: std::fmt::Display;

    /// Inserts one batch, returning the number of rows written.
    fn insert_batch(&mut self, batch: &[TimetableEntry]) -> Result<usize, Self::Error>;
}

/// Batched insertion failed partway.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("persisted {inserted} of {attempted} entries: {message}")]
pub struct PersistenceBatchFailure {
    /// Rows committed before the failure.
    pub inserted: usize,
    /// Rows the run attempted to persist.
    pub attempted: usize,
    /// Storage-side failure description.
    pub message: String,
}

/// Writes entries through the sink in batches of `batch_size`.
///
/// Returns the total rows written, or a [`PersistenceBatchFailure`]
/// recording progress when a batch fails.
pub fn persist_entries<S: EntrySink>(
    sink: &mut S,
    entries: &[TimetableEntry],
    batch_size: usize,
) -> Result<usize, PersistenceBatchFailure> {
    let batch_size = batch_size.max(1);
    let mut inserted = 0;

    for batch in entries.chunks(batch_size) {
        match sink.insert_batch(batch) {
            Ok(count) => inserted += count,
            Err(err) => {
                warn!(
                    "entry batch failed after {inserted} of {} rows: {err}",
                    entries.len()
                );
                return Err(PersistenceBatchFailure {
                    inserted,
                    attempted: entries.len(),
                    message: err.to_string(),
                });
            }
        }
    }
    Ok(inserted)
}
