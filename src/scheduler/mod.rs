//! End-to-end run orchestration.
//!
//! [`TimetableScheduler`] wires the pipeline together: load and validate
//! the snapshot, scale and run the GA, repair leftovers, materialize
//! entries, and summarize the run. All state is explicit per run; two
//! schedulers (e.g. for different streams) can run concurrently without
//! interference.

mod pipeline;

pub use pipeline::{RunParams, RunReport, RunSummary, TimetableScheduler};
