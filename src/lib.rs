//! University timetable generation engine.
//!
//! Assigns (class, course, lecturer) teaching obligations to
//! (day, time-slot, room) placements using a genetic algorithm with a
//! deterministic greedy repair pass for leftovers. Hard conflicts
//! (double-bookings, capacity, break slots) dominate the fitness score;
//! soft preferences (daily load, room type) refine it. The crate is a
//! library: it consumes an in-memory snapshot of entities and returns
//! structured results, leaving persistence and UI to the caller.
//!
//! # Modules
//!
//! - **`models`**: Typed ids, `Requirement`, `ResourcePool`, `Gene`,
//!   `TimetableEntry`
//! - **`loader`**: `Snapshot` → validated `ProblemInstance`
//! - **`constraints`**: O(1) conflict maps and hard/soft checks
//! - **`fitness`**: scoring, violation itemization, quality rating
//! - **`ga`**: chromosome, operators, and the evolutionary loop
//! - **`repair`**: greedy first-fit fallback scheduling
//! - **`materialize`**: genes → persistable entries
//! - **`scheduler`**: end-to-end pipeline and run summary
//! - **`persist`**: batched insertion boundary
//!
//! # Example
//!
//! ```no_run
//! use timetabler::loader::{RunFilter, Snapshot};
//! use timetabler::scheduler::{RunParams, TimetableScheduler};
//!
//! let snapshot = Snapshot::default(); // filled from storage
//! let filter = RunFilter::new(1, 1, "2025/2026");
//! let params = RunParams::default();
//!
//! let report = TimetableScheduler::new().run(&snapshot, &filter, &params)?;
//! println!(
//!     "{} scheduled, {} left over",
//!     report.summary.scheduled,
//!     report.summary.unscheduled.len()
//! );
//! # Ok::<(), timetabler::error::ScheduleError>(())
//! ```

pub mod constraints;
pub mod error;
pub mod fitness;
pub mod ga;
pub mod loader;
pub mod materialize;
pub mod models;
pub mod persist;
pub mod repair;
pub mod scheduler;

pub use error::{DataIncompleteError, ScheduleError};
pub use loader::{ProblemInstance, RunFilter, Snapshot};
pub use scheduler::{RunParams, RunReport, RunSummary, TimetableScheduler};
