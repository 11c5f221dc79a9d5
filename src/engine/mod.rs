//! Attendance aggregation engine
//!
//! Pure functions over a set of scan records: exclusion, frequency ranking,
//! first/last windows, histograms and the paid-attendance policy. Nothing in
//! here performs I/O; the orchestrator only schedules the passes on the
//! blocking pool.

pub mod error;
pub mod exclusion;
pub mod frequency;
pub mod histogram;
pub mod orchestrator;
pub mod policy;
pub mod scope;
pub mod summary;
pub mod window;

#[cfg(test)]
mod testing;

pub use error::{EngineError, EngineResult};
pub use orchestrator::{AttendanceEnvelope, CarView, Orchestrator, ScopeSnapshot};
pub use scope::{CarScope, Granularity, Pagination, Scope};
