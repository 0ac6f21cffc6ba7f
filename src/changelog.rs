//! Tag interval aggregation and changelog rendering.
//!
//! Tags are resolved to commit timestamps and partitioned into intervals,
//! merged pull requests and closed issues are bucketed into those intervals,
//! issues are classified by label, and one markdown section is rendered per
//! interval.

/// Document assembly from resolved repository data.
pub mod assembler;

/// Issue classification by label and section ordering.
pub mod classify;

/// Concurrent issue event fetching and actual close date resolution.
pub mod close_dates;

/// Time window filtering and milestone reconciliation.
pub mod filter;

/// Tag interval partitioning.
pub mod interval;

/// Fetching and pre-filtering of repository data.
pub mod loader;

/// Markdown rendering of a single interval.
pub mod render;

/// Memoized tag timestamp resolution.
pub mod tag_times;

pub use assembler::{ChangelogAssembler, RepositoryData};
pub use loader::RepositoryLoader;
