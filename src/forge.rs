//! Repository data source for the changelog engine.
//!
//! Provides the typed records the engine consumes and the GitHub client that
//! populates them, hiding pagination and token authentication behind the
//! [`traits::Forge`] trait.

/// Connection settings for the hosting platform.
pub mod config;

/// GitHub API client implementation for GitHub.com and Enterprise.
pub mod github;

/// Common trait for repository data sources.
pub mod traits;

/// Typed tag, pull request, issue, event and commit records.
pub mod types;
