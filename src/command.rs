//! Command execution for the changelog generator.
//!
//! A run loads the repository history from the forge, assembles the
//! changelog document and writes it to the configured output file. Nothing
//! is written when any step fails.

/// Changelog generation and output.
pub mod generate;
