//! Generates a markdown changelog from a GitHub project's tags, merged pull
//! requests and closed issues.
pub mod changelog;
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod forge;

pub use error::{ChangelogError, Result};
