//! Changelog generation options.
use chrono::format::{Item, StrftimeItems};
use derive_builder::Builder;
use std::path::PathBuf;

use crate::{ChangelogError, Result};

/// Default strftime pattern for section dates.
pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%y";
/// Default output file.
pub const DEFAULT_OUTPUT: &str = "CHANGELOG.md";
/// Default introduction placed before each pull request title.
pub const DEFAULT_MERGE_PREFIX: &str = "*Merged pull-request:* ";
/// Issue labels included by default.
pub const DEFAULT_LABELS: [&str; 2] = ["bug", "enhancement"];

/// Which tag intervals to render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TagRange {
    /// Every interval, newest first, down to the beginning of history.
    #[default]
    All,
    /// Only the interval between the two most recent tags.
    Last,
    /// Only the interval between two named tags.
    Between { tag1: String, tag2: String },
}

/// Options controlling what goes into the changelog and how it is rendered.
#[derive(Debug, Clone, Builder)]
#[builder(
    setter(into, strip_option),
    default,
    build_fn(private, name = "_build")
)]
pub struct GeneratorConfig {
    /// Issues carrying any of these labels are included
    pub labels: Vec<String>,
    /// When set, only pull requests carrying one of these labels (or no label
    /// at all) are included
    pub pull_request_labels: Option<Vec<String>>,
    /// Include issues without any label
    pub add_issues_wo_labels: bool,
    /// Let milestone titles override timestamp based placement of issues
    pub filter_issues_by_milestone: bool,
    /// Include merged pull requests
    pub pulls: bool,
    /// Include closed issues
    pub issues: bool,
    /// Add a compare link between consecutive tags
    pub compare_link: bool,
    /// Credit pull request authors
    pub author: bool,
    pub merge_prefix: String,
    /// strftime pattern for section dates
    pub date_format: String,
    pub output: PathBuf,
    pub range: TagRange,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            labels: DEFAULT_LABELS.iter().map(|l| l.to_string()).collect(),
            pull_request_labels: None,
            add_issues_wo_labels: true,
            filter_issues_by_milestone: true,
            pulls: true,
            issues: true,
            compare_link: true,
            author: true,
            merge_prefix: DEFAULT_MERGE_PREFIX.into(),
            date_format: DEFAULT_DATE_FORMAT.into(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            range: TagRange::All,
        }
    }
}

impl GeneratorConfigBuilder {
    pub fn build(&self) -> Result<GeneratorConfig> {
        let config = self._build().map_err(|e| {
            ChangelogError::invalid_config(format!(
                "Failed to build generator config: {}",
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }
}

impl GeneratorConfig {
    pub fn builder() -> GeneratorConfigBuilder {
        GeneratorConfigBuilder::default()
    }

    /// Rejects options that would only fail once rendering has started.
    pub fn validate(&self) -> Result<()> {
        if StrftimeItems::new(&self.date_format)
            .any(|item| matches!(item, Item::Error))
        {
            return Err(ChangelogError::invalid_config(format!(
                "invalid date format: {}",
                self.date_format
            )));
        }

        if let TagRange::Between { tag1, tag2 } = &self.range
            && (tag1.is_empty() || tag2.is_empty())
        {
            return Err(ChangelogError::invalid_config(
                "both tags of a range must be named",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_command_line_defaults() {
        let config = GeneratorConfig::default();

        assert_eq!(config.labels, vec!["bug", "enhancement"]);
        assert!(config.pull_request_labels.is_none());
        assert!(config.add_issues_wo_labels);
        assert!(config.filter_issues_by_milestone);
        assert!(config.pulls && config.issues && config.compare_link);
        assert_eq!(config.date_format, "%d/%m/%y");
        assert_eq!(config.output, PathBuf::from("CHANGELOG.md"));
        assert_eq!(config.range, TagRange::All);
    }

    #[test]
    fn builder_overrides_defaults() {
        let config = GeneratorConfig::builder()
            .pulls(false)
            .pull_request_labels(vec!["feature".to_string()])
            .range(TagRange::Last)
            .build()
            .unwrap();

        assert!(!config.pulls);
        assert!(config.issues);
        assert_eq!(config.pull_request_labels, Some(vec!["feature".into()]));
        assert_eq!(config.range, TagRange::Last);
    }

    #[test]
    fn builder_rejects_invalid_date_format() {
        let result = GeneratorConfig::builder().date_format("%Q %").build();

        assert!(matches!(result, Err(ChangelogError::InvalidConfig(_))));
    }

    #[test]
    fn builder_rejects_unnamed_range_tags() {
        let result = GeneratorConfig::builder()
            .range(TagRange::Between {
                tag1: "v1.0".into(),
                tag2: "".into(),
            })
            .build();

        assert!(result.is_err());
    }
}
