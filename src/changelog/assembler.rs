use log::*;
use std::collections::HashSet;

use crate::{
    ChangelogError, Result,
    changelog::{
        classify,
        filter::{filter_by_interval, reconcile_milestones},
        interval::{self, Interval},
        render::{ChangelogSection, SectionRenderer},
        tag_times::ResolvedTag,
    },
    config::GeneratorConfig,
    forge::{
        config::RemoteConfig,
        types::{Issue, PullRequest},
    },
};

/// First line of every generated document.
pub const CHANGELOG_HEADER: &str = "# Changelog\n\n";

/// Last line of every generated document.
pub const CHANGELOG_FOOTER: &str = "\\* *This changelog was generated by [github_changelog_generator](https://github.com/skywinder/Github-Changelog-Generator)*";

/// Fully materialised repository history, tags sorted newest first.
#[derive(Debug, Clone, Default)]
pub struct RepositoryData {
    pub tags: Vec<ResolvedTag>,
    pub pull_requests: Vec<PullRequest>,
    pub issues: Vec<Issue>,
}

/// Builds the changelog document from repository data.
pub struct ChangelogAssembler {
    config: GeneratorConfig,
    renderer: SectionRenderer,
}

impl ChangelogAssembler {
    pub fn new(config: GeneratorConfig, remote: &RemoteConfig) -> Self {
        let renderer = SectionRenderer::new(&config, remote);
        Self { config, renderer }
    }

    /// Renders every selected interval and wraps them with header and
    /// footer. Nothing is returned when an interval cannot be built.
    pub fn assemble(&self, data: &RepositoryData) -> Result<String> {
        let intervals = interval::partition(&data.tags, &self.config.range)?;

        self.log_unplaceable(data);

        info!("Generating log..");

        let sections = self.sections(data, &intervals);

        let mut log = String::from(CHANGELOG_HEADER);

        for section in sections.iter() {
            debug!("adding section for {}", section.tag());
            log.push_str(section.as_str());
        }

        log.push_str("\n\n");
        log.push_str(CHANGELOG_FOOTER);

        Ok(log)
    }

    /// One section per interval, in interval order.
    pub fn sections(
        &self,
        data: &RepositoryData,
        intervals: &[Interval],
    ) -> Vec<ChangelogSection> {
        let tag_names =
            data.tags.iter().map(|t| t.name()).collect::<HashSet<&str>>();

        intervals
            .iter()
            .map(|interval| self.section(data, interval, &tag_names))
            .collect()
    }

    fn section(
        &self,
        data: &RepositoryData,
        interval: &Interval,
        tag_names: &HashSet<&str>,
    ) -> ChangelogSection {
        let pull_requests = filter_by_interval(
            &data.pull_requests,
            PullRequest::merge_date,
            interval,
        );

        let mut issues =
            filter_by_interval(&data.issues, Issue::close_date, interval);

        if self.config.filter_issues_by_milestone {
            issues =
                reconcile_milestones(issues, &data.issues, interval, tag_names);
        }

        classify::sort_issues(&mut issues);

        debug!(
            "tag {}: {} pull requests, {} issues",
            interval.newer_name(),
            pull_requests.len(),
            issues.len()
        );

        self.renderer.render(interval, &pull_requests, &issues)
    }

    fn log_unplaceable(&self, data: &RepositoryData) {
        for pr in data.pull_requests.iter().filter(|p| p.merged_at.is_none()) {
            debug!(
                "{}",
                ChangelogError::UnresolvedTimestamp {
                    number: pr.number,
                    field: "merged_at",
                }
            );
        }

        for issue in data.issues.iter().filter(|i| i.close_date().is_none()) {
            debug!(
                "{}",
                ChangelogError::UnresolvedTimestamp {
                    number: issue.number,
                    field: "close",
                }
            );
        }
    }
}
