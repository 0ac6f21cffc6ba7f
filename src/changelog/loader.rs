use log::*;
use std::sync::Arc;

use crate::{
    Result,
    changelog::{
        assembler::RepositoryData,
        close_dates,
        tag_times::{TagTimeCache, TimeResolver},
    },
    config::GeneratorConfig,
    forge::{
        traits::Forge,
        types::{Issue, PullRequest},
    },
};

/// Keeps pull requests carrying one of `labels`, or no label at all. Without
/// an include-set every pull request is kept.
pub fn filter_pull_requests_by_labels(
    pull_requests: Vec<PullRequest>,
    labels: Option<&[String]>,
) -> Vec<PullRequest> {
    let Some(labels) = labels else {
        return pull_requests;
    };

    debug!("Filter all pull requests by labels.");

    let filtered = pull_requests
        .into_iter()
        .filter(|pr| {
            pr.labels.is_empty() || pr.labels.iter().any(|l| labels.contains(l))
        })
        .collect::<Vec<PullRequest>>();

    info!(
        "Filtered pull requests with specified labels and w/o labels: {}",
        filtered.len()
    );

    filtered
}

/// Issues carrying one of `labels`, followed by unlabelled issues when
/// `add_without_labels` is set.
pub fn filter_issues_by_labels(
    issues: Vec<Issue>,
    labels: &[String],
    add_without_labels: bool,
) -> Vec<Issue> {
    let (unlabelled, labelled): (Vec<Issue>, Vec<Issue>) =
        issues.into_iter().partition(|i| i.labels.is_empty());

    let mut filtered = labelled
        .into_iter()
        .filter(|i| i.labels.iter().any(|l| labels.contains(l)))
        .collect::<Vec<Issue>>();

    if add_without_labels {
        filtered.extend(unlabelled);
    }

    info!(
        "Filtered issues with labels {:?}{}: {}",
        labels,
        if add_without_labels { " and w/o labels" } else { "" },
        filtered.len()
    );

    filtered
}

/// Fetches everything the assembler needs from the forge.
pub struct RepositoryLoader {
    forge: Arc<dyn Forge>,
    config: GeneratorConfig,
    cache: TagTimeCache,
}

impl RepositoryLoader {
    pub fn new(forge: Arc<dyn Forge>, config: GeneratorConfig) -> Self {
        Self {
            forge,
            config,
            cache: TagTimeCache::new(),
        }
    }

    pub async fn load(&self) -> Result<RepositoryData> {
        info!("Fetching tags...");
        let tags = self.forge.get_tags().await?;

        let resolver =
            TimeResolver::new(Arc::clone(&self.forge), self.cache.clone());
        let tags = resolver.resolve_all(&tags).await?;

        let pull_requests = if self.config.pulls {
            self.load_pull_requests().await?
        } else {
            vec![]
        };

        let issues = if self.config.issues {
            self.load_issues().await?
        } else {
            vec![]
        };

        Ok(RepositoryData {
            tags,
            pull_requests,
            issues,
        })
    }

    async fn load_pull_requests(&self) -> Result<Vec<PullRequest>> {
        info!("Fetching pull requests...");

        let pull_requests = self.forge.get_closed_pull_requests().await?;

        let (merged, unmerged): (Vec<PullRequest>, Vec<PullRequest>) =
            pull_requests
                .into_iter()
                .partition(|pr| pr.merged_at.is_some());

        debug!("skipping {} closed but unmerged pull requests", unmerged.len());

        Ok(filter_pull_requests_by_labels(
            merged,
            self.config.pull_request_labels.as_deref(),
        ))
    }

    async fn load_issues(&self) -> Result<Vec<Issue>> {
        info!("Fetching closed issues...");

        let issues = self.forge.get_closed_issues().await?;
        let issues = filter_issues_by_labels(
            issues,
            &self.config.labels,
            self.config.add_issues_wo_labels,
        );

        let issues = close_dates::fetch_events(&self.forge, issues).await;

        Ok(close_dates::resolve_actual_dates(&self.forge, issues).await)
    }
}
