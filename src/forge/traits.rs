//! Traits related to the repository data source
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::{
    Result,
    forge::{
        config::RemoteConfig,
        types::{CommitDates, Event, Issue, PullRequest, Tag},
    },
};

/// Fully materialised access to a repository's history. Implementations own
/// pagination, authentication and rate limiting.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Forge: Send + Sync {
    fn remote_config(&self) -> RemoteConfig;
    /// All tags with their commit references.
    async fn get_tags(&self) -> Result<Vec<Tag>>;
    /// All closed pull requests, merged or not.
    async fn get_closed_pull_requests(&self) -> Result<Vec<PullRequest>>;
    /// All closed issues, excluding pull requests.
    async fn get_closed_issues(&self) -> Result<Vec<Issue>>;
    /// Chronological event history of one issue.
    async fn get_issue_events(&self, number: u64) -> Result<Vec<Event>>;
    /// Author and committer dates of a commit.
    async fn get_commit(&self, sha: &str) -> Result<CommitDates>;
}
