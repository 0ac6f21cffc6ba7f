//! Implements the Forge trait for Github
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::*;
use octocrab::{Octocrab, Page, models, params};
use serde::Deserialize;

use crate::{
    Result,
    forge::{
        config::{DEFAULT_PAGE_SIZE, RemoteConfig},
        traits::Forge,
        types::{
            Author, CommitDates, Event, Issue, Milestone, PullRequest, Tag,
        },
    },
};

#[derive(Debug, Deserialize)]
struct IssueEventResponse {
    pub event: String,
    pub commit_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct GitActor {
    pub date: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct GitCommitResponse {
    pub author: GitActor,
    pub committer: GitActor,
}

/// GitHub forge implementation using Octocrab for API interactions with
/// tags, pull requests, issues and commits.
pub struct Github {
    config: RemoteConfig,
    instance: Octocrab,
}

impl Github {
    /// Create GitHub client with optional personal access token
    /// authentication and API base URL configuration.
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let mut builder = Octocrab::builder();

        if let Some(endpoint) = config.api_endpoint.as_ref() {
            builder = builder.base_uri(endpoint.as_str())?;
        }

        if let Some(token) = config.token.as_ref() {
            builder = builder.personal_token(token.clone());
        }

        let instance = builder.build()?;

        Ok(Self { config, instance })
    }

    fn repo_route(&self, path: &str) -> String {
        format!("/repos/{}/{}/{path}", self.config.owner, self.config.repo)
    }
}

fn convert_pull_request(pr: models::pulls::PullRequest) -> PullRequest {
    PullRequest {
        number: pr.number,
        title: pr.title.unwrap_or_default(),
        merged_at: pr.merged_at,
        labels: pr
            .labels
            .unwrap_or_default()
            .into_iter()
            .map(|l| l.name)
            .collect(),
        html_url: pr.html_url.map(|u| u.to_string()).unwrap_or_default(),
        author: pr.user.map(|u| Author {
            login: u.login,
            html_url: u.html_url.to_string(),
        }),
    }
}

fn convert_issue(issue: models::issues::Issue) -> Issue {
    Issue {
        number: issue.number,
        title: issue.title,
        closed_at: issue.closed_at,
        actual_date: None,
        labels: issue.labels.into_iter().map(|l| l.name).collect(),
        milestone: issue.milestone.map(|m| Milestone { title: m.title }),
        html_url: issue.html_url.to_string(),
        events: vec![],
    }
}

#[async_trait]
impl Forge for Github {
    fn remote_config(&self) -> RemoteConfig {
        self.config.clone()
    }

    async fn get_tags(&self) -> Result<Vec<Tag>> {
        let page = self
            .instance
            .repos(&self.config.owner, &self.config.repo)
            .list_tags()
            .per_page(DEFAULT_PAGE_SIZE)
            .send()
            .await?;

        let tags = self.instance.all_pages(page).await?;

        info!("Found {} tags", tags.len());

        Ok(tags
            .into_iter()
            .map(|t| Tag {
                name: t.name,
                commit_sha: t.commit.sha,
            })
            .collect())
    }

    async fn get_closed_pull_requests(&self) -> Result<Vec<PullRequest>> {
        let page = self
            .instance
            .pulls(&self.config.owner, &self.config.repo)
            .list()
            .state(params::State::Closed)
            .per_page(DEFAULT_PAGE_SIZE)
            .send()
            .await?;

        let pulls = self.instance.all_pages(page).await?;

        info!("Received pull requests: {}", pulls.len());

        Ok(pulls.into_iter().map(convert_pull_request).collect())
    }

    async fn get_closed_issues(&self) -> Result<Vec<Issue>> {
        let page = self
            .instance
            .issues(&self.config.owner, &self.config.repo)
            .list()
            .state(params::State::Closed)
            .per_page(DEFAULT_PAGE_SIZE)
            .send()
            .await?;

        let issues = self.instance.all_pages(page).await?;

        info!("Received issues: {}", issues.len());

        // the issues endpoint also lists pull requests
        Ok(issues
            .into_iter()
            .filter(|i| i.pull_request.is_none())
            .map(convert_issue)
            .collect())
    }

    async fn get_issue_events(&self, number: u64) -> Result<Vec<Event>> {
        let route = self.repo_route(&format!("issues/{number}/events"));

        let params = serde_json::json!({ "per_page": DEFAULT_PAGE_SIZE });

        let page: Page<IssueEventResponse> =
            self.instance.get(route, Some(&params)).await?;

        let events = self.instance.all_pages(page).await?;

        debug!("issue #{number}: received {} events", events.len());

        Ok(events
            .into_iter()
            .map(|e| Event {
                kind: e.event,
                commit_sha: e.commit_id,
                occurred_at: e.created_at,
            })
            .collect())
    }

    async fn get_commit(&self, sha: &str) -> Result<CommitDates> {
        let route = self.repo_route(&format!("git/commits/{sha}"));

        let commit: GitCommitResponse =
            self.instance.get(route, None::<&()>).await?;

        Ok(CommitDates {
            author_date: commit.author.date,
            committer_date: commit.committer.date,
        })
    }
}
