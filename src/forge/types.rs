use chrono::{DateTime, Utc};

/// Event kind recorded when an issue is closed.
pub const CLOSED_EVENT: &str = "closed";

/// A named pointer to a commit, used as a release boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub commit_sha: String,
}

/// Author of a pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Author {
    pub login: String,
    pub html_url: String,
}

/// A closed pull request. Only merged pull requests carry `merged_at`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub merged_at: Option<DateTime<Utc>>,
    /// Label names in the order the forge reports them
    pub labels: Vec<String>,
    pub html_url: String,
    pub author: Option<Author>,
}

/// Release grouping attached to an issue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Milestone {
    pub title: String,
}

/// A single entry of an issue's event history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Event {
    pub kind: String,
    pub commit_sha: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// A closed issue.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub closed_at: Option<DateTime<Utc>>,
    /// Date of the commit that closed the issue, when one could be found
    pub actual_date: Option<DateTime<Utc>>,
    /// Label names in the order the forge reports them
    pub labels: Vec<String>,
    pub milestone: Option<Milestone>,
    pub html_url: String,
    /// Chronological event history
    pub events: Vec<Event>,
}

/// Dates recorded on a commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitDates {
    pub author_date: DateTime<Utc>,
    pub committer_date: DateTime<Utc>,
}

impl PullRequest {
    /// Timestamp used to place the pull request in an interval.
    pub fn merge_date(&self) -> Option<DateTime<Utc>> {
        self.merged_at
    }
}

impl Issue {
    /// Timestamp used to place the issue in an interval: the closing
    /// commit's date when known, the recorded close time otherwise.
    pub fn close_date(&self) -> Option<DateTime<Utc>> {
        self.actual_date.or(self.closed_at)
    }

    pub fn first_label(&self) -> Option<&str> {
        self.labels.first().map(String::as_str)
    }

    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l == name)
    }

    pub fn milestone_title(&self) -> Option<&str> {
        self.milestone.as_ref().map(|m| m.title.as_str())
    }
}
