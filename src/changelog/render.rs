use regex::Regex;
use std::{fmt, sync::LazyLock};

use crate::{
    changelog::{classify::IssueCategory, interval::Interval},
    config::GeneratorConfig,
    forge::{
        config::RemoteConfig,
        types::{Issue, PullRequest},
    },
};

/// Characters that change how a title renders in markdown
static MARKDOWN_SPECIAL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([\\>*_()\[\]#])").unwrap());

/// Backslash-escapes markdown sensitive characters so titles render verbatim.
pub fn escape_markdown(text: &str) -> String {
    MARKDOWN_SPECIAL_REGEX
        .replace_all(text, r"\$1")
        .to_string()
}

/// Produces the bullet text for one merged pull request.
pub trait PullRequestFormatter: Send + Sync {
    fn format(&self, pull_request: &PullRequest) -> String;
}

/// Formats pull requests as "<prefix><title> ([\#n](url))" with an optional
/// author credit.
#[derive(Debug, Clone)]
pub struct DefaultPullRequestFormatter {
    merge_prefix: String,
    author: bool,
}

impl DefaultPullRequestFormatter {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            merge_prefix: config.merge_prefix.clone(),
            author: config.author,
        }
    }
}

impl PullRequestFormatter for DefaultPullRequestFormatter {
    fn format(&self, pull_request: &PullRequest) -> String {
        let mut line = format!(
            "{}{} ([\\#{}]({}))",
            self.merge_prefix,
            escape_markdown(&pull_request.title),
            pull_request.number,
            pull_request.html_url
        );

        if self.author
            && let Some(author) = pull_request.author.as_ref()
        {
            line.push_str(&format!(
                " ([{}]({}))",
                author.login, author.html_url
            ));
        }

        line.push_str("\n\n");
        line
    }
}

/// Rendered markdown for one interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogSection {
    tag: String,
    markdown: String,
}

impl ChangelogSection {
    /// Name of the tag closing the interval.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn as_str(&self) -> &str {
        &self.markdown
    }
}

impl fmt::Display for ChangelogSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.markdown)
    }
}

/// Composes changelog sections from filtered interval contents.
pub struct SectionRenderer {
    project_url: String,
    date_format: String,
    compare_link: bool,
    pulls: bool,
    issues: bool,
    formatter: Box<dyn PullRequestFormatter>,
}

impl SectionRenderer {
    pub fn new(config: &GeneratorConfig, remote: &RemoteConfig) -> Self {
        Self {
            project_url: remote.project_url(),
            date_format: config.date_format.clone(),
            compare_link: config.compare_link,
            pulls: config.pulls,
            issues: config.issues,
            formatter: Box::new(DefaultPullRequestFormatter::new(config)),
        }
    }

    /// Replaces the pull request formatter.
    pub fn with_formatter(
        mut self,
        formatter: Box<dyn PullRequestFormatter>,
    ) -> Self {
        self.formatter = formatter;
        self
    }

    /// Renders one section. `issues` must already be in display order.
    pub fn render(
        &self,
        interval: &Interval,
        pull_requests: &[&PullRequest],
        issues: &[&Issue],
    ) -> ChangelogSection {
        let newer = interval.newer_name();

        let mut log =
            format!("## [{newer}]({}/tree/{newer})\n", self.project_url);

        if self.compare_link
            && let Some(older) = interval.older_name()
        {
            log.push_str(&format!(
                "[Full Changelog]({}/compare/{older}...{newer})\n",
                self.project_url
            ));
        }

        let date = interval.newer.timestamp.format(&self.date_format);
        log.push_str(&format!("#### {date}\n"));

        if self.pulls {
            for pull_request in pull_requests.iter() {
                log.push_str(&format!(
                    "- {}",
                    self.formatter.format(pull_request)
                ));
            }
        }

        if self.issues {
            for issue in issues.iter() {
                log.push_str(&format!(
                    "- *{}:* {} [\\#{}]({})\n\n",
                    IssueCategory::of(issue).intro(),
                    escape_markdown(&issue.title),
                    issue.number,
                    issue.html_url
                ));
            }
        }

        ChangelogSection {
            tag: newer.to_string(),
            markdown: log,
        }
    }
}
