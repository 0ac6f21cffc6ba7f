//! CLI argument parsing and GitHub connection configuration.
use clap::Parser;
use git_url_parse::GitUrl;
use log::*;
use secrecy::SecretString;
use std::{env, path::PathBuf};
use url::Url;

use crate::{
    ChangelogError, Result,
    config::{
        DEFAULT_DATE_FORMAT, DEFAULT_MERGE_PREFIX, DEFAULT_OUTPUT,
        GeneratorConfig, TagRange,
    },
    forge::config::{DEFAULT_GITHUB_SITE, RemoteConfig, TOKEN_ENV_VAR},
};

/// Host of the public GitHub web site.
const GITHUB_HOST: &str = "github.com";

/// Generate a changelog from a GitHub project's tags, merged pull requests
/// and closed issues.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// GitHub user or organisation owning the project.
    pub user: Option<String>,

    /// GitHub project name.
    pub project: Option<String>,

    #[arg(long)]
    /// Repository URL (https://github.com/owner/repo). Alternative to USER
    /// and PROJECT.
    pub repo: Option<String>,

    #[arg(short, long)]
    /// GitHub personal access token. Falls back to CHANGELOG_GITHUB_TOKEN.
    pub token: Option<String>,

    #[arg(short, long, default_value = DEFAULT_DATE_FORMAT)]
    /// strftime pattern used for section dates.
    pub format: String,

    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    /// Output file.
    pub output: PathBuf,

    #[arg(long, value_delimiter = ',', default_value = "bug,enhancement")]
    /// Comma separated issue labels to include.
    pub labels: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    /// Only include pull requests with one of these labels (or no label).
    pub pr_labels: Option<Vec<String>>,

    #[arg(long, default_value_t = false)]
    /// Leave out issues without any label.
    pub no_issues_wo_labels: bool,

    #[arg(long, default_value_t = false)]
    /// Place issues by close date only, ignoring milestones named after tags.
    pub no_filter_by_milestone: bool,

    #[arg(long, default_value_t = false)]
    /// Leave out merged pull requests.
    pub no_pull_requests: bool,

    #[arg(long, default_value_t = false)]
    /// Leave out closed issues.
    pub no_issues: bool,

    #[arg(long, default_value_t = false)]
    /// Do not add compare links between tags.
    pub no_compare_link: bool,

    #[arg(long, default_value_t = false)]
    /// Do not credit pull request authors.
    pub no_author: bool,

    #[arg(long, default_value = DEFAULT_MERGE_PREFIX)]
    /// Text placed before every pull request title.
    pub merge_prefix: String,

    #[arg(long, num_args = 2, value_names = ["TAG1", "TAG2"], conflicts_with = "last")]
    /// Only generate the section between two tags.
    pub between_tags: Option<Vec<String>>,

    #[arg(long, default_value_t = false)]
    /// Only generate the section between the two most recent tags.
    pub last: bool,

    #[arg(long)]
    /// Web site used for links, for GitHub Enterprise installations.
    pub github_site: Option<String>,

    #[arg(long)]
    /// API endpoint, for GitHub Enterprise installations.
    pub github_api: Option<String>,

    #[arg(short, long, default_value_t = false)]
    /// Enable debug logging.
    pub verbose: bool,
}

impl Args {
    /// Configure the GitHub connection from CLI arguments.
    pub fn get_remote(&self) -> Result<RemoteConfig> {
        let parsed = if let Some(repo_url) = self.repo.as_ref() {
            parse_repo_url(repo_url)?
        } else {
            match (self.user.as_ref(), self.project.as_ref()) {
                (Some(user), Some(project)) => RepoUrl {
                    owner: user.clone(),
                    repo: project.clone(),
                    ..Default::default()
                },
                _ => {
                    return Err(ChangelogError::InvalidArgs(
                        "must provide USER and PROJECT or --repo".into(),
                    ));
                }
            }
        };

        let site = self
            .github_site
            .clone()
            .or(parsed.site)
            .unwrap_or_else(|| DEFAULT_GITHUB_SITE.to_string());
        Url::parse(&site)?;

        let api_endpoint = self.github_api.clone().or(parsed.api_endpoint);

        if let Some(endpoint) = api_endpoint.as_ref() {
            Url::parse(endpoint)?;
        }

        Ok(RemoteConfig {
            owner: parsed.owner,
            repo: parsed.repo,
            site,
            api_endpoint,
            token: resolve_token(self.token.clone(), parsed.token),
        })
    }

    /// Changelog options from CLI arguments.
    pub fn get_config(&self) -> Result<GeneratorConfig> {
        let range = match (self.between_tags.as_deref(), self.last) {
            (Some([tag1, tag2]), _) => TagRange::Between {
                tag1: tag1.clone(),
                tag2: tag2.clone(),
            },
            (Some(_), _) => {
                return Err(ChangelogError::InvalidArgs(
                    "--between-tags expects exactly two tags".into(),
                ));
            }
            (None, true) => TagRange::Last,
            (None, false) => TagRange::All,
        };

        let mut builder = GeneratorConfig::builder();

        builder
            .labels(self.labels.clone())
            .add_issues_wo_labels(!self.no_issues_wo_labels)
            .filter_issues_by_milestone(!self.no_filter_by_milestone)
            .pulls(!self.no_pull_requests)
            .issues(!self.no_issues)
            .compare_link(!self.no_compare_link)
            .author(!self.no_author)
            .merge_prefix(self.merge_prefix.clone())
            .date_format(self.format.clone())
            .output(self.output.clone())
            .range(range);

        if let Some(pr_labels) = self.pr_labels.clone() {
            builder.pull_request_labels(pr_labels);
        }

        builder.build()
    }
}

/// Validate repository URL uses HTTP or HTTPS scheme.
fn validate_scheme(scheme: git_url_parse::Scheme) -> Result<()> {
    match scheme {
        git_url_parse::Scheme::Http => Ok(()),
        git_url_parse::Scheme::Https => Ok(()),
        _ => Err(ChangelogError::InvalidArgs(
            "only http and https schemes are supported for repo urls".into(),
        )),
    }
}

/// Connection details derived from a repository URL.
#[derive(Debug, Default)]
struct RepoUrl {
    owner: String,
    repo: String,
    token: Option<String>,
    site: Option<String>,
    api_endpoint: Option<String>,
}

/// Owner, project, embedded token, web site and API base of a repository
/// URL. Hosts other than github.com are treated as GitHub Enterprise, which
/// serves its API under `/api/v3`.
fn parse_repo_url(repo_url: &str) -> Result<RepoUrl> {
    let parsed = GitUrl::parse(repo_url)?;

    validate_scheme(parsed.scheme)?;

    let host = parsed.host.ok_or(ChangelogError::InvalidArgs(
        "unable to parse host from repo url".into(),
    ))?;

    let owner = parsed.owner.ok_or(ChangelogError::InvalidArgs(
        "unable to parse owner from repo url".into(),
    ))?;

    let authority = match parsed.port {
        Some(port) => format!("{host}:{port}"),
        None => host.clone(),
    };

    let site = format!("{}://{}", parsed.scheme, authority);

    let api_endpoint = if host == GITHUB_HOST {
        None
    } else {
        Some(format!("{site}/api/v3"))
    };

    Ok(RepoUrl {
        owner,
        repo: parsed.name,
        token: parsed.token,
        site: Some(site),
        api_endpoint,
    })
}

/// Token precedence: command line, repo URL, environment.
fn resolve_token(
    cli_token: Option<String>,
    url_token: Option<String>,
) -> Option<SecretString> {
    let token = cli_token
        .filter(|t| !t.is_empty())
        .or(url_token.filter(|t| !t.is_empty()))
        .or_else(|| env::var(TOKEN_ENV_VAR).ok().filter(|t| !t.is_empty()));

    if token.is_none() {
        warn!(
            "Warning: No token provided (-t option) and variable ${TOKEN_ENV_VAR} was not found."
        );
        warn!(
            "This script can make only 50 requests to GitHub API per hour without token!"
        );
    }

    token.map(SecretString::from)
}

#[cfg(test)]
mod tests {
    //! Unit tests for CLI argument parsing and remote configuration.
    use super::*;
    use secrecy::ExposeSecret;

    fn parse(args: &[&str]) -> Args {
        let mut argv = vec!["github-changelog-generator"];
        argv.extend_from_slice(args);
        Args::try_parse_from(argv).unwrap()
    }

    /// Test remote configuration from positional user and project.
    #[test]
    fn gets_remote_from_user_and_project() {
        let args = parse(&["skywinder", "changelog", "-t", "secret"]);

        let remote = args.get_remote().unwrap();

        assert_eq!(remote.owner, "skywinder");
        assert_eq!(remote.repo, "changelog");
        assert_eq!(remote.site, DEFAULT_GITHUB_SITE);
        assert_eq!(remote.token.unwrap().expose_secret(), "secret");
    }

    /// Test remote configuration from a repository URL.
    #[test]
    fn gets_remote_from_repo_url() {
        let args = parse(&[
            "--repo",
            "https://git.example.com/acme/widgets",
            "--token",
            "secret",
        ]);

        let remote = args.get_remote().unwrap();

        assert_eq!(remote.owner, "acme");
        assert_eq!(remote.repo, "widgets");
        assert_eq!(remote.site, "https://git.example.com");
        assert_eq!(remote.project_url(), "https://git.example.com/acme/widgets");
        assert_eq!(
            remote.api_endpoint.as_deref(),
            Some("https://git.example.com/api/v3")
        );
    }

    /// Test that an enterprise repository URL keeps its port and points the
    /// API at the same host.
    #[test]
    fn enterprise_repo_url_derives_site_and_api_with_port() {
        let args = parse(&[
            "--repo",
            "https://ghe.example.com:8443/acme/widgets",
            "-t",
            "secret",
        ]);

        let remote = args.get_remote().unwrap();

        assert_eq!(remote.site, "https://ghe.example.com:8443");
        assert_eq!(
            remote.api_endpoint.as_deref(),
            Some("https://ghe.example.com:8443/api/v3")
        );
        assert_eq!(
            remote.project_url(),
            "https://ghe.example.com:8443/acme/widgets"
        );
    }

    #[test]
    fn github_repo_url_keeps_default_api() {
        let args =
            parse(&["--repo", "https://github.com/acme/widgets", "-t", "s"]);

        let remote = args.get_remote().unwrap();

        assert_eq!(remote.site, "https://github.com");
        assert!(remote.api_endpoint.is_none());
    }

    #[test]
    fn explicit_api_overrides_repo_url_derived_api() {
        let args = parse(&[
            "--repo",
            "https://ghe.example.com/acme/widgets",
            "-t",
            "s",
            "--github-api",
            "https://api.ghe.example.com",
        ]);

        let remote = args.get_remote().unwrap();

        assert_eq!(
            remote.api_endpoint.as_deref(),
            Some("https://api.ghe.example.com")
        );
    }

    #[test]
    fn explicit_site_and_endpoint_override_defaults() {
        let args = parse(&[
            "acme",
            "widgets",
            "-t",
            "secret",
            "--github-site",
            "https://ghe.example.com",
            "--github-api",
            "https://ghe.example.com/api/v3",
        ]);

        let remote = args.get_remote().unwrap();

        assert_eq!(remote.site, "https://ghe.example.com");
        assert_eq!(
            remote.api_endpoint.as_deref(),
            Some("https://ghe.example.com/api/v3")
        );
    }

    #[test]
    fn invalid_site_is_rejected() {
        let args = parse(&["acme", "widgets", "--github-site", "not a url"]);
        assert!(matches!(args.get_remote(), Err(ChangelogError::UrlError(_))));
    }

    #[test]
    fn missing_project_is_rejected() {
        let args = parse(&["acme"]);
        assert!(matches!(args.get_remote(), Err(ChangelogError::InvalidArgs(_))));
    }

    /// Test that only HTTP and HTTPS schemes are supported for repository URLs.
    #[test]
    fn only_supports_http_and_https_schemes() {
        let args = parse(&["--repo", "git@github.com:acme/widgets"]);
        assert!(args.get_remote().is_err());
    }

    #[test]
    fn defaults_produce_default_config() {
        let config = parse(&["acme", "widgets"]).get_config().unwrap();
        let defaults = GeneratorConfig::default();

        assert_eq!(config.labels, defaults.labels);
        assert_eq!(config.date_format, defaults.date_format);
        assert_eq!(config.output, defaults.output);
        assert_eq!(config.merge_prefix, defaults.merge_prefix);
        assert!(config.pull_request_labels.is_none());
        assert!(config.pulls && config.issues && config.compare_link);
        assert!(config.add_issues_wo_labels && config.filter_issues_by_milestone);
        assert_eq!(config.range, TagRange::All);
    }

    #[test]
    fn toggles_and_labels_are_applied() {
        let config = parse(&[
            "acme",
            "widgets",
            "--labels",
            "bug,security",
            "--pr-labels",
            "feature",
            "--no-issues-wo-labels",
            "--no-compare-link",
            "--no-pull-requests",
            "-o",
            "HISTORY.md",
        ])
        .get_config()
        .unwrap();

        assert_eq!(config.labels, vec!["bug", "security"]);
        assert_eq!(config.pull_request_labels, Some(vec!["feature".into()]));
        assert!(!config.add_issues_wo_labels);
        assert!(!config.compare_link);
        assert!(!config.pulls);
        assert!(config.issues);
        assert_eq!(config.output, PathBuf::from("HISTORY.md"));
    }

    #[test]
    fn range_selection() {
        let config = parse(&["a", "b", "--last"]).get_config().unwrap();
        assert_eq!(config.range, TagRange::Last);

        let config = parse(&["a", "b", "--between-tags", "v0.1", "v0.3"])
            .get_config()
            .unwrap();
        assert_eq!(
            config.range,
            TagRange::Between {
                tag1: "v0.1".into(),
                tag2: "v0.3".into()
            }
        );
    }

    #[test]
    fn last_conflicts_with_between_tags() {
        let result = Args::try_parse_from([
            "github-changelog-generator",
            "a",
            "b",
            "--last",
            "--between-tags",
            "v0.1",
            "v0.2",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn invalid_date_format_is_rejected() {
        let result = parse(&["a", "b", "--format", "%Q"]).get_config();
        assert!(matches!(result, Err(ChangelogError::InvalidConfig(_))));
    }
}
