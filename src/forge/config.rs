//! Configuration for hosting platform connections.
use secrecy::SecretString;

/// Default web site used for tree and compare links.
pub const DEFAULT_GITHUB_SITE: &str = "https://github.com";
/// Default page size for paginated list queries.
pub const DEFAULT_PAGE_SIZE: u8 = 100;
/// Environment variable consulted when no token is passed on the command line.
pub const TOKEN_ENV_VAR: &str = "CHANGELOG_GITHUB_TOKEN";

/// Remote repository connection configuration.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Repository owner (user or organisation).
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Web site base used when rendering links (e.g. "https://github.com").
    pub site: String,
    /// Optional API endpoint override for GitHub Enterprise installations.
    pub api_endpoint: Option<String>,
    /// Access token. Requests are unauthenticated when absent.
    pub token: Option<SecretString>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            owner: "".to_string(),
            repo: "".to_string(),
            site: DEFAULT_GITHUB_SITE.to_string(),
            api_endpoint: None,
            token: None,
        }
    }
}

impl RemoteConfig {
    /// Base web URL of the project, e.g. "https://github.com/owner/repo".
    pub fn project_url(&self) -> String {
        format!(
            "{}/{}/{}",
            self.site.trim_end_matches('/'),
            self.owner,
            self.repo
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_remote_config() {
        let remote = RemoteConfig::default();
        assert!(remote.token.is_none());
        assert!(remote.api_endpoint.is_none());
        assert_eq!(remote.site, DEFAULT_GITHUB_SITE);
    }

    #[test]
    fn project_url_joins_site_owner_and_repo() {
        let remote = RemoteConfig {
            owner: "skywinder".into(),
            repo: "changelog".into(),
            site: "https://git.example.com/".into(),
            ..Default::default()
        };

        assert_eq!(
            remote.project_url(),
            "https://git.example.com/skywinder/changelog"
        );
    }
}
