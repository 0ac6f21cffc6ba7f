//! Changelog generation command implementation.
use log::*;
use std::sync::Arc;

use crate::{
    Result,
    changelog::{ChangelogAssembler, RepositoryLoader},
    cli,
    config::GeneratorConfig,
    forge::{github::Github, traits::Forge},
};

/// Execute the generate command: fetch, assemble and write the changelog.
pub async fn execute(args: &cli::Args) -> Result<()> {
    let remote = args.get_remote()?;
    let config = args.get_config()?;

    info!("Generating changelog for {}/{}", remote.owner, remote.repo);

    let forge: Arc<dyn Forge> = Arc::new(Github::new(remote)?);

    run(forge, config).await
}

/// Generates the changelog through `forge` and writes it to the configured
/// output path. The file is only touched once the document is complete.
pub async fn run(forge: Arc<dyn Forge>, config: GeneratorConfig) -> Result<()> {
    let output = config.output.clone();

    let log = generate(forge, config).await?;

    tokio::fs::write(&output, log).await?;

    info!("Done! Generated log placed in {}", output.display());

    Ok(())
}

/// Produces the full changelog document without writing it anywhere. Links
/// point at the forge's configured site.
pub async fn generate(
    forge: Arc<dyn Forge>,
    config: GeneratorConfig,
) -> Result<String> {
    config.validate()?;

    let remote = forge.remote_config();
    let loader = RepositoryLoader::new(forge, config.clone());
    let data = loader.load().await?;

    debug!(
        "loaded {} tags, {} pull requests, {} issues",
        data.tags.len(),
        data.pull_requests.len(),
        data.issues.len()
    );

    ChangelogAssembler::new(config, &remote).assemble(&data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ChangelogError,
        config::TagRange,
        forge::{
            config::RemoteConfig,
            traits::MockForge,
            types::{CommitDates, Issue, PullRequest, Tag},
        },
    };
    use chrono::{DateTime, TimeZone, Utc};
    use tempfile::TempDir;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2015, 3, day, 9, 0, 0).unwrap()
    }

    fn remote() -> RemoteConfig {
        RemoteConfig {
            owner: "owner".into(),
            repo: "repo".into(),
            ..Default::default()
        }
    }

    fn mock_forge() -> MockForge {
        let mut mock_forge = MockForge::new();
        mock_forge.expect_remote_config().returning(remote);
        mock_forge.expect_get_tags().returning(|| {
            Ok(vec![
                Tag {
                    name: "v0.1".into(),
                    commit_sha: "a".into(),
                },
                Tag {
                    name: "v0.2".into(),
                    commit_sha: "b".into(),
                },
            ])
        });
        mock_forge.expect_get_commit().returning(|sha| {
            let day = if sha == "a" { 2 } else { 20 };
            Ok(CommitDates {
                author_date: at(day),
                committer_date: at(day),
            })
        });
        mock_forge.expect_get_closed_pull_requests().returning(|| {
            Ok(vec![PullRequest {
                number: 3,
                title: "Support enterprise".into(),
                merged_at: Some(at(10)),
                html_url: "https://github.com/owner/repo/pull/3".into(),
                ..Default::default()
            }])
        });
        mock_forge.expect_get_closed_issues().returning(|| {
            Ok(vec![Issue {
                number: 4,
                title: "Broken links".into(),
                closed_at: Some(at(11)),
                labels: vec!["bug".into()],
                html_url: "https://github.com/owner/repo/issues/4".into(),
                ..Default::default()
            }])
        });
        mock_forge
            .expect_get_issue_events()
            .returning(|_| Ok(vec![]));
        mock_forge
    }

    #[tokio::test]
    async fn writes_changelog_to_output() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("CHANGELOG.md");
        let config = GeneratorConfig {
            output: output.clone(),
            ..Default::default()
        };

        run(Arc::new(mock_forge()), config).await.unwrap();

        let content = std::fs::read_to_string(&output).unwrap();
        assert!(content.starts_with("# Changelog\n\n## [v0.2]"));
        assert!(content.contains("Support enterprise ([\\#3]"));
        assert!(content.contains("- *Fixed bug:* Broken links [\\#4]"));
        assert!(content.contains("## [v0.1](https://github.com/owner/repo/tree/v0.1)"));
    }

    #[tokio::test]
    async fn unknown_tag_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("CHANGELOG.md");
        let config = GeneratorConfig {
            output: output.clone(),
            range: TagRange::Between {
                tag1: "v1.0".into(),
                tag2: "v0.2".into(),
            },
            ..Default::default()
        };

        let result = run(Arc::new(mock_forge()), config).await;

        assert!(matches!(result, Err(ChangelogError::TagNotFound(t)) if t == "v1.0"));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn invalid_date_format_fails_before_fetching() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("CHANGELOG.md");
        let mut mock_forge = MockForge::new();
        mock_forge.expect_remote_config().never();
        mock_forge.expect_get_tags().never();
        let config = GeneratorConfig {
            output: output.clone(),
            date_format: "%Q".into(),
            ..Default::default()
        };

        let result = run(Arc::new(mock_forge), config).await;

        assert!(matches!(result, Err(ChangelogError::InvalidConfig(_))));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn forge_failure_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("CHANGELOG.md");
        let mut mock_forge = MockForge::new();
        mock_forge.expect_remote_config().returning(remote);
        mock_forge
            .expect_get_tags()
            .returning(|| Err(ChangelogError::forge("unreachable")));
        let config = GeneratorConfig {
            output: output.clone(),
            ..Default::default()
        };

        let result = run(Arc::new(mock_forge), config).await;

        assert!(matches!(result, Err(ChangelogError::ForgeError(_))));
        assert!(!output.exists());
    }
}
