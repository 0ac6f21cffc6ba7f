use futures::future::join_all;
use log::*;
use std::{future::Future, sync::Arc};

use crate::{
    ChangelogError, Result,
    forge::{
        traits::Forge,
        types::{CLOSED_EVENT, Issue},
    },
};

/// Runs `work` concurrently once per issue, each future owning its issue.
/// Output order matches input order.
async fn for_each_issue<F, Fut>(
    forge: &Arc<dyn Forge>,
    issues: Vec<Issue>,
    work: F,
) -> Vec<Issue>
where
    F: Fn(Arc<dyn Forge>, Issue) -> Fut,
    Fut: Future<Output = Issue>,
{
    let futs = issues
        .into_iter()
        .map(|issue| work(Arc::clone(forge), issue));

    join_all(futs).await
}

/// Attaches the event history to every issue. An issue whose events cannot
/// be fetched keeps an empty history.
pub async fn fetch_events(
    forge: &Arc<dyn Forge>,
    issues: Vec<Issue>,
) -> Vec<Issue> {
    info!("Fetching events for issues: 0/{}", issues.len());

    let issues = for_each_issue(forge, issues, |forge, mut issue| async move {
        match forge.get_issue_events(issue.number).await {
            Ok(events) => issue.events = events,
            Err(err) => warn!(
                "{}",
                ChangelogError::event_resolution(issue.number, err)
            ),
        }
        issue
    })
    .await;

    info!("Fetching events for issues: Done!");

    issues
}

/// Sets `actual_date` on every issue that was closed by a commit. Failures
/// are logged and leave that issue's `actual_date` unset.
pub async fn resolve_actual_dates(
    forge: &Arc<dyn Forge>,
    issues: Vec<Issue>,
) -> Vec<Issue> {
    info!("Fetching close commit date for issues...");

    let issues = for_each_issue(forge, issues, |forge, mut issue| async move {
        let found =
            find_closed_date_by_commit(forge.as_ref(), &mut issue).await;

        if let Err(err) = found {
            warn!("{err}");
        }
        issue
    })
    .await;

    let unresolved = issues.iter().filter(|i| i.actual_date.is_none()).count();
    debug!("{unresolved} issues kept their recorded close date");

    info!("Fetching close commit date for issues: Done!");

    issues
}

/// Looks at the most recent "closed" event: the author date of its commit
/// when it references one, the recorded close time otherwise.
pub async fn find_closed_date_by_commit(
    forge: &dyn Forge,
    issue: &mut Issue,
) -> Result<()> {
    let closing_sha = match issue
        .events
        .iter()
        .rev()
        .find(|e| e.kind == CLOSED_EVENT)
    {
        Some(event) => event.commit_sha.clone(),
        None => return Ok(()),
    };

    issue.actual_date = match closing_sha {
        Some(sha) => {
            let commit = forge
                .get_commit(&sha)
                .await
                .map_err(|e| ChangelogError::event_resolution(issue.number, e))?;
            Some(commit.author_date)
        }
        None => issue.closed_at,
    };

    Ok(())
}
