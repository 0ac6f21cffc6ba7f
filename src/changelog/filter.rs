use chrono::{DateTime, Utc};
use std::collections::HashSet;

use crate::{changelog::interval::Interval, forge::types::Issue};

/// Entities whose timestamp, as picked by `selector`, lies inside the
/// interval. Entities without a timestamp are skipped.
pub fn filter_by_interval<'a, T, F>(
    entities: &'a [T],
    selector: F,
    interval: &Interval,
) -> Vec<&'a T>
where
    F: Fn(&T) -> Option<DateTime<Utc>>,
{
    entities
        .iter()
        .filter(|e| selector(*e).is_some_and(|t| interval.contains(t)))
        .collect()
}

/// Lets milestones take precedence over timestamps: issues whose milestone
/// names a tag are removed from `filtered`, then every issue whose milestone
/// names the interval's newer tag is added back from `all_issues`.
pub fn reconcile_milestones<'a>(
    filtered: Vec<&'a Issue>,
    all_issues: &'a [Issue],
    interval: &Interval,
    tag_names: &HashSet<&str>,
) -> Vec<&'a Issue> {
    let milestone_is_tag = |issue: &Issue| {
        issue
            .milestone_title()
            .is_some_and(|title| tag_names.contains(title))
    };

    let mut reconciled = filtered
        .into_iter()
        .filter(|issue| !milestone_is_tag(*issue))
        .collect::<Vec<&Issue>>();

    let mut numbers =
        reconciled.iter().map(|i| i.number).collect::<HashSet<u64>>();

    for issue in all_issues.iter() {
        if milestone_is_tag(issue)
            && issue.milestone_title() == Some(interval.newer_name())
            && numbers.insert(issue.number)
        {
            reconciled.push(issue);
        }
    }

    reconciled
}
