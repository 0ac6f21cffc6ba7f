use std::cmp::Ordering;

use crate::forge::types::Issue;

pub const BUG_LABEL: &str = "bug";
pub const ENHANCEMENT_LABEL: &str = "enhancement";

/// How a closed issue is introduced in the changelog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueCategory {
    FixedBug,
    Enhancement,
    Closed,
}

impl IssueCategory {
    /// Category derived from the issue's labels. An issue labelled both
    /// "bug" and "enhancement" counts as an enhancement.
    pub fn of(issue: &Issue) -> Self {
        if issue.has_label(ENHANCEMENT_LABEL) {
            IssueCategory::Enhancement
        } else if issue.has_label(BUG_LABEL) {
            IssueCategory::FixedBug
        } else {
            IssueCategory::Closed
        }
    }

    pub fn intro(&self) -> &'static str {
        match self {
            IssueCategory::FixedBug => "Fixed bug",
            IssueCategory::Enhancement => "Implemented enhancement",
            IssueCategory::Closed => "Closed issue",
        }
    }
}

/// Unlabelled issues first, labelled ones by first label name.
fn compare_by_first_label(a: &Issue, b: &Issue) -> Ordering {
    match (a.first_label(), b.first_label()) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

/// Orders a section's issues: sorted by [`compare_by_first_label`] and then
/// reversed, so labelled issues come first in descending first label order
/// and unlabelled issues close the section.
pub fn sort_issues(issues: &mut [&Issue]) {
    issues.sort_by(|a, b| compare_by_first_label(a, b));
    issues.reverse();
}
