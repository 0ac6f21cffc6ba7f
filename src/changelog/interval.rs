use chrono::{DateTime, Utc};
use log::*;

use crate::{
    ChangelogError, Result, changelog::tag_times::ResolvedTag,
    config::TagRange,
};

/// Time window `(older, newer]` between two tags. Without an older tag the
/// window is unbounded below.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    pub older: Option<ResolvedTag>,
    pub newer: ResolvedTag,
}

impl Interval {
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        let above_older = self
            .older
            .as_ref()
            .is_none_or(|older| timestamp > older.timestamp);

        above_older && timestamp <= self.newer.timestamp
    }

    pub fn older_name(&self) -> Option<&str> {
        self.older.as_ref().map(|t| t.name())
    }

    pub fn newer_name(&self) -> &str {
        self.newer.name()
    }
}

/// Splits tags, sorted newest first, into the intervals selected by `range`.
pub fn partition(
    tags: &[ResolvedTag],
    range: &TagRange,
) -> Result<Vec<Interval>> {
    match range {
        TagRange::All => whole_history(tags),
        TagRange::Last => last(tags).map(|i| vec![i]),
        TagRange::Between { tag1, tag2 } => {
            between(tags, tag1, tag2).map(|i| vec![i])
        }
    }
}

/// One interval per adjacent pair of tags, newest first, followed by the
/// interval covering everything up to the oldest tag.
fn whole_history(tags: &[ResolvedTag]) -> Result<Vec<Interval>> {
    let oldest = tags.last().ok_or(ChangelogError::MissingNewerTag)?;

    let mut intervals = tags
        .windows(2)
        .map(|pair| Interval {
            older: Some(pair[1].clone()),
            newer: pair[0].clone(),
        })
        .collect::<Vec<Interval>>();

    intervals.push(Interval {
        older: None,
        newer: oldest.clone(),
    });

    debug!("partitioned {} tags into {} intervals", tags.len(), intervals.len());

    Ok(intervals)
}

fn last(tags: &[ResolvedTag]) -> Result<Interval> {
    let newer = tags.first().ok_or(ChangelogError::MissingNewerTag)?;

    Ok(Interval {
        older: tags.get(1).cloned(),
        newer: newer.clone(),
    })
}

fn between(tags: &[ResolvedTag], tag1: &str, tag2: &str) -> Result<Interval> {
    let position = |name: &str| {
        tags.iter()
            .position(|t| t.name() == name)
            .ok_or_else(|| ChangelogError::tag_not_found(name))
    };

    let first = position(tag1)?;
    let second = position(tag2)?;

    // tags are sorted newest first, the higher index is the older tag
    let (newer, older) = if first <= second {
        (first, second)
    } else {
        (second, first)
    };

    if newer == older {
        warn!("range starts and ends at {tag1}: section will be empty");
    }

    Ok(Interval {
        older: Some(tags[older].clone()),
        newer: tags[newer].clone(),
    })
}
