use chrono::{DateTime, Utc};
use futures::future::join_all;
use log::*;
use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};
use tokio::sync::RwLock;

use crate::{
    Result,
    forge::{traits::Forge, types::Tag},
};

/// A tag together with the commit timestamp it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTag {
    pub tag: Tag,
    pub timestamp: DateTime<Utc>,
}

impl ResolvedTag {
    pub fn name(&self) -> &str {
        &self.tag.name
    }
}

/// Tag name to commit timestamp mapping shared by every resolution task of a
/// run. A tag always resolves to the same timestamp so overlapping writes are
/// harmless.
#[derive(Debug, Clone, Default)]
pub struct TagTimeCache {
    times: Arc<RwLock<HashMap<String, DateTime<Utc>>>>,
}

impl TagTimeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, name: &str) -> Option<DateTime<Utc>> {
        self.times.read().await.get(name).copied()
    }

    pub async fn insert(&self, name: &str, timestamp: DateTime<Utc>) {
        self.times.write().await.insert(name.to_string(), timestamp);
    }

    pub async fn len(&self) -> usize {
        self.times.read().await.len()
    }
}

/// Maps tags to the committer date of the commit they point at.
#[derive(Clone)]
pub struct TimeResolver {
    forge: Arc<dyn Forge>,
    cache: TagTimeCache,
}

impl TimeResolver {
    pub fn new(forge: Arc<dyn Forge>, cache: TagTimeCache) -> Self {
        Self { forge, cache }
    }

    pub fn cache(&self) -> &TagTimeCache {
        &self.cache
    }

    /// Timestamp of a single tag, fetched once and then served from cache.
    pub async fn resolve(&self, tag: &Tag) -> Result<DateTime<Utc>> {
        if let Some(timestamp) = self.cache.get(&tag.name).await {
            return Ok(timestamp);
        }

        debug!("fetching commit date for tag {}", tag.name);

        let commit = self.forge.get_commit(&tag.commit_sha).await?;
        self.cache.insert(&tag.name, commit.committer_date).await;

        Ok(commit.committer_date)
    }

    /// Resolves all tags concurrently, one lookup per distinct tag name, and
    /// returns them sorted newest first. Tags sharing a timestamp keep their
    /// input order.
    pub async fn resolve_all(&self, tags: &[Tag]) -> Result<Vec<ResolvedTag>> {
        info!("Fetching tags dates..");

        let mut seen = HashSet::new();
        let mut unique = vec![];

        for tag in tags.iter() {
            if seen.insert(tag.name.as_str()) {
                unique.push(tag.clone());
            } else {
                warn!("ignoring duplicate tag name: {}", tag.name);
            }
        }

        let futs = unique.iter().map(|tag| self.resolve(tag));
        let times = join_all(futs)
            .await
            .into_iter()
            .collect::<Result<Vec<DateTime<Utc>>>>()?;

        let mut resolved = unique
            .into_iter()
            .zip(times)
            .map(|(tag, timestamp)| ResolvedTag { tag, timestamp })
            .collect::<Vec<ResolvedTag>>();

        debug!("{} tag timestamps cached", self.cache.len().await);

        debug!("Sorting tags..");

        sort_newest_first(&mut resolved);

        Ok(resolved)
    }
}

/// Stable sort by timestamp, most recent first.
pub fn sort_newest_first(tags: &mut [ResolvedTag]) {
    tags.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}
