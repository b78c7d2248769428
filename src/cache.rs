//! On-disk cache of daily best-reply documents.
//!
//! # Layout
//!
//! ```text
//! data_dir/
//! ├── 20120101.json   # raw API response, written once
//! ├── 20120102.json
//! ├── ...
//! └── today.json      # alias, overwritten by every `fetch` run
//! ```
//!
//! A cache file is treated as ground truth once it exists. New files are
//! written to a `.tmp` sibling first and renamed into place.

use crate::api::{FetchAsync, date_key};
use crate::error::Result;
use crate::models::{Article, BestReplyDocument};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, instrument};

/// Cache-or-fetch access to one document per day.
#[derive(Debug)]
pub struct DailyCache<F> {
    data_dir: PathBuf,
    fetcher: F,
}

impl<F> DailyCache<F>
where
    F: FetchAsync,
{
    pub fn new(data_dir: impl Into<PathBuf>, fetcher: F) -> Self {
        Self {
            data_dir: data_dir.into(),
            fetcher,
        }
    }

    #[cfg(test)]
    pub(crate) fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Path of the cache file called `{name}.json`.
    pub fn path_for_name(&self, name: &str) -> PathBuf {
        self.data_dir.join(format!("{name}.json"))
    }

    /// Path of the dated cache file for `date`.
    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.path_for_name(&date_key(date))
    }

    /// Return the raw document for `date`, fetching and persisting it first
    /// if no cache file exists yet.
    #[instrument(level = "debug", skip_all, fields(%date))]
    pub async fn document_at(&self, date: NaiveDate) -> Result<String> {
        let path = self.path_for(date);
        if fs::try_exists(&path).await? {
            debug!(path = %path.display(), "Cache hit");
            return Ok(fs::read_to_string(&path).await?);
        }

        info!(path = %path.display(), "Cache miss; fetching");
        let body = self.fetcher.fetch(date).await?;
        write_atomic(&path, &body).await?;
        Ok(body)
    }

    /// Parsed article list for `date`.
    pub async fn articles_at(&self, date: NaiveDate) -> Result<Vec<Article>> {
        let body = self.document_at(date).await?;
        Ok(BestReplyDocument::parse_articles(date, &body)?)
    }

    /// Download the document for `date` into the cache directory.
    ///
    /// # Arguments
    ///
    /// * `date` - The day whose best-reply list is requested
    /// * `name` - File stem to write (`{name}.json`); the dated stem when `None`
    /// * `overwrite` - Replace an existing file instead of skipping it
    ///
    /// # Returns
    ///
    /// `true` when a download happened, `false` when the file already existed
    /// and `overwrite` was not set.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// cache.fetch_to(yesterday, None, false).await?;
    /// cache.fetch_to(today, Some("today"), true).await?;
    /// ```
    #[instrument(level = "info", skip_all, fields(%date, ?name, overwrite))]
    pub async fn fetch_to(
        &self,
        date: NaiveDate,
        name: Option<&str>,
        overwrite: bool,
    ) -> Result<bool> {
        let path = match name {
            Some(name) => self.path_for_name(name),
            None => self.path_for(date),
        };

        if !overwrite && fs::try_exists(&path).await? {
            debug!(path = %path.display(), "Already cached; skipping");
            return Ok(false);
        }

        info!(path = %path.display(), "Fetching");
        let body = self.fetcher.fetch(date).await?;
        write_atomic(&path, &body).await?;
        Ok(true)
    }
}

async fn write_atomic(path: &Path, body: &str) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, body).await?;
    fs::rename(&tmp, path).await?;
    debug!(path = %path.display(), bytes = body.len(), "Wrote cache file");
    Ok(())
}
