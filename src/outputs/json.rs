//! JSON output of tagged articles.
//!
//! Each processed date is written to `{json_output_dir}/{YYYY-MM-DD}.json`.
//! Re-running the pipeline over the same cache overwrites the file with
//! identical content.

use crate::error::Result;
use crate::models::DailyTags;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Path of the JSON file for `daily`.
pub fn daily_path(json_output_dir: &Path, daily: &DailyTags) -> PathBuf {
    json_output_dir.join(format!("{}.json", daily.date.format("%Y-%m-%d")))
}

/// Write a [`DailyTags`] as pretty-printed JSON, creating the directory if
/// needed.
#[instrument(level = "debug", skip_all, fields(date = %daily.date))]
pub async fn write_daily_tags(daily: &DailyTags, json_output_dir: &Path) -> Result<PathBuf> {
    let json = serde_json::to_string_pretty(daily)?;

    if let Err(e) = fs::create_dir_all(json_output_dir).await {
        error!(dir = %json_output_dir.display(), error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let path = daily_path(json_output_dir, daily);
    fs::write(&path, json).await?;
    info!(path = %path.display(), articles = daily.articles.len(), "Wrote daily tags");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaggedArticle;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_write_daily_tags() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2015, 6, 1).unwrap();
        let daily = DailyTags {
            date,
            articles: vec![TaggedArticle {
                date,
                title: "메르스 확산".to_string(),
                publisher: "한겨레".to_string(),
                tags: vec!["메르스".to_string()],
            }],
        };

        let out_dir = dir.path().join("tags");
        let path = write_daily_tags(&daily, &out_dir).await.unwrap();
        assert_eq!(path, out_dir.join("2015-06-01.json"));

        let back: DailyTags =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, daily);
    }
}
