//! Output sinks for tagged articles.
//!
//! # Submodules
//!
//! - [`text`]: the plain `title / tags / blank line` layout on stdout
//! - [`json`]: one `DailyTags` file per date for downstream consumers
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! ├── 2014-04-16.json
//! ├── 2014-04-17.json
//! └── ...
//! ```

pub mod json;
pub mod text;

use crate::error::Result;
use crate::models::DailyTags;
use crate::pipeline::TagSink;
use std::io;
use std::path::PathBuf;

/// Sends each day to stdout and/or a JSON directory.
#[derive(Debug, Default, Clone)]
pub struct OutputSink {
    /// Print the text layout to stdout.
    pub text: bool,
    /// Write one JSON file per day here when set.
    pub json_output_dir: Option<PathBuf>,
}

impl TagSink for OutputSink {
    async fn emit(&mut self, daily: &DailyTags) -> Result<()> {
        if self.text {
            text::write_tagged(&mut io::stdout().lock(), &daily.articles)?;
        }
        if let Some(dir) = &self.json_output_dir {
            json::write_daily_tags(daily, dir).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaggedArticle;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_sink_writes_json_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2016, 1, 2).unwrap();
        let daily = DailyTags {
            date,
            articles: vec![TaggedArticle {
                date,
                title: "제목".to_string(),
                publisher: String::new(),
                tags: vec![],
            }],
        };
        let mut sink = OutputSink {
            text: false,
            json_output_dir: Some(dir.path().to_path_buf()),
        };

        sink.emit(&daily).await.unwrap();
        assert!(dir.path().join("2016-01-02.json").exists());
    }
}
