//! Data models for cached best-reply documents and tagged output.
//!
//! - [`BestReplyDocument`]: the raw API response as stored in the cache
//! - [`Article`]: one article of a day, carrying the date it was listed on
//! - [`TaggedArticle`] and [`DailyTags`]: what the tagging pipeline emits
//!
//! The API uses camelCase field names, so the wire structs rename them onto
//! snake_case Rust fields.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The JSON document returned by the best-reply endpoint.
///
/// Only the article list is read; any other fields in the response are kept
/// in the cache file but ignored here.
#[derive(Debug, Deserialize, Serialize)]
pub struct BestReplyDocument {
    #[serde(rename = "bestreplyNewsList", default)]
    pub news: Vec<ApiArticle>,
}

/// One entry of `bestreplyNewsList` as it appears on the wire.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiArticle {
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    /// Korean name of the content provider (publisher).
    #[serde(rename = "cpKorName", default)]
    pub cp_kor_name: Option<String>,
}

/// A news article listed on a given day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub date: NaiveDate,
    pub title: String,
    pub summary: String,
    /// Publisher name; empty when the API omitted it.
    pub source_name: String,
}

impl Article {
    pub fn from_api(date: NaiveDate, api: ApiArticle) -> Self {
        Self {
            date,
            title: api.title,
            summary: api.summary.unwrap_or_default(),
            source_name: api.cp_kor_name.unwrap_or_default(),
        }
    }
}

impl BestReplyDocument {
    /// Parse a cached or freshly fetched document body into articles for `date`.
    pub fn parse_articles(date: NaiveDate, body: &str) -> serde_json::Result<Vec<Article>> {
        let document: BestReplyDocument = serde_json::from_str(body)?;
        Ok(document
            .news
            .into_iter()
            .map(|api| Article::from_api(date, api))
            .collect())
    }
}

/// An article title with the tags chosen for it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TaggedArticle {
    pub date: NaiveDate,
    pub title: String,
    pub publisher: String,
    pub tags: Vec<String>,
}

/// Every tagged article for one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DailyTags {
    pub date: NaiveDate,
    pub articles: Vec<TaggedArticle>,
}
