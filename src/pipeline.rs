//! The tagging sweep.
//!
//! For every date in range:
//! 1. **Vocabulary**: build the trending vocabulary around the date and add
//!    the known entities to it
//! 2. **Keywords**: extract candidate keywords from each article of the day
//! 3. **Tags**: keep the candidates that are in the vocabulary
//! 4. **Output**: hand the day's [`DailyTags`] to a [`TagSink`]
//!
//! Days are processed strictly one after another; the only state carried
//! between them is the per-day word memo inside [`TrendingWords`].

use crate::api::FetchAsync;
use crate::cache::DailyCache;
use crate::error::Result;
use crate::extract::WordExtractor;
use crate::models::{DailyTags, TaggedArticle};
use crate::tagger::PosTagger;
use crate::trending::TrendingWords;
use crate::utils::{check_range, enum_dates, truncate_for_log};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Receives each day's tagged articles as soon as they are ready.
pub trait TagSink {
    async fn emit(&mut self, daily: &DailyTags) -> Result<()>;
}

/// Totals for one sweep.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub days: usize,
    pub articles: usize,
    /// Articles that received at least one tag.
    pub tagged: usize,
}

/// Cache, extractor and trending state wired together.
#[derive(Debug)]
pub struct Pipeline<F, T> {
    cache: DailyCache<F>,
    extractor: WordExtractor<T>,
    trending: TrendingWords,
}

impl<F, T> Pipeline<F, T>
where
    F: FetchAsync,
    T: PosTagger,
{
    pub fn new(cache: DailyCache<F>, extractor: WordExtractor<T>, trending: TrendingWords) -> Self {
        Self {
            cache,
            extractor,
            trending,
        }
    }

    #[cfg(test)]
    pub(crate) fn cache(&self) -> &DailyCache<F> {
        &self.cache
    }

    /// Tag every article listed on `date`.
    #[instrument(level = "info", skip_all, fields(%date))]
    pub async fn tag_day(&mut self, date: NaiveDate, today: NaiveDate) -> Result<DailyTags> {
        let vocabulary = self
            .trending
            .vocabulary_at(date, today, &self.cache, &self.extractor)
            .await?;

        let known = self.extractor.lexicon().known_entities();
        let mut allowed: HashSet<&str> = HashSet::with_capacity(vocabulary.len() + known.len());
        allowed.extend(vocabulary.iter().map(String::as_str));
        allowed.extend(known.iter().map(String::as_str));

        let articles = self.cache.articles_at(date).await?;
        let mut tagged = Vec::with_capacity(articles.len());
        for article in articles {
            let tags: Vec<String> = self
                .extractor
                .extract_keywords(&article)?
                .into_iter()
                .filter(|keyword| allowed.contains(keyword.as_str()))
                .collect();
            debug!(
                title = %truncate_for_log(&article.title, 40),
                tags = tags.len(),
                "Tagged article"
            );
            tagged.push(TaggedArticle {
                date,
                title: article.title,
                publisher: article.source_name,
                tags,
            });
        }

        Ok(DailyTags {
            date,
            articles: tagged,
        })
    }

    /// Tag every date in `from..=to`, emitting each day to `sink`.
    #[instrument(level = "info", skip_all, fields(%from, %to))]
    pub async fn run<S: TagSink>(
        &mut self,
        from: NaiveDate,
        to: NaiveDate,
        today: NaiveDate,
        sink: &mut S,
    ) -> Result<RunStats> {
        check_range(from, to)?;
        let t0 = Instant::now();
        let mut stats = RunStats::default();

        for date in enum_dates(from, to) {
            let daily = self.tag_day(date, today).await?;
            stats.days += 1;
            stats.articles += daily.articles.len();
            stats.tagged += daily.articles.iter().filter(|a| !a.tags.is_empty()).count();
            sink.emit(&daily).await?;
        }

        info!(
            days = stats.days,
            articles = stats.articles,
            tagged = stats.tagged,
            memo_entries = self.trending.memo_len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Tagging sweep complete"
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::tests::FakeFetcher;
    use crate::extract::Lexicon;
    use crate::tagger::tests::SlashTagger;
    use crate::trending::TrendingParams;
    use std::collections::BTreeMap;
    use std::num::NonZeroUsize;
    use std::path::Path;

    #[derive(Default)]
    struct Collect(Vec<DailyTags>);

    impl TagSink for Collect {
        async fn emit(&mut self, daily: &DailyTags) -> Result<()> {
            self.0.push(daily.clone());
            Ok(())
        }
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2014, 4, day).unwrap()
    }

    fn doc(articles: &[(&str, &str)]) -> String {
        let news: Vec<serde_json::Value> = articles
            .iter()
            .map(|(title, summary)| {
                serde_json::json!({"title": title, "summary": summary, "cpKorName": "한겨레"})
            })
            .collect();
        serde_json::json!({ "bestreplyNewsList": news }).to_string()
    }

    fn fetcher() -> FakeFetcher {
        FakeFetcher::default()
            .with(d(1), doc(&[("구조 작업 난항", "구조 작업 계속 날씨 날씨")]))
            .with(d(2), doc(&[("세월호 구조", "잠수 인력 투입"), ("국회 논의", "국회 국회 회의")]))
            .with(d(3), doc(&[("구조 인력", "인력 부족")]))
    }

    fn pipeline(dir: &Path, vocabulary_size: usize) -> Pipeline<FakeFetcher, SlashTagger> {
        let lexicon = Lexicon::new(["세월호".to_string()], ["뉴스".to_string()], BTreeMap::new());
        Pipeline::new(
            DailyCache::new(dir, fetcher()),
            WordExtractor::new(SlashTagger, lexicon, 30),
            TrendingWords::new(
                TrendingParams {
                    start: d(1),
                    window_days: 1,
                    sample_size: 20,
                    vocabulary_size,
                },
                NonZeroUsize::new(16).unwrap(),
            ),
        )
    }

    #[tokio::test]
    async fn test_tags_are_keywords_in_vocabulary_or_known() {
        let dir = tempfile::tempdir().unwrap();
        let mut p = pipeline(dir.path(), 2);

        let daily = p.tag_day(d(2), d(3)).await.unwrap();

        // Window [1, 3] titles: 구조 x3, 작업, 난항, 세월호, 국회, 논의, 인력.
        // Vocabulary of two: 구조, 작업.
        assert_eq!(daily.articles.len(), 2);
        assert_eq!(daily.articles[0].title, "세월호 구조");
        assert_eq!(daily.articles[0].tags, vec!["구조", "세월호"]);
        // 국회 repeats but never made the vocabulary.
        assert_eq!(daily.articles[1].tags, Vec::<String>::new());
    }

    #[tokio::test]
    async fn test_run_covers_range_and_counts() {
        let dir = tempfile::tempdir().unwrap();
        let mut p = pipeline(dir.path(), 100);
        let mut sink = Collect::default();

        let stats = p.run(d(1), d(3), d(3), &mut sink).await.unwrap();

        assert_eq!(stats.days, 3);
        assert_eq!(stats.articles, 4);
        assert_eq!(sink.0.iter().map(|t| t.date).collect::<Vec<_>>(), vec![d(1), d(2), d(3)]);
        // 날씨 repeats in the summary but titles never mention it.
        assert_eq!(sink.0[0].articles[0].tags, vec!["구조", "작업", "난항"]);
        // Each cache file is fetched once despite overlapping windows.
        assert_eq!(p.cache().fetcher().call_count(), 3);
    }

    #[tokio::test]
    async fn test_rerun_is_identical() {
        let dir = tempfile::tempdir().unwrap();
        let mut first = Collect::default();
        let mut second = Collect::default();

        pipeline(dir.path(), 5).run(d(1), d(3), d(3), &mut first).await.unwrap();
        let mut again = pipeline(dir.path(), 5);
        again.run(d(1), d(3), d(3), &mut second).await.unwrap();

        assert_eq!(first.0, second.0);
        assert_eq!(again.cache().fetcher().call_count(), 0);
    }

    #[tokio::test]
    async fn test_run_rejects_inverted_range() {
        let dir = tempfile::tempdir().unwrap();
        let mut p = pipeline(dir.path(), 5);
        let mut sink = Collect::default();
        assert!(p.run(d(3), d(1), d(3), &mut sink).await.is_err());
        assert!(sink.0.is_empty());
    }
}
