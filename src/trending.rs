//! Trending vocabulary over a sliding window of days.
//!
//! For a target date the vocabulary is built from the titles of the first
//! `sample_size` articles of every day in a `2 * window_days + 1` day window,
//! ranked by frequency. Per-day word lists are expensive (one tagger pass per
//! title) and every date's window overlaps its neighbours' almost entirely,
//! so they are memoized in a bounded LRU keyed by `(date, sample_size)`.

use crate::api::FetchAsync;
use crate::cache::DailyCache;
use crate::error::{Error, Result};
use crate::extract::{WordExtractor, most_common};
use crate::tagger::PosTagger;
use crate::utils::enum_dates;
use chrono::{Duration, NaiveDate};
use lru::LruCache;
use std::num::NonZeroUsize;
use tracing::{debug, instrument};

/// The inclusive window of days considered for `date`.
///
/// The window is `[date - half_width, date + half_width]`. Near the start of
/// history it is shifted forward to begin at `start`; near today it is
/// shifted backward to end at `today`. It is only shorter than
/// `2 * half_width + 1` days when `[start, today]` itself is. A window wider
/// than the calendar simply covers `[start, today]`; a width that does not
/// fit in a [`Duration`], or is negative, is an error.
pub fn trending_window(
    date: NaiveDate,
    start: NaiveDate,
    today: NaiveDate,
    half_width: i64,
) -> Result<(NaiveDate, NaiveDate)> {
    if start > today {
        return Err(Error::InvalidDateRange { start, end: today });
    }
    let out_of_range = || Error::WindowOutOfRange { date, half_width };
    let half = Some(half_width)
        .filter(|h| *h >= 0)
        .and_then(Duration::try_days)
        .ok_or_else(out_of_range)?;
    let width = half.checked_add(&half).ok_or_else(out_of_range)?;

    let mut from = date.checked_sub_signed(half).unwrap_or(NaiveDate::MIN);
    let mut to = date.checked_add_signed(half).unwrap_or(NaiveDate::MAX);

    if from < start {
        from = start;
        to = from.checked_add_signed(width).unwrap_or(NaiveDate::MAX);
    }
    if to > today {
        to = today;
        from = to.checked_sub_signed(width).unwrap_or(NaiveDate::MIN).max(start);
    }
    Ok((from, to))
}

/// Sizes that shape a trending vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendingParams {
    pub start: NaiveDate,
    pub window_days: i64,
    pub sample_size: usize,
    pub vocabulary_size: usize,
}

/// Computes trending vocabularies, remembering per-day word lists.
#[derive(Debug)]
pub struct TrendingWords {
    params: TrendingParams,
    memo: LruCache<(NaiveDate, usize), Vec<String>>,
}

impl TrendingWords {
    pub fn new(params: TrendingParams, memo_capacity: NonZeroUsize) -> Self {
        Self {
            params,
            memo: LruCache::new(memo_capacity),
        }
    }

    /// Number of per-day word lists currently memoized.
    pub fn memo_len(&self) -> usize {
        self.memo.len()
    }

    /// Forget every memoized word list, e.g. after cache files were replaced.
    pub fn clear(&mut self) {
        self.memo.clear();
    }

    /// Nouns from the titles of the first `sample_size` articles of `date`.
    pub async fn words_at<F, T>(
        &mut self,
        date: NaiveDate,
        cache: &DailyCache<F>,
        extractor: &WordExtractor<T>,
    ) -> Result<Vec<String>>
    where
        F: FetchAsync,
        T: PosTagger,
    {
        let key = (date, self.params.sample_size);
        if let Some(words) = self.memo.get(&key) {
            return Ok(words.clone());
        }

        let articles = cache.articles_at(date).await?;
        let mut words = Vec::new();
        for article in articles.iter().take(self.params.sample_size) {
            words.extend(extractor.extract_words(&article.title)?);
        }
        debug!(%date, count = words.len(), "Computed daily title words");

        self.memo.put(key, words.clone());
        Ok(words)
    }

    /// Up to `vocabulary_size` words, most frequent first, across the window
    /// around `date`.
    ///
    /// # Arguments
    ///
    /// * `date` - Center of the window
    /// * `today` - Last day that may be read; the window never passes it
    /// * `cache` - Source of each day's article list
    /// * `extractor` - Turns sampled titles into words
    ///
    /// # Returns
    ///
    /// The ranked vocabulary, or the first cache or tagger error met while
    /// reading the window.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let vocabulary = trending.vocabulary_at(date, today, &cache, &extractor).await?;
    /// assert!(vocabulary.len() <= 3000);
    /// ```
    #[instrument(level = "info", skip_all, fields(%date))]
    pub async fn vocabulary_at<F, T>(
        &mut self,
        date: NaiveDate,
        today: NaiveDate,
        cache: &DailyCache<F>,
        extractor: &WordExtractor<T>,
    ) -> Result<Vec<String>>
    where
        F: FetchAsync,
        T: PosTagger,
    {
        let (from, to) =
            trending_window(date, self.params.start, today, self.params.window_days)?;

        let mut words = Vec::new();
        for day in enum_dates(from, to) {
            words.extend(self.words_at(day, cache, extractor).await?);
        }

        let vocabulary: Vec<String> = most_common(&words, self.params.vocabulary_size)
            .into_iter()
            .map(|(word, _)| word)
            .collect();
        debug!(
            %from,
            %to,
            sampled = words.len(),
            size = vocabulary.len(),
            "Built trending vocabulary"
        );
        Ok(vocabulary)
    }
}
