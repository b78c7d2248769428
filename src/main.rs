//! # bestreply_trends
//!
//! Caches the Daum "best-reply" news list for every day since a fixed start
//! date and tags each article with the keywords that were trending around
//! the day it was listed.
//!
//! ## Usage
//!
//! ```sh
//! bestreply_trends fetch      # fill ./data up to yesterday, refresh today.json
//! bestreply_trends            # tag every day from the start date to today
//! ```
//!
//! ## Architecture
//!
//! 1. **Cache**: one raw JSON document per day under the data directory,
//!    fetched on first use and never refetched
//! 2. **Extraction**: known entities are matched literally, the rest of the
//!    text goes through a part-of-speech tagger and nouns are kept
//! 3. **Trending**: nouns from sampled titles across a 61-day window are
//!    ranked by frequency
//! 4. **Tagging**: an article's repeated nouns that are trending (or known
//!    entities) become its tags
//!
//! Work is strictly sequential.

use chrono::Local;
use clap::Parser;
use std::error::Error;
use std::num::NonZeroUsize;
use std::time::Duration as StdDuration;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cache;
mod cli;
mod config;
mod error;
mod extract;
mod models;
mod outputs;
mod pipeline;
mod tagger;
mod trending;
mod utils;

use api::{FetchAsync, HttpFetcher, RetryFetch};
use cache::DailyCache;
use cli::{Cli, Command};
use config::Config;
use extract::{Lexicon, WordExtractor};
use outputs::OutputSink;
use pipeline::Pipeline;
use trending::{TrendingParams, TrendingWords};
use utils::{check_range, enum_dates, ensure_writable_dir, previous_day};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let start_time = std::time::Instant::now();
    info!("bestreply_trends starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(data_dir) = &args.data_dir {
        config.data_dir = data_dir.clone();
    }
    if let Some(start_date) = args.start_date {
        config.start_date = start_date;
    }

    if let Err(e) = ensure_writable_dir(&config.data_dir).await {
        error!(
            path = %config.data_dir.display(),
            error = %e,
            "Data directory is not writable (fix perms or choose a different path)"
        );
        return Err(e.into());
    }

    let today = Local::now().date_naive();
    let result = match args.action() {
        Command::Fetch { limit } => run_fetch(&config, limit, today).await,
        Command::Tag {
            end_date,
            json_output_dir,
            quiet,
        } => {
            let sink = OutputSink {
                text: !quiet,
                json_output_dir,
            };
            run_tag(&config, end_date.unwrap_or(today), today, sink).await
        }
    };

    if let Err(e) = &result {
        error!(error = %e, "Run aborted");
    }
    result?;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    Ok(())
}

fn build_fetcher(
    config: &Config,
    limit: Option<NonZeroUsize>,
) -> impl FetchAsync + std::fmt::Debug {
    let limit = limit.map_or(config.fetch_limit, NonZeroUsize::get);
    let http = HttpFetcher::new(config.endpoint.clone(), limit);
    RetryFetch::new(
        http,
        config.retry.max_retries,
        StdDuration::from_millis(config.retry.base_delay_ms),
    )
}

/// Fill the cache for every day before `today`, then overwrite `today.json`.
#[instrument(level = "info", skip_all, fields(start = %config.start_date, %today))]
async fn run_fetch(
    config: &Config,
    limit: Option<NonZeroUsize>,
    today: chrono::NaiveDate,
) -> error::Result<()> {
    let cache = DailyCache::new(&config.data_dir, build_fetcher(config, limit));

    let end = previous_day(today);
    let mut fetched = 0usize;
    let mut skipped = 0usize;
    for date in enum_dates(config.start_date, end) {
        if cache.fetch_to(date, None, false).await? {
            fetched += 1;
        } else {
            skipped += 1;
        }
    }
    cache.fetch_to(today, Some("today"), true).await?;

    info!(fetched, skipped, "Cache fill complete");
    Ok(())
}

/// Run the tagging sweep from the configured start date to `end`.
#[instrument(level = "info", skip_all, fields(start = %config.start_date, %end))]
async fn run_tag(
    config: &Config,
    end: chrono::NaiveDate,
    today: chrono::NaiveDate,
    mut sink: OutputSink,
) -> error::Result<()> {
    check_range(config.start_date, end)?;

    let memo_capacity = NonZeroUsize::new(config.memo_capacity).ok_or_else(|| {
        error::Error::InvalidConfig("memo_capacity must be greater than zero".to_string())
    })?;

    let tagger = tagger::default_tagger()?;
    let extractor = WordExtractor::new(tagger, Lexicon::from_config(config), config.top_nouns);
    let trending = TrendingWords::new(
        TrendingParams {
            start: config.start_date,
            window_days: config.window_days,
            sample_size: config.sample_size,
            vocabulary_size: config.vocabulary_size,
        },
        memo_capacity,
    );
    let cache = DailyCache::new(&config.data_dir, build_fetcher(config, None));

    let mut pipeline = Pipeline::new(cache, extractor, trending);
    let stats = pipeline
        .run(config.start_date, end, today, &mut sink)
        .await?;
    info!(
        days = stats.days,
        articles = stats.articles,
        tagged = stats.tagged,
        "Tagging complete"
    );
    Ok(())
}
