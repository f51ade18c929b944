//! Pipeline orchestration: fetch, extract, merge, persist.
//!
//! Two page-walking strategies are supported:
//!
//! - **Sequential**: start at page 1 and keep going while the page shows a
//!   "More" link. Works without knowing how many pages exist.
//! - **Parallel**: fetch pages `1..=K` with at most
//!   [`MAX_CONCURRENT_REQUESTS`] requests in flight.
//!
//! Whatever the strategy, pages are merged in ascending page order and rows
//! keep their on-page order, so completion order never shows in the output.
//! The first fetch failure aborts the run before anything is written.

use crate::config::{Config, MAX_CONCURRENT_REQUESTS, Strategy};
use crate::error::{FetchError, PipelineError};
use crate::models::{PageExtract, Record, RunSummary};
use crate::outputs::json;
use crate::scrapers::PageSource;
use crate::scrapers::fetch::HttpPageFetcher;
use crate::scrapers::hackernews::ListingExtractor;
use crate::scrapers::relative_time::{PhraseTimeParser, RelativeTimeParser};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt, TryStreamExt};
use itertools::Itertools;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Records of a finished walk together with its counters.
#[derive(Debug, Clone, Default)]
pub struct Collected {
    pub records: Vec<Record>,
    pub summary: RunSummary,
}

/// Drives a [`PageSource`] and a [`ListingExtractor`] across listing pages.
#[derive(Debug)]
pub struct Orchestrator<S, P = PhraseTimeParser> {
    source: S,
    extractor: ListingExtractor<P>,
    strategy: Strategy,
    parallel_pages: u32,
    concurrency: usize,
    max_pages: Option<u32>,
    /// Reference instant for relative submission times, read once per page.
    clock: fn() -> DateTime<Utc>,
}

impl<S: PageSource> Orchestrator<S> {
    pub fn new(source: S, config: &Config) -> Self {
        Self::with_extractor(source, ListingExtractor::new(), config)
    }
}

impl<S: PageSource, P: RelativeTimeParser> Orchestrator<S, P> {
    pub fn with_extractor(source: S, extractor: ListingExtractor<P>, config: &Config) -> Self {
        Self {
            source,
            extractor,
            strategy: config.strategy,
            parallel_pages: config.parallel_pages.max(1),
            concurrency: config.concurrency.clamp(1, MAX_CONCURRENT_REQUESTS),
            max_pages: config.max_pages,
            clock: Utc::now,
        }
    }

    /// Replace the wall clock used to resolve `"3 hours ago"` style times.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Walk the listing with the configured strategy.
    #[instrument(level = "info", skip(self), fields(strategy = %self.strategy))]
    pub async fn collect(&self) -> Result<Collected, FetchError> {
        let t0 = Instant::now();
        let pages = match self.strategy {
            Strategy::Sequential => self.walk_sequential().await?,
            Strategy::Parallel => self.fetch_parallel().await?,
        };
        let mut collected = merge_pages(pages);
        collected.summary.elapsed = t0.elapsed();
        Ok(collected)
    }

    /// Follow "More" links from page 1 until a page has none.
    async fn walk_sequential(&self) -> Result<Vec<(u32, PageExtract)>, FetchError> {
        let mut pages = Vec::new();
        let mut page = 1u32;
        loop {
            if self.max_pages.is_some_and(|max| page > max) {
                warn!(max_pages = ?self.max_pages, "Page cap reached; stopping walk early");
                break;
            }
            let extract = self.process_page(page).await?;
            let has_next = extract.has_next_page;
            pages.push((page, extract));
            if !has_next {
                break;
            }
            page += 1;
        }
        Ok(pages)
    }

    /// Fetch pages `1..=parallel_pages` concurrently.
    async fn fetch_parallel(&self) -> Result<Vec<(u32, PageExtract)>, FetchError> {
        info!(
            pages = self.parallel_pages,
            concurrency = self.concurrency,
            "Fetching listing pages in parallel"
        );
        let pages: Vec<(u32, PageExtract)> = stream::iter(1..=self.parallel_pages)
            .map(|page| async move { Ok::<_, FetchError>((page, self.process_page(page).await?)) })
            .buffer_unordered(self.concurrency)
            .try_collect()
            .await?;

        let last = pages.iter().max_by_key(|(page, _)| *page);
        if let Some((page, extract)) = last {
            if extract.has_next_page {
                warn!(
                    last_page = *page,
                    "Last fetched page still links to more; raise parallel_pages to cover them"
                );
            }
        }
        Ok(pages)
    }

    async fn process_page(&self, page: u32) -> Result<PageExtract, FetchError> {
        debug!(page, "Fetching listing page");
        let markup = self.source.fetch(page).await?;
        let extract = self.extractor.extract(&markup, (self.clock)());
        info!(
            page,
            records = extract.records.len(),
            skipped = extract.skipped_rows,
            has_next_page = extract.has_next_page,
            "Processed listing page"
        );
        Ok(extract)
    }
}

/// Concatenate page batches in ascending page order, dropping records whose id
/// was already seen on an earlier page.
pub fn merge_pages(mut pages: Vec<(u32, PageExtract)>) -> Collected {
    pages.sort_by_key(|(page, _)| *page);

    let pages_fetched = pages.len() as u32;
    let skipped_rows: usize = pages.iter().map(|(_, p)| p.skipped_rows).sum();
    let all: Vec<Record> = pages
        .into_iter()
        .flat_map(|(_, extract)| extract.records)
        .collect();
    let total = all.len();
    let records: Vec<Record> = all.into_iter().unique_by(|r| r.id).collect();
    let duplicates_dropped = total - records.len();
    if duplicates_dropped > 0 {
        warn!(
            duplicates_dropped,
            "Stories moved between pages during the walk; kept first occurrence"
        );
    }

    Collected {
        summary: RunSummary {
            pages_fetched,
            records: records.len(),
            skipped_rows,
            duplicates_dropped,
            ..RunSummary::default()
        },
        records,
    }
}

/// Walk `source` and write the merged records to the configured dataset path.
///
/// Nothing is written unless every page was fetched.
#[instrument(level = "info", skip_all, fields(output = %config.output_path.display()))]
pub async fn run_with_source<S: PageSource>(
    source: S,
    config: &Config,
) -> Result<RunSummary, PipelineError> {
    let orchestrator = Orchestrator::new(source, config);
    let Collected { records, summary } = orchestrator.collect().await?;
    json::persist(&records, &config.output_path).await?;
    info!(
        pages = summary.pages_fetched,
        records = summary.records,
        skipped = summary.skipped_rows,
        duplicates = summary.duplicates_dropped,
        elapsed = ?summary.elapsed,
        "Pipeline run complete"
    );
    Ok(summary)
}

/// One full refresh against the live site.
pub async fn run(config: &Config) -> Result<RunSummary, PipelineError> {
    let fetcher = HttpPageFetcher::from_config(config)?;
    run_with_source(fetcher, config).await
}
