//! Data models for extracted front-page stories.
//!
//! This module defines the core data structures used throughout the pipeline:
//! - [`Record`]: One normalized story entry, as persisted in the dataset
//! - [`PageExtract`]: The records of one listing page plus its continuation signal
//! - [`RunSummary`]: Counters reported at the end of a pipeline run
//!
//! Field names of [`Record`] are the dataset contract read by the downstream
//! query service, so they must not be renamed.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A single story entry extracted from a listing page.
///
/// Records are built once by the extractor and never mutated afterwards.
/// Optional fields serialize as `null`.
///
/// # Fields
///
/// * `id` - The row's native identifier, unique across a run
/// * `title` - Anchor text of the story link; empty when the anchor is missing
/// * `link` - Destination of the story link
/// * `points` - Score, 0 for unscored posts
/// * `author` - Submitting user, absent for job posts
/// * `comments` - Comment count, 0 when the post has none
/// * `time` - Absolute submission instant as an ISO-8601 UTC string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Native identifier taken from the row's `id` attribute.
    pub id: u64,
    /// Story title.
    pub title: String,
    /// Story destination URL, relative for self posts (`item?id=...`).
    pub link: Option<String>,
    /// Score shown next to the story.
    pub points: u32,
    /// Username of the submitter.
    pub author: Option<String>,
    /// Number of comments.
    pub comments: u32,
    /// Submission time, e.g. `2024-05-01T09:00:00.000Z`.
    pub time: Option<String>,
}

/// Result of extracting a single listing page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageExtract {
    /// Records in row order.
    pub records: Vec<Record>,
    /// Whether the page advertises a further page.
    pub has_next_page: bool,
    /// Story rows that were dropped because they lacked required structure.
    pub skipped_rows: usize,
}

/// Counters describing a finished pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Number of listing pages fetched and extracted.
    pub pages_fetched: u32,
    /// Number of records in the merged collection.
    pub records: usize,
    /// Malformed rows skipped across all pages.
    pub skipped_rows: usize,
    /// Records dropped because their id already appeared on an earlier page.
    pub duplicates_dropped: usize,
    /// Wall-clock time spent fetching and extracting.
    pub elapsed: Duration,
}
