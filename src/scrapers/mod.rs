//! Listing page retrieval and extraction.
//!
//! The pipeline reads the site in two steps per page:
//!
//! 1. **Fetching**: Download the raw markup of one listing page ([`PageSource`])
//! 2. **Extracting**: Turn that markup into records ([`hackernews::ListingExtractor`])
//!
//! # Submodules
//!
//! | Module | Role |
//! |--------|------|
//! | [`fetch`] | HTTP implementation of [`PageSource`] |
//! | [`hackernews`] | Story row parsing and "More" link detection |
//! | [`relative_time`] | `"3 hours ago"` → absolute instant |

use crate::error::FetchError;

pub mod fetch;
pub mod hackernews;
pub mod relative_time;

#[cfg(test)]
pub(crate) mod fixtures;

/// Source of raw listing page markup.
///
/// Page indices are 1-based. Implementations perform one retrieval per call
/// and never cache.
pub trait PageSource {
    async fn fetch(&self, page: u32) -> Result<String, FetchError>;
}
