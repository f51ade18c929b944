//! # hn_frontpage
//!
//! Mirrors a news-aggregation front page: walks the paginated HTML listing,
//! extracts every story into a normalized [`models::Record`], and writes the
//! collection as a flat JSON dataset for a downstream query service.
//!
//! ## Architecture
//!
//! The crate follows a pipeline architecture:
//! 1. **Fetching**: Download listing pages by index ([`scrapers::fetch`])
//! 2. **Extracting**: Parse story rows and the "More" link ([`scrapers::hackernews`])
//! 3. **Merging**: Concatenate pages in page order, sequentially or up to 4 at a time ([`pipeline`])
//! 4. **Output**: Atomically replace the JSON dataset ([`outputs::json`])
//!
//! The read side of the dataset (sort + offset/limit) lives in [`query`].

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod outputs;
pub mod pipeline;
pub mod query;
pub mod scrapers;
pub mod utils;
