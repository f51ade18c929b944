//! Error types for the extraction pipeline.
//!
//! Only run-level failures live here. Per-row and per-field problems are
//! recovered inside the extractor and never surface as errors.

use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to retrieve a listing page. Fatal to the run; never retried.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("page index must be 1 or greater, got {0}")]
    InvalidPage(u32),
    #[error("invalid listing base URL: {0}")]
    BaseUrl(#[source] url::ParseError),
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request for page {page} failed: {source}")]
    Transport {
        page: u32,
        #[source]
        source: reqwest::Error,
    },
    #[error("page {page} returned HTTP {status}")]
    Status { page: u32, status: StatusCode },
    #[error("could not read body of page {page}: {source}")]
    Body {
        page: u32,
        #[source]
        source: reqwest::Error,
    },
}

/// Failure to write the final dataset. Fatal to the run.
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("could not serialize dataset: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("could not create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not move {from} into place at {to}: {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Invalid or unreadable configuration. Raised before any page is fetched.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Any fatal failure of a pipeline run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Persist(#[from] PersistError),
}
