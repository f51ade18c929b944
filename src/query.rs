//! Read side of the dataset contract.
//!
//! The downstream query service loads the persisted dataset wholesale, sorts it
//! by `points` or `comments`, and returns one offset/limit window of it to the
//! infinite-scroll clients. These helpers implement exactly that behaviour so
//! the dataset format and the query semantics are checked together.

use crate::models::Record;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::Path;
use tracing::{info, instrument};

/// Field a query sorts by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderBy {
    #[default]
    Comments,
    Points,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    #[default]
    Desc,
    Asc,
}

/// Arguments of an items query. Missing fields take the service defaults:
/// most-commented first, ten items, from the start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ItemsQuery {
    pub order_by: OrderBy,
    pub order: Order,
    pub limit: usize,
    pub offset: usize,
}

impl Default for ItemsQuery {
    fn default() -> Self {
        Self {
            order_by: OrderBy::default(),
            order: Order::default(),
            limit: 10,
            offset: 0,
        }
    }
}

/// One window of the sorted dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemsPayload {
    /// Number of items in this window.
    pub count: usize,
    pub news_items: Vec<Record>,
}

/// Load a persisted dataset.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn load_dataset(path: &Path) -> Result<Vec<Record>, Box<dyn Error + Send + Sync>> {
    let raw = tokio::fs::read_to_string(path).await?;
    let records: Vec<Record> = serde_json::from_str(&raw)?;
    info!(count = records.len(), "Loaded dataset");
    Ok(records)
}

/// Sort `records` per `query` and cut out the requested window.
///
/// The sort is stable, so equal keys keep their dataset order in both
/// directions.
pub fn query_items(records: &[Record], query: &ItemsQuery) -> ItemsPayload {
    let key = |r: &Record| match query.order_by {
        OrderBy::Points => r.points,
        OrderBy::Comments => r.comments,
    };

    let mut sorted: Vec<&Record> = records.iter().collect();
    match query.order {
        Order::Asc => sorted.sort_by_key(|r| key(*r)),
        Order::Desc => sorted.sort_by(|a, b| key(*b).cmp(&key(*a))),
    }

    let news_items: Vec<Record> = sorted
        .into_iter()
        .skip(query.offset)
        .take(query.limit)
        .cloned()
        .collect();

    ItemsPayload {
        count: news_items.len(),
        news_items,
    }
}
