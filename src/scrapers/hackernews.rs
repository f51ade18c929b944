//! Hacker News listing page extractor.
//!
//! Turns the markup of one listing page (`/news?p=N`) into [`Record`]s.
//!
//! # Markup Layout
//!
//! Every story occupies two table rows followed by a decorative spacer:
//!
//! ```text
//! <tr class="athing" id="40123456">          title cell: td.title > span.titleline > a
//! <tr>  <td class="subtext"><span class="subline">
//!         span.score#score_40123456   "150 points"
//!         a.hnuser                    "alice"
//!         span.age > a                "3 hours ago"
//!         a[href^="item?"]            "42 comments"
//! <tr class="spacer">
//! ```
//!
//! The page ends with an `a.morelink` when a further page exists.
//!
//! Rows that lack an id or a title cell are skipped. Optional fields fall back
//! to their documented defaults instead of failing the page.

use crate::models::{PageExtract, Record};
use crate::scrapers::relative_time::{PhraseTimeParser, RelativeTimeParser, to_iso8601};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use tracing::{debug, trace};

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector must parse")
}

static SPACER: Lazy<Selector> = Lazy::new(|| selector("tr.spacer"));
static STORY_ROW: Lazy<Selector> = Lazy::new(|| selector("tr.athing"));
static TITLE_CELL: Lazy<Selector> = Lazy::new(|| selector("td.title"));
static TITLE_ANCHOR: Lazy<Selector> =
    Lazy::new(|| selector("a.storylink, span.titleline > a, a.titlelink"));
static SCORE: Lazy<Selector> = Lazy::new(|| selector("span.score"));
static SUBTEXT: Lazy<Selector> = Lazy::new(|| selector("td.subtext"));
static SUBLINE: Lazy<Selector> = Lazy::new(|| selector("span.subline"));
static AUTHOR: Lazy<Selector> = Lazy::new(|| selector("a.hnuser"));
static AGE: Lazy<Selector> = Lazy::new(|| selector(".age"));
static ANCHOR: Lazy<Selector> = Lazy::new(|| selector("a"));
static COMMENTS_LINK: Lazy<Selector> = Lazy::new(|| selector(r#"a[href^="item?"]"#));
static MORE_LINK: Lazy<Selector> = Lazy::new(|| selector(".morelink"));

static LEADING_INT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(\d+)").expect("valid regex"));
static COMMENTS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+).*comment").expect("valid regex"));

/// Extracts story records from listing page markup.
///
/// The extractor is pure: the same markup and reference instant always give
/// the same [`PageExtract`].
#[derive(Debug, Clone, Default)]
pub struct ListingExtractor<P = PhraseTimeParser> {
    time_parser: P,
}

impl ListingExtractor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: RelativeTimeParser> ListingExtractor<P> {
    /// Use a custom relative time parser.
    pub fn with_time_parser(time_parser: P) -> Self {
        Self { time_parser }
    }

    /// Extract every well-formed story of one page.
    ///
    /// `now` is the reference instant for relative submission times.
    pub fn extract(&self, markup: &str, now: DateTime<Utc>) -> PageExtract {
        let mut document = Html::parse_document(markup);
        remove_spacers(&mut document);

        let scores: HashMap<&str, ElementRef> = document
            .select(&SCORE)
            .filter_map(|el| {
                let id = el.value().attr("id")?.strip_prefix("score_")?;
                Some((id, el))
            })
            .collect();

        let mut page = PageExtract::default();
        let mut rows_seen = 0usize;

        for row in document.select(&STORY_ROW) {
            rows_seen += 1;
            match self.extract_row(row, &scores, now) {
                Some(record) => page.records.push(record),
                None => page.skipped_rows += 1,
            }
        }

        page.has_next_page = rows_seen > 0 && document.select(&MORE_LINK).next().is_some();
        debug!(
            rows = rows_seen,
            records = page.records.len(),
            skipped = page.skipped_rows,
            has_next_page = page.has_next_page,
            "Extracted listing page"
        );
        page
    }

    fn extract_row(
        &self,
        row: ElementRef<'_>,
        scores: &HashMap<&str, ElementRef<'_>>,
        now: DateTime<Utc>,
    ) -> Option<Record> {
        let raw_id = row.value().attr("id").unwrap_or_default();
        let Ok(id) = raw_id.trim().parse::<u64>() else {
            debug!(raw_id, "Skipping story row without a numeric id");
            return None;
        };

        let title_cells: Vec<ElementRef> = row.select(&TITLE_CELL).collect();
        if title_cells.is_empty() {
            debug!(id, "Skipping story row without a title cell");
            return None;
        }
        let anchor = title_cells
            .iter()
            .find_map(|cell| cell.select(&TITLE_ANCHOR).next());
        let title = anchor.map(element_text).unwrap_or_default();
        let link = anchor
            .and_then(|a| a.value().attr("href"))
            .map(str::to_string);

        let score = scores.get(raw_id.trim()).copied();
        let points = score.map(|el| parse_points(&element_text(el))).unwrap_or(0);

        // Rows without a score still expose their subtext, so author, age and
        // comments are read from there while points stay 0.
        let siblings = match score {
            Some(el) => siblings_of(el),
            None => subtext_children(row),
        };

        let author = siblings
            .iter()
            .find(|el| AUTHOR.matches(el))
            .map(|el| element_text(*el))
            .filter(|name| !name.is_empty());

        let comments = siblings
            .iter()
            .filter(|el| COMMENTS_LINK.matches(el))
            .find_map(|el| parse_comments(&element_text(*el)))
            .unwrap_or(0);

        let time = siblings
            .iter()
            .find(|el| AGE.matches(el))
            .and_then(|age| self.parse_age(id, *age, now));

        Some(Record {
            id,
            title,
            link,
            points,
            author,
            comments,
            time,
        })
    }

    fn parse_age(&self, id: u64, age: ElementRef<'_>, now: DateTime<Utc>) -> Option<String> {
        let phrase = age.select(&ANCHOR).next().map(element_text).unwrap_or_default();
        if let Some(instant) = self.time_parser.parse(&phrase, now) {
            return Some(to_iso8601(instant));
        }

        // Newer pages carry `title="2024-05-01T09:00:00 1714554000"` on the age span.
        let absolute = age
            .value()
            .attr("title")
            .and_then(|t| t.split_whitespace().next())
            .and_then(|stamp| self.time_parser.parse(stamp, now));
        if absolute.is_none() {
            trace!(id, %phrase, "Unparsable submission time");
        }
        absolute.map(to_iso8601)
    }
}

/// Detach decorative spacer rows so only data rows remain in the tree.
fn remove_spacers(document: &mut Html) {
    let spacer_ids: Vec<_> = document.select(&SPACER).map(|el| el.id()).collect();
    for node_id in spacer_ids {
        if let Some(mut node) = document.tree.get_mut(node_id) {
            node.detach();
        }
    }
}

/// Element siblings of `el`, excluding `el` itself.
fn siblings_of<'a>(el: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    el.parent()
        .map(|parent| {
            parent
                .children()
                .filter(|node| node.id() != el.id())
                .filter_map(ElementRef::wrap)
                .collect()
        })
        .unwrap_or_default()
}

/// Contents of the subtext cell belonging to `row`, for rows without a score.
fn subtext_children<'a>(row: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    let Some(next_row) = row.next_siblings().filter_map(ElementRef::wrap).next() else {
        return Vec::new();
    };
    if STORY_ROW.matches(&next_row) {
        return Vec::new();
    }
    let Some(cell) = next_row.select(&SUBTEXT).next() else {
        return Vec::new();
    };
    let container = cell.select(&SUBLINE).next().unwrap_or(cell);
    container.children().filter_map(ElementRef::wrap).collect()
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Leading integer of a `"<n> points"` label; 0 if there is none.
pub fn parse_points(label: &str) -> u32 {
    LEADING_INT_RE
        .captures(label)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(0)
}

/// Count from a `"<n> comments"` label. `None` for labels such as `"discuss"`.
pub fn parse_comments(label: &str) -> Option<u32> {
    COMMENTS_RE
        .captures(label.trim())
        .and_then(|caps| caps[1].parse().ok())
}
