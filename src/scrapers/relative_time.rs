//! Relative time phrase parsing.
//!
//! Listing pages show submission times as phrases like `"3 hours ago"`. The
//! extractor turns them into absolute instants through the
//! [`RelativeTimeParser`] trait so the phrase grammar can be swapped out.

use chrono::{DateTime, Duration, Months, NaiveDateTime, SecondsFormat, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

/// Resolves a human-relative time phrase against a reference instant.
pub trait RelativeTimeParser {
    /// Returns `None` when the phrase is not understood.
    fn parse(&self, phrase: &str, reference: DateTime<Utc>) -> Option<DateTime<Utc>>;
}

impl<F> RelativeTimeParser for F
where
    F: Fn(&str, DateTime<Utc>) -> Option<DateTime<Utc>>,
{
    fn parse(&self, phrase: &str, reference: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self(phrase, reference)
    }
}

static AGO_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+|an?)\s+(second|sec|minute|min|hour|day|week|month|year)s?\s+ago$")
        .expect("valid relative time regex")
});

/// Parser for the phrases the listing pages actually emit.
///
/// Understands `"<n> <unit>(s) ago"` (and `"a"`/`"an"` for one), `"just now"`,
/// `"now"`, `"today"`, `"yesterday"`, and absolute `YYYY-MM-DDTHH:MM:SS`
/// timestamps.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhraseTimeParser;

impl RelativeTimeParser for PhraseTimeParser {
    fn parse(&self, phrase: &str, reference: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let phrase = phrase.trim().to_ascii_lowercase();
        match phrase.as_str() {
            "" => return None,
            "now" | "just now" | "today" => return Some(reference),
            "yesterday" => return reference.checked_sub_signed(Duration::days(1)),
            _ => {}
        }

        if let Some(caps) = AGO_RE.captures(&phrase) {
            let amount: u32 = match &caps[1] {
                "a" | "an" => 1,
                n => n.parse().ok()?,
            };
            let amount_i64 = i64::from(amount);
            return match &caps[2] {
                "second" | "sec" => reference.checked_sub_signed(Duration::seconds(amount_i64)),
                "minute" | "min" => reference.checked_sub_signed(Duration::minutes(amount_i64)),
                "hour" => reference.checked_sub_signed(Duration::hours(amount_i64)),
                "day" => reference.checked_sub_signed(Duration::days(amount_i64)),
                "week" => reference.checked_sub_signed(Duration::weeks(amount_i64)),
                "month" => reference.checked_sub_months(Months::new(amount)),
                "year" => reference.checked_sub_months(Months::new(amount.checked_mul(12)?)),
                _ => None,
            };
        }

        NaiveDateTime::parse_from_str(&phrase, "%Y-%m-%dt%H:%M:%S")
            .ok()
            .map(|naive| naive.and_utc())
    }
}

/// Format an instant the way the dataset stores it, e.g. `2024-05-01T09:00:00.000Z`.
pub fn to_iso8601(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}
