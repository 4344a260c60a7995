use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{
    DAYS_PER_PERIOD, MIN_FREQUENCY_DAYS, MIN_PATTERN_ENTRIES, MIN_PATTERN_KEYWORD_COUNT,
    RECURRING_MIN_COUNT,
};
use crate::entry::Entry;
use crate::keywords::{KeywordIndex, build_keyword_map};
use crate::time::days_between;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternType {
    Recurring,
    Emerging,
    Fading,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Stable,
    Decreasing,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Timespan {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Temporal classification of a single keyword.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    #[serde(rename = "type")]
    pub kind: PatternType,
    pub keywords: Vec<String>,
    /// Mentions per 7-day period since the first mention.
    pub frequency: f64,
    pub trend: Trend,
    pub timespan: Timespan,
}

/// [`find_patterns_at`] evaluated now.
pub fn find_patterns(entries: &[Entry], time_window_days: u32) -> Vec<Pattern> {
    find_patterns_at(entries, time_window_days, Utc::now())
}

/// Classify every keyword with two or more mentions as emerging, fading or
/// recurring relative to `now`. Fewer than three entries yields nothing.
pub fn find_patterns_at(
    entries: &[Entry],
    time_window_days: u32,
    now: DateTime<Utc>,
) -> Vec<Pattern> {
    if entries.len() < MIN_PATTERN_ENTRIES {
        return Vec::new();
    }
    patterns_from(&build_keyword_map(entries), time_window_days, now)
}

/// Pattern classification over a prebuilt index.
///
/// Keywords whose containing entries all lack a parseable date are skipped:
/// without a first mention there is nothing to measure against `now`.
pub fn patterns_from(
    index: &KeywordIndex,
    time_window_days: u32,
    now: DateTime<Utc>,
) -> Vec<Pattern> {
    if index.entry_count() < MIN_PATTERN_ENTRIES {
        return Vec::new();
    }
    let window = f64::from(time_window_days);

    let mut patterns: Vec<Pattern> = index
        .iter()
        .filter(|k| k.count >= MIN_PATTERN_KEYWORD_COUNT)
        .filter_map(|keyword| {
            let (first, last) = (keyword.first_seen?, keyword.last_seen?);
            let days_since_first = days_between(first, now);
            let days_since_last = days_between(last, now);
            let frequency =
                keyword.count as f64 / days_since_first.max(MIN_FREQUENCY_DAYS) * DAYS_PER_PERIOD;

            let (kind, trend) = if days_since_first < window {
                (PatternType::Emerging, Trend::Increasing)
            } else if days_since_last > window {
                (PatternType::Fading, Trend::Decreasing)
            } else if keyword.count >= RECURRING_MIN_COUNT && days_since_first > window {
                let trend = recent_trend(index.mention_dates(&keyword.word), window, now);
                (PatternType::Recurring, trend)
            } else {
                (PatternType::Recurring, Trend::Stable)
            };

            Some(Pattern {
                kind,
                keywords: vec![keyword.word.clone()],
                frequency,
                trend,
                timespan: Timespan {
                    start: first,
                    end: last,
                },
            })
        })
        .collect();

    patterns.sort_by(|a, b| b.frequency.total_cmp(&a.frequency));
    tracing::debug!(patterns = patterns.len(), "classified patterns");
    patterns
}

/// Compare mentions inside the trailing window with all earlier mentions.
fn recent_trend(mentions: &[DateTime<Utc>], window: f64, now: DateTime<Utc>) -> Trend {
    let recent = mentions
        .iter()
        .filter(|&&date| days_between(date, now) <= window)
        .count();
    let older = mentions.len() - recent;
    match recent.cmp(&older) {
        std::cmp::Ordering::Greater => Trend::Increasing,
        std::cmp::Ordering::Less => Trend::Decreasing,
        std::cmp::Ordering::Equal => Trend::Stable,
    }
}
