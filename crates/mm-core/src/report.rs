use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clusters::{Cluster, clusters_from};
use crate::constants::{DEFAULT_KEYWORD_LIMIT, DEFAULT_MIN_THEME_SIZE, DEFAULT_TIME_WINDOW_DAYS};
use crate::cooccurrence::build_cooccurrence_map;
use crate::entry::Entry;
use crate::keywords::{Keyword, build_keyword_map};
use crate::patterns::{Pattern, patterns_from};
use crate::themes::{Theme, themes_from};

/// Tunable parameters of the four queries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub keyword_limit: usize,
    pub min_theme_size: usize,
    pub time_window_days: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            keyword_limit: DEFAULT_KEYWORD_LIMIT,
            min_theme_size: DEFAULT_MIN_THEME_SIZE,
            time_window_days: DEFAULT_TIME_WINDOW_DAYS,
        }
    }
}

/// All four query results over one entry collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternReport {
    pub generated_at: DateTime<Utc>,
    pub entry_count: usize,
    pub keywords: Vec<Keyword>,
    pub themes: Vec<Theme>,
    pub patterns: Vec<Pattern>,
    pub clusters: Vec<Cluster>,
}

/// Run every query against `entries`, building the keyword index and the
/// co-occurrence map once. Results are identical to calling the queries
/// one by one.
pub fn analyze(entries: &[Entry], config: &EngineConfig, now: DateTime<Utc>) -> PatternReport {
    let index = build_keyword_map(entries);
    let cooccurrence = build_cooccurrence_map(entries);

    let keywords = index
        .ranked()
        .into_iter()
        .take(config.keyword_limit)
        .cloned()
        .collect();
    let themes = themes_from(&index, &cooccurrence, config.min_theme_size);
    let patterns = patterns_from(&index, config.time_window_days, now);
    let clusters = clusters_from(&index, &cooccurrence);

    PatternReport {
        generated_at: now,
        entry_count: entries.len(),
        keywords,
        themes,
        patterns,
        clusters,
    }
}
