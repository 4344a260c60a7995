use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{
    MAX_THEME_COMPANIONS, MAX_THEME_SEEDS, MIN_SHARED_ENTRIES, MIN_THEME_KEYWORD_COUNT,
};
use crate::cooccurrence::{CooccurrenceMap, build_cooccurrence_map};
use crate::entry::Entry;
use crate::keywords::{KeywordIndex, build_keyword_map};

/// A cluster of related keywords with its presence over time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub id: String,
    /// Seed word first, then companions by shared-entry count.
    pub keywords: Vec<String>,
    /// Size of the union of member entries.
    pub count: usize,
    /// `count` over the total number of entries.
    pub strength: f64,
    pub first_seen: Option<DateTime<Utc>>,
    pub last_seen: Option<DateTime<Utc>>,
    /// Union of member entry IDs, first-encounter order.
    pub entries: Vec<String>,
}

/// Group frequent keywords into non-overlapping themes.
pub fn detect_themes(entries: &[Entry], min_theme_size: usize) -> Vec<Theme> {
    let index = build_keyword_map(entries);
    let cooccurrence = build_cooccurrence_map(entries);
    themes_from(&index, &cooccurrence, min_theme_size)
}

/// Greedy seeded clustering over prebuilt structures.
///
/// Seeds are the most frequent keywords seen in at least two entries. Each
/// unclaimed seed takes up to three unclaimed partners that share at least
/// two entries with it; a group that reaches `min_theme_size` becomes a
/// theme and claims all of its members. Claimed words never seed or join
/// another theme, so themes are disjoint.
pub fn themes_from(
    index: &KeywordIndex,
    cooccurrence: &CooccurrenceMap,
    min_theme_size: usize,
) -> Vec<Theme> {
    let seeds = index
        .ranked()
        .into_iter()
        .filter(|k| k.count >= MIN_THEME_KEYWORD_COUNT)
        .take(MAX_THEME_SEEDS);

    let mut claimed: HashSet<&str> = HashSet::new();
    let mut themes = Vec::new();

    for seed in seeds {
        if claimed.contains(seed.word.as_str()) {
            continue;
        }

        let mut companions: Vec<(&str, u32)> = cooccurrence
            .partners(&seed.word)
            .filter(|&(word, shared)| shared >= MIN_SHARED_ENTRIES && !claimed.contains(word))
            .collect();
        companions.sort_by(|a, b| b.1.cmp(&a.1));
        companions.truncate(MAX_THEME_COMPANIONS);

        let mut members = vec![seed.word.as_str()];
        members.extend(companions.into_iter().map(|(word, _)| word));
        if members.len() < min_theme_size {
            continue;
        }

        themes.push(materialize(index, &members));
        claimed.extend(members);
    }

    themes.sort_by(|a, b| b.count.cmp(&a.count));
    tracing::debug!(themes = themes.len(), "detected themes");
    themes
}

fn materialize(index: &KeywordIndex, members: &[&str]) -> Theme {
    let mut seen = HashSet::new();
    let mut entries = Vec::new();
    let mut first_seen: Option<DateTime<Utc>> = None;
    let mut last_seen: Option<DateTime<Utc>> = None;

    for keyword in members.iter().filter_map(|word| index.get(word)) {
        for id in &keyword.entries {
            if seen.insert(id.as_str()) {
                entries.push(id.clone());
            }
        }
        if let Some(first) = keyword.first_seen {
            first_seen = Some(first_seen.map_or(first, |current| current.min(first)));
        }
        if let Some(last) = keyword.last_seen {
            last_seen = Some(last_seen.map_or(last, |current| current.max(last)));
        }
    }

    let total = index.entry_count();
    let strength = if total == 0 {
        0.0
    } else {
        entries.len() as f64 / total as f64
    };

    Theme {
        id: format!("theme-{}", members.join("-")),
        keywords: members.iter().map(|w| w.to_string()).collect(),
        count: entries.len(),
        strength,
        first_seen,
        last_seen,
        entries,
    }
}
