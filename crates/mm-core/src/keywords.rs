use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MIN_LENGTH;
use crate::entry::Entry;
use crate::tokenizer::extract_keywords;

/// Frequency and recency of one normalized word across the collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keyword {
    pub word: String,
    /// Entries containing the word. An entry contributes once per word.
    pub count: usize,
    /// Earliest parseable date among containing entries.
    pub first_seen: Option<DateTime<Utc>>,
    /// Latest parseable date among containing entries.
    pub last_seen: Option<DateTime<Utc>>,
    /// IDs of containing entries, first-encounter order, no duplicates.
    pub entries: Vec<String>,
}

impl Keyword {
    fn new(word: &str) -> Self {
        Self {
            word: word.to_string(),
            count: 0,
            first_seen: None,
            last_seen: None,
            entries: Vec::new(),
        }
    }

    fn observe_date(&mut self, date: DateTime<Utc>) {
        if self.first_seen.is_none_or(|first| date < first) {
            self.first_seen = Some(date);
        }
        if self.last_seen.is_none_or(|last| date > last) {
            self.last_seen = Some(date);
        }
    }
}

/// Keywords in first-sighting order, addressable by word or by stable ID.
///
/// The ID of a keyword is its position in insertion order, which is also
/// the tie-break order for every count-based ranking downstream.
#[derive(Clone, Debug, Default)]
pub struct KeywordIndex {
    keywords: Vec<Keyword>,
    ids: HashMap<String, usize>,
    /// Parseable date of every mention, per keyword ID.
    mentions: Vec<Vec<DateTime<Utc>>>,
    entry_count: usize,
}

impl KeywordIndex {
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Number of entries the index was built from.
    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    pub fn get(&self, word: &str) -> Option<&Keyword> {
        self.ids.get(word).map(|&id| &self.keywords[id])
    }

    pub fn id_of(&self, word: &str) -> Option<usize> {
        self.ids.get(word).copied()
    }

    /// Dates of the entries mentioning `word`, in entry order.
    /// Entries with unparseable dates are absent.
    pub fn mention_dates(&self, word: &str) -> &[DateTime<Utc>] {
        self.ids
            .get(word)
            .map(|&id| self.mentions[id].as_slice())
            .unwrap_or_default()
    }

    /// Keywords in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Keyword> {
        self.keywords.iter()
    }

    /// Keywords by descending count; equal counts keep insertion order.
    pub fn ranked(&self) -> Vec<&Keyword> {
        let mut ranked: Vec<&Keyword> = self.keywords.iter().collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked
    }

    fn observe(
        &mut self,
        word: &str,
        entry_id: &str,
        date: Option<DateTime<Utc>>,
        seen: &mut HashSet<(usize, String)>,
    ) {
        let id = match self.ids.get(word) {
            Some(&id) => id,
            None => {
                let id = self.keywords.len();
                self.keywords.push(Keyword::new(word));
                self.mentions.push(Vec::new());
                self.ids.insert(word.to_string(), id);
                id
            }
        };

        let keyword = &mut self.keywords[id];
        keyword.count += 1;
        if seen.insert((id, entry_id.to_string())) {
            keyword.entries.push(entry_id.to_string());
        }
        if let Some(date) = date {
            keyword.observe_date(date);
            self.mentions[id].push(date);
        }
    }
}

/// Aggregate every entry's keywords into a [`KeywordIndex`].
///
/// Entries whose date cannot be parsed still count toward `count` and
/// `entries`; they just leave `first_seen`/`last_seen` untouched.
pub fn build_keyword_map(entries: &[Entry]) -> KeywordIndex {
    let mut index = KeywordIndex {
        entry_count: entries.len(),
        ..KeywordIndex::default()
    };
    let mut seen = HashSet::new();

    for entry in entries {
        let date = entry.parsed_date();
        for word in extract_keywords(&entry.text(), DEFAULT_MIN_LENGTH) {
            index.observe(&word, &entry.id, date, &mut seen);
        }
    }

    tracing::debug!(
        entries = entries.len(),
        keywords = index.len(),
        "built keyword index"
    );
    index
}

/// The `limit` most frequent keywords. Ties keep first-seen order.
pub fn get_top_keywords(entries: &[Entry], limit: usize) -> Vec<Keyword> {
    build_keyword_map(entries)
        .ranked()
        .into_iter()
        .take(limit)
        .cloned()
        .collect()
}
