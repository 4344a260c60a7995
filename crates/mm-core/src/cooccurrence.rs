use std::collections::HashMap;

use indexmap::IndexMap;

use crate::constants::DEFAULT_MIN_LENGTH;
use crate::entry::Entry;
use crate::tokenizer::extract_keywords;

/// Symmetric sparse count of entries in which two keywords appear together.
///
/// Words get stable IDs in first-insertion order and each row keeps its
/// partners in first-insertion order too, so iteration is deterministic for a
/// fixed input order. `get(a, b) == get(b, a)` always holds and a word is
/// never its own partner.
#[derive(Clone, Debug, Default)]
pub struct CooccurrenceMap {
    words: Vec<String>,
    ids: HashMap<String, usize>,
    rows: Vec<IndexMap<usize, u32>>,
}

impl CooccurrenceMap {
    /// Number of words with at least one partner.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Words in first-insertion order.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    /// Shared-entry count for a pair, 0 if they never met.
    pub fn get(&self, a: &str, b: &str) -> u32 {
        match (self.ids.get(a), self.ids.get(b)) {
            (Some(&a), Some(&b)) => self.rows[a].get(&b).copied().unwrap_or(0),
            _ => 0,
        }
    }

    /// Partners of `word` with their shared-entry counts, in insertion order.
    pub fn partners<'a>(&'a self, word: &str) -> impl Iterator<Item = (&'a str, u32)> + use<'a> {
        self.ids
            .get(word)
            .map(|&id| &self.rows[id])
            .into_iter()
            .flat_map(|row| row.iter())
            .map(move |(&partner, &count)| (self.words[partner].as_str(), count))
    }

    /// Number of distinct partners of `word`.
    pub fn connections(&self, word: &str) -> usize {
        self.ids.get(word).map_or(0, |&id| self.rows[id].len())
    }

    /// Nested `word → partner → count` view, both levels in insertion order.
    pub fn to_nested(&self) -> IndexMap<String, IndexMap<String, u32>> {
        self.words
            .iter()
            .zip(&self.rows)
            .map(|(word, row)| {
                let partners = row
                    .iter()
                    .map(|(&partner, &count)| (self.words[partner].clone(), count))
                    .collect();
                (word.clone(), partners)
            })
            .collect()
    }

    fn intern(&mut self, word: &str) -> usize {
        if let Some(&id) = self.ids.get(word) {
            return id;
        }
        let id = self.words.len();
        self.words.push(word.to_string());
        self.rows.push(IndexMap::new());
        self.ids.insert(word.to_string(), id);
        id
    }

    fn record_pair(&mut self, a: &str, b: &str) {
        let a = self.intern(a);
        let b = self.intern(b);
        if a == b {
            return;
        }
        *self.rows[a].entry(b).or_insert(0) += 1;
        *self.rows[b].entry(a).or_insert(0) += 1;
    }
}

/// Count, for every keyword pair, the entries that contain both.
///
/// Each entry adds at most 1 to a pair however often the words repeat in it.
/// Cost is O(Σ wᵢ²) in the per-entry distinct keyword count wᵢ, which
/// dominates for long entries.
pub fn build_cooccurrence_map(entries: &[Entry]) -> CooccurrenceMap {
    let mut map = CooccurrenceMap::default();

    for entry in entries {
        let words = extract_keywords(&entry.text(), DEFAULT_MIN_LENGTH);
        for (i, a) in words.iter().enumerate() {
            for b in &words[i + 1..] {
                map.record_pair(a, b);
            }
        }
    }

    tracing::debug!(
        entries = entries.len(),
        words = map.len(),
        "built co-occurrence map"
    );
    map
}
