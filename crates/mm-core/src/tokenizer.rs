use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::constants::DEFAULT_MIN_LENGTH;

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\W").unwrap());

/// Low-information words excluded from analysis.
///
/// Apostrophes are split like any other non-word character, so the leading
/// half of common contractions ("don't" → "don") is listed as well.
const STOPWORD_LIST: [&str; 97] = [
    "the", "and", "for", "are", "but", "not", "you", "all", "any", "can", "had", "her", "was",
    "one", "our", "out", "has", "have", "him", "his", "how", "its", "may", "she", "who", "why",
    "what", "when", "where", "which", "this", "that", "these", "those", "with", "from", "they",
    "them", "their", "there", "then", "than", "been", "being", "were", "will", "would", "could",
    "should", "into", "about", "your", "yours", "just", "also", "very", "some", "such", "only",
    "own", "same", "too", "does", "did", "doing", "each", "few", "more", "most", "other", "over",
    "again", "here", "once", "both", "because", "while", "myself", "yourself", "himself",
    "herself", "itself", "ourselves", "themselves", "don", "doesn", "didn", "isn", "aren", "wasn",
    "weren", "won", "wouldn", "couldn", "shouldn", "haven", "hasn",
];

static STOPWORDS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOPWORD_LIST.into_iter().collect());

pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(word)
}

/// Extract the distinct keywords of `text`, in order of first appearance.
///
/// Lower-cases, turns every non-word character into a space and splits on
/// whitespace, then drops stopwords and tokens with fewer than `min_length`
/// characters.
pub fn extract_keywords(text: &str, min_length: usize) -> Vec<String> {
    let lowered = text.to_lowercase();
    let cleaned = NON_WORD.replace_all(&lowered, " ");
    let mut seen = HashSet::new();
    cleaned
        .split_whitespace()
        .filter(|t| t.chars().count() >= min_length && !is_stopword(t))
        .filter(|t| seen.insert(*t))
        .map(str::to_string)
        .collect()
}

/// [`extract_keywords`] with the default minimum length, as a set.
pub fn keyword_set(text: &str) -> HashSet<String> {
    extract_keywords(text, DEFAULT_MIN_LENGTH).into_iter().collect()
}
