//! Journal pattern engine.
//!
//! Scans a collection of journal entries and surfaces recurring vocabulary,
//! emerging and fading topics, themes and keyword clusters. Everything is
//! plain counting and co-occurrence arithmetic: no models, no scoring.
//!
//! Zero I/O and no state between calls. Each query rebuilds its inputs from
//! the entries it is given, so a fixed input order gives identical output.

pub mod clusters;
pub mod constants;
pub mod cooccurrence;
pub mod entry;
pub mod graph;
pub mod keywords;
pub mod patterns;
pub mod report;
pub mod themes;
pub mod time;
pub mod tokenizer;

pub use clusters::{Cluster, generate_clusters};
pub use constants::{
    DEFAULT_GRAPH_NODES, DEFAULT_KEYWORD_LIMIT, DEFAULT_MIN_EDGE_WEIGHT, DEFAULT_MIN_LENGTH,
    DEFAULT_MIN_THEME_SIZE, DEFAULT_TIME_WINDOW_DAYS, MAX_CLUSTERS,
};
pub use cooccurrence::{CooccurrenceMap, build_cooccurrence_map};
pub use entry::{Entry, EntryBody};
pub use graph::{GraphEdge, GraphNode, KeywordGraph, build_keyword_graph};
pub use keywords::{Keyword, KeywordIndex, build_keyword_map, get_top_keywords};
pub use patterns::{Pattern, PatternType, Timespan, Trend, find_patterns, find_patterns_at};
pub use report::{EngineConfig, PatternReport, analyze};
pub use themes::{Theme, detect_themes};
pub use time::{now_iso8601, parse_date, to_iso8601};
pub use tokenizer::{extract_keywords, is_stopword, keyword_set};
