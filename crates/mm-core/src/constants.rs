/// Shortest token the tokenizer keeps.
pub const DEFAULT_MIN_LENGTH: usize = 3;

/// Default number of keywords returned by `get_top_keywords`.
pub const DEFAULT_KEYWORD_LIMIT: usize = 20;

/// Default minimum member count for a theme (seed included).
pub const DEFAULT_MIN_THEME_SIZE: usize = 2;

/// Default look-back window for temporal classification, in days.
pub const DEFAULT_TIME_WINDOW_DAYS: u32 = 30;

/// Themes: a keyword must appear in at least this many entries to seed one.
pub const MIN_THEME_KEYWORD_COUNT: usize = 2;

/// Themes: only the most frequent keywords are tried as seeds.
pub const MAX_THEME_SEEDS: usize = 20;

/// Themes: a companion must share at least this many entries with its seed.
pub const MIN_SHARED_ENTRIES: u32 = 2;

/// Themes: companions attached to one seed.
pub const MAX_THEME_COMPANIONS: usize = 3;

/// Patterns: fewer entries than this carries no temporal signal.
pub const MIN_PATTERN_ENTRIES: usize = 3;

/// Patterns: a keyword needs this many mentions to be classified at all.
pub const MIN_PATTERN_KEYWORD_COUNT: usize = 2;

/// Patterns: mentions required for the long-running recurring rule.
pub const RECURRING_MIN_COUNT: usize = 3;

/// Patterns: frequency is reported per period of this many days.
pub const DAYS_PER_PERIOD: f64 = 7.0;

/// Patterns: floor on the frequency denominator (same-day data).
pub const MIN_FREQUENCY_DAYS: f64 = 1.0;

/// Clusters: partners attached to one seed.
pub const MAX_CLUSTER_PARTNERS: usize = 4;

/// Clusters: result cap.
pub const MAX_CLUSTERS: usize = 10;

/// Graph: default node cap.
pub const DEFAULT_GRAPH_NODES: usize = 30;

/// Graph: default minimum shared-entry count for an edge.
pub const DEFAULT_MIN_EDGE_WEIGHT: u32 = 2;
