use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use mm_core::{Entry, build_cooccurrence_map, detect_themes, generate_clusters};

const WORDS: [&str; 40] = [
    "sleep", "shift", "family", "stress", "handover", "patient", "tired", "walk", "music",
    "conflict", "mentor", "coffee", "ward", "night", "team", "dinner", "rested", "anxious",
    "calm", "deadline", "meeting", "doctor", "break", "lunch", "student", "exam", "running",
    "garden", "reading", "partner", "weekend", "holiday", "budget", "rent", "friend", "phone",
    "screen", "breathing", "journal", "gratitude",
];

/// Deterministic journal: entry `i` uses a rotating window of `words_per_entry` words.
fn journal(entries: usize, words_per_entry: usize) -> Vec<Entry> {
    (0..entries)
        .map(|i| {
            let text: Vec<&str> = (0..words_per_entry)
                .map(|j| WORDS[(i * 7 + j * 3) % WORDS.len()])
                .collect();
            let date = format!("2026-{:02}-{:02}", 1 + (i / 28) % 12, 1 + i % 28);
            Entry::incident(&format!("e{i}"), &date, &text.join(" "))
        })
        .collect()
}

fn bench_cooccurrence(c: &mut Criterion) {
    let mut group = c.benchmark_group("cooccurrence");
    for words in [5, 15, 30] {
        let entries = journal(500, words);
        group.bench_with_input(BenchmarkId::from_parameter(words), &entries, |b, entries| {
            b.iter(|| build_cooccurrence_map(black_box(entries)))
        });
    }
    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let entries = journal(1000, 12);
    c.bench_function("detect_themes_1000", |b| {
        b.iter(|| detect_themes(black_box(&entries), 2))
    });
    c.bench_function("generate_clusters_1000", |b| {
        b.iter(|| generate_clusters(black_box(&entries)))
    });
}

criterion_group!(benches, bench_cooccurrence, bench_queries);
criterion_main!(benches);
