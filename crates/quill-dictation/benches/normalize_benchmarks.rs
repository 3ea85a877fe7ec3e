//! Benchmarks for transcript normalization.
//!
//! Interim text is normalized on every transcript event, so a chunk of a few
//! sentences has to normalize well inside a frame. The latency check at the
//! end asserts p95 stays under 100us for a ~60 word chunk.

use std::time::Duration;

use criterion::{criterion_group, criterion_main, Criterion};
use quill_dictation::normalize::{join_to_document, normalize};

/// Generate a spoken transcript chunk (~60 words) with punctuation phrases.
///
/// The closing phrase varies by index to exercise the one, two and three word
/// lookup windows.
fn generate_spoken_chunk(index: usize) -> String {
    let ending = match index % 4 {
        0 => "full stop",
        1 => "question mark",
        2 => "exclamation point",
        _ => "new paragraph",
    };

    format!(
        "meeting notes from the product review comma the team discussed the \
         upcoming release timeline full stop sarah mentioned that the survey \
         results are available semi colon the satisfaction score improved \
         by four points new line action items colon update the runbook comma \
         finalize the alert thresholds comma and open bracket if time allows \
         close bracket clean up the dashboards {} reference {}",
        ending, index
    )
}

/// Same length, no punctuation phrases (baseline: every word misses the table).
fn generate_plain_chunk(index: usize) -> String {
    format!(
        "meeting notes from the product review the team discussed the upcoming \
         release timeline sarah mentioned that the survey results are available \
         the satisfaction score improved by four points action items update the \
         runbook finalize the alert thresholds and if time allows clean up the \
         dashboards before the next sync on thursday reference {}",
        index
    )
}

fn bench_normalize(c: &mut Criterion) {
    // Pre-generate chunks to exclude generation time from measurements.
    let spoken: Vec<String> = (0..1000).map(generate_spoken_chunk).collect();
    let plain: Vec<String> = (0..1000).map(generate_plain_chunk).collect();

    let mut group = c.benchmark_group("normalize");
    group.sample_size(200);
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("spoken_chunk", |b| {
        let mut idx = 0usize;
        b.iter(|| {
            let out = normalize(&spoken[idx % spoken.len()]);
            idx += 1;
            out
        });
    });

    group.bench_function("plain_chunk", |b| {
        let mut idx = 0usize;
        b.iter(|| {
            let out = normalize(&plain[idx % plain.len()]);
            idx += 1;
            out
        });
    });

    group.bench_function("normalize_and_join", |b| {
        let document = "Earlier paragraph that ended properly.";
        let mut idx = 0usize;
        b.iter(|| {
            let normalized = normalize(&spoken[idx % spoken.len()]);
            idx += 1;
            join_to_document(document, &normalized)
        });
    });

    group.finish();
}

/// Explicit p95 latency assertion for a single chunk.
fn bench_normalize_latency_assertion(_c: &mut Criterion) {
    let chunks: Vec<String> = (0..1000).map(generate_spoken_chunk).collect();
    let target = Duration::from_micros(100);

    let mut times = Vec::with_capacity(chunks.len());
    for chunk in &chunks {
        let start = std::time::Instant::now();
        let _out = normalize(chunk);
        times.push(start.elapsed());
    }

    times.sort();
    let p95 = times[949];
    let median = times[499];
    let max = times[times.len() - 1];

    eprintln!("\n=== Normalize Latency (1000 spoken chunks) ===");
    eprintln!("Median:  {:?}", median);
    eprintln!("p95:     {:?} (target: {:?})", p95, target);
    eprintln!("Max:     {:?}", max);

    assert!(
        p95 < target,
        "normalize p95 {:?} exceeds target {:?}",
        p95,
        target
    );
}

criterion_group!(
    benches,
    bench_normalize,
    bench_normalize_latency_assertion
);
criterion_main!(benches);
