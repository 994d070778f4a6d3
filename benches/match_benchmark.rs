use criterion::{black_box, criterion_group, criterion_main, Criterion};

use seqscan::{MatchOptions, Matcher, Reporting};

// Deterministic pseudo-random DNA sequence.
fn random_sequence(len: usize) -> String {
    const BASES: [char; 4] = ['A', 'C', 'G', 'T'];
    let mut state = 0x9E37_79B9_7F4A_7C15u64;
    (0..len)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            BASES[(state >> 33) as usize % 4]
        })
        .collect()
}

fn bench_scan(c: &mut Criterion) {
    let haystack = random_sequence(1 << 16);
    for tau in [0usize, 1, 2] {
        c.bench_function(&format!("scan 64k, tau {tau}"), |b| {
            let mut matcher = Matcher::new("ACGTAGGT", tau).unwrap();
            let options = MatchOptions::new().with_reporting(Reporting::All);
            b.iter(|| black_box(matcher.match_string(&haystack, options).unwrap()));
        });
    }
}

fn bench_scan_memory_bounded(c: &mut Criterion) {
    let haystack = random_sequence(1 << 16);
    c.bench_function("scan 64k, tau 2, cache mode", |b| {
        let mut matcher = seqscan::MatcherBuilder::new()
            .memory_limit(1)
            .build("ACGTAGGT", 2)
            .unwrap();
        let options = MatchOptions::new().with_reporting(Reporting::All);
        b.iter(|| black_box(matcher.match_string(&haystack, options).unwrap()));
    });
}

criterion_group!(benches, bench_scan, bench_scan_memory_bounded);
criterion_main!(benches);
