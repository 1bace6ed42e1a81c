use criterion::{Criterion, black_box, criterion_group, criterion_main};

use citegraph_core::{CitationTally, IdExtractor};

fn synthetic_abstract(references: usize) -> String {
    let mut text = String::new();
    for i in 0..references {
        text.push_str(&format!(
            "This result builds on arXiv:{:04}.{:05} and refines the bound from [{:04}.{:05}]. ",
            2000 + (i % 400),
            i,
            1900 + (i % 400),
            i
        ));
    }
    text
}

fn bench_extractor_scan_short(c: &mut Criterion) {
    let extractor = IdExtractor::new();
    let text = "We extend arXiv:1706.03762 with the objective of [1810.04805] \
                and evaluate against arxiv.org/abs/2005.14165.";
    c.bench_function("extractor_scan_short", |b| {
        b.iter(|| black_box(extractor.scan(black_box(text))));
    });
}

fn bench_extractor_scan_long(c: &mut Criterion) {
    let extractor = IdExtractor::new();
    let text = synthetic_abstract(200);
    c.bench_function("extractor_scan_long", |b| {
        b.iter(|| black_box(extractor.scan(black_box(&text))));
    });
}

fn bench_extractor_from_locator(c: &mut Criterion) {
    let extractor = IdExtractor::new();
    c.bench_function("extractor_from_locator", |b| {
        b.iter(|| black_box(extractor.from_locator(black_box("https://arxiv.org/abs/1706.03762v5"))));
    });
}

fn bench_tally_add(c: &mut Criterion) {
    let titles: Vec<String> = (0..500).map(|i| format!("Paper Title {}", i % 50)).collect();
    c.bench_function("tally_add_500", |b| {
        b.iter(|| {
            let mut tally = CitationTally::new();
            for title in &titles {
                tally.add(title);
            }
            black_box(tally.len())
        });
    });
}

fn bench_tally_merge(c: &mut Criterion) {
    let mut left = CitationTally::new();
    let mut right = CitationTally::new();
    for i in 0..200 {
        left.add(&format!("Left Paper {}", i % 80));
        right.add(&format!("Right Paper {}", i % 80));
    }
    c.bench_function("tally_merge_200", |b| {
        b.iter(|| {
            let mut combined = left.clone();
            combined.merge(right.clone());
            black_box(combined.len())
        });
    });
}

fn bench_tally_ranked(c: &mut Criterion) {
    let mut tally = CitationTally::new();
    for i in 0..1000 {
        tally.add(&format!("Paper Title {}", i % 300));
    }
    c.bench_function("tally_ranked_top10", |b| {
        b.iter(|| black_box(tally.ranked(10)));
    });
}

criterion_group!(
    benches,
    bench_extractor_scan_short,
    bench_extractor_scan_long,
    bench_extractor_from_locator,
    bench_tally_add,
    bench_tally_merge,
    bench_tally_ranked
);
criterion_main!(benches);
