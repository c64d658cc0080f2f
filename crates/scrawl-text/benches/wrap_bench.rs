//! Benchmarks for text wrapping.
//!
//! Run with: cargo bench -p scrawl-text

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

use scrawl_font::MonospaceMetrics;
use scrawl_text::WrapEngine;

// =============================================================================
// Workloads
// =============================================================================

/// ASCII prose with plenty of break opportunities.
fn ascii_text(len: usize) -> String {
    "The quick brown fox jumps over the lazy dog. "
        .chars()
        .cycle()
        .take(len)
        .collect()
}

/// CJK text: every position is a break opportunity candidate.
fn cjk_text(len: usize) -> String {
    "\u{4E2D}\u{6587}\u{6D4B}\u{8BD5}\u{3001}\u{6587}\u{672C}\u{3002}"
        .chars()
        .cycle()
        .take(len)
        .collect()
}

/// Mixed ASCII and CJK with punctuation context.
fn mixed_text(len: usize) -> String {
    "Hello \u{4E16}\u{754C}! Test \u{300C}\u{6D4B}\u{8BD5}\u{300D}. "
        .chars()
        .cycle()
        .take(len)
        .collect()
}

/// Emoji-heavy text including ZWJ sequences.
fn emoji_text(count: usize) -> String {
    "go \u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F467} now \u{1F680}\u{1F389} "
        .repeat(count)
}

/// One giant unbreakable token (hard-split worst case).
fn unbroken_text(len: usize) -> String {
    "x".repeat(len)
}

// =============================================================================
// Benches
// =============================================================================

fn bench_wrap(c: &mut Criterion) {
    let engine = WrapEngine::new();
    let font = MonospaceMetrics::unit();

    let mut group = c.benchmark_group("wrap");
    for len in [64usize, 512, 4096] {
        let workloads = [
            ("ascii", ascii_text(len)),
            ("cjk", cjk_text(len)),
            ("mixed", mixed_text(len)),
            ("unbroken", unbroken_text(len)),
        ];
        for (name, text) in workloads {
            group.throughput(Throughput::Bytes(text.len() as u64));
            group.bench_with_input(BenchmarkId::new(name, len), &text, |b, text| {
                b.iter(|| engine.wrap(black_box(text), &font, black_box(40.0)));
            });
        }
    }
    group.finish();
}

fn bench_emoji(c: &mut Criterion) {
    let engine = WrapEngine::new();
    let font = MonospaceMetrics::unit();

    let mut group = c.benchmark_group("wrap_emoji");
    for count in [8usize, 64] {
        let text = emoji_text(count);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &text, |b, text| {
            b.iter(|| engine.wrap(black_box(text), &font, black_box(10.0)));
        });
    }
    group.finish();
}

fn bench_tokenize(c: &mut Criterion) {
    let engine = WrapEngine::new();

    let mut group = c.benchmark_group("tokenize");
    for (name, text) in [
        ("ascii", ascii_text(512)),
        ("cjk", cjk_text(512)),
        ("mixed", mixed_text(512)),
    ] {
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &text, |b, text| {
            b.iter(|| engine.tokenize(black_box(text)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_wrap, bench_emoji, bench_tokenize);
criterion_main!(benches);
