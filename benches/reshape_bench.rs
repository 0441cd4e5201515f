//! Response reshaping performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use exa_cli::output::{filter_fields, parse_field_list, reshape, JqFilter};
use exa_cli::services::stream::StreamDecoder;
use serde_json::{json, Value};

/// Create a search envelope with `count` results
fn create_search_envelope(count: usize) -> Value {
    let results: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "title": format!("Result {}", i),
                "url": format!("https://example.com/{}", i),
                "id": format!("id-{}", i),
                "score": 1.0 / (i as f64 + 1.0),
                "publishedDate": "2025-01-01T00:00:00.000Z",
                "text": "lorem ipsum ".repeat(50),
                "highlights": ["first highlight", "second highlight"]
            })
        })
        .collect();

    json!({
        "requestId": "bench",
        "results": results,
        "costDollars": {"total": 0.005}
    })
}

/// Benchmark: Field selection at different result counts
fn bench_field_selection(c: &mut Criterion) {
    let fields = parse_field_list("title,url,score");
    let mut group = c.benchmark_group("field_selection");

    for count in [10, 25, 100].iter() {
        let envelope = create_search_envelope(*count);
        group.bench_with_input(BenchmarkId::new("filter_fields", count), count, |b, _| {
            b.iter(|| black_box(filter_fields(black_box(envelope.clone()), &fields)))
        });
    }

    group.finish();
}

/// Benchmark: jq filter compile and run
fn bench_jq(c: &mut Criterion) {
    let envelope = create_search_envelope(25);

    c.bench_function("jq_compile", |b| {
        b.iter(|| black_box(JqFilter::compile(black_box("[.results[] | select(.score > 0.1) | .url]")).unwrap()))
    });

    let filter = JqFilter::compile("[.results[] | select(.score > 0.1) | .url]").unwrap();
    c.bench_function("jq_run", |b| {
        b.iter(|| black_box(filter.run(black_box(envelope.clone())).unwrap()))
    });

    let fields = parse_field_list("title,url");
    c.bench_function("reshape_fields_and_jq", |b| {
        b.iter(|| black_box(reshape(black_box(envelope.clone()), &fields, Some(".[0]")).unwrap()))
    });
}

/// Benchmark: SSE line decoding
fn bench_stream_decoding(c: &mut Criterion) {
    let decoder = StreamDecoder::default();
    let delta = r#"data: {"text":"a short fragment of the answer "}"#;

    c.bench_function("decode_text_delta", |b| {
        b.iter(|| black_box(decoder.decode_line(black_box(delta))))
    });
}

criterion_group!(benches, bench_field_selection, bench_jq, bench_stream_decoding);
criterion_main!(benches);
