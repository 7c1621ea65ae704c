use criterion::{criterion_group, criterion_main, Criterion};
use sift::index::SearchIndex;
use sift::models::SearchRecord;

fn synthetic_records(count: usize) -> Vec<SearchRecord> {
    let topics = ["pipelines", "serde", "jekyll", "tantivy", "borrowck", "lifetimes"];
    (0..count)
        .map(|i| {
            let topic = topics[i % topics.len()];
            serde_json::from_value(serde_json::json!({
                "id": i as u32,
                "title": format!("{topic} deep dive part {i}"),
                "url": format!("/posts/{topic}-{i}"),
                "date": "2021-04-01",
                "tags": [topic, "rust"],
                "shortinfo": format!("Notes on {topic} from the trenches"),
                "content": format!(
                    "Everything about {topic}: setup, pitfalls, staged processing \
                     and how the pieces fit together in a real site build. {}",
                    "filler text for realistic body length. ".repeat(20)
                ),
            }))
            .expect("valid synthetic record")
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let records = synthetic_records(500);
    c.bench_function("build_500_records", |b| {
        b.iter(|| SearchIndex::build(&records).unwrap());
    });
}

fn bench_query(c: &mut Criterion) {
    let records = synthetic_records(500);
    let index = SearchIndex::build(&records).unwrap();

    let queries = vec![
        ("single_word", "pipelines"),
        ("fuzzy_typo", "pipelnes"),
        ("multi_word", "staged processing"),
        ("tag_match", "serde"),
        ("fallback_syntax", "\"(pipelines:"),
        ("no_match", "quaternions"),
    ];

    let mut group = c.benchmark_group("query");
    for (name, query) in queries {
        group.bench_function(name, |b| {
            b.iter(|| index.query(query, 10).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_query);
criterion_main!(benches);
