use compact_metrics::{
    expand, CharacterSet, CompactDocument, MetricsDocument, Minifier, MinifyOptions, Tier,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const TIERS: [Tier; 3] = [Tier::Legacy, Tier::ValueIndexed, Tier::TupletIndexed];

fn documents() -> Vec<(&'static str, MetricsDocument)> {
    let charset = CharacterSet::generate();
    let varied = metrics_test_data::varied_metrics_document(charset.as_slice(), 0x5EED);
    [
        ("serif", metrics_test_data::SERIF_16PX.to_string()),
        ("mono", metrics_test_data::MONO_12PX.to_string()),
        ("varied", varied),
    ]
    .into_iter()
    .map(|(name, json)| (name, MetricsDocument::from_json(&json).unwrap()))
    .collect()
}

pub fn minify_benchmark(c: &mut Criterion) {
    for (name, document) in documents() {
        for tier in TIERS {
            let minifier = Minifier::new(MinifyOptions::default().with_tier(tier));
            c.bench_with_input(
                BenchmarkId::new(format!("minify_{tier:?}"), name),
                &document,
                |b, document| b.iter(|| minifier.minify(black_box(document)).unwrap()),
            );
        }
    }
}

pub fn expand_benchmark(c: &mut Criterion) {
    for (name, document) in documents() {
        for tier in TIERS {
            let minifier = Minifier::new(MinifyOptions::default().with_tier(tier));
            let compact = minifier.minify(&document).unwrap();
            c.bench_with_input(
                BenchmarkId::new(format!("expand_{tier:?}"), name),
                &compact,
                |b, compact| b.iter(|| expand(black_box(compact)).unwrap()),
            );
        }
    }
}

pub fn load_benchmark(c: &mut Criterion) {
    for (name, document) in documents() {
        let json = Minifier::default().minify(&document).unwrap().to_json().unwrap();
        c.bench_with_input(BenchmarkId::new("load_compact", name), &json, |b, json| {
            b.iter(|| {
                let compact = CompactDocument::from_json(black_box(json)).unwrap();
                expand(&compact).unwrap()
            })
        });
    }
}

criterion_group!(benches, minify_benchmark, expand_benchmark, load_benchmark);
criterion_main!(benches);
