//! Benchmarks for chattopics parsing, normalization and topic modeling.
//!
//! Run with: `cargo bench`
//! Run specific group: `cargo bench --bench pipeline -- lda_fit`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chattopics::config::{PipelineConfig, TopicModelConfig, VectorizerConfig};
use chattopics::core::lda::LatentDirichletAllocation;
use chattopics::core::output::to_csv;
use chattopics::core::{CountVectorizer, ReferenceData, TextNormalizer, TopicPipeline};
use chattopics::parser::TranscriptParser;

// =============================================================================
// Test Data Generators
// =============================================================================

const SENDERS: [&str; 4] = ["Alice", "Bob", "Carol", "Dave"];

const BODIES: [&str; 6] = [
    "pizza pasta cheese dinner tonight 🍕",
    "football match tonight goal highlights https://example.com/goals",
    "pasta carbonara recipe with extra cheese please",
    "striker scored a late goal in the league match",
    "@Carol rocket launch orbit countdown 🚀 #space",
    "concert tickets guitar drums band 2024",
];

fn generate_transcript(count: usize) -> String {
    let mut lines = Vec::with_capacity(count);
    for i in 0..count {
        let day = i / 200 % 28 + 1;
        let hour = i / 60 % 12 + 1;
        let minute = i % 60;
        let meridiem = if i % 2 == 0 { "am" } else { "pm" };
        if i % 25 == 0 {
            lines.push(format!("{day:02}/03/23, {hour}:{minute:02} {meridiem} - Alice added Erin"));
        } else {
            lines.push(format!(
                "{day:02}/03/23, {hour}:{minute:02} {meridiem} - {}: {}",
                SENDERS[i % SENDERS.len()],
                BODIES[i % BODIES.len()]
            ));
        }
    }
    lines.join("\n")
}

fn generate_documents(count: usize) -> Vec<String> {
    let normalizer = TextNormalizer::new(ReferenceData::english());
    (0..count)
        .map(|i| normalizer.normalize(BODIES[i % BODIES.len()]))
        .collect()
}

// =============================================================================
// Stage Benchmarks
// =============================================================================

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("transcript_parsing");
    let parser = TranscriptParser::new();

    for size in [100_usize, 1_000, 10_000] {
        let txt = generate_transcript(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &txt, |b, txt| {
            b.iter(|| black_box(parser.parse_str(black_box(txt))));
        });
    }
    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");
    let normalizer = TextNormalizer::new(ReferenceData::english());

    for size in [100_usize, 1_000, 10_000] {
        let texts: Vec<&str> = (0..size).map(|i| BODIES[i % BODIES.len()]).collect();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &texts, |b, texts| {
            b.iter(|| black_box(normalizer.normalize_all(texts.iter().copied())));
        });
    }
    group.finish();
}

fn bench_vectorize(c: &mut Criterion) {
    let mut group = c.benchmark_group("vectorize");
    let vectorizer = CountVectorizer::new(VectorizerConfig::new());

    for size in [100_usize, 1_000, 10_000] {
        let docs = generate_documents(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &docs, |b, docs| {
            b.iter(|| black_box(vectorizer.fit(black_box(docs)).unwrap()));
        });
    }
    group.finish();
}

fn bench_lda_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("lda_fit");
    group.sample_size(10);

    for size in [100_usize, 1_000] {
        let docs = generate_documents(size);
        let (_, dtm) = CountVectorizer::new(VectorizerConfig::new()).fit(&docs).unwrap();
        let lda = LatentDirichletAllocation::new(
            TopicModelConfig::new().with_num_topics(5).with_max_iterations(50),
        );
        group.throughput(Throughput::Elements(dtm.total_count()));
        group.bench_with_input(BenchmarkId::from_parameter(size), &dtm, |b, dtm| {
            b.iter(|| black_box(lda.fit(dtm).unwrap()));
        });
    }
    group.finish();
}

// =============================================================================
// Full Pipeline Benchmark
// =============================================================================

fn bench_full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_pipeline");
    group.sample_size(10);

    let pipeline = TopicPipeline::english(
        PipelineConfig::new()
            .with_topic_model(TopicModelConfig::new().with_num_topics(5).with_max_iterations(50)),
    );
    let parser = TranscriptParser::new();

    for size in [100_usize, 1_000] {
        let txt = generate_transcript(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &txt, |b, txt| {
            b.iter(|| {
                let corpus = parser.parse_str(black_box(txt));
                let analysis = pipeline.run(&corpus).unwrap();
                let csv = to_csv(&analysis.corpus).unwrap();
                black_box(csv)
            });
        });
    }
    group.finish();
}

// =============================================================================
// Criterion Configuration
// =============================================================================

criterion_group!(
    benches,
    bench_parsing,
    bench_normalize,
    bench_vectorize,
    bench_lda_fit,
    bench_full_pipeline,
);

criterion_main!(benches);
