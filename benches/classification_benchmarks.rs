//! Classification benchmarks
//!
//! Measures the full document pass (metrics, context, classifiers) and the
//! structure assembly on synthetic documents of increasing size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use doc_structure::structure::StructureBuilder;
use doc_structure::{DocumentClassifier, DocumentMetrics, TextElement};

/// Generate a document of repeated sections: heading, paragraph, list.
fn synthetic_document(sections: usize) -> Vec<TextElement> {
    let mut elements = Vec::with_capacity(sections * 6);

    for i in 0..sections {
        elements.push(TextElement::new(format!("{}. Section title", i + 1), 16.0).bold());
        elements.push(TextElement::new(
            "Body text describing the section in some detail. It spans a couple of sentences, \
             with ordinary punctuation, as most paragraphs do.",
            11.0,
        ));
        elements.push(TextElement::new("Key points:", 11.0));
        elements.push(TextElement::new("• first point", 11.0));
        elements.push(TextElement::new("• second point", 11.0));
        elements.push(
            TextElement::new("Notes", 11.0).with_lines(["Notes", "a) one", "b) two", "c) three"]),
        );
    }

    elements
}

fn bench_metrics(c: &mut Criterion) {
    let mut group = c.benchmark_group("metrics");

    for sections in [10, 100, 1000] {
        let elements = synthetic_document(sections);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_elements", elements.len())),
            &elements,
            |b, elements| b.iter(|| DocumentMetrics::analyze(black_box(elements))),
        );
    }

    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");
    let classifier = DocumentClassifier::new();

    for sections in [10, 100, 1000] {
        let elements = synthetic_document(sections);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_elements", elements.len())),
            &elements,
            |b, elements| b.iter(|| classifier.classify(black_box(elements))),
        );
    }

    group.finish();
}

fn bench_structure(c: &mut Criterion) {
    let elements = synthetic_document(100);
    let results = DocumentClassifier::new().classify(&elements);

    c.bench_function("structure_build_600_elements", |b| {
        b.iter(|| StructureBuilder::new().build(black_box(&elements), black_box(&results)))
    });
}

criterion_group!(benches, bench_metrics, bench_classify, bench_structure);
criterion_main!(benches);
