use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use disaster_triage::features::{TextVectorizer, VectorizerConfig};
use disaster_triage::text::Normalizer;

const DOC_COUNT: usize = 500;

fn corpus() -> Vec<String> {
    let subjects = ["people", "families", "children", "volunteers", "villages"];
    let needs = ["water", "food", "shelter", "medicine", "blankets", "fuel"];
    let verbs = ["need", "request", "report", "lack", "want"];
    (0..DOC_COUNT)
        .map(|i| {
            format!(
                "{} in sector {} urgently {} {} and {}",
                subjects[i % subjects.len()],
                i % 17,
                verbs[i % verbs.len()],
                needs[i % needs.len()],
                needs[(i + 3) % needs.len()],
            )
        })
        .collect()
}

fn bench_tokenize(c: &mut Criterion) {
    let message =
        "Please, we URGENTLY need clean drinking water and food supplies for 300 families!";
    c.bench_function("tokenize_message", |b| {
        b.iter(|| Normalizer::tokenize(black_box(message)));
    });
}

fn bench_vectorizer(c: &mut Criterion) {
    let documents = corpus();

    c.bench_function("vectorizer_fit", |b| {
        b.iter_batched(
            || TextVectorizer::new(VectorizerConfig::default()),
            |mut vectorizer| vectorizer.fit(black_box(&documents)).expect("fit"),
            BatchSize::SmallInput,
        );
    });

    let mut fitted = TextVectorizer::new(VectorizerConfig::default());
    fitted.fit(&documents).expect("fit");
    c.bench_function("vectorizer_transform", |b| {
        b.iter(|| fitted.transform(black_box(&documents)).expect("transform"));
    });
}

criterion_group!(benches, bench_tokenize, bench_vectorizer);
criterion_main!(benches);
