use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use copurchase_catalog::{Catalog, CatalogEntry, EntrySource, LoaderOptions, ResolverOptions, load_text, resolve};
use copurchase_core::Money;

const WORDS: [&str; 8] = ["томаты", "оливки", "вяленые", "каперсы", "маслины", "песто", "зелёные", "чёрные"];

fn synthetic_catalog(size: usize) -> Catalog {
    (0..size)
        .map(|i| {
            let name = format!("{} {} №{i}", WORDS[i % WORDS.len()], WORDS[(i / 8) % WORDS.len()]);
            CatalogEntry::new(&name, "130 гр", Money::from_cents(9540), 10, EntrySource::Manual)
                .expect("synthetic entry is valid")
        })
        .collect()
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");

    for size in [100usize, 1000, 5000].iter() {
        let catalog = synthetic_catalog(*size);
        group.throughput(Throughput::Elements(*size as u64));

        group.bench_with_input(BenchmarkId::new("substring_query", size), &catalog, |b, catalog| {
            b.iter(|| resolve(black_box("вялен"), catalog, &ResolverOptions::default()));
        });

        group.bench_with_input(BenchmarkId::new("typo_query", size), &catalog, |b, catalog| {
            b.iter(|| resolve(black_box("каперсв маслно"), catalog, &ResolverOptions::default()));
        });
    }

    group.finish();
}

fn bench_load_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_text");

    for rows in [100usize, 1000].iter() {
        let text: String = (0..*rows)
            .map(|i| format!("{i};{} №{i};130 гр;6;1800,00;95,40\n", WORDS[i % WORDS.len()]))
            .fold("№;Наименование;Масса нетто;Штук в коробке;Цена за коробку;Цена за штуку\n".to_string(), |mut acc, line| {
                acc.push_str(&line);
                acc
            });

        group.bench_with_input(BenchmarkId::new("headered", rows), &text, |b, text| {
            b.iter(|| {
                let mut catalog = Catalog::new();
                load_text(black_box(text), "bench.csv", &LoaderOptions::default(), &mut catalog)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_resolve, bench_load_text);
criterion_main!(benches);
