//! Pipeline performance benchmarks.
//!
//! Measures quote normalization, table reading and the transform stages
//! on synthetic registries of increasing size.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use langbase::{Pipeline, QuoteNormalizer, TableReader};

/// Generate a raw languoid registry in the single-quoted source dialect.
fn generate_languoids(rows: usize) -> String {
    let mut data = String::from("id,name,status\n");
    for row in 0..rows {
        let status = match row % 4 {
            0 => "'safe'",
            1 => "'\\'definitely endangered\\''",
            2 => "NULL",
            _ => "'extinct'",
        };
        data.push_str(&format!("lang{:04},'Language, {}',{}\n", row, row, status));
    }
    data
}

/// Generate a raw language registry with repeated families and genera.
fn generate_languages(rows: usize) -> String {
    let mut data = String::from("glottocode,Name,iso_code,family,genus\n");
    for row in 0..rows {
        data.push_str(&format!(
            "lang{:04},Language {},x{:02},' Family{}','Genus{}'\n",
            row,
            row,
            row % 100,
            row % 50,
            row % 200
        ));
    }
    data
}

/// Generate a raw geo registry covering every other language.
fn generate_geo(rows: usize) -> String {
    let mut data = String::from("glottocode,name,latitude,longitude,macroarea,countrycodes\n");
    for row in (0..rows).step_by(2) {
        data.push_str(&format!(
            "lang{:04},Language {},{:.3},{:.3},Eurasia,'DE FR'\n",
            row,
            row,
            (row % 90) as f64 * 0.5,
            (row % 180) as f64 * 0.5
        ));
    }
    data
}

/// Benchmark the quote normalizer on raw files of various sizes.
fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    for rows in [100, 1_000, 10_000].iter() {
        let data = generate_languoids(*rows);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &data, |b, data| {
            let normalizer = QuoteNormalizer::new();
            b.iter(|| black_box(normalizer.normalize_bytes(data.as_bytes()).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark reading canonical files into tables.
fn bench_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("read");

    for rows in [100, 1_000, 10_000].iter() {
        let (canonical, _) = QuoteNormalizer::new()
            .normalize_bytes(generate_languages(*rows).as_bytes())
            .unwrap();
        group.throughput(Throughput::Bytes(canonical.len() as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &canonical, |b, data| {
            let reader = TableReader::new();
            b.iter(|| black_box(reader.read_bytes(data, "language").unwrap()))
        });
    }

    group.finish();
}

/// Benchmark cleaning, deduplication, joins and dimension extraction.
fn bench_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform");

    for rows in [100, 1_000, 10_000].iter() {
        let load = |raw: String, name: &str| {
            let (canonical, _) = QuoteNormalizer::new().normalize_bytes(raw.as_bytes()).unwrap();
            TableReader::new().read_bytes(&canonical, name).unwrap().0
        };
        let languoids = load(generate_languoids(*rows), "languoid");
        let languages = load(generate_languages(*rows), "language");
        let geos = load(generate_geo(*rows), "geo");

        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), rows, |b, _| {
            let pipeline = Pipeline::new();
            b.iter_with_setup(
                || (languoids.clone(), languages.clone(), geos.clone()),
                |(languoids, languages, geos)| {
                    black_box(pipeline.transform(languoids, languages, geos).unwrap())
                },
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_normalize, bench_read, bench_transform);
criterion_main!(benches);
