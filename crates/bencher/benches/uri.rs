use std::hint::black_box;

use bencher::{TestCase, TestFile};
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use micro_message::uri::Uri;

static SIMPLE_URIS: TestFile = TestFile::new("simple.txt", include_str!("../resources/uri/simple.txt"));
static COMPLEX_URIS: TestFile = TestFile::new("complex.txt", include_str!("../resources/uri/complex.txt"));

fn create_test_cases() -> Vec<TestCase> {
    vec![TestCase::new("simple_uris", SIMPLE_URIS), TestCase::new("complex_uris", COMPLEX_URIS)]
}

fn parse_all(case: &TestCase) -> Vec<Uri> {
    case.file().inputs().map(|input| Uri::parse(input).expect("fixture should be a valid uri")).collect()
}

fn benchmark_parse(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("uri_parse");

    for case in create_test_cases() {
        group.throughput(Throughput::Bytes(case.bytes()));
        group.bench_with_input(BenchmarkId::from_parameter(case.name()), &case, |b, case| {
            b.iter(|| {
                for input in case.file().inputs() {
                    black_box(Uri::parse(black_box(input)).expect("fixture should be a valid uri"));
                }
            });
        });
    }

    group.finish();
}

fn benchmark_serialize(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("uri_serialize");

    for case in create_test_cases() {
        let uris = parse_all(&case);
        group.throughput(Throughput::Bytes(case.bytes()));
        group.bench_with_input(BenchmarkId::from_parameter(case.name()), &uris, |b, uris| {
            b.iter(|| {
                for uri in uris {
                    black_box(uri.to_string());
                }
            });
        });
    }

    group.finish();
}

fn benchmark_update(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("uri_update");

    for case in create_test_cases() {
        let uris = parse_all(&case);
        group.bench_with_input(BenchmarkId::from_parameter(case.name()), &uris, |b, uris| {
            b.iter_batched_ref(
                || uris.clone(),
                |uris| {
                    for uri in uris.iter() {
                        let updated = uri
                            .with_scheme("https")
                            .and_then(|uri| uri.with_host("updated.example.com"))
                            .and_then(|uri| uri.with_port(8443))
                            .and_then(|uri| uri.with_path("/v2/resource"))
                            .expect("updates should be valid");
                        black_box(updated);
                    }
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(uri, benchmark_parse, benchmark_serialize, benchmark_update);
criterion_main!(uri);
