use std::hint::black_box;

use bencher::{TestCase, TestFile};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use micro_message::header::Headers;

static BROWSER_HEADERS: TestFile = TestFile::new("browser.txt", include_str!("../resources/header/browser.txt"));

fn benchmark_header_lines(criterion: &mut Criterion) {
    let case = TestCase::new("browser_headers", BROWSER_HEADERS);
    let mut group = criterion.benchmark_group("header_lines");

    group.throughput(Throughput::Bytes(case.bytes()));
    group.bench_with_input(BenchmarkId::new("parse", case.name()), &case, |b, case| {
        b.iter(|| black_box(Headers::parse_header_lines(case.file().pairs()).expect("fixture should hold valid headers")));
    });

    let headers = Headers::parse_header_lines(case.file().pairs()).expect("fixture should hold valid headers");
    group.bench_with_input(BenchmarkId::new("lookup", case.name()), &headers, |b, headers| {
        b.iter(|| {
            for (name, _) in case.file().pairs() {
                black_box(headers.get_line(black_box(name)));
            }
        });
    });

    group.finish();
}

criterion_group!(header, benchmark_header_lines);
criterion_main!(header);
