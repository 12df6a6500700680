use criterion::{black_box, criterion_group, criterion_main, Criterion};

use snipdex::extractor::Extractor;

/// Generate a synthetic source file with `n` functions and `n / 4` classes.
fn synthetic_source(n: usize) -> String {
    let mut src = String::new();
    for i in 0..n {
        src.push_str(&format!(
            "import mod{i} from \"lib{i}\";\n\
             function handler{i}(req, res) {{\n  const value{i} = transform(req.body);\n  return res.send(value{i});\n}}\n\n"
        ));
        if i % 4 == 0 {
            src.push_str(&format!(
                "class Service{i} {{\n  run(input) {{ return process(input); }}\n}}\n\n"
            ));
        }
    }
    src
}

fn bench_extract_small(c: &mut Criterion) {
    let src = synthetic_source(20);
    c.bench_function("extract_small_file", |b| {
        b.iter(|| Extractor::extract(black_box(&src)));
    });
}

fn bench_extract_large(c: &mut Criterion) {
    let src = synthetic_source(500);
    c.bench_function("extract_large_file", |b| {
        b.iter(|| Extractor::extract(black_box(&src)));
    });
}

criterion_group!(benches, bench_extract_small, bench_extract_large);
criterion_main!(benches);
