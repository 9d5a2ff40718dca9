use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use topo_core::parser;
use topo_core::scanner::Scanner;

/// Build a synthetic program of roughly `n` small statements mixing
/// declarations, arithmetic, and control flow.
fn synthetic_program(n: usize) -> String {
    let mut src = String::new();
    for i in 0..n {
        src.push_str(&format!("var value{i} = {i} + {i} * 2\n"));
        if i % 10 == 0 {
            src.push_str("if (value0 > 5) {\n    total = total + 1\n} else {\n    total = total - 1\n}\n");
        }
    }
    src
}

/// Build an expression nested `depth` parentheses deep.
fn nested_expression(depth: usize) -> String {
    let mut src = String::new();
    for _ in 0..depth {
        src.push('(');
    }
    src.push('1');
    for _ in 0..depth {
        src.push_str(" + 2)");
    }
    src
}

// ---------------------------------------------------------------------------
// Scanner throughput
// ---------------------------------------------------------------------------

fn bench_scanner_throughput(c: &mut Criterion) {
    let source = synthetic_program(200);
    c.bench_function("scanner_tokenize_program", |b| {
        b.iter(|| Scanner::tokenize_all(black_box(&source)));
    });

    let strings: String = (0..100)
        .map(|i| format!("var s{i} = \"escaped\\n\\t text {i}\"\n"))
        .collect();
    c.bench_function("scanner_tokenize_string_heavy", |b| {
        b.iter(|| Scanner::tokenize_all(black_box(&strings)));
    });
}

// ---------------------------------------------------------------------------
// Full parse
// ---------------------------------------------------------------------------

fn bench_parse_program(c: &mut Criterion) {
    let small = "var x = 10\nif (x > 5) {\n    x = x - 1\n}\n";
    assert!(parser::parse(small, "bench").is_ok());
    c.bench_function("parse_small_program", |b| {
        b.iter(|| parser::parse(black_box(small), "bench"));
    });

    let large = synthetic_program(200);
    assert!(parser::parse(&large, "bench").is_ok());
    c.bench_function("parse_synthetic_program", |b| {
        b.iter(|| parser::parse(black_box(&large), "bench"));
    });
}

// ---------------------------------------------------------------------------
// Deep expression nesting
// ---------------------------------------------------------------------------

fn bench_parse_nested_expression(c: &mut Criterion) {
    let deep = nested_expression(64);
    assert!(parser::parse(&deep, "bench").is_ok());
    c.bench_function("parse_nested_expression", |b| {
        b.iter(|| parser::parse(black_box(&deep), "bench"));
    });
}

// ---------------------------------------------------------------------------
// Group & main
// ---------------------------------------------------------------------------

criterion_group!(
    benches,
    bench_scanner_throughput,
    bench_parse_program,
    bench_parse_nested_expression,
);
criterion_main!(benches);
