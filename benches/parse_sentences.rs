use criterion::{black_box, criterion_group, criterion_main, Criterion};

use npchunk::{np_chunks, Grammar};

fn parse(g: &Grammar, input: &[&str]) -> usize {
  g.parse(input)
    .map(|trees| trees.iter().map(|t| np_chunks(t).len()).sum())
    .unwrap_or(0)
}

fn criterion_benchmark(c: &mut Criterion) {
  let grammar = Grammar::sentences().unwrap();
  let simple_input = "holmes sat".split(' ').collect::<Vec<_>>();
  let complex_input = "holmes lit the pipe at the door on thursday"
    .split(' ')
    .collect::<Vec<_>>();

  let ambiguous = "S -> S S | \"x\"".parse::<Grammar>().unwrap();
  let ambiguous_input = vec!["x"; 10];

  c.bench_function("parse simple", |b| {
    b.iter(|| parse(black_box(&grammar), black_box(&simple_input)))
  });

  c.bench_function("parse complex", |b| {
    b.iter(|| parse(black_box(&grammar), black_box(&complex_input)))
  });

  c.bench_function("parse ambiguous", |b| {
    b.iter(|| parse(black_box(&ambiguous), black_box(&ambiguous_input)))
  });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
