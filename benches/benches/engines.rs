//! Benchmark template compilation and rendering time.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use benches::context;
use benches::{Engine, Handlebars, Stash};

criterion_main! { benches }
criterion_group! { benches, bench_compile, bench_render, bench_recursive }

/// Benchmarks the time taken to compile a template.
fn bench_compile(c: &mut Criterion) {
    let mut g = c.benchmark_group("compile");

    macro_rules! bench {
        ($E:ty, $source:literal) => {{
            g.bench_function(<$E as Engine>::name(), |b| {
                let source = repeat(include_str!($source), 50);
                let mut engine = <$E as Engine>::new();
                b.iter(|| engine.add_template("bench", &source));
            });
        }};
    }

    bench!(Handlebars, "../benchdata/handlebars.html");
    bench!(Stash, "../benchdata/stash.html");
}

/// Benchmarks the time taken to render a template as a string.
fn bench_render(c: &mut Criterion) {
    let mut g = c.benchmark_group("render");

    let ctx = context::random(150);

    macro_rules! bench {
        ($E:ty, $source:literal) => {{
            g.bench_function(<$E as Engine>::name(), |b| {
                let source = repeat(include_str!($source), 20);
                let mut engine = <$E as Engine>::new();
                <$E as Engine>::add_template(&mut engine, "bench", &source);
                b.iter(|| <$E as Engine>::render(&engine, "bench", &ctx));
            });
        }};
    }

    bench!(Handlebars, "../benchdata/handlebars.html");
    bench!(Stash, "../benchdata/stash.html");
}

/// Benchmarks rendering values as templates, both as `/r` fragments and
/// as global templates.
fn bench_recursive(c: &mut Criterion) {
    let mut g = c.benchmark_group("recursive");

    for n in [10, 150] {
        let ctx = context::random(n);

        g.bench_with_input(BenchmarkId::new("fragment", n), &ctx, |b, ctx| {
            let mut engine = Stash::new();
            engine.add_template("bench", include_str!("../benchdata/recursive.html"));
            b.iter(|| engine.render("bench", ctx));
            assert_eq!(engine.engine().cache_len(), n.min(8));
        });

        g.bench_with_input(BenchmarkId::new("global", n), &ctx, |b, ctx| {
            let mut engine = Stash::with_globals(&[("summary", "{{name}} is {{age}}")]);
            engine.add_template("bench", "{{foreach users}}{{summary}}{{end}}");
            b.iter(|| engine.render("bench", ctx));
        });
    }
}

fn repeat(source: &str, n: usize) -> String {
    let mut s = String::new();
    for _ in 0..n {
        s.push_str(source);
    }
    s
}
