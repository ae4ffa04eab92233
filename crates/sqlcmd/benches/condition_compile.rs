use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sqlcmd::expr::compile;
use sqlcmd::{Cond, Fields, MysqlEscape, Params, escape_field_expr};

/// `( ( ( col0 = ? ) AND ( col1 = ? ) ) AND ... )` with `n` leaves.
fn build_and_chain(n: usize) -> Cond {
    let e = Fields;
    let mut cond = e.field("col0").eq(0);
    for i in 1..n {
        cond = cond.and(e.field(&format!("col{i}")).eq(i as i64));
    }
    cond
}

/// `n` comparisons against the same field, alternating AND / OR.
fn build_same_field(n: usize) -> Cond {
    let e = Fields;
    let mut cond = e.field("age").gte(0);
    for i in 1..n {
        let next = e.field("age").lt(i as i64);
        cond = if i % 2 == 0 { cond.and(next) } else { cond.or(next) };
    }
    cond
}

fn bench_compile_and_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("condition/and_chain");

    for n in [1, 5, 10, 50, 100] {
        let cond = build_and_chain(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &cond, |b, cond| {
            b.iter(|| {
                let mut params = Params::new();
                black_box(compile(cond.expr(), &mut params, &MysqlEscape));
            });
        });
    }

    group.finish();
}

fn bench_compile_same_field(c: &mut Criterion) {
    let mut group = c.benchmark_group("condition/same_field");

    for n in [5, 20, 100] {
        let cond = build_same_field(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &cond, |b, cond| {
            b.iter(|| {
                let mut params = Params::new();
                black_box(compile(cond.expr(), &mut params, &MysqlEscape));
            });
        });
    }

    group.finish();
}

fn bench_in_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("condition/in_list");

    for n in [5, 20, 100, 500] {
        let cond = Fields.field("id").in_list(0..n as i64);
        group.bench_with_input(BenchmarkId::from_parameter(n), &cond, |b, cond| {
            b.iter(|| {
                let mut params = Params::new();
                black_box(compile(cond.expr(), &mut params, &MysqlEscape));
            });
        });
    }

    group.finish();
}

fn bench_escape_field_expr(c: &mut Criterion) {
    let inputs = [
        "user_name",
        "u.user_name",
        "u.user_name as name",
        "count(distinct u.user_id) as cnt",
    ];
    c.bench_function("ident/escape_field_expr", |b| {
        b.iter(|| {
            for input in inputs {
                black_box(escape_field_expr(input, &MysqlEscape));
            }
        });
    });
}

criterion_group!(
    benches,
    bench_compile_and_chain,
    bench_compile_same_field,
    bench_in_list,
    bench_escape_field_expr
);
criterion_main!(benches);
