#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sldlog::dsl::declare;
use sldlog::{RuleSet, Term};

fn cons(head: Term, tail: Term) -> Term {
    Term::compound("cons", [head, tail])
}

fn int_list(n: i64) -> Term {
    (0..n).rev().fold(Term::sym("nil"), |tail, i| cons(Term::int(i), tail))
}

fn nat(n: usize) -> Term {
    (0..n).fold(Term::int(0), |t, _| Term::compound("s", [t]))
}

fn setup_append() -> RuleSet {
    let mut rules = RuleSet::default();
    declare(|v| {
        rules.declare(Term::compound("append", [Term::sym("nil"), v.var("ys"), v.var("ys")]).fact())?;
        rules.declare(
            Term::compound(
                "append",
                [
                    cons(v.var("x"), v.var("xs")),
                    v.var("ys"),
                    cons(v.var("x"), v.var("zs")),
                ],
            )
            .when([Term::compound("append", [v.var("xs"), v.var("ys"), v.var("zs")])]),
        )
    })
    .unwrap();
    rules
}

fn setup_len() -> RuleSet {
    let mut rules = RuleSet::default();
    declare(|v| {
        rules.declare(Term::compound("len", [Term::sym("nil"), Term::int(0)]).fact())?;
        rules.declare(
            Term::compound(
                "len",
                [cons(v.wildcard(), v.var("t")), Term::compound("s", [v.var("n")])],
            )
            .when([Term::compound("len", [v.var("t"), v.var("n")])]),
        )
    })
    .unwrap();
    rules
}

fn setup_peano() -> RuleSet {
    let mut rules = RuleSet::default();
    declare(|v| {
        rules.declare(Term::compound("plus", [v.var("x"), Term::int(0), v.var("x")]).fact())?;
        rules.declare(
            Term::compound("plus", [v.var("x"), Term::compound("s", [v.var("y")]), v.var("z")])
                .when([Term::compound(
                    "plus",
                    [Term::compound("s", [v.var("x")]), v.var("y"), v.var("z")],
                )]),
        )
    })
    .unwrap();
    rules
}

fn setup_family(people: usize) -> RuleSet {
    let person = |i: usize| Term::sym(format!("p{i}"));
    let mut rules = RuleSet::new((1..people).map(|i| {
        Term::compound("father", [person((i - 1) / 2), person(i)])
    }))
    .unwrap();
    declare(|v| {
        rules.declare(
            Term::compound("grandfather", [v.var("x"), v.var("y")]).when([
                Term::compound("father", [v.var("x"), v.var("z")]),
                Term::compound("father", [v.var("z"), v.var("y")]),
            ]),
        )
    })
    .unwrap();
    rules
}

fn query_append_long_lists(c: &mut Criterion) {
    let rules = setup_append();
    let goal = Term::compound("append", [int_list(200), int_list(200), Term::var("xs")]);

    c.bench_function("query_append_long_lists", |b| {
        b.iter(|| black_box(rules.solve(black_box(&goal))));
    });
}

fn query_len_long_list(c: &mut Criterion) {
    let rules = setup_len();
    let goal = Term::compound("len", [int_list(4000), Term::var("n")]);

    c.bench_function("query_len_long_list", |b| {
        b.iter(|| black_box(rules.solve(black_box(&goal))));
    });
}

fn query_append_all_splits(c: &mut Criterion) {
    let rules = setup_append();
    let goal = Term::compound("append", [Term::var("x"), Term::var("y"), int_list(100)]);

    c.bench_function("query_append_all_splits", |b| {
        b.iter(|| black_box(rules.solve_all(black_box(&goal)).count()));
    });
}

fn query_peano_addition(c: &mut Criterion) {
    let rules = setup_peano();
    let goal = Term::compound("plus", [nat(100), nat(100), Term::var("sum")]);

    c.bench_function("query_peano_addition", |b| {
        b.iter(|| black_box(rules.solve(black_box(&goal))));
    });
}

fn query_all_grandfathers(c: &mut Criterion) {
    let rules = setup_family(255);
    let goal = Term::compound("grandfather", [Term::var("x"), Term::var("y")]);

    c.bench_function("query_all_grandfathers", |b| {
        b.iter(|| black_box(rules.solve_all(black_box(&goal)).count()));
    });
}

criterion_group!(
    benches,
    query_append_long_lists,
    query_len_long_list,
    query_append_all_splits,
    query_peano_addition,
    query_all_grandfathers
);
criterion_main!(benches);
