use criterion::{black_box, criterion_group, criterion_main, Criterion};
use langlab::fa::Dfa;
use langlab::parser;
use langlab::regex::Regex;
use lazy_static::lazy_static;
use regex::Regex as LibRegex;

const DFA_1: &str = "\
*vertices 3
*initial 1
*final 3
*transitions
1 > 2 | a
2 > 3 | b
2 > 2 | a
3 > 3 | a b
";

const DFA_2: &str = "\
*vertices 2
*initial 1
*final 2
*transitions
1 > 2 | a
2 > 1 | a
1 > 1 | b
2 > 2 | b
";

const REGEX_SRC: &str = "(a+b)*abb(a+b)*";

lazy_static! {
    static ref DFA1: Dfa = parser::fa(DFA_1).unwrap().try_into().unwrap();
    static ref DFA2: Dfa = parser::fa(DFA_2).unwrap().try_into().unwrap();
}

fn build_regex() -> Regex {
    let tokens = parser::regex(REGEX_SRC).unwrap();
    Regex::try_from(tokens).unwrap()
}

pub fn algebra(c: &mut Criterion) {
    c.bench_function("union", |b| b.iter(|| DFA1.union(black_box(&DFA2))));
    c.bench_function("intersection", |b| b.iter(|| DFA1.intersection(black_box(&DFA2))));
    c.bench_function("difference", |b| b.iter(|| DFA1.difference(black_box(&DFA2))));
    c.bench_function("symmetric difference", |b| {
        b.iter(|| DFA1.symmetric_difference(black_box(&DFA2)))
    });
}

pub fn minimize_and_equivalence(c: &mut Criterion) {
    c.bench_function("minimize", |b| b.iter(|| DFA1.minimize()));
    c.bench_function("equivalence check", |b| b.iter(|| DFA1.equivalent_to(black_box(&DFA2))));
}

pub fn regex_compile(c: &mut Criterion) {
    c.bench_function("followpos regex compile", |b| {
        b.iter(|| {
            let tokens = parser::regex(black_box(REGEX_SRC)).unwrap();
            let regex = Regex::try_from(tokens).unwrap();
            regex.to_dfa()
        })
    });

    c.bench_function("external regex compile", |b| {
        b.iter(|| LibRegex::new(black_box(&format!("^(?:{})$", REGEX_SRC.replace('+', "|")))).unwrap())
    });
}

pub fn regex_check(c: &mut Criterion) {
    let regex = build_regex();
    let dfa = regex.to_dfa().minimize();
    let word = ["a", "a", "b", "b", "b", "a"];

    c.bench_function("followpos regex check", |b| b.iter(|| dfa.accepts(black_box(&word))));

    let lib_pattern = format!("^(?:{})$", REGEX_SRC.replace('+', "|"));
    let lib_regex = LibRegex::new(&lib_pattern).unwrap();
    c.bench_function("external regex check", |b| {
        b.iter(|| lib_regex.is_match(black_box("aabbba")))
    });
}

criterion_group!(benches, algebra, minimize_and_equivalence, regex_compile, regex_check);
criterion_main!(benches);
