use respath::deps::driver::DependencyDriver;
use respath::deps::output::EdgeCollector;
use respath::qbf::formula::Formula;
use respath::qbf::qdimacs::{parse_qdimacs_str, to_qdimacs, write_qdimacs};
use respath::qbf::random::{RandomQbfConfig, generate_qdimacs};

fn quants(f: &Formula) -> Vec<respath::qbf::literal::Quantifier> {
    f.vars[1..].iter().map(|v| v.quant).collect()
}

#[test]
fn normalized_text_is_a_fixed_point() {
    let src = "p cnf 8 4\ne 8 3 0\na 1 0\na 6 0\ne 2 5 0\n8 1 2 0\n-3 6 0\n-8 -1 5 6 0\n3 -2 0\n";
    let f = parse_qdimacs_str(src).expect("parse");
    let text = to_qdimacs(&f);
    let g = parse_qdimacs_str(&text).expect("reparse");

    assert_eq!(quants(&f), quants(&g));
    assert_eq!(f.clauses, g.clauses);
    assert_eq!(g.max_orig_var, f.num_vars());
    assert!(g.vars[1..].iter().enumerate().all(|(i, v)| v.orig == i as u32 + 1));
    assert_eq!(to_qdimacs(&g), text);
    // both universal blocks merge into one
    assert_eq!(g.stats().blocks, 3);
}

#[test]
fn writer_matches_string_rendering() {
    let f = parse_qdimacs_str("p cnf 3 2\na 2 0\ne 1 3 0\n2 1 0\n-2 -3 0\n").expect("parse");
    let mut buf = Vec::new();
    write_qdimacs(&f, &mut buf).expect("write");
    assert_eq!(String::from_utf8_lossy(&buf), to_qdimacs(&f));
}

#[test]
fn dependencies_survive_normalization() {
    let text = generate_qdimacs(&RandomQbfConfig {
        vars: 12,
        clauses: 30,
        clause_len: 3,
        blocks: 4,
        seed: 7,
    })
    .expect("generate");
    let f = parse_qdimacs_str(&text).expect("parse");
    let g = parse_qdimacs_str(&to_qdimacs(&f)).expect("reparse");

    let mut before = EdgeCollector::default();
    DependencyDriver::new(&f)
        .expect("driver")
        .run(&[], &mut before)
        .expect("run");
    let mut after = EdgeCollector::default();
    DependencyDriver::new(&g)
        .expect("driver")
        .run(&[], &mut after)
        .expect("run");

    // The normalized formula names variable i by its new id i.
    let renamed = before
        .edges
        .iter()
        .map(|&(v, x)| {
            (
                f.new_id(v).expect("quantified"),
                f.new_id(x).expect("quantified"),
            )
        })
        .collect::<Vec<_>>();
    assert_eq!(renamed, after.edges);
}
