use respath::qbf::formula::Variable;
use respath::qbf::literal::{Lit, Quantifier};
use respath::qbf::qdimacs::{ReadLimit, parse_qdimacs_reader, parse_qdimacs_str};

fn parse_err(src: &str) -> String {
    match parse_qdimacs_str(src) {
        Ok(_) => panic!("expected parser error"),
        Err(e) => format!("{e:#}"),
    }
}

#[test]
fn renumbers_in_prefix_order() {
    let src = "\
c comment before the header
p cnf 9 1
e 7 2 0
a 9 0
e 1 0
7 9 1 2 0
";
    let f = match parse_qdimacs_str(src) {
        Ok(v) => v,
        Err(e) => panic!("parse failed: {e}"),
    };
    let origs = f.vars[1..].iter().map(|v| v.orig).collect::<Vec<_>>();
    assert_eq!(origs, vec![7, 2, 9, 1]);
    assert_eq!(f.vars[0], Variable::SENTINEL);
    assert_eq!(f.new_id(9), Some(3));
    assert_eq!(f.new_id(3), None);
    assert_eq!(
        f.vars[1..].iter().map(|v| v.depth).collect::<Vec<_>>(),
        vec![1, 1, 2, 3]
    );
    // sorted by new id; last literal existential so nothing is reduced
    assert_eq!(
        f.clauses[0].lits(),
        &[Lit::pos(1), Lit::pos(2), Lit::pos(3), Lit::pos(4)]
    );
}

#[test]
fn universal_reduction_on_single_clause() {
    let f = parse_qdimacs_str("p cnf 2 1\ne 1 0\na 2 0\n1 2 0\n").expect("parse");
    assert_eq!(f.clauses.len(), 1);
    assert_eq!(f.clauses[0].lits(), &[Lit::pos(1)]);
}

#[test]
fn reduction_can_leave_an_empty_clause() {
    let f = parse_qdimacs_str("p cnf 3 2\na 1 2 0\ne 3 0\n-2 1 0\n0\n").expect("parse");
    assert_eq!(f.clauses.len(), 2);
    assert!(f.clauses[0].is_empty());
    assert!(f.clauses[1].is_empty());
    assert_eq!(f.stats().empty_clauses, 2);
}

#[test]
fn empty_prefix_is_an_empty_formula() {
    let f = parse_qdimacs_str("p cnf 3 2\n1 2 0\n-3 0\n").expect("parse");
    assert_eq!(f.num_vars(), 0);
    assert_eq!(f.num_clauses(), 0);
    assert_eq!(f.max_orig_var, 3);
}

#[test]
fn input_ending_in_prefix_keeps_variables() {
    let f = parse_qdimacs_str("p cnf 2 0\na 1 0\ne 2 0\n").expect("parse");
    assert_eq!(f.num_vars(), 2);
    assert_eq!(f.quant(1), Quantifier::Universal);
    assert_eq!(f.num_clauses(), 0);
}

#[test]
fn reads_past_declared_count_until_eof() {
    let src = "p cnf 2 1\ne 1 2 0\n1 0\n2 0\n-1 -2 0\n";
    assert_eq!(parse_qdimacs_str(src).expect("parse").num_clauses(), 3);
    let bounded = parse_qdimacs_reader(
        std::io::Cursor::new(src.as_bytes()),
        ReadLimit::DeclaredClauses,
    )
    .expect("parse");
    assert_eq!(bounded.num_clauses(), 1);
}

#[test]
fn clauses_may_span_lines() {
    let f = parse_qdimacs_str("p cnf 3 1\ne 1 2 3 0\n1\n-2\n3 0\n").expect("parse");
    assert_eq!(f.clauses[0].len(), 3);
}

#[test]
fn reject_missing_header() {
    assert!(parse_err("e 1 0\n1 0\n").contains("missing 'p cnf' header"));
    assert!(parse_err("p dnf 1 1\n").contains("expected 'p cnf'"));
    assert!(parse_err("p cnf x 1\n").contains("invalid variable count"));
}

#[test]
fn reject_truncated_input() {
    assert!(parse_err("p cnf 2 1\ne 1 2").contains("truncated quantifier block"));
    assert!(parse_err("p cnf 2 1\ne 1 2 0\n1 2").contains("truncated clause"));
}

#[test]
fn reject_bad_variables() {
    assert!(parse_err("p cnf 2 1\ne 1 3 0\n1 0\n").contains("exceeds declared maximum"));
    assert!(parse_err("p cnf 2 1\ne 1 0\na 1 0\n1 0\n").contains("quantified twice"));
    assert!(parse_err("p cnf 3 1\ne 1 0\n1 -2 0\n").contains("not quantified"));
    assert!(parse_err("p cnf 3 1\ne 1 0\n1 -4 0\n").contains("exceeds declared maximum"));
}
