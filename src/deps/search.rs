//! Resolution-path reachability from a single literal.
//!
//! Starting from the occurrences of a literal, the search walks through
//! clauses left to right (in variable id order, which follows the prefix) and
//! crosses from an existential literal to the clauses of its complement. Every
//! literal of the opposite quantifier met along the way is a connection.
//!
//! A clause is scheduled at most twice. The first visit, keyed by the literal
//! that entered the clause, continues through all later literals. A second
//! visit happens only when the clause is entered by a different literal; it
//! closes the path through the first entry literal itself.

use log::trace;

use super::occurrence::OccurrenceIndex;
use crate::qbf::formula::Formula;
use crate::qbf::literal::{Lit, Quantifier};

/// Literal indices found by one search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReachableSet {
    bits: Vec<bool>,
}

impl ReachableSet {
    pub fn new(num_vars: u32) -> Self {
        Self {
            bits: vec![false; 2 * num_vars as usize],
        }
    }

    pub fn contains(&self, lit: Lit) -> bool {
        self.bits[lit.index()]
    }

    /// Returns true if `lit` was not present yet.
    pub fn insert(&mut self, lit: Lit) -> bool {
        let slot = &mut self.bits[lit.index()];
        let fresh = !*slot;
        *slot = true;
        fresh
    }

    pub fn clear(&mut self) {
        self.bits.fill(false);
    }

    pub fn len(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.bits.iter().any(|&b| b)
    }

    pub fn iter(&self) -> impl Iterator<Item = Lit> + '_ {
        self.bits
            .iter()
            .enumerate()
            .filter(|(_, b)| **b)
            .map(|(idx, _)| Lit::from_index(idx))
    }
}

/// Counts recorded connections against the most that can exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionBudget {
    found: usize,
    max: usize,
}

impl ConnectionBudget {
    /// A `max` of 0 never ends a search early.
    pub fn new(max: usize) -> Self {
        Self { found: 0, max }
    }

    pub fn unbounded() -> Self {
        Self::new(0)
    }

    pub fn found(&self) -> usize {
        self.found
    }

    /// Charges one connection; true once the budget is used up.
    fn charge(&mut self) -> bool {
        self.found += 1;
        self.found == self.max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    First(usize),
    Second(usize),
}

/// Per-search bookkeeping, allocated once and cleared between searches.
#[derive(Debug, Clone)]
pub struct SearchScratch {
    /// Literal that produced the first visit of each clause.
    visited: Vec<Option<Lit>>,
    /// How often each clause has been scheduled (0, 1 or 2).
    entries: Vec<u8>,
    /// Literals whose occurrences have been scheduled.
    explored: Vec<bool>,
    stack: Vec<Visit>,
}

impl SearchScratch {
    pub fn new(formula: &Formula) -> Self {
        let nc = formula.num_clauses();
        Self {
            visited: vec![None; nc],
            entries: vec![0; nc],
            explored: vec![false; 2 * formula.num_vars() as usize],
            stack: Vec::new(),
        }
    }

    pub fn reset(&mut self) {
        self.visited.fill(None);
        self.entries.fill(0);
        self.explored.fill(false);
        self.stack.clear();
    }
}

/// Adds to `reachable` every literal of the opposite quantifier that `start`
/// reaches over a resolution path through variables after `start`'s.
/// `scratch` must be freshly reset.
pub fn search(
    formula: &Formula,
    occ: &OccurrenceIndex,
    start: Lit,
    budget: &mut ConnectionBudget,
    reachable: &mut ReachableSet,
    scratch: &mut SearchScratch,
) {
    let mut walk = Walk {
        formula,
        occ,
        start,
        quant: formula.quant(start.var),
        budget,
        reachable,
        scratch,
    };
    walk.run();
    trace!("search from {}: {} connections", start, walk.budget.found());
}

struct Walk<'a> {
    formula: &'a Formula,
    occ: &'a OccurrenceIndex,
    start: Lit,
    quant: Quantifier,
    budget: &'a mut ConnectionBudget,
    reachable: &'a mut ReachableSet,
    scratch: &'a mut SearchScratch,
}

impl Walk<'_> {
    fn run(&mut self) {
        self.scratch.explored[self.start.index()] = true;
        for &c in self.occ.clauses_of(self.start) {
            self.scratch.stack.push(Visit::First(c));
            self.scratch.visited[c] = Some(self.start);
            self.scratch.entries[c] = 1;
        }

        while let Some(visit) = self.scratch.stack.pop() {
            let done = match visit {
                Visit::First(c) => self.first_visit(c),
                Visit::Second(c) => self.second_visit(c),
            };
            if done {
                self.scratch.stack.clear();
                return;
            }
        }
    }

    /// Returns true when the budget is exhausted.
    fn first_visit(&mut self, c: usize) -> bool {
        let Some(entry) = self.scratch.visited[c] else {
            return false;
        };
        let formula = self.formula;
        let lits = formula.clauses[c].lits();

        // Only variables from the start variable onwards lie on the path.
        let mut pos = lits.partition_point(|l| l.var < self.start.var);
        if pos < lits.len() && lits[pos] == self.start {
            pos += 1;
        }

        for &lit in &lits[pos..] {
            if lit == entry {
                continue;
            }
            let quant = formula.quant(lit.var);
            if quant == Quantifier::Existential {
                self.extend(lit.neg());
            }
            if quant != self.quant && self.record(lit) {
                return true;
            }
        }
        false
    }

    fn second_visit(&mut self, c: usize) -> bool {
        let Some(entry) = self.scratch.visited[c] else {
            return false;
        };
        let quant = self.formula.quant(entry.var);
        if quant != self.quant && self.record(entry) {
            return true;
        }
        if quant == Quantifier::Existential {
            self.extend(entry.neg());
        }
        false
    }

    fn extend(&mut self, target: Lit) {
        let idx = target.index();
        if self.scratch.explored[idx] {
            return;
        }
        self.scratch.explored[idx] = true;
        for &c in self.occ.clauses_of(target) {
            match self.scratch.entries[c] {
                0 => {
                    self.scratch.stack.push(Visit::First(c));
                    self.scratch.visited[c] = Some(target);
                    self.scratch.entries[c] = 1;
                }
                1 if self.scratch.visited[c] != Some(target) => {
                    self.scratch.stack.push(Visit::Second(c));
                    self.scratch.entries[c] = 2;
                }
                _ => {}
            }
        }
    }

    fn record(&mut self, lit: Lit) -> bool {
        self.reachable.insert(lit) && self.budget.charge()
    }
}

#[cfg(test)]
mod tests {
    use super::{ConnectionBudget, ReachableSet, SearchScratch, search};
    use crate::deps::occurrence::OccurrenceIndex;
    use crate::qbf::literal::Lit;
    use crate::qbf::qdimacs::parse_qdimacs_str;

    fn reach(src: &str, start: Lit, max: usize) -> Vec<Lit> {
        let f = parse_qdimacs_str(src).expect("parse");
        let occ = OccurrenceIndex::build(&f);
        let mut scratch = SearchScratch::new(&f);
        let mut reachable = ReachableSet::new(f.num_vars());
        let mut budget = ConnectionBudget::new(max);
        search(&f, &occ, start, &mut budget, &mut reachable, &mut scratch);
        reachable.iter().collect()
    }

    #[test]
    fn direct_connection_in_one_clause() {
        // a1 e2: the clause survives reduction since its last literal is existential
        let src = "p cnf 2 1\na 1 0\ne 2 0\n1 2 0\n";
        assert_eq!(reach(src, Lit::pos(1), 0), vec![Lit::pos(2)]);
        assert!(reach(src, Lit::neg_of(1), 0).is_empty());
    }

    #[test]
    fn path_crosses_existential_complement() {
        // a1 e2 e3: 1 v 2, -2 v 3 connects +1 to +3 through variable 2
        let src = "p cnf 3 2\na 1 0\ne 2 3 0\n1 2 0\n-2 3 0\n";
        assert_eq!(reach(src, Lit::pos(1), 0), vec![Lit::pos(2), Lit::pos(3)]);
    }

    #[test]
    fn existential_bridge_reaches_both_polarities() {
        // e1 a2 e3 a4: 1 v 2 v 3 then -2 v -3, crossing over existential 3
        let src = "p cnf 4 2\ne 1 0\na 2 0\ne 3 0\na 4 0\n1 2 3 0\n-2 -3 0\n";
        assert_eq!(reach(src, Lit::pos(1), 0), vec![Lit::pos(2), Lit::neg_of(2)]);
    }

    #[test]
    fn universal_does_not_bridge() {
        // e1 a2 e3 a4 e5: reaching 4 would need a step from +2 to -2
        let src = "p cnf 5 2\ne 1 0\na 2 0\ne 3 0\na 4 0\ne 5 0\n1 2 3 0\n-2 4 5 0\n";
        assert_eq!(reach(src, Lit::pos(1), 0), vec![Lit::pos(2)]);
    }

    #[test]
    fn literals_left_of_start_are_ignored() {
        // e1 a2 e3: starting at 2, literal 1 lies before the start variable
        let src = "p cnf 3 1\ne 1 0\na 2 0\ne 3 0\n1 2 3 0\n";
        assert_eq!(reach(src, Lit::pos(2), 0), vec![Lit::pos(3)]);
    }

    #[test]
    fn budget_stops_at_the_bound() {
        let src = "p cnf 3 1\na 1 0\ne 2 3 0\n1 2 3 0\n";
        assert_eq!(reach(src, Lit::pos(1), 1).len(), 1);
        assert_eq!(reach(src, Lit::pos(1), 0).len(), 2);
    }

    #[test]
    fn second_visit_records_entry_literal() {
        // -2 v -3 is first entered through -2 and then again through -3.
        // Only the second visit reports -2, the literal that opened the clause.
        let src = "p cnf 3 2\na 1 0\ne 2 3 0\n1 2 3 0\n-2 -3 0\n";
        assert_eq!(
            reach(src, Lit::pos(1), 0),
            vec![Lit::pos(2), Lit::neg_of(2), Lit::pos(3), Lit::neg_of(3)]
        );
    }
}
