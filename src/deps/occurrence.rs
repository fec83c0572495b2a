use crate::qbf::formula::Formula;
use crate::qbf::literal::Lit;

/// Clause indices per literal index, in clause order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccurrenceIndex {
    occ: Vec<Vec<usize>>,
}

impl OccurrenceIndex {
    pub fn build(formula: &Formula) -> Self {
        let mut occ = vec![Vec::new(); 2 * formula.num_vars() as usize];
        for (i, clause) in formula.clauses.iter().enumerate() {
            for lit in clause.lits() {
                occ[lit.index()].push(i);
            }
        }
        Self { occ }
    }

    pub fn clauses_of(&self, lit: Lit) -> &[usize] {
        &self.occ[lit.index()]
    }

    pub fn num_literals(&self) -> usize {
        self.occ.len()
    }

    pub fn total_occurrences(&self) -> usize {
        self.occ.iter().map(Vec::len).sum()
    }
}
