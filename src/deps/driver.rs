use anyhow::{Context, Result};
use log::{debug, info};

use super::occurrence::OccurrenceIndex;
use super::output::DependencySink;
use super::query::{Answer, Query};
use super::search::{ConnectionBudget, ReachableSet, SearchScratch, search};
use crate::error::DepsError;
use crate::qbf::formula::{Formula, QuantCounts};
use crate::qbf::literal::Lit;

pub const MAX_CLAUSES: usize = 1 << 31;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyReport {
    /// Number of dependency pairs found.
    pub total: u64,
    /// One answer per query, in the sorted order the queries were given.
    pub answers: Vec<Answer>,
}

/// Computes the resolution-path dependencies of a formula.
#[derive(Debug, Clone)]
pub struct DependencyDriver<'f> {
    formula: &'f Formula,
    occ: OccurrenceIndex,
    /// Most opposite-quantifier literals each variable can connect to.
    max_connections: Vec<usize>,
    /// Highest variable with a nonzero bound; later ones have no candidates.
    last_var: u32,
}

impl<'f> DependencyDriver<'f> {
    pub fn new(formula: &'f Formula) -> Result<Self> {
        if formula.num_clauses() > MAX_CLAUSES {
            return Err(DepsError::TooManyClauses(formula.num_clauses()).into());
        }
        let (max_connections, last_var) = connection_bounds(formula);
        Ok(Self {
            formula,
            occ: OccurrenceIndex::build(formula),
            max_connections,
            last_var,
        })
    }

    pub fn max_connections(&self, var: u32) -> usize {
        self.max_connections[var as usize]
    }

    pub fn last_var(&self) -> u32 {
        self.last_var
    }

    pub fn occurrences(&self) -> &OccurrenceIndex {
        &self.occ
    }

    /// Streams every dependency to `sink` and answers `queries`, which must be
    /// sorted.
    pub fn run<S: DependencySink>(
        &self,
        queries: &[Query],
        sink: &mut S,
    ) -> Result<DependencyReport> {
        let f = self.formula;
        let num_vars = f.num_vars();
        info!(
            "computing dependencies: {} variables ({} searched), {} clauses, {} queries",
            num_vars,
            self.last_var,
            f.num_clauses(),
            queries.len()
        );

        let mut scratch = SearchScratch::new(f);
        let mut reach_pos = ReachableSet::new(num_vars);
        let mut reach_neg = ReachableSet::new(num_vars);
        let mut answers = vec![Answer::No; queries.len()];
        let mut next_query = 0usize;
        let mut total = 0u64;

        for v in 1..=self.last_var {
            let bound = self.max_connections(v);

            reach_pos.clear();
            scratch.reset();
            search(
                f,
                &self.occ,
                Lit::pos(v),
                &mut ConnectionBudget::new(bound),
                &mut reach_pos,
                &mut scratch,
            );

            reach_neg.clear();
            scratch.reset();
            search(
                f,
                &self.occ,
                Lit::neg_of(v),
                &mut ConnectionBudget::new(bound),
                &mut reach_neg,
                &mut scratch,
            );

            let orig_v = f.var(v).orig;
            sink.begin(orig_v).context("failed to write dependencies")?;
            let mut found = 0usize;
            for x in v..=num_vars {
                let pos = Lit::pos(x);
                let neg = Lit::neg_of(x);
                let is_dep = (reach_pos.contains(pos) && reach_neg.contains(neg))
                    || (reach_pos.contains(neg) && reach_neg.contains(pos));
                if is_dep {
                    sink.dependency(orig_v, f.var(x).orig)
                        .context("failed to write dependencies")?;
                    found += 1;
                }

                // Pairs arrive in increasing order, so a query below the
                // current pair can no longer be hit.
                let pair = Query { first: v, second: x };
                while next_query < queries.len() && queries[next_query] < pair {
                    answers[next_query] = Answer::No;
                    next_query += 1;
                }
                while next_query < queries.len() && queries[next_query] == pair {
                    answers[next_query] = if is_dep { Answer::Yes } else { Answer::No };
                    next_query += 1;
                }
            }
            sink.end(orig_v).context("failed to write dependencies")?;
            debug!("variable {} (bound {}): {} dependencies", orig_v, bound, found);
            total += found as u64;
        }

        for (answer, q) in answers.iter_mut().zip(queries) {
            if f.quant(q.first) == f.quant(q.second) {
                *answer = Answer::Mismatch;
            }
        }

        info!("found {} dependencies", total);
        Ok(DependencyReport { total, answers })
    }
}

/// For each variable, twice the number of opposite-quantifier variables after
/// it; returns the bounds and the last variable whose bound is nonzero.
fn connection_bounds(formula: &Formula) -> (Vec<usize>, u32) {
    let totals = formula.quant_counts();
    let mut seen = QuantCounts::default();
    let mut bounds = vec![0usize; formula.vars.len()];
    let mut last_var = 0u32;
    for v in 1..=formula.num_vars() {
        let quant = formula.quant(v);
        let opposite = quant.opposite();
        bounds[v as usize] = 2 * (totals.get(opposite) - seen.get(opposite));
        seen.bump(quant);
        if bounds[v as usize] > 0 {
            last_var = v;
        }
    }
    (bounds, last_var)
}
