use std::fs::File;
use std::io::{BufRead, BufReader};

use anyhow::{Context, Result, bail};

use crate::error::DepsError;
use crate::qbf::formula::Formula;

/// A pair of renumbered variables, `first <= second`. The derived order is
/// the lexicographic order the driver produces pairs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Query {
    pub first: u32,
    pub second: u32,
}

impl Query {
    /// Validates a pair of original ids and translates it.
    pub fn from_orig(formula: &Formula, a: u32, b: u32) -> Result<Self> {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        if hi > formula.max_orig_var {
            return Err(DepsError::QueryOutOfRange(hi).into());
        }
        let first = formula
            .new_id(lo)
            .ok_or(DepsError::UnquantifiedQueryVariable(lo))?;
        let second = formula
            .new_id(hi)
            .ok_or(DepsError::UnquantifiedQueryVariable(hi))?;
        Ok(if first <= second {
            Self { first, second }
        } else {
            Self {
                first: second,
                second: first,
            }
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
    /// Both variables carry the same quantifier; the scheme says nothing.
    Mismatch,
}

impl Answer {
    pub fn letter(self) -> char {
        match self {
            Answer::Yes => 'Y',
            Answer::No => 'N',
            Answer::Mismatch => 'Q',
        }
    }
}

pub fn parse_queries_str(s: &str, formula: &Formula) -> Result<Vec<Query>> {
    parse_queries_reader(std::io::Cursor::new(s.as_bytes()), formula)
}

pub fn load_queries(path: &str, formula: &Formula) -> Result<Vec<Query>> {
    let file = File::open(path).with_context(|| format!("failed to open query file {}", path))?;
    parse_queries_reader(BufReader::new(file), formula)
}

/// Reads whitespace-separated id pairs to end of input and returns them
/// translated and sorted.
pub fn parse_queries_reader<R: BufRead>(r: R, formula: &Formula) -> Result<Vec<Query>> {
    let mut queries = Vec::new();
    let mut pending: Option<u32> = None;

    for (idx, line) in r.lines().enumerate() {
        let line = line.context("failed to read query input")?;
        for tok in line.split_whitespace() {
            let id = tok
                .parse::<u32>()
                .with_context(|| format!("line {}: invalid query variable: {}", idx + 1, tok))?;
            match pending.take() {
                None => pending = Some(id),
                Some(first) => queries.push(Query::from_orig(formula, first, id)?),
            }
        }
    }
    if let Some(id) = pending {
        bail!("query input ends with unpaired variable {}", id);
    }

    queries.sort();
    Ok(queries)
}
