use std::fs::File;
use std::io::{BufRead, BufReader, Write};

use anyhow::{Context, Result, bail};
use log::debug;

use super::formula::{Clause, Formula, Variable};
use super::literal::{Lit, Quantifier};

/// How many clauses to read after the prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadLimit {
    /// Stop after the count declared in the header, leaving the rest of the
    /// stream untouched.
    DeclaredClauses,
    /// Read clauses until end of input; the declared count is ignored.
    Eof,
}

pub fn parse_qdimacs_str(s: &str) -> Result<Formula> {
    parse_qdimacs_reader(std::io::Cursor::new(s.as_bytes()), ReadLimit::Eof)
}

/// Reads a formula from `path`, or from standard input when `path` is `-`.
pub fn load_formula(path: &str) -> Result<Formula> {
    if path == "-" {
        let stdin = std::io::stdin();
        return parse_qdimacs_reader(stdin.lock(), ReadLimit::DeclaredClauses)
            .context("failed to parse formula from standard input");
    }
    let file = File::open(path).with_context(|| format!("failed to open {}", path))?;
    parse_qdimacs_reader(BufReader::new(file), ReadLimit::Eof)
        .with_context(|| format!("failed to parse {}", path))
}

pub fn parse_qdimacs_reader<R: BufRead>(r: R, limit: ReadLimit) -> Result<Formula> {
    let mut tokens = Tokens::new(r);

    loop {
        match tokens.next()? {
            Some(tok) if tok == "p" => break,
            Some(_) => {}
            None => bail!("missing 'p cnf' header"),
        }
    }
    let kind = tokens.expect("header")?;
    if kind != "cnf" {
        bail!("invalid header: expected 'p cnf', found 'p {}'", kind);
    }
    let max_orig_var = parse_u32_token(&tokens.expect("header")?, "variable count")?;
    let declared = parse_u32_token(&tokens.expect("header")?, "clause count")?;

    let mut formula = Formula::empty(max_orig_var, declared);

    // The token that ends the prefix is already the first literal of the matrix.
    let mut depth = 0u32;
    let first_lit = loop {
        let Some(tok) = tokens.next()? else {
            debug!("input ended inside the prefix after {} blocks", depth);
            return Ok(formula);
        };
        let Some(quant) = Quantifier::from_marker(&tok) else {
            break tok;
        };
        depth += 1;
        read_block(&mut tokens, &mut formula, quant, depth)?;
    };

    if depth == 0 {
        debug!("empty quantifier prefix, ignoring matrix");
        return Ok(formula);
    }

    let mut pending = Some(first_lit);
    let mut lits = Vec::new();
    loop {
        if limit == ReadLimit::DeclaredClauses && formula.clauses.len() >= declared as usize {
            break;
        }
        let mut tok = match pending.take() {
            Some(tok) => tok,
            None => match tokens.next()? {
                Some(tok) => tok,
                None => break,
            },
        };
        loop {
            let value = tok
                .parse::<i64>()
                .with_context(|| format!("line {}: invalid literal: {}", tokens.line_no, tok))?;
            if value == 0 {
                break;
            }
            lits.push(translate_lit(&formula, value, tokens.line_no)?);
            tok = tokens.expect("clause")?;
        }
        let clause = Clause::reduced(std::mem::take(&mut lits), &formula.vars);
        formula.clauses.push(clause);
    }

    debug!(
        "parsed {} variables in {} blocks, {} clauses (declared {})",
        formula.num_vars(),
        depth,
        formula.clauses.len(),
        declared
    );
    Ok(formula)
}

fn read_block<R: BufRead>(
    tokens: &mut Tokens<R>,
    formula: &mut Formula,
    quant: Quantifier,
    depth: u32,
) -> Result<()> {
    loop {
        let tok = tokens.expect("quantifier block")?;
        let orig = parse_u32_token(&tok, "quantified variable")?;
        if orig == 0 {
            return Ok(());
        }
        if orig > formula.max_orig_var {
            bail!(
                "line {}: quantified variable {} exceeds declared maximum {}",
                tokens.line_no,
                orig,
                formula.max_orig_var
            );
        }
        if formula.orig_to_new[orig as usize] != 0 {
            bail!("line {}: variable {} is quantified twice", tokens.line_no, orig);
        }
        formula.vars.push(Variable { orig, depth, quant });
        formula.orig_to_new[orig as usize] = formula.num_vars();
    }
}

fn translate_lit(formula: &Formula, value: i64, line_no: usize) -> Result<Lit> {
    let orig = value.unsigned_abs();
    if orig > formula.max_orig_var as u64 {
        bail!(
            "line {}: literal {} exceeds declared maximum variable {}",
            line_no,
            value,
            formula.max_orig_var
        );
    }
    let Some(var) = formula.new_id(orig as u32) else {
        bail!("line {}: variable {} is not quantified", line_no, orig);
    };
    Ok(Lit::new(var, value > 0))
}

fn parse_u32_token(token: &str, what: &str) -> Result<u32> {
    token
        .parse::<u32>()
        .with_context(|| format!("invalid {} value: {}", what, token))
}

/// Whitespace tokens pulled one line at a time, so a bounded read never
/// consumes lines past the last clause it needs.
struct Tokens<R> {
    reader: R,
    pending: Vec<String>,
    line_no: usize,
}

impl<R: BufRead> Tokens<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            pending: Vec::new(),
            line_no: 0,
        }
    }

    fn next(&mut self) -> Result<Option<String>> {
        loop {
            if let Some(tok) = self.pending.pop() {
                return Ok(Some(tok));
            }
            let mut line = String::new();
            let n = self
                .reader
                .read_line(&mut line)
                .context("failed to read qdimacs input")?;
            if n == 0 {
                return Ok(None);
            }
            self.line_no += 1;
            let trimmed = line.trim_start();
            if trimmed.starts_with('c') {
                continue;
            }
            self.pending = trimmed.split_whitespace().rev().map(str::to_owned).collect();
        }
    }

    fn expect(&mut self, what: &str) -> Result<String> {
        match self.next()? {
            Some(tok) => Ok(tok),
            None => bail!("truncated {} at line {}", what, self.line_no),
        }
    }
}

/// Renders the renumbered formula: one block per run of equal quantifiers,
/// then the reduced clauses.
pub fn to_qdimacs(formula: &Formula) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "p cnf {} {}\n",
        formula.num_vars(),
        formula.num_clauses()
    ));

    let mut run: Option<Quantifier> = None;
    for id in 1..=formula.num_vars() {
        let quant = formula.quant(id);
        if run != Some(quant) {
            if run.is_some() {
                out.push_str(" 0\n");
            }
            out.push_str(quant.marker());
            run = Some(quant);
        }
        out.push_str(&format!(" {}", id));
    }
    if run.is_some() {
        out.push_str(" 0\n");
    }

    for clause in &formula.clauses {
        for lit in clause.lits() {
            out.push_str(&format!("{} ", lit));
        }
        out.push_str("0\n");
    }
    out
}

pub fn write_qdimacs<W: Write>(formula: &Formula, mut w: W) -> std::io::Result<()> {
    w.write_all(to_qdimacs(formula).as_bytes())?;
    w.flush()
}
