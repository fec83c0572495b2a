use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use respath::deps::driver::{DependencyDriver, DependencyReport};
use respath::deps::output::{AdjacencyWriter, CountOnly, ListWriter, OutputStyle};
use respath::deps::query::{Query, load_queries};
use respath::error::DepsError;
use respath::qbf::formula::Formula;
use respath::qbf::qdimacs::{load_formula, write_qdimacs};
use respath::qbf::random::{RandomQbfConfig, generate_qdimacs};

#[derive(Debug, Parser)]
#[command(name = "respath")]
#[command(about = "Resolution-path dependency scheme for QDIMACS formulas")]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Compute dependencies; FORMULA may be `-` for standard input.
    Deps {
        formula: String,
        /// Also print the number of trivial dependencies.
        #[arg(short = 't', long)]
        count_trivial: bool,
        /// Print only the number of dependencies.
        #[arg(short = 'c', long)]
        count_only: bool,
        /// Print one `v: deps... 0` line per variable.
        #[arg(short = 'd', long)]
        depqbf_output: bool,
        #[arg(short = 'q', long)]
        query_file: Option<String>,
    },
    /// Write the renumbered, reduced formula.
    Normalize { formula: String, out: String },
    Stats { formula: String },
    /// Write a random QDIMACS instance.
    Gen {
        #[arg(long)]
        vars: u32,
        #[arg(long)]
        clauses: usize,
        #[arg(long, default_value_t = 3)]
        len: u32,
        #[arg(long, default_value_t = 2)]
        blocks: u32,
        #[arg(long, default_value_t = 1)]
        seed: u64,
        #[arg(long)]
        out: String,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            let code = e.downcast_ref::<DepsError>().map_or(1, DepsError::exit_code);
            ExitCode::from(code)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Cmd::Deps {
            formula,
            count_trivial,
            count_only,
            depqbf_output,
            query_file,
        } => {
            // count-only wins over the adjacency layout
            let style = if count_only {
                OutputStyle::Count
            } else if depqbf_output {
                OutputStyle::Adjacency
            } else {
                OutputStyle::List
            };
            deps_cmd(&formula, style, count_trivial, query_file.as_deref())?
        }
        Cmd::Normalize { formula, out } => normalize_cmd(&formula, &out)?,
        Cmd::Stats { formula } => stats_cmd(&formula)?,
        Cmd::Gen {
            vars,
            clauses,
            len,
            blocks,
            seed,
            out,
        } => {
            let text = generate_qdimacs(&RandomQbfConfig {
                vars,
                clauses,
                clause_len: len,
                blocks,
                seed,
            })?;
            std::fs::write(&out, text).with_context(|| format!("failed to write {}", out))?;
            println!("GEN: wrote {} | vars={} clauses={}", out, vars, clauses);
        }
    }
    Ok(())
}

fn deps_cmd(
    path: &str,
    style: OutputStyle,
    count_trivial: bool,
    query_file: Option<&str>,
) -> Result<()> {
    let formula = load_formula(path)?;
    // Every fatal condition is checked before the first search.
    let driver = DependencyDriver::new(&formula)?;
    let queries = match query_file {
        Some(q) => load_queries(q, &formula)?,
        None => Vec::new(),
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let report = match style {
        OutputStyle::List => driver.run(&queries, &mut ListWriter::new(&mut out))?,
        OutputStyle::Adjacency => driver.run(&queries, &mut AdjacencyWriter::new(&mut out))?,
        OutputStyle::Count => driver.run(&queries, &mut CountOnly)?,
    };

    if count_trivial {
        writeln!(out, "Trivial deps: {}", formula.trivial_deps())?;
    }
    if style == OutputStyle::Count {
        writeln!(out, "RRS deps:     {}", report.total)?;
    }
    if !queries.is_empty() {
        write_answers(&mut out, &formula, &queries, &report)?;
    }
    out.flush()?;
    Ok(())
}

fn write_answers<W: Write>(
    out: &mut W,
    formula: &Formula,
    queries: &[Query],
    report: &DependencyReport,
) -> io::Result<()> {
    writeln!(out, "Query answers:")?;
    for (q, answer) in queries.iter().zip(&report.answers) {
        writeln!(
            out,
            "{} {} {}",
            answer.letter(),
            formula.var(q.first).orig,
            formula.var(q.second).orig
        )?;
    }
    Ok(())
}

fn normalize_cmd(path: &str, out: &str) -> Result<()> {
    let formula = load_formula(path)?;
    let file = File::create(out).with_context(|| format!("failed to create {}", out))?;
    write_qdimacs(&formula, BufWriter::new(file))
        .with_context(|| format!("failed to write {}", out))?;
    println!(
        "NORMALIZE: wrote {} | vars={} clauses={}",
        out,
        formula.num_vars(),
        formula.num_clauses()
    );
    Ok(())
}

fn stats_cmd(path: &str) -> Result<()> {
    let formula = load_formula(path)?;
    let stats = formula.stats();
    println!(
        "vars={} universal={} existential={} blocks={}",
        stats.vars, stats.counts.universal, stats.counts.existential, stats.blocks
    );
    println!(
        "clauses={} empty_clauses={} literals={} trivial_deps={}",
        stats.clauses,
        stats.empty_clauses,
        stats.literals,
        formula.trivial_deps()
    );
    Ok(())
}
