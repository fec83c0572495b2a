use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use log::warn;

use crate::deps::driver::DependencyDriver;
use crate::deps::output::CountOnly;
use crate::error::DepsError;
use crate::qbf::formula::Formula;
use crate::qbf::qdimacs::{ReadLimit, parse_qdimacs_reader};

const EXTENSIONS: [&str; 2] = ["qdimacs", "qdim"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchRow {
    pub path: String,
    pub status: String,
    pub wall_ms: Option<u128>,
    pub file_bytes: Option<u64>,
    pub vars: Option<u32>,
    pub universal: Option<usize>,
    pub existential: Option<usize>,
    pub clauses: Option<usize>,
    pub trivial: Option<u64>,
    pub deps: Option<u64>,
}

impl BenchRow {
    pub fn csv_header() -> &'static str {
        "path,status,wall_ms,file_bytes,vars,universal,existential,clauses,trivial,deps"
    }

    pub fn to_csv_line(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{},{},{}",
            esc_csv(&self.path),
            self.status,
            opt(self.wall_ms),
            opt(self.file_bytes),
            opt(self.vars),
            opt(self.universal),
            opt(self.existential),
            opt(self.clauses),
            opt(self.trivial),
            opt(self.deps),
        )
    }

    fn status_only(path: &Path, status: &str, file_bytes: Option<u64>) -> Self {
        Self {
            path: path.to_string_lossy().to_string(),
            status: status.to_string(),
            wall_ms: None,
            file_bytes,
            vars: None,
            universal: None,
            existential: None,
            clauses: None,
            trivial: None,
            deps: None,
        }
    }
}

/// Computes the dependency count of one file on a worker thread, giving up
/// after `timeout`. A timed-out worker is left to finish on its own.
pub fn run_one(path: &Path, timeout: Duration) -> BenchRow {
    let file_bytes = fs::metadata(path).ok().map(|m| m.len());
    let start = Instant::now();
    let p = path.to_path_buf();
    let (tx, rx) = mpsc::channel();

    std::thread::spawn(move || {
        let row = run_one_inner(&p, file_bytes);
        let _ = tx.send(row);
    });

    let mut row = match rx.recv_timeout(timeout) {
        Ok(row) => row,
        Err(mpsc::RecvTimeoutError::Timeout) => {
            warn!("{}: timed out after {:?}", path.display(), timeout);
            BenchRow::status_only(path, "timeout", file_bytes)
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            BenchRow::status_only(path, "internal_error", file_bytes)
        }
    };
    row.wall_ms = Some(start.elapsed().as_millis());
    row
}

pub fn run_dataset(
    dir: &Path,
    timeout: Duration,
    csv_path: &Path,
    progress: bool,
) -> std::io::Result<Vec<BenchRow>> {
    let paths = discover_paths(dir)?;
    let mut csv = File::create(csv_path)?;
    writeln!(csv, "{}", BenchRow::csv_header())?;
    csv.flush()?;

    let mut rows = Vec::new();
    for path in paths {
        let row = run_one(&path, timeout);
        if progress {
            println!(
                "path={} status={} wall_ms={} deps={}",
                row.path,
                row.status,
                row.wall_ms.unwrap_or_default(),
                row.deps.unwrap_or_default()
            );
        }
        writeln!(csv, "{}", row.to_csv_line())?;
        csv.flush()?;
        rows.push(row);
    }

    Ok(rows)
}

fn run_one_inner(path: &Path, file_bytes: Option<u64>) -> BenchRow {
    let formula = match parse_file(path) {
        Ok(v) => v,
        Err(_) => return BenchRow::status_only(path, "parse_error", file_bytes),
    };

    let counts = formula.quant_counts();
    let mut row = BenchRow {
        vars: Some(formula.num_vars()),
        universal: Some(counts.universal),
        existential: Some(counts.existential),
        clauses: Some(formula.num_clauses()),
        trivial: Some(formula.trivial_deps()),
        ..BenchRow::status_only(path, "ok", file_bytes)
    };

    let driver = match DependencyDriver::new(&formula) {
        Ok(v) => v,
        Err(e) => {
            row.status = match e.downcast_ref::<DepsError>() {
                Some(DepsError::TooManyClauses(_)) => "capacity_error".to_string(),
                _ => "internal_error".to_string(),
            };
            return row;
        }
    };
    match driver.run(&[], &mut CountOnly) {
        Ok(report) => row.deps = Some(report.total),
        Err(_) => row.status = "internal_error".to_string(),
    }
    row
}

fn parse_file(path: &Path) -> anyhow::Result<Formula> {
    let file = File::open(path)?;
    parse_qdimacs_reader(BufReader::new(file), ReadLimit::Eof)
}

fn discover_paths(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut out = Vec::<PathBuf>::new();
    collect_paths(dir, &mut out)?;
    out.sort();
    Ok(out)
}

fn collect_paths(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let p = entry.path();
        if p.is_dir() {
            collect_paths(&p, out)?;
            continue;
        }
        let ext = p.extension().and_then(|x| x.to_str()).unwrap_or("");
        if EXTENSIONS.contains(&ext) {
            out.push(p);
        }
    }
    Ok(())
}

fn opt<T: ToString>(v: Option<T>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

fn esc_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
