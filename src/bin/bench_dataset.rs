use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use respath::bench::run_dataset;

#[derive(Debug, Parser)]
#[command(name = "bench_dataset")]
struct Cli {
    #[arg(long)]
    dir: String,
    #[arg(long = "timeout_ms", default_value_t = 30000)]
    timeout_ms: u64,
    #[arg(long)]
    csv: String,
    #[arg(long, default_value_t = false)]
    progress: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    run_from_args(&cli)
}

fn run_from_args(cli: &Cli) -> Result<()> {
    let rows = run_dataset(
        &PathBuf::from(&cli.dir),
        Duration::from_millis(cli.timeout_ms),
        &PathBuf::from(&cli.csv),
        cli.progress,
    )
    .with_context(|| format!("failed to run dataset in {}", cli.dir))?;
    let ok = rows.iter().filter(|r| r.status == "ok").count();
    println!("rows={} ok={}", rows.len(), ok);
    Ok(())
}
