// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use tracing::info;
use tracing_subscriber::EnvFilter;
use usher_experiment::{
    batch::{BatchReport, BatchRunnerBuilder},
    generator::GroupSequenceGenerator,
};
use usher_model::loading::{Instance, LayoutLoader};
use usher_online::{
    allocator::OnlineAllocator, observer::log::LogObserver, stats::AllocationStatistics,
    strategy::StrategyKind,
};

#[derive(Debug, Parser)]
#[command(name = "usher", version, about = "Online seat allocation under distancing rules")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Seat the instance's arrival sequence with one strategy.
    Run(RunArgs),
    /// Compare strategies over repeated trials.
    Batch(BatchArgs),
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Instance file: R, C, R rows of 0/1 digits, group sizes ending in 0.
    input: PathBuf,
    #[arg(long, default_value_t = StrategyKind::FirstFit)]
    strategy: StrategyKind,
    /// Seed for randomized strategies.
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Print the final grid after the placements.
    #[arg(long)]
    show_grid: bool,
    /// Also write a JSON report to this path.
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,
    /// Reject instances whose group sequence lacks the terminating 0.
    #[arg(long)]
    strict: bool,
}

#[derive(Debug, Args)]
struct BatchArgs {
    input: PathBuf,
    #[arg(long, default_value_t = 1)]
    trials: usize,
    /// Draw this many random groups per trial instead of replaying the
    /// instance's sequence.
    #[arg(long)]
    groups: Option<usize>,
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Strategies to compare; all of them if omitted.
    #[arg(long = "strategy", num_args = 1..)]
    strategies: Vec<StrategyKind>,
    #[arg(long)]
    threads: Option<usize>,
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct RunReport<'a> {
    strategy: StrategyKind,
    /// Only set for strategies that draw random numbers.
    seed: Option<u64>,
    placements: Vec<String>,
    seats_filled: usize,
    remaining_eligible: usize,
    statistics: &'a AllocationStatistics,
}

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load(path: &Path, strict: bool) -> Result<Instance> {
    LayoutLoader::new()
        .require_sentinel(strict)
        .from_path(path)
        .with_context(|| format!("failed to load instance from {}", path.display()))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "wrote report");
    Ok(())
}

fn run(args: RunArgs) -> Result<()> {
    let instance = load(&args.input, args.strict)?;
    let grid = instance.grid().context("invalid auditorium layout")?;
    let mut allocator = OnlineAllocator::new(
        grid,
        args.strategy.build(args.seed),
        instance.sequence(),
    );
    let mut observer = LogObserver::new(args.strategy.as_str());
    let outcome = allocator.run(&mut observer)?;

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for placement in outcome.placements() {
        writeln!(out, "{}", placement)?;
    }
    writeln!(out, "filled seats = {}", outcome.seats_filled())?;
    writeln!(out, "remaining eligible seats = {}", outcome.remaining_eligible())?;
    if args.show_grid {
        write!(out, "{}", allocator.grid())?;
    }
    out.flush()?;

    if let Some(path) = &args.json {
        let report = RunReport {
            strategy: args.strategy,
            seed: args.strategy.is_randomized().then_some(args.seed),
            placements: outcome.placements().iter().map(|p| p.to_string()).collect(),
            seats_filled: outcome.seats_filled(),
            remaining_eligible: outcome.remaining_eligible(),
            statistics: outcome.statistics(),
        };
        write_json(path, &report)?;
    }
    Ok(())
}

fn batch(args: BatchArgs) -> Result<()> {
    if args.trials == 0 {
        bail!("--trials must be at least 1");
    }
    let instance = load(&args.input, false)?;

    let sequences: Vec<Vec<usize>> = match args.groups {
        Some(n) => {
            let mut generator = GroupSequenceGenerator::new(ChaCha8Rng::seed_from_u64(args.seed));
            (0..args.trials).map(|_| generator.generate(n)).collect()
        }
        None => vec![instance.groups.clone(); args.trials],
    };
    let strategies = if args.strategies.is_empty() {
        StrategyKind::ALL.to_vec()
    } else {
        args.strategies
    };

    let mut builder = BatchRunnerBuilder::new()
        .with_strategies(strategies)
        .with_sequences(sequences)
        .with_seed(args.seed);
    if let Some(threads) = args.threads {
        builder = builder.with_max_threads(threads);
    }
    let runner = builder.build();
    info!(
        strategies = runner.strategies().len(),
        trials = runner.sequences().len(),
        threads = runner.max_threads(),
        "starting batch"
    );
    let report = runner.run(&instance.layout)?;

    print_summary(&report, runner.strategies())?;
    if let Some(path) = &args.json {
        write_json(path, &report)?;
    }
    Ok(())
}

fn print_summary(report: &BatchReport, strategies: &[StrategyKind]) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    writeln!(
        out,
        "{:<12} {:>8} {:>14} {:>14} {:>12}",
        "strategy", "trials", "avg filled", "avg skipped", "best filled"
    )?;
    for &kind in strategies {
        let trials: Vec<_> = report.trials_for(kind).collect();
        if trials.is_empty() {
            continue;
        }
        let n = trials.len() as f64;
        let filled: usize = trials.iter().map(|t| t.seats_filled).sum();
        let skipped: usize = trials.iter().map(|t| t.groups_skipped).sum();
        let best = trials.iter().map(|t| t.seats_filled).max().unwrap_or(0);
        writeln!(
            out,
            "{:<12} {:>8} {:>14.2} {:>14.2} {:>12}",
            kind.as_str(),
            trials.len(),
            filled as f64 / n,
            skipped as f64 / n,
            best
        )?;
    }
    out.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    enable_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => run(args),
        Command::Batch(args) => batch(args),
    }
}
