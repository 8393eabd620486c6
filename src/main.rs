use std::io::{self, Write};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tilegemm::bench::{run_trial, summarize, time_oracle, CSV_HEADER};
use tilegemm::pool::THREADS_ENV;
use tilegemm::verify::{Harness, NdarrayOracle};
use tilegemm::{BlockConfig, PoolConfig, Result, Variant, KB, MB, NB};

#[derive(Parser)]
#[command(name = "tilegemm")]
#[command(about = "Naive vs cache-blocked square SGEMM: correctness and throughput")]
struct Cli {
    /// Worker threads (default: all hardware threads).
    #[arg(long, global = true, env = THREADS_ENV)]
    threads: Option<usize>,

    #[command(flatten)]
    blocks: BlockArgs,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Args)]
struct BlockArgs {
    /// Tile height of the blocked kernel.
    #[arg(long, global = true, env = "TILEGEMM_MB", default_value_t = MB)]
    row_block: usize,

    /// Tile width of the blocked kernel.
    #[arg(long, global = true, env = "TILEGEMM_NB", default_value_t = NB)]
    col_block: usize,

    /// Tile depth of the blocked kernel.
    #[arg(long, global = true, env = "TILEGEMM_KB", default_value_t = KB)]
    reduction_block: usize,
}

#[derive(Subcommand)]
enum Cmd {
    /// Check both kernels against the reference multiply.
    Check,
    /// Time one kernel and print a CSV row per trial.
    Bench {
        /// baseline or blocked.
        variant: Variant,
        /// Matrix dimension.
        n: usize,
        /// Number of timed trials.
        #[arg(default_value_t = 1)]
        trials: usize,
        /// Print the CSV header first.
        #[arg(long)]
        header: bool,
    },
    /// Time the reference multiply (peak calibration).
    Peak {
        #[arg(default_value_t = 4096)]
        n: usize,
        /// Untimed calls before the measured one.
        #[arg(long, default_value_t = 2)]
        warmups: usize,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = BlockConfig::new(
        cli.blocks.row_block,
        cli.blocks.col_block,
        cli.blocks.reduction_block,
    )?;
    PoolConfig {
        threads: cli.threads,
    }
    .install_global()?;

    match cli.cmd {
        Cmd::Check => check(config),
        Cmd::Bench {
            variant,
            n,
            trials,
            header,
        } => bench(variant, n, trials, header, &config),
        Cmd::Peak { n, warmups } => peak(n, warmups),
    }
}

fn check(config: BlockConfig) -> Result<ExitCode> {
    info!(threads = rayon::current_num_threads(), %config, "running correctness suite");
    let report = Harness::new(&NdarrayOracle, config).run_suite()?;

    println!("{report}");

    if report.passed() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn bench(
    variant: Variant,
    n: usize,
    trials: usize,
    header: bool,
    config: &BlockConfig,
) -> Result<ExitCode> {
    let mut out = io::stdout().lock();
    if header {
        writeln!(out, "{CSV_HEADER}")?;
    }

    let mut results = Vec::with_capacity(trials);
    for _ in 0..trials {
        let trial = run_trial(variant, n, config)?;
        writeln!(out, "{}", trial.csv_row())?;
        out.flush()?;
        results.push(trial);
    }

    if let Some(summary) = summarize(&results) {
        info!(%variant, n, %config, "{summary}");
    }
    Ok(ExitCode::SUCCESS)
}

fn peak(n: usize, warmups: usize) -> Result<ExitCode> {
    let (time_s, gflops) = time_oracle(&NdarrayOracle, n, warmups)?;
    println!("n={n} time={time_s:.3}s  GFLOP/s={gflops:.1}");
    Ok(ExitCode::SUCCESS)
}
