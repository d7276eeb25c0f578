use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use fedplan::{MonteCarloOverrides, OutputFormat, commands, init_logging, load_plan, render};
use fedplan_core::model::SamplingMode;

#[derive(Parser, Debug)]
#[command(name = "fedplan")]
#[command(about = "Retirement projections for federal employee households")]
struct Args {
    /// Plan file (YAML, or JSON with a .json extension)
    plan: PathBuf,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Deterministic year-by-year projection
    Project {
        /// Only this scenario (default: all)
        #[arg(short, long)]
        scenario: Option<String>,
    },
    /// Monte Carlo success rates and percentile bands
    MonteCarlo {
        #[arg(short, long)]
        scenario: Option<String>,
        #[arg(short, long)]
        trials: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(short, long, value_enum)]
        mode: Option<Mode>,
        /// Worker threads (default: all cores)
        #[arg(short, long)]
        workers: Option<usize>,
        /// Include every trial in the output
        #[arg(long)]
        include_trials: bool,
    },
    /// Withdrawal rate that yields a target net income once retired
    BreakEven {
        #[arg(short, long)]
        scenario: Option<String>,
        /// Target net income for the first fully retired year
        #[arg(short, long)]
        target: f64,
    },
    /// Compare every scenario against the first
    Compare,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    Historical,
    Statistical,
}

impl From<Mode> for SamplingMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Historical => SamplingMode::Historical,
            Mode::Statistical => SamplingMode::Statistical,
        }
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(args.log_file.as_deref(), &args.log_level)?;

    let plan = load_plan(&args.plan)?;
    let output = match args.command {
        Command::Project { scenario } => {
            render(&commands::project(&plan, scenario.as_deref())?, args.format)?
        }
        Command::MonteCarlo {
            scenario,
            trials,
            seed,
            mode,
            workers,
            include_trials,
        } => {
            let overrides = MonteCarloOverrides {
                trials,
                seed,
                mode: mode.map(SamplingMode::from),
                workers,
                include_trials,
            };
            render(
                &commands::monte_carlo(&plan, scenario.as_deref(), &overrides)?,
                args.format,
            )?
        }
        Command::BreakEven { scenario, target } => render(
            &commands::break_even(&plan, scenario.as_deref(), target)?,
            args.format,
        )?,
        Command::Compare => render(&commands::compare(&plan)?, args.format)?,
    };
    println!("{output}");

    tracing::debug!("done");
    Ok(())
}
