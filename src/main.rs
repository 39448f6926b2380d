use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use shakmaty::Color;

use oracle_chess::MoveOracle;
use oracle_chess::oracle::{BuiltinOracle, Difficulty, ProcessOracle, ProcessOracleConfig};
use oracle_chess::terminal::{SessionOptions, run_interactive_terminal};

/// Where Black's moves come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OracleKind {
    /// In-process pawn player
    Builtin,
    /// External engine exchanging files in the exchange directory
    Process,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Play White against a pluggable move oracle", long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// AI difficulty (easy, medium, hard or any label); prompted when absent
    #[arg(long)]
    difficulty: Option<String>,

    /// Move source for Black
    #[arg(long, value_enum, default_value_t = OracleKind::Process)]
    oracle: OracleKind,

    /// Engine executable for the process oracle
    #[arg(long, default_value = "python")]
    program: String,

    /// Engine argument placed before the exchange file names (repeatable)
    #[arg(long = "arg", default_values_t = ["ai.py".to_string()])]
    args: Vec<String>,

    /// Directory holding board.txt and move.txt
    #[arg(long, default_value = ".")]
    exchange_dir: PathBuf,

    /// Seconds the engine may think before it is killed
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Check oracle moves with the same rule as human moves
    #[arg(long)]
    strict_oracle: bool,

    /// Refuse new moves once this many are recorded
    #[arg(long)]
    history_limit: Option<usize>,

    /// Seed for the builtin oracle's random choices
    #[arg(long)]
    seed: Option<u64>,

    /// Disable ANSI highlighting
    #[arg(long)]
    plain: bool,
}

fn main() {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, log_level),
    )
    .format(|buf, record| writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args()))
    .target(env_logger::Target::Stderr)
    .init();

    if let Err(e) = run(args) {
        log::error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

fn build_oracle(args: &Args) -> Box<dyn MoveOracle> {
    match args.oracle {
        OracleKind::Builtin => Box::new(match args.seed {
            Some(seed) => BuiltinOracle::with_seed(Color::Black, seed),
            None => BuiltinOracle::new(Color::Black),
        }),
        OracleKind::Process => Box::new(ProcessOracle::new(ProcessOracleConfig {
            program: args.program.clone(),
            args: args.args.clone(),
            exchange_dir: args.exchange_dir.clone(),
            timeout: Duration::from_secs(args.timeout_secs),
            ..ProcessOracleConfig::default()
        })),
    }
}

fn run(args: Args) -> Result<()> {
    let oracle = build_oracle(&args);
    let options = SessionOptions {
        difficulty: args.difficulty.as_deref().map(Difficulty::from),
        strict_oracle: args.strict_oracle,
        history_limit: args.history_limit,
        plain: args.plain,
    };

    let outcome = run_interactive_terminal(oracle, options)?;
    log::info!("session finished: {outcome:?}");
    Ok(())
}
