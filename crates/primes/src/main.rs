//! compute_primes CLI
//!
//! Sieves the integers up to a fixed limit and prints a completion line.

use clap::{CommandFactory, Parser as ClapParser, Subcommand};
use clap_complete::{Shell, generate};
use compute_primes::report::ReportConfig;
use compute_primes::{ConfigError, LIMIT, PrimesConfig, run};
use std::io;
use std::path::PathBuf;
use std::process;

#[derive(ClapParser)]
#[command(name = "compute_primes")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Sieve of Eratosthenes up to a fixed limit", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        run_completions(shell);
        return;
    }

    let config = match PrimesConfig::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = init_logging(&config) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    let report = ReportConfig::from_env();
    let code = run(
        LIMIT,
        config.sieve.on_alloc_failure,
        report.as_ref(),
        &mut io::stdout(),
        &mut io::stderr(),
    );
    if code != 0 {
        process::exit(code);
    }
}

fn run_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "compute_primes", &mut io::stdout());
}

fn init_logging(config: &PrimesConfig) -> Result<(), ConfigError> {
    let directive = config.log_directive()?;
    // RUST_LOG, when set, replaces the configured level
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(directive)
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    Ok(())
}
