//! compute_pi CLI
//!
//! Prints a Leibniz approximation of pi after a fixed number of iterations.
//! Takes no input; flags only select configuration and shell completions.

use clap::{CommandFactory, Parser as ClapParser, Subcommand};
use clap_complete::{Shell, generate};
use compute_pi::report::{ReportConfig, ReportData};
use compute_pi::{ConfigError, ITERATIONS, LEGACY_PROMPT, PiConfig, format_result, leibniz_pi};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;
use std::time::Instant;
use tracing::info;

#[derive(ClapParser)]
#[command(name = "compute_pi")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Approximate pi with the Leibniz series", long_about = None)]
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

    let config = match PiConfig::load(cli.config.as_deref()) {
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

    run(&config);
}

fn run_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "compute_pi", &mut io::stdout());
}

fn init_logging(config: &PiConfig) -> Result<(), ConfigError> {
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

fn run(config: &PiConfig) {
    let report = ReportConfig::from_env();

    if config.output.legacy_prompt {
        print!("{}", LEGACY_PROMPT);
        let _ = io::stdout().flush();
    }

    info!(iterations = ITERATIONS, "computing pi");
    let start = Instant::now();
    let pi = leibniz_pi(ITERATIONS);
    let elapsed = start.elapsed();

    println!("{}", format_result(pi));

    if let Some(report) = report {
        compute_pi::report::emit(
            &report,
            &ReportData {
                iterations: ITERATIONS,
                value: pi,
                elapsed,
            },
        );
    }
}
