//! Fractus CLI - recovers Shamir-shared secrets from base-encoded share documents
//!
//! A share document maps integer x-coordinates to values written in bases
//! 2 through 36. The secret is the constant term of the interpolating
//! polynomial, computed exactly.

mod commands;
mod config;
mod error;
mod formats;
mod utils;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use commands::Commands;
use config::Config;
use log::LevelFilter;

#[derive(Parser)]
#[command(
    name = "fractus",
    version,
    author = "Fractus Team",
    about = "Fractus - recover secrets from base-encoded Shamir shares",
    long_about = "Reads a share document (JSON or YAML), decodes every share value from its \
                  declared base and reconstructs the secret by Lagrange interpolation at zero. \
                  All arithmetic is exact, so secrets of any size are recovered without loss."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to the user config dir, then ./fractus.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log share selection and print the full error chain
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Print nothing but the recovered secret
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        match (self.quiet, self.verbose) {
            (true, _) => LevelFilter::Off,
            (false, true) => LevelFilter::Debug,
            (false, false) => LevelFilter::Info,
        }
    }

    fn run(&self) -> anyhow::Result<()> {
        let config = Config::load(self.config.as_deref())?;
        self.command.execute(&config)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level());

    match cli.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if !cli.quiet {
                report(&e, cli.verbose);
            }
            ExitCode::FAILURE
        }
    }
}

fn report(error: &anyhow::Error, verbose: bool) {
    eprintln!("Error: {}", error);
    if verbose {
        for cause in error.chain().skip(1) {
            eprintln!("  Caused by: {}", cause);
        }
    }
}

fn init_logging(level: LevelFilter) {
    if level == LevelFilter::Off {
        return;
    }

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();
}
