//! karaoke-extract CLI entry point

use clap::Parser;
use karaoke_extract::config::{Cli, Settings};
use karaoke_extract::{pipeline, ExitStatus, ExtractError};
use std::panic::{self, AssertUnwindSafe};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(&cli);

    // Build settings from CLI
    let settings = Settings::from_cli(&cli);

    // Run the pipeline; a panic is reported like any other unexpected error
    match panic::catch_unwind(AssertUnwindSafe(|| pipeline::run(&settings))) {
        Ok(Ok(outcome)) => {
            if !cli.quiet {
                println!();
                println!("Done.");
                println!("Vocals:       {}", outcome.vocals.display());
                println!("Instrumental: {}", outcome.instrumental.display());
            }
            ExitCode::from(ExitStatus::SUCCESS)
        }
        Ok(Err(e)) => report(&e),
        Err(_) => {
            eprintln!("UNEXPECTED ERROR: internal panic");
            ExitCode::from(ExitStatus::UNEXPECTED)
        }
    }
}

fn report(e: &ExtractError) -> ExitCode {
    let code = e.exit_code();
    if code == ExitStatus::UNEXPECTED {
        eprintln!("UNEXPECTED ERROR: {}", e);
    } else {
        eprintln!("Error: {}", e);
    }
    ExitCode::from(code)
}

fn init_logging(cli: &Cli) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter())),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
