//! Lesion Classify CLI - Skin lesion image classification tool.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{Cli, Commands, ExitCode};
use config::AppConfig;

fn main() -> std::process::ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version go to stdout and are not failures.
            let code = if e.use_stderr() {
                ExitCode::Error
            } else {
                ExitCode::Success
            };
            e.print().ok();
            return code.into();
        }
    };

    // Initialize tracing
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = AppConfig::load();

    let exit_code = match cli.command {
        Some(Commands::Predict(args)) => predict(args.with_config(&config)),
        Some(Commands::Assess(args)) => {
            match commands::assess::run(&args.with_config(&config)) {
                Ok(code) => code,
                Err(e) => report(&e),
            }
        }
        Some(Commands::Symptoms) => {
            commands::symptoms::run();
            ExitCode::Success
        }
        Some(Commands::Models(ref args)) => match commands::models::run(args, &config) {
            Ok(()) => ExitCode::Success,
            Err(e) => report(&e),
        },
        None => {
            // Default behavior: run predict with flattened args
            if cli.predict.paths.is_empty() {
                eprintln!("error: No paths specified. Use --help for usage information.");
                return ExitCode::Error.into();
            }
            predict(cli.predict.with_config(&config))
        }
    };

    exit_code.into()
}

fn predict(args: commands::predict::PredictArgs) -> ExitCode {
    match commands::predict::run(&args) {
        Ok(_) => ExitCode::Success,
        Err(e) => report(&e),
    }
}

fn report(e: &anyhow::Error) -> ExitCode {
    eprintln!("error: {e:#}");
    ExitCode::Error
}
