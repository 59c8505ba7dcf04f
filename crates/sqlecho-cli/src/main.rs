//! sqlecho CLI - SQL parse/deparse round-trip test harness

mod args;
mod battery;
mod config;
mod output;

use std::fs;
use std::process::ExitCode;

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use sqlecho_core::{DialectEngine, SqlDialect, SqlEngine};

use crate::args::{Args, Command};
use crate::config::Config;

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(has_failures) => {
            if has_failures {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Error: {:?}", e);
            ExitCode::from(2)
        }
    }
}

fn run(args: Args) -> Result<bool> {
    match args.command.unwrap_or_default() {
        Command::Run {
            config: config_path,
            dialect,
            format,
        } => {
            // Parse and validate dialect
            let dialect: SqlDialect = dialect.parse().map_err(|e: String| miette::miette!(e))?;

            // Load configuration, falling back to the built-in battery
            let config = if let Some(path) = config_path {
                Config::from_file(&path)?
            } else {
                Config::find_and_load()?.unwrap_or_else(Config::default_battery)
            };

            if config.corpora.is_empty() {
                miette::bail!("No corpora configured. Add [[corpus]] entries to sqlecho.toml");
            }

            let report = battery::run_battery(&config, dialect, format)?;
            Ok(report.is_failing())
        }

        Command::Split { file } => {
            let content = fs::read_to_string(&file).into_diagnostic()?;
            let engine = DialectEngine::default();

            match engine.split(&content) {
                Ok(spans) => {
                    for (i, span) in spans.iter().enumerate() {
                        println!(
                            "Statement {} at {}..{}:",
                            i + 1,
                            span.offset,
                            span.offset + span.length
                        );
                        println!("{}", span.resolve(&content));
                        println!();
                    }
                    Ok(false)
                }
                Err(e) => {
                    eprintln!("Split error: {}", e);
                    Ok(true)
                }
            }
        }

        Command::Parse { file } => {
            let content = fs::read_to_string(&file).into_diagnostic()?;
            let engine = DialectEngine::default();

            let spans = match engine.split(&content) {
                Ok(spans) => spans,
                Err(e) => {
                    eprintln!("Split error: {}", e);
                    return Ok(true);
                }
            };

            let mut has_failures = false;
            for (i, span) in spans.iter().enumerate() {
                println!("Statement {}:", i + 1);
                match engine.parse(span.resolve(&content)) {
                    Ok(tree) => println!("{}", tree.as_str()),
                    Err(e) => {
                        eprintln!("Parse error: {}", e);
                        has_failures = true;
                    }
                }
                println!();
            }
            Ok(has_failures)
        }
    }
}
