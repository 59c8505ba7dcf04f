//! CLI argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "sqlecho")]
#[command(author, version, about = "SQL parse/deparse round-trip test harness")]
#[command(propagate_version = true)]
pub struct Args {
    /// With no subcommand, the full corpus battery is run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the corpus battery (the default)
    Run {
        /// Battery configuration file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// SQL dialect
        #[arg(short, long, default_value = "postgresql")]
        dialect: String,

        /// Output format
        #[arg(short, long, default_value = "human", value_enum)]
        format: OutputFormat,
    },

    /// Split a SQL file and display the statement spans (for debugging)
    Split {
        /// SQL file to split
        file: PathBuf,
    },

    /// Parse a SQL file and display the serialized trees (for debugging)
    Parse {
        /// SQL file to parse
        file: PathBuf,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Run {
            config: None,
            dialect: "postgresql".to_string(),
            format: OutputFormat::Human,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Streaming progress markers plus one diagnostic block per failure
    #[default]
    Human,
    /// The full run report as JSON
    Json,
}
