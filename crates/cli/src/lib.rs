pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "modebot",
    about = "Modebot operator CLI",
    long_about = "Prepare settings storage, inspect configuration, and read or change the bot mode.",
    after_help = "Examples:\n  modebot doctor --json\n  modebot mode\n  modebot mode quiet"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Create the settings storage and apply pending migrations")]
    Migrate,
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, Discord token readiness, and storage connectivity")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Show the stored bot mode, or set it to standard, quiet or verbose")]
    Mode {
        #[arg(help = "New mode to store")]
        value: Option<String>,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
        Command::Mode { value } => commands::mode::run(value.as_deref()),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
