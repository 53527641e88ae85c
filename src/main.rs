use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use sdlc::config::{DEFAULT_CONFIG_FILE, OutputFormat, SdlcConfig};

mod branch_cmd;
mod name_cmd;

/// legend-sdlc workspace tooling
///
/// Encode and decode the git branch names that back SDLC workspaces, and
/// check entity, package, and classifier names against the naming grammar.
///
/// BRANCH NAMES:
///
///   workspace/<user>/<id>          user workspace
///   backup/<user>/<id>             user workspace backup
///   resolution/<user>/<id>         user conflict resolution
///   group/<id>                     group workspace
///   group-backup/<id>              group workspace backup
///   group-resolution/<id>          group conflict resolution
///
///   Prefix any of these with patch/<M.N.P>/ for a patch release stream.
#[derive(Parser)]
#[command(name = "sdlc")]
#[command(version, about)]
#[command(propagate_version = true)]
#[command(after_help = "See 'sdlc <command> --help' for more information on a specific command.")]
struct Cli {
    /// Configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Output format (overrides the configuration file)
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode and decode workspace branch names
    #[command(subcommand)]
    Branch(branch_cmd::BranchCommands),

    /// Check names against the naming grammar
    #[command(subcommand)]
    Name(name_cmd::NameCommands),
}

fn main() -> Result<ExitCode> {
    sdlc::telemetry::init();
    let cli = Cli::parse();

    let config = SdlcConfig::load(&cli.config)?;
    let format = cli.format.unwrap_or(config.output.format);

    match cli.command {
        Commands::Branch(cmd) => branch_cmd::run(cmd, &config, format),
        Commands::Name(cmd) => Ok(name_cmd::run(&cmd, format)),
    }
}
