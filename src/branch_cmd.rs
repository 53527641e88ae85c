//! `sdlc branch`: workspace branch-name encoding and decoding.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Subcommand;
use sdlc::config::{OutputFormat, SdlcConfig};
use sdlc_core::{
    DevelopmentStream, VersionId, WorkspaceAccessType, WorkspaceId, WorkspaceSpecification,
    WorkspaceType, parse_workspace_branch_name, workspace_branch_name,
};
use serde_json::json;
use tracing::debug;

#[derive(Subcommand)]
pub enum BranchCommands {
    /// Print the branch name for a workspace
    Encode {
        /// Workspace id
        workspace_id: WorkspaceId,

        /// Group workspace (default: user workspace)
        #[arg(long)]
        group: bool,

        /// Access type: workspace, backup, or resolution
        #[arg(long, default_value = "workspace")]
        access: WorkspaceAccessType,

        /// Patch release version (default: the project's main line)
        #[arg(long, value_name = "M.N.P")]
        patch: Option<VersionId>,

        /// Owning user (default: identity.user from the configuration)
        #[arg(long)]
        user: Option<String>,
    },

    /// Decode branch names into workspace specifications
    ///
    /// Exits with status 1 if any name is not a workspace branch.
    Decode {
        /// Branch names
        #[arg(required = true)]
        names: Vec<String>,

        /// Project id for diagnostics (default: project.id from the configuration)
        #[arg(long)]
        project: Option<String>,
    },

    /// Read branch names from stdin and print the workspace branches
    Scan {
        /// Project id for diagnostics (default: project.id from the configuration)
        #[arg(long)]
        project: Option<String>,
    },
}

pub fn run(cmd: BranchCommands, config: &SdlcConfig, format: OutputFormat) -> Result<ExitCode> {
    match cmd {
        BranchCommands::Encode {
            workspace_id,
            group,
            access,
            patch,
            user,
        } => {
            let workspace_type = if group {
                WorkspaceType::Group
            } else {
                WorkspaceType::User
            };
            let spec = WorkspaceSpecification::new(
                workspace_id,
                workspace_type,
                access,
                DevelopmentStream::from(patch),
                user,
            );
            encode(&spec, config, format)?;
            Ok(ExitCode::SUCCESS)
        }
        BranchCommands::Decode { names, project } => {
            let project = project.unwrap_or_else(|| config.project.id.clone());
            let mut out = io::stdout().lock();
            let mut all_recognized = true;
            for name in &names {
                let spec = parse_workspace_branch_name(&project, name);
                all_recognized &= spec.is_some();
                print_decoded(&mut out, format, name, spec.as_ref())?;
            }
            Ok(if all_recognized {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        BranchCommands::Scan { project } => {
            let project = project.unwrap_or_else(|| config.project.id.clone());
            let mut out = io::stdout().lock();
            let mut input = io::stdin().lock();
            let mut line = Vec::new();
            loop {
                line.clear();
                let read = input
                    .read_until(b'\n', &mut line)
                    .context("reading branch names from stdin")?;
                if read == 0 {
                    break;
                }
                let Ok(text) = std::str::from_utf8(&line) else {
                    let lossy = String::from_utf8_lossy(&line);
                    debug!(
                        project = %project,
                        branch = %lossy.trim_end(),
                        "skipping branch name that is not UTF-8"
                    );
                    continue;
                };
                let name = text.trim();
                if let Some(spec) = parse_workspace_branch_name(&project, name) {
                    print_decoded(&mut out, format, name, Some(&spec))?;
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn encode(spec: &WorkspaceSpecification, config: &SdlcConfig, format: OutputFormat) -> Result<()> {
    let name = workspace_branch_name(spec, || config.identity.user.clone())
        .with_context(|| format!("cannot name {spec}"))?;
    match format {
        OutputFormat::Text => println!("{name}"),
        OutputFormat::Json => {
            let resolved = match spec.user_id() {
                Some(_) => spec.clone(),
                None => parse_workspace_branch_name(&config.project.id, &name)
                    .unwrap_or_else(|| spec.clone()),
            };
            println!("{}", json!({ "branch": name, "specification": resolved }));
        }
    }
    Ok(())
}

fn print_decoded(
    out: &mut impl Write,
    format: OutputFormat,
    name: &str,
    spec: Option<&WorkspaceSpecification>,
) -> Result<()> {
    match format {
        OutputFormat::Text => match spec {
            Some(spec) => writeln!(out, "{name}\t{spec}")?,
            None => writeln!(out, "{name}\tnot a workspace branch")?,
        },
        OutputFormat::Json => {
            writeln!(out, "{}", json!({ "branch": name, "specification": spec }))?;
        }
    }
    Ok(())
}
