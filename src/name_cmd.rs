//! `sdlc name`: naming grammar checks.

use std::process::ExitCode;

use clap::{Subcommand, ValueEnum};
use sdlc::config::OutputFormat;
use sdlc_core::naming;
use serde_json::json;

#[derive(Subcommand)]
pub enum NameCommands {
    /// Check a value against a grammar; exits with status 1 if it does not match
    Check {
        /// Which grammar to check against
        #[arg(value_enum)]
        kind: NameKind,

        /// The name or path to check
        value: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum NameKind {
    EntityName,
    EntityPath,
    PackagePath,
    PackageableElementPath,
    ClassifierPath,
    VersionTag,
}

impl NameKind {
    fn label(self) -> &'static str {
        match self {
            Self::EntityName => "entity name",
            Self::EntityPath => "entity path",
            Self::PackagePath => "package path",
            Self::PackageableElementPath => "packageable element path",
            Self::ClassifierPath => "classifier path",
            Self::VersionTag => "version tag",
        }
    }

    fn matches(self, value: &str) -> bool {
        match self {
            Self::EntityName => naming::is_valid_entity_name(value),
            Self::EntityPath => naming::is_valid_entity_path(value),
            Self::PackagePath => naming::is_valid_package_path(value),
            Self::PackageableElementPath => naming::is_valid_packageable_element_path(value),
            Self::ClassifierPath => naming::is_valid_classifier_path(value),
            Self::VersionTag => naming::is_version_tag_name(value),
        }
    }
}

pub fn run(cmd: &NameCommands, format: OutputFormat) -> ExitCode {
    let NameCommands::Check { kind, value } = cmd;
    let valid = kind.matches(value);
    match format {
        OutputFormat::Text => {
            let verdict = if valid { "valid" } else { "invalid" };
            println!("{value}: {verdict} {}", kind.label());
        }
        OutputFormat::Json => {
            println!(
                "{}",
                json!({ "kind": kind.label(), "value": value, "valid": valid })
            );
        }
    }
    if valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
