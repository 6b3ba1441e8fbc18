//! CLI argument definitions for depcov.
//!
//! Uses `clap` derive macros. Each command corresponds to a handler in the
//! [`super::commands`] module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "depcov",
    version,
    about = "Verify that provided dependencies are present on the runtime classpath",
    long_about = "depcov collects the dependency tree of a Maven project and checks that every \
                  dependency expected to be supplied at runtime is actually on the runtime \
                  classpath, and that the project declares an explicit scope for each dependency."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to depcov.toml in the current directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Require an explicit scope on every declared dependency
    Scopes {
        #[command(flatten)]
        args: AuditArgs,
    },

    /// Check that the collected dependencies are on the runtime classpath
    Provided {
        #[command(flatten)]
        args: AuditArgs,
    },

    /// Check that every transitively provided artifact is on the runtime classpath
    Transitive {
        #[command(flatten)]
        args: AuditArgs,
    },

    /// Run all rules
    Check {
        #[command(flatten)]
        args: AuditArgs,
    },

    /// Print the dependency tree used by the provided check
    Tree {
        #[command(flatten)]
        args: AuditArgs,
    },
}

/// Options shared by every command. Values given here override depcov.toml.
#[derive(Args, Debug, Default)]
pub struct AuditArgs {
    /// Project POM
    #[arg(long, value_name = "PATH")]
    pub pom: Option<PathBuf>,

    /// Runtime classpath listing, one coordinate per line
    #[arg(long, value_name = "FILE")]
    pub runtime: Option<PathBuf>,

    /// Runtime artifact coordinate (repeatable)
    #[arg(long = "runtime-artifact", value_name = "COORD")]
    pub runtime_artifacts: Vec<String>,

    /// Exclusion pattern groupId[:artifactId[:extension[:classifier]]] (repeatable)
    #[arg(long = "exclude", value_name = "PATTERN")]
    pub excludes: Vec<String>,

    /// Also check optional dependencies of dependencies
    #[arg(long)]
    pub include_optional: bool,

    /// Also check the project's own provided dependencies
    #[arg(long)]
    pub include_direct: bool,

    /// Remote repository as NAME=URL (repeatable)
    #[arg(long = "repo", value_name = "NAME=URL")]
    pub repos: Vec<String>,

    /// Local repository directory
    #[arg(long, value_name = "DIR")]
    pub local_repo: Option<PathBuf>,

    /// Use only the local repository
    #[arg(long)]
    pub offline: bool,

    /// Stop collecting below this depth
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Text,
    Json,
}

pub fn parse() -> Cli {
    Cli::parse()
}
