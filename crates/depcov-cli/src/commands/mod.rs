//! Command dispatch and handler modules.

mod check;
mod provided;
mod scopes;
mod transitive;
mod tree;

use std::path::{Path, PathBuf};

use depcov_core::config::{AuditConfig, RepositoryEntry};
use depcov_ops::report::OutputFormat;
use depcov_util::errors::DepcovError;
use miette::Result;

use crate::cli::{AuditArgs, Cli, Command, Format};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Scopes { args } => scopes::exec(config_path, &args),
        Command::Provided { args } => provided::exec(config_path, &args),
        Command::Transitive { args } => transitive::exec(config_path, &args),
        Command::Check { args } => check::exec(config_path, &args),
        Command::Tree { args } => tree::exec(config_path, &args),
    }
}

/// The project directory and its configuration with command-line overrides
/// applied.
pub(crate) fn load(config_path: Option<&Path>, args: &AuditArgs) -> Result<(PathBuf, AuditConfig)> {
    let project_dir = std::env::current_dir().map_err(DepcovError::Io)?;
    let mut config = match config_path {
        Some(path) => AuditConfig::from_path(path)?,
        None => AuditConfig::load(&project_dir)?,
    };
    apply_overrides(&mut config, args)?;
    Ok((project_dir, config))
}

fn apply_overrides(config: &mut AuditConfig, args: &AuditArgs) -> Result<()> {
    if let Some(pom) = &args.pom {
        config.project.pom = pom.clone();
    }
    if let Some(runtime) = &args.runtime {
        config.project.runtime_classpath = Some(runtime.clone());
    }
    config
        .project
        .runtime
        .extend(args.runtime_artifacts.iter().cloned());

    config.provided.excludes.extend(args.excludes.iter().cloned());
    config.transitive.excludes.extend(args.excludes.iter().cloned());
    config.provided.include_optional_dependencies |= args.include_optional;
    config.provided.include_direct_dependencies |= args.include_direct;

    for spec in &args.repos {
        let (name, url) = spec.split_once('=').ok_or_else(|| DepcovError::Configuration {
            message: format!("--repo expects NAME=URL, got '{spec}'"),
        })?;
        config
            .repositories
            .insert(name.to_string(), RepositoryEntry::Url(url.to_string()));
    }
    if let Some(dir) = &args.local_repo {
        config.resolver.local_repository = dir.display().to_string();
    }
    config.resolver.offline |= args.offline;
    if args.max_depth.is_some() {
        config.resolver.max_depth = args.max_depth;
    }
    Ok(())
}

pub(crate) fn output_format(format: Format) -> OutputFormat {
    match format {
        Format::Text => OutputFormat::Text,
        Format::Json => OutputFormat::Json,
    }
}
