//! Everything an audit reads from disk before checking.

use std::path::{Path, PathBuf};

use depcov_core::artifact::Artifact;
use depcov_core::config::AuditConfig;
use depcov_core::exclusion::ExclusionPattern;
use depcov_core::runtime::RuntimeClasspath;
use depcov_maven::cache::LocalCache;
use depcov_maven::pom::Pom;
use depcov_maven::repository::{self, MavenRepository};
use depcov_resolver::pom_source::PomDescriptorSource;
use depcov_util::errors::DepcovError;

/// The audited project: its raw POM, coordinates, runtime classpath and the
/// descriptor source used to walk its dependencies.
pub struct AuditProject {
    pub pom_path: PathBuf,
    /// The POM as written, without inheritance or interpolation.
    pub pom: Pom,
    pub root: Artifact,
    pub runtime: RuntimeClasspath,
    pub repositories: Vec<MavenRepository>,
    pub source: PomDescriptorSource,
}

impl AuditProject {
    pub fn load(project_dir: &Path, config: &AuditConfig) -> miette::Result<Self> {
        let pom_path = project_dir.join(&config.project.pom);
        if !pom_path.is_file() {
            return Err(DepcovError::Configuration {
                message: format!("No POM found at {}", pom_path.display()),
            }
            .into());
        }
        let pom = Pom::from_path(&pom_path)?;

        let cache = LocalCache::new(config.resolver.local_repository_path());
        let mut source = if config.resolver.offline {
            PomDescriptorSource::offline(cache)
        } else {
            PomDescriptorSource::new(cache)?
        };
        let root = source.register_workspace_pom(&pom_path)?;
        let repositories = repository::build_repositories(&config.repositories);
        let runtime = load_runtime(project_dir, config)?;
        tracing::debug!("Collected {} runtime dependencies", runtime.len());

        Ok(Self {
            pom_path,
            pom,
            root,
            runtime,
            repositories,
            source,
        })
    }
}

/// The runtime classpath file (relative to `project_dir`) plus inline
/// coordinates from `[project] runtime`.
pub fn load_runtime(project_dir: &Path, config: &AuditConfig) -> miette::Result<RuntimeClasspath> {
    let mut runtime = match &config.project.runtime_classpath {
        Some(path) => RuntimeClasspath::from_path(&project_dir.join(path))?,
        None => RuntimeClasspath::default(),
    };
    let inline = config
        .project
        .runtime
        .iter()
        .map(|coordinate| {
            Artifact::parse(coordinate).map_err(|e| DepcovError::Configuration {
                message: format!("runtime artifact '{coordinate}': {e}"),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    for artifact in &inline {
        tracing::debug!("Runtime artifact {artifact} (inline)");
    }
    runtime.extend(inline);
    Ok(runtime)
}

/// Parse configured exclusion patterns, failing on the first bad one.
pub fn parse_excludes(patterns: &[String]) -> miette::Result<Vec<ExclusionPattern>> {
    ExclusionPattern::parse_all(patterns).map_err(|e| {
        DepcovError::Configuration {
            message: e.to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_combines_file_and_inline_entries() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("runtime.txt"), "# runtime\ng:a:1.0\n\ng:b:2.0\n").unwrap();
        let mut config = AuditConfig::default();
        config.project.runtime_classpath = Some(PathBuf::from("runtime.txt"));
        config.project.runtime = vec!["g:c:3.0".to_string()];
        let runtime = load_runtime(dir.path(), &config).unwrap();
        assert_eq!(runtime.len(), 3);
    }

    #[test]
    fn bad_inline_runtime_entry_is_a_configuration_error() {
        let mut config = AuditConfig::default();
        config.project.runtime = vec!["nonsense".to_string()];
        let err = load_runtime(Path::new("."), &config).unwrap_err();
        assert!(err.to_string().contains("runtime artifact 'nonsense'"));
    }

    #[test]
    fn bad_exclude_is_rejected() {
        assert!(parse_excludes(&["a:b:c:d:e".to_string()]).is_err());
        assert_eq!(parse_excludes(&["org.slf4j".to_string()]).unwrap().len(), 1);
    }

    #[test]
    fn loads_offline_project() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("pom.xml"),
            "<project><groupId>g</groupId><artifactId>app</artifactId><version>1</version><packaging>bundle</packaging></project>",
        )
        .unwrap();
        let mut config = AuditConfig::default();
        config.resolver.offline = true;
        config.resolver.local_repository = dir.path().join("m2").display().to_string();
        let project = AuditProject::load(dir.path(), &config).unwrap();
        assert_eq!(project.root, Artifact::new("g", "app", "1"));
        assert!(project.runtime.is_empty());
        assert!(project.repositories.iter().any(MavenRepository::is_central));
    }
}
