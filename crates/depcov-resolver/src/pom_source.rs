//! [`DescriptorSource`] backed by Maven POMs.
//!
//! POMs are looked up in the workspace (the audited project and parents
//! reachable through `relativePath`), then in the local repository, then in
//! the remote repositories unless running offline. Each POM is turned into
//! its effective form: parent inheritance, interpolation, BOM imports and
//! dependency management.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

use depcov_core::artifact::Artifact;
use depcov_core::exclusion::ExclusionPattern;
use depcov_core::scope::Scope;
use depcov_maven::cache::LocalCache;
use depcov_maven::pom::{Pom, PomDependency};
use depcov_maven::repository::MavenRepository;
use reqwest::blocking::Client;

use crate::descriptor::{searched_list, Descriptor, DescriptorError, DescriptorSource};
use crate::graph::Dependency;
use crate::version::{MavenVersion, VersionSpec};

const MAX_PARENT_DEPTH: usize = 16;

enum LoadError {
    NotFound(String),
    Broken(String),
}

impl LoadError {
    fn describe(self) -> String {
        match self {
            LoadError::NotFound(key) => format!("POM {key} could not be found"),
            LoadError::Broken(message) => message,
        }
    }
}

pub struct PomDescriptorSource {
    workspace: HashMap<String, Pom>,
    cache: LocalCache,
    client: Option<Client>,
    effective: RefCell<HashMap<String, Pom>>,
}

fn pom_key(group: &str, artifact: &str, version: &str) -> String {
    format!("{group}:{artifact}:{version}")
}

impl PomDescriptorSource {
    /// Source that may download missing POMs into `cache`.
    pub fn new(cache: LocalCache) -> miette::Result<Self> {
        let client = depcov_maven::download::build_client()?;
        Ok(Self {
            client: Some(client),
            ..Self::offline(cache)
        })
    }

    /// Source restricted to the workspace and the local repository.
    pub fn offline(cache: LocalCache) -> Self {
        Self {
            workspace: HashMap::new(),
            cache,
            client: None,
            effective: RefCell::new(HashMap::new()),
        }
    }

    pub fn is_offline(&self) -> bool {
        self.client.is_none()
    }

    /// Register the project POM at `path`, plus any parent POMs found via
    /// `relativePath`, and return the project's coordinates.
    pub fn register_workspace_pom(&mut self, path: &Path) -> miette::Result<Artifact> {
        let pom = Pom::from_path(path)?;
        let artifact = pom.artifact()?;
        self.register(path, pom, 0)?;
        Ok(artifact)
    }

    fn register(&mut self, path: &Path, pom: Pom, depth: usize) -> miette::Result<()> {
        let artifact = pom.artifact()?;
        if let Some(parent) = pom.parent.as_ref().filter(|_| depth < MAX_PARENT_DEPTH) {
            let relative = parent.relative_path.as_deref().unwrap_or("../pom.xml");
            let parent_key = pom_key(&parent.group_id, &parent.artifact_id, &parent.version);
            if !relative.is_empty() && !self.workspace.contains_key(&parent_key) {
                let dir = path.parent().unwrap_or_else(|| Path::new("."));
                let mut candidate = dir.join(relative);
                if candidate.is_dir() {
                    candidate = candidate.join("pom.xml");
                }
                if candidate.is_file() {
                    match Pom::from_path(&candidate) {
                        Ok(parent_pom)
                            if parent_pom
                                .artifact()
                                .map(|a| pom_key(&a.group_id, &a.artifact_id, &a.version) == parent_key)
                                .unwrap_or(false) =>
                        {
                            self.register(&candidate, parent_pom, depth + 1)?;
                        }
                        _ => tracing::debug!(
                            "{} is not the parent {parent_key}, ignoring",
                            candidate.display()
                        ),
                    }
                }
            }
        }
        tracing::debug!("Workspace POM {} at {}", artifact, path.display());
        self.workspace.insert(
            pom_key(&artifact.group_id, &artifact.artifact_id, &artifact.version),
            pom,
        );
        Ok(())
    }

    fn raw_pom(
        &self,
        group: &str,
        artifact: &str,
        version: &str,
        repositories: &[MavenRepository],
    ) -> Result<Pom, LoadError> {
        let key = pom_key(group, artifact, version);
        if let Some(pom) = self.workspace.get(&key) {
            return Ok(pom.clone());
        }
        if let Some(pom) = self
            .cache
            .get_pom(group, artifact, version)
            .map_err(|e| LoadError::Broken(format!("POM {key} in local repository: {e}")))?
        {
            return Ok(pom);
        }
        let Some(client) = &self.client else {
            return Err(LoadError::NotFound(key));
        };
        self.cache
            .fetch_pom(client, repositories, group, artifact, version)
            .map_err(|e| LoadError::Broken(format!("POM {key}: {e}")))?
            .ok_or(LoadError::NotFound(key))
    }

    fn effective_pom(
        &self,
        group: &str,
        artifact: &str,
        version: &str,
        repositories: &[MavenRepository],
        depth: usize,
    ) -> Result<Pom, LoadError> {
        let key = pom_key(group, artifact, version);
        if let Some(pom) = self.effective.borrow().get(&key) {
            return Ok(pom.clone());
        }
        if depth > MAX_PARENT_DEPTH {
            return Err(LoadError::Broken(format!(
                "parent or import chain too deep at {key}"
            )));
        }

        let mut pom = self.raw_pom(group, artifact, version, repositories)?;
        if let Some(parent) = pom.parent.clone() {
            let parent_pom = self
                .effective_pom(
                    &parent.group_id,
                    &parent.artifact_id,
                    &parent.version,
                    repositories,
                    depth + 1,
                )
                .map_err(|e| LoadError::Broken(format!("parent of {key}: {}", e.describe())))?;
            pom.apply_parent(&parent_pom);
        }
        pom.resolve_properties();

        let imports: Vec<PomDependency> = pom.bom_imports().into_iter().cloned().collect();
        for bom in imports {
            let Some(bom_version) = bom.version.as_deref() else {
                continue;
            };
            let bom_pom = self
                .effective_pom(
                    &bom.group_id,
                    &bom.artifact_id,
                    bom_version,
                    repositories,
                    depth + 1,
                )
                .map_err(|e| LoadError::Broken(format!("import in {key}: {}", e.describe())))?;
            pom.merge_management(&bom_pom.dependency_management);
        }
        pom.apply_management();

        self.effective.borrow_mut().insert(key, pom.clone());
        Ok(pom)
    }
}

fn to_dependency(owner: &Artifact, dep: &PomDependency) -> Result<Dependency, DescriptorError> {
    let invalid = |message: String| DescriptorError::Invalid {
        artifact: owner.clone(),
        message,
    };
    let version = dep
        .version
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| invalid(format!("dependency {} has no version", dep.management_key())))?;
    let scope = match dep.scope.as_deref() {
        None | Some("") => Scope::Compile,
        Some(s) => s.parse::<Scope>().map_err(invalid)?,
    };
    let (extension, classifier) = dep.extension_and_classifier();
    let artifact = Artifact::new(&dep.group_id, &dep.artifact_id, version)
        .with_extension(&extension)
        .with_classifier(classifier.as_deref());
    let exclusions = dep
        .exclusions
        .iter()
        .map(|e| ExclusionPattern::for_edge(&e.group_id, e.artifact_id.as_deref()))
        .collect();
    Ok(Dependency::new(artifact, scope)
        .optional(dep.optional)
        .with_exclusions(exclusions))
}

impl PomDescriptorSource {
    /// Versions of `group:artifact` available locally, plus those the
    /// remote repositories publish when online.
    fn available_versions(
        &self,
        group: &str,
        artifact: &str,
        repositories: &[MavenRepository],
    ) -> miette::Result<Vec<String>> {
        let mut known = match &self.client {
            Some(client) => self
                .cache
                .fetch_versions(client, repositories, group, artifact)?,
            None => self.cache.local_versions(group, artifact)?,
        };
        for project in self.workspace.values().filter_map(|pom| pom.artifact().ok()) {
            if project.group_id == group
                && project.artifact_id == artifact
                && !known.versions.contains(&project.version)
            {
                known.versions.push(project.version);
            }
        }
        Ok(known.versions)
    }

    /// Replace a ranged version by the highest available version inside
    /// the range, keeping the range on the dependency.
    fn pin_range(
        &self,
        owner: &Artifact,
        dependency: Dependency,
        repositories: &[MavenRepository],
    ) -> Result<Dependency, DescriptorError> {
        let declared = dependency.artifact.version.clone();
        if !declared.starts_with(['[', '(']) {
            return Ok(dependency);
        }
        let spec = VersionSpec::parse(&declared).map_err(|e| DescriptorError::Invalid {
            artifact: owner.clone(),
            message: format!("dependency {}: {e}", dependency.artifact.key()),
        })?;

        let group = &dependency.artifact.group_id;
        let name = &dependency.artifact.artifact_id;
        let versions = self
            .available_versions(group, name, repositories)
            .map_err(|e| DescriptorError::Unavailable {
                artifact: owner.clone(),
                message: format!("versions of {group}:{name}: {e}"),
            })?;
        let Some(pinned) = versions
            .iter()
            .map(|v| MavenVersion::parse(v))
            .filter(|v| spec.contains(v))
            .max()
        else {
            return Err(DescriptorError::Unavailable {
                artifact: owner.clone(),
                message: format!(
                    "no version of {group}:{name} within {declared} is available ({} known)",
                    versions.len()
                ),
            });
        };
        tracing::debug!("{group}:{name}:{declared} resolved to {pinned}");

        Ok(Dependency {
            artifact: dependency.artifact.with_version(&pinned.to_string()),
            ..dependency
        }
        .with_version_constraint(declared))
    }
}

impl DescriptorSource for PomDescriptorSource {
    fn read(
        &self,
        artifact: &Artifact,
        repositories: &[MavenRepository],
    ) -> Result<Descriptor, DescriptorError> {
        let key = pom_key(&artifact.group_id, &artifact.artifact_id, &artifact.version);
        let pom = self
            .effective_pom(
                &artifact.group_id,
                &artifact.artifact_id,
                &artifact.version,
                repositories,
                0,
            )
            .map_err(|e| match e {
                LoadError::NotFound(missing) if missing == key => DescriptorError::NotFound {
                    artifact: artifact.clone(),
                    searched: if self.is_offline() {
                        format!("{} (offline)", self.cache.root().display())
                    } else {
                        format!(
                            "{}, {}",
                            self.cache.root().display(),
                            searched_list(repositories)
                        )
                    },
                },
                other => DescriptorError::Unavailable {
                    artifact: artifact.clone(),
                    message: other.describe(),
                },
            })?;

        let dependencies = pom
            .dependencies
            .iter()
            .map(|d| {
                to_dependency(artifact, d).and_then(|dep| self.pin_range(artifact, dep, repositories))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Descriptor {
            artifact: artifact.clone(),
            dependencies,
        })
    }
}
