//! The runtime classpath: artifacts that will actually be available when the
//! audited component runs.

use std::path::Path;

use crate::artifact::Artifact;

/// Flat, read-only lookup set of runtime artifacts.
///
/// Input order and duplicates carry no meaning.
#[derive(Debug, Clone, Default)]
pub struct RuntimeClasspath {
    artifacts: Vec<Artifact>,
}

impl RuntimeClasspath {
    pub fn new(artifacts: Vec<Artifact>) -> Self {
        Self { artifacts }
    }

    /// Parse one coordinate per line. Blank lines and `#` comments are
    /// skipped.
    pub fn parse(content: &str) -> miette::Result<Self> {
        let mut artifacts = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let artifact = Artifact::parse(line).map_err(|e| {
                depcov_util::errors::DepcovError::Configuration {
                    message: format!("runtime classpath line {}: {e}", idx + 1),
                }
            })?;
            artifacts.push(artifact);
        }
        Ok(Self { artifacts })
    }

    /// Load a runtime classpath listing from a file.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            depcov_util::errors::DepcovError::Configuration {
                message: format!("Failed to read runtime classpath {}: {e}", path.display()),
            }
        })?;
        let classpath = Self::parse(&content)?;
        tracing::debug!(
            "Loaded {} runtime artifacts from {}",
            classpath.len(),
            path.display()
        );
        for artifact in classpath.iter() {
            tracing::debug!("Runtime artifact {artifact}");
        }
        Ok(classpath)
    }

    pub fn extend(&mut self, more: impl IntoIterator<Item = Artifact>) {
        self.artifacts.extend(more);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts.iter()
    }

    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    /// Runtime artifacts sharing `artifact`'s identity (any version).
    pub fn candidates_for<'a>(&'a self, artifact: &'a Artifact) -> impl Iterator<Item = &'a Artifact> {
        self.artifacts.iter().filter(move |a| a.same_identity(artifact))
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

impl FromIterator<Artifact> for RuntimeClasspath {
    fn from_iter<T: IntoIterator<Item = Artifact>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
