//! Artifact descriptors: the declared dependencies of one artifact, as
//! provided by an external source.

use std::collections::HashMap;

use depcov_core::artifact::{Artifact, ExactKey};
use depcov_maven::repository::MavenRepository;
use thiserror::Error;

use crate::graph::Dependency;

/// The declared dependencies of an artifact.
#[derive(Debug, Clone)]
pub struct Descriptor {
    pub artifact: Artifact,
    pub dependencies: Vec<Dependency>,
}

#[derive(Debug, Clone, Error)]
pub enum DescriptorError {
    #[error("Failure to find {artifact} in {searched}")]
    NotFound { artifact: Artifact, searched: String },

    #[error("Invalid artifact descriptor for {artifact}: {message}")]
    Invalid { artifact: Artifact, message: String },

    #[error("Failed to read artifact descriptor for {artifact}: {message}")]
    Unavailable { artifact: Artifact, message: String },
}

impl DescriptorError {
    pub fn artifact(&self) -> &Artifact {
        match self {
            Self::NotFound { artifact, .. }
            | Self::Invalid { artifact, .. }
            | Self::Unavailable { artifact, .. } => artifact,
        }
    }
}

/// Reads artifact descriptors against a repository set.
pub trait DescriptorSource {
    fn read(
        &self,
        artifact: &Artifact,
        repositories: &[MavenRepository],
    ) -> Result<Descriptor, DescriptorError>;
}

/// Descriptors registered up front, keyed by exact artifact.
#[derive(Debug, Clone, Default)]
pub struct StaticDescriptorSource {
    descriptors: HashMap<ExactKey, Vec<Dependency>>,
}

impl StaticDescriptorSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the dependencies of `artifact`.
    pub fn with(mut self, artifact: Artifact, dependencies: Vec<Dependency>) -> Self {
        self.insert(artifact, dependencies);
        self
    }

    pub fn insert(&mut self, artifact: Artifact, dependencies: Vec<Dependency>) {
        self.descriptors.insert(artifact.exact_key(), dependencies);
    }
}

impl DescriptorSource for StaticDescriptorSource {
    fn read(
        &self,
        artifact: &Artifact,
        repositories: &[MavenRepository],
    ) -> Result<Descriptor, DescriptorError> {
        match self.descriptors.get(&artifact.exact_key()) {
            Some(dependencies) => Ok(Descriptor {
                artifact: artifact.clone(),
                dependencies: dependencies.clone(),
            }),
            None => Err(DescriptorError::NotFound {
                artifact: artifact.clone(),
                searched: searched_list(repositories),
            }),
        }
    }
}

/// `central (https://...), nexus (https://...)`, or `no repositories`.
pub fn searched_list(repositories: &[MavenRepository]) -> String {
    if repositories.is_empty() {
        return "no repositories".to_string();
    }
    repositories
        .iter()
        .map(|r| format!("{} ({})", r.name, r.url))
        .collect::<Vec<_>>()
        .join(", ")
}
