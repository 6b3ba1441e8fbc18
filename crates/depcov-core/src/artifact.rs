//! Artifact coordinates and the two identity notions the audit compares by.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Extension assumed when a coordinate does not name one.
pub const DEFAULT_EXTENSION: &str = "jar";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinateError {
    #[error(
        "invalid artifact coordinate '{0}': expected <group>:<artifact>[:<extension>[:<classifier>]]:<version>"
    )]
    Invalid(String),
}

/// An immutable Maven artifact coordinate.
///
/// An absent classifier is stored as the empty string, so unclassified and
/// empty-classifier artifacts compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Artifact {
    pub group_id: String,
    pub artifact_id: String,
    pub extension: String,
    #[serde(default)]
    pub classifier: String,
    pub version: String,
}

/// Version-disregarding identity: group, artifact, classifier, extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityKey {
    pub group_id: String,
    pub artifact_id: String,
    pub classifier: String,
    pub extension: String,
}

/// Full identity: [`IdentityKey`] plus version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExactKey {
    pub identity: IdentityKey,
    pub version: String,
}

impl Artifact {
    /// A `jar` artifact without classifier.
    pub fn new(group_id: &str, artifact_id: &str, version: &str) -> Self {
        Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
            classifier: String::new(),
            version: version.to_string(),
        }
    }

    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.to_string();
        self
    }

    pub fn with_classifier(mut self, classifier: Option<&str>) -> Self {
        self.classifier = classifier.unwrap_or_default().to_string();
        self
    }

    pub fn with_version(&self, version: &str) -> Self {
        Self {
            version: version.to_string(),
            ..self.clone()
        }
    }

    /// Parse `group:artifact[:extension[:classifier]]:version`.
    pub fn parse(s: &str) -> Result<Self, CoordinateError> {
        let invalid = || CoordinateError::Invalid(s.to_string());
        let parts: Vec<&str> = s.trim().split(':').collect();
        if parts.iter().any(|p| p.trim().is_empty()) {
            return Err(invalid());
        }
        let (extension, classifier) = match parts.len() {
            3 => (DEFAULT_EXTENSION, None),
            4 => (parts[2], None),
            5 => (parts[2], Some(parts[3])),
            _ => return Err(invalid()),
        };
        let version = parts[parts.len() - 1];
        Ok(Self::new(parts[0].trim(), parts[1].trim(), version.trim())
            .with_extension(extension.trim())
            .with_classifier(classifier.map(str::trim)))
    }

    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey {
            group_id: self.group_id.clone(),
            artifact_id: self.artifact_id.clone(),
            classifier: self.classifier.clone(),
            extension: self.extension.clone(),
        }
    }

    pub fn exact_key(&self) -> ExactKey {
        ExactKey {
            identity: self.identity_key(),
            version: self.version.clone(),
        }
    }

    /// Equal in every field except the version.
    pub fn same_identity(&self, other: &Artifact) -> bool {
        self.group_id == other.group_id
            && self.artifact_id == other.artifact_id
            && self.classifier == other.classifier
            && self.extension == other.extension
    }

    /// `group:artifact` without version.
    pub fn key(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)?;
        if !self.classifier.is_empty() {
            write!(f, ":{}:{}", self.extension, self.classifier)?;
        } else if self.extension != DEFAULT_EXTENSION {
            write!(f, ":{}", self.extension)?;
        }
        write!(f, ":{}", self.version)
    }
}

impl FromStr for Artifact {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
