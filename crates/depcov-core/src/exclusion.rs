//! Exclusion patterns: `<groupId>[:<artifactId>[:<extension>[:<classifier>]]]`.
//!
//! Each field is either the wildcard `*`, a glob containing `*`/`?`
//! (`org.apache.*`), or a literal. Omitted trailing fields are wildcards.

use std::fmt;
use std::str::FromStr;

use globset::{Glob, GlobMatcher};
use thiserror::Error;

use crate::artifact::Artifact;

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("exclusion pattern must not be empty")]
    Empty,

    #[error("pattern must contain at most three colons, but contains {colons}: {pattern}")]
    TooManySegments { pattern: String, colons: usize },

    #[error("invalid glob '{glob}' in pattern {pattern}: {source}")]
    InvalidGlob {
        pattern: String,
        glob: String,
        #[source]
        source: globset::Error,
    },
}

/// One field of an [`ExclusionPattern`].
#[derive(Debug, Clone)]
pub enum FieldPattern {
    Any,
    Literal(String),
    Glob(GlobMatcher),
}

impl FieldPattern {
    fn parse(field: &str, pattern: &str) -> Result<Self, PatternError> {
        let field = field.trim();
        if field.is_empty() || field == "*" {
            return Ok(FieldPattern::Any);
        }
        if field.contains('*') || field.contains('?') {
            let glob = Glob::new(field).map_err(|source| PatternError::InvalidGlob {
                pattern: pattern.to_string(),
                glob: field.to_string(),
                source,
            })?;
            return Ok(FieldPattern::Glob(glob.compile_matcher()));
        }
        Ok(FieldPattern::Literal(field.to_string()))
    }

    pub fn literal(value: &str) -> Self {
        FieldPattern::Literal(value.to_string())
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            FieldPattern::Any => true,
            FieldPattern::Literal(lit) => lit == value,
            FieldPattern::Glob(matcher) => matcher.is_match(value),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, FieldPattern::Any)
    }

    pub fn as_str(&self) -> &str {
        match self {
            FieldPattern::Any => "*",
            FieldPattern::Literal(lit) => lit,
            FieldPattern::Glob(matcher) => matcher.glob().glob(),
        }
    }
}

impl PartialEq for FieldPattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for FieldPattern {}

/// A coordinate pattern used to prune artifacts (and their subtrees).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionPattern {
    pub group_id: FieldPattern,
    pub artifact_id: FieldPattern,
    pub extension: FieldPattern,
    pub classifier: FieldPattern,
}

impl ExclusionPattern {
    /// Parse `<groupId>[:<artifactId>[:<extension>[:<classifier>]]]`.
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        let trimmed = pattern.trim();
        if trimmed.is_empty() {
            return Err(PatternError::Empty);
        }
        let parts: Vec<&str> = trimmed.split(':').collect();
        if parts.len() > 4 {
            return Err(PatternError::TooManySegments {
                pattern: pattern.to_string(),
                colons: parts.len() - 1,
            });
        }
        let field = |i: usize| match parts.get(i) {
            Some(part) => FieldPattern::parse(part, pattern),
            None => Ok(FieldPattern::Any),
        };
        Ok(Self {
            group_id: field(0)?,
            artifact_id: field(1)?,
            extension: field(2)?,
            classifier: field(3)?,
        })
    }

    /// Parse every pattern, failing on the first malformed one.
    pub fn parse_all<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Self>, PatternError> {
        patterns.iter().map(|p| Self::parse(p.as_ref())).collect()
    }

    /// Pattern for an exclusion declared on a POM dependency edge
    /// (`groupId` + optional `artifactId`).
    pub fn for_edge(group_id: &str, artifact_id: Option<&str>) -> Self {
        let any_or = |s: &str| {
            if s.is_empty() || s == "*" {
                FieldPattern::Any
            } else {
                FieldPattern::literal(s)
            }
        };
        Self {
            group_id: any_or(group_id),
            artifact_id: artifact_id.map(any_or).unwrap_or(FieldPattern::Any),
            extension: FieldPattern::Any,
            classifier: FieldPattern::Any,
        }
    }

    /// `*:*:pom:*`, which matches pure aggregator artifacts.
    pub fn pom_aggregator() -> Self {
        Self {
            group_id: FieldPattern::Any,
            artifact_id: FieldPattern::Any,
            extension: FieldPattern::literal("pom"),
            classifier: FieldPattern::Any,
        }
    }

    /// True iff every non-wildcard field matches the artifact's field.
    pub fn matches(&self, artifact: &Artifact) -> bool {
        self.group_id.matches(&artifact.group_id)
            && self.artifact_id.matches(&artifact.artifact_id)
            && self.extension.matches(&artifact.extension)
            && self.classifier.matches(&artifact.classifier)
    }
}

impl fmt::Display for ExclusionPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.group_id.as_str(),
            self.artifact_id.as_str(),
            self.extension.as_str(),
            self.classifier.as_str()
        )
    }
}

impl FromStr for ExclusionPattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
