//! Violations and per-rule reports.

use depcov_core::artifact::Artifact;
use depcov_resolver::paths::PathRecord;
use depcov_util::errors::DepcovError;
use serde::Serialize;

/// How results are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Why a dependency was flagged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ViolationKind {
    /// No runtime artifact with the same identity.
    Missing,
    /// Only runtime artifacts with a potentially incompatible version.
    IncompatibleVersion { closest: Artifact },
    /// The required version specification could not be parsed.
    InvalidVersion { reason: String },
    /// Declared without a `<scope>`.
    MissingScope { location: String },
}

/// A single flagged dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Artifact coordinates, or the management key for scope violations.
    pub subject: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<PathRecord>,
    #[serde(flatten)]
    pub kind: ViolationKind,
    pub message: String,
}

impl Violation {
    pub fn new(subject: impl Into<String>, kind: ViolationKind, message: String) -> Self {
        Self {
            subject: subject.into(),
            paths: Vec::new(),
            kind,
            message,
        }
    }

    pub fn with_paths(mut self, paths: Vec<PathRecord>) -> Self {
        self.paths = paths;
        self
    }
}

/// The rule a report belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    ExplicitScope,
    ProvidedCoverage,
    TransitiveCoverage,
}

impl Rule {
    pub fn name(self) -> &'static str {
        match self {
            Rule::ExplicitScope => "explicit-scope",
            Rule::ProvidedCoverage => "provided-coverage",
            Rule::TransitiveCoverage => "transitive-coverage",
        }
    }
}

/// Result of the explicit-scope check.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScopeReport {
    /// Raw dependencies inspected.
    pub checked: usize,
    pub violations: Vec<Violation>,
}

impl ScopeReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn summary(&self) -> Option<String> {
        let count = self.violations.len();
        if count == 0 {
            return None;
        }
        let noun = if count == 1 { "scope" } else { "scopes" };
        Some(format!(
            "Found {count} missing dependency {noun}. Look at the warnings emitted above for the details."
        ))
    }
}

/// Result of one of the two coverage checks.
#[derive(Debug, Clone, Serialize)]
pub struct CoverageReport {
    pub rule: Rule,
    /// Distinct artifacts compared against the runtime classpath.
    pub checked: usize,
    pub violations: Vec<Violation>,
}

impl CoverageReport {
    pub fn new(rule: Rule) -> Self {
        Self {
            rule,
            checked: 0,
            violations: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn summary(&self) -> Option<String> {
        let count = self.violations.len();
        if count == 0 {
            return None;
        }
        let lines: Vec<&str> = self.violations.iter().map(|v| v.message.as_str()).collect();
        Some(format!(
            "Found {count} missing runtime dependencies:\n{}",
            lines.join("\n")
        ))
    }
}

/// Turn a failing summary into the error returned to the caller.
pub fn violation_error(summary: String) -> miette::Report {
    DepcovError::Violation { message: summary }.into()
}

/// Render any report as pretty JSON.
pub fn to_json<T: Serialize>(report: &T) -> miette::Result<String> {
    serde_json::to_string_pretty(report).map_err(|e| {
        DepcovError::Generic {
            message: format!("Failed to serialize report: {e}"),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_summary_pluralizes() {
        let mut report = ScopeReport::default();
        assert_eq!(report.summary(), None);

        let violation = Violation::new(
            "g:a:jar",
            ViolationKind::MissingScope {
                location: String::new(),
            },
            "msg".to_string(),
        );
        report.violations.push(violation.clone());
        assert!(report.summary().unwrap().starts_with("Found 1 missing dependency scope."));
        report.violations.push(violation);
        assert!(report.summary().unwrap().starts_with("Found 2 missing dependency scopes."));
    }

    #[test]
    fn transitive_summary_lists_messages() {
        let mut report = CoverageReport::new(Rule::TransitiveCoverage);
        report.violations.push(Violation::new("g:a:1", ViolationKind::Missing, "first".into()));
        report.violations.push(Violation::new("g:b:1", ViolationKind::Missing, "second".into()));
        assert_eq!(
            report.summary().unwrap(),
            "Found 2 missing runtime dependencies:\nfirst\nsecond"
        );
    }

    #[test]
    fn provided_summary_lists_messages() {
        let mut report = CoverageReport::new(Rule::ProvidedCoverage);
        report.violations.push(Violation::new("g:a:1", ViolationKind::Missing, "m".into()));
        assert_eq!(report.summary().unwrap(), "Found 1 missing runtime dependencies:\nm");
    }

    #[test]
    fn violation_json_is_tagged() {
        let violation = Violation::new(
            "g:a:1.0",
            ViolationKind::IncompatibleVersion {
                closest: Artifact::new("g", "a", "2.0"),
            },
            "m".into(),
        );
        let json: serde_json::Value = serde_json::from_str(&to_json(&violation).unwrap()).unwrap();
        assert_eq!(json["kind"], "incompatible-version");
        assert_eq!(json["subject"], "g:a:1.0");
        assert!(json.get("paths").is_none());
    }
}
