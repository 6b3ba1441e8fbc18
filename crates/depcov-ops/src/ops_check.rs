//! Operation: run all three rules against one project and fail once with
//! every summary.

use std::path::Path;

use depcov_core::config::AuditConfig;
use serde::Serialize;

use crate::ops_scopes::check_explicit_scopes;
use crate::project::AuditProject;
use crate::report::{self, CoverageReport, OutputFormat, ScopeReport};
use crate::{ops_provided, ops_transitive};

/// Results of every rule for one project.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub project: String,
    pub explicit_scope: ScopeReport,
    pub provided: CoverageReport,
    pub transitive: CoverageReport,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.explicit_scope.is_clean() && self.provided.is_clean() && self.transitive.is_clean()
    }

    /// Summaries of the failing rules, in execution order.
    pub fn summaries(&self) -> Vec<String> {
        [
            self.explicit_scope.summary(),
            self.provided.summary(),
            self.transitive.summary(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Run the explicit-scope, provided and transitive checks.
pub fn check(project_dir: &Path, config: &AuditConfig, format: OutputFormat) -> miette::Result<()> {
    let project = AuditProject::load(project_dir, config)?;

    depcov_util::progress::status(
        "Checking",
        &format!("{} for explicit scopes", project.pom_path.display()),
    );
    let explicit_scope = check_explicit_scopes(&project.pom.dependencies);
    let provided = ops_provided::run(&project, config)?;
    let transitive = ops_transitive::run(&project, config)?;

    let report = CheckReport {
        project: project.root.to_string(),
        explicit_scope,
        provided,
        transitive,
    };
    if format == OutputFormat::Json {
        println!("{}", report::to_json(&report)?);
    }

    if report.is_clean() {
        depcov_util::progress::status("Finished", &format!("{} passed all rules", report.project));
        return Ok(());
    }
    depcov_util::progress::status_warn("Failed", &format!("{} violated at least one rule", report.project));
    Err(report::violation_error(report.summaries().join("\n")))
}
