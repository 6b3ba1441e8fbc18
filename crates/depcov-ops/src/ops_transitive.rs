//! Operation: require every transitively `provided` artifact of the project
//! to be present on the runtime classpath, in any version.
//!
//! Unlike the provided check this one also covers the project's own direct
//! `provided` dependencies, and exclusion patterns only suppress reporting;
//! they do not prune the tree.

use std::path::Path;

use depcov_core::artifact::Artifact;
use depcov_core::config::AuditConfig;
use depcov_core::exclusion::ExclusionPattern;
use depcov_core::runtime::RuntimeClasspath;
use depcov_core::scope::Scope;
use depcov_maven::repository::MavenRepository;
use depcov_resolver::collector::{self, CollectPolicy};
use depcov_resolver::descriptor::DescriptorSource;
use depcov_resolver::paths::describe_paths;
use depcov_resolver::selector::DependencySelector;
use depcov_util::errors::DepcovError;

use crate::matching;
use crate::project::{self, AuditProject};
use crate::report::{self, CoverageReport, OutputFormat, Rule, Violation, ViolationKind};

/// Settings for the transitive check.
#[derive(Debug, Clone, Default)]
pub struct TransitivePolicy {
    /// Artifacts matching any of these are skipped.
    pub excludes: Vec<ExclusionPattern>,
    pub max_depth: Option<usize>,
}

impl TransitivePolicy {
    pub fn from_config(config: &AuditConfig) -> miette::Result<Self> {
        Ok(Self {
            excludes: project::parse_excludes(&config.transitive.excludes)?,
            max_depth: config.resolver.max_depth,
        })
    }

    fn collect_policy(&self) -> CollectPolicy {
        let selector = DependencySelector::and(vec![
            DependencySelector::scope_exclusion([Scope::Test]),
            DependencySelector::pattern_exclusion([]),
            DependencySelector::optional_exclusion(),
        ]);
        CollectPolicy::new(selector).with_max_depth(self.max_depth)
    }
}

/// Check every artifact that ends up `provided` anywhere below `root`.
pub fn check_transitive_provided_coverage(
    root: &Artifact,
    policy: &TransitivePolicy,
    runtime: &RuntimeClasspath,
    source: &dyn DescriptorSource,
    repositories: &[MavenRepository],
) -> miette::Result<CoverageReport> {
    let resolution = collector::resolve(
        root,
        &policy.collect_policy(),
        &[Scope::Provided],
        source,
        repositories,
    )
    .map_err(|e| DepcovError::Resolution {
        message: e.render(),
    })?;

    tracing::debug!(
        "Collected {} transitive dependencies: ",
        resolution.artifacts.len()
    );
    for (artifact, entry) in &resolution.artifacts {
        tracing::debug!("{artifact} ({})", describe_paths(&entry.paths));
        if !entry.dependencies.is_empty() {
            let below: Vec<String> = entry.dependencies.iter().map(|a| a.to_string()).collect();
            tracing::debug!("    depends on {}", below.join(", "));
        }
    }

    let mut report = CoverageReport::new(Rule::TransitiveCoverage);
    report.checked = resolution.artifacts.len();
    for (artifact, entry) in resolution.artifacts {
        if policy.excludes.iter().any(|p| p.matches(&artifact)) {
            tracing::debug!("Skip excluded dependency {artifact}");
            continue;
        }
        if matching::contains_identity(&artifact, runtime) {
            continue;
        }
        let message = format!(
            "Transitive provided dependency {artifact} ({}) not found as runtime dependency!",
            describe_paths(&entry.paths)
        );
        tracing::warn!("{message}");
        report.violations.push(
            Violation::new(artifact.to_string(), ViolationKind::Missing, message)
                .with_paths(entry.paths),
        );
    }
    Ok(report)
}

/// Run the transitive check for the project in `project_dir`.
pub fn transitive(
    project_dir: &Path,
    config: &AuditConfig,
    format: OutputFormat,
) -> miette::Result<()> {
    let project = AuditProject::load(project_dir, config)?;
    let report = run(&project, config)?;
    if format == OutputFormat::Json {
        println!("{}", report::to_json(&report)?);
    }
    crate::ops_provided::finish(&report)
}

pub(crate) fn run(project: &AuditProject, config: &AuditConfig) -> miette::Result<CoverageReport> {
    let policy = TransitivePolicy::from_config(config)?;
    depcov_util::progress::status(
        "Checking",
        &format!("{} transitive provided coverage", project.root),
    );
    let sp = depcov_util::progress::spinner("Resolving provided dependencies...");
    let result = check_transitive_provided_coverage(
        &project.root,
        &policy,
        &project.runtime,
        &project.source,
        &project.repositories,
    );
    sp.finish_and_clear();
    result
}
