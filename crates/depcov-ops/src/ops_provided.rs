//! Operation: require every collected dependency of the project to be
//! present, in a compatible version, on the runtime classpath.
//!
//! The tree is collected with test-scoped dependencies, excluded patterns and
//! POM aggregators pruned. Optional dependencies below the direct level and
//! direct `provided` dependencies are pruned too unless the policy includes
//! them.

use std::collections::BTreeMap;
use std::path::Path;

use depcov_core::artifact::Artifact;
use depcov_core::config::{AuditConfig, ProvidedConfig};
use depcov_core::exclusion::ExclusionPattern;
use depcov_core::runtime::RuntimeClasspath;
use depcov_core::scope::Scope;
use depcov_maven::repository::MavenRepository;
use depcov_resolver::collector::{self, CollectPolicy};
use depcov_resolver::descriptor::DescriptorSource;
use depcov_resolver::paths::PathRecord;
use depcov_resolver::selector::DependencySelector;
use depcov_util::errors::DepcovError;
use petgraph::graph::NodeIndex;

use crate::matching::{self, MatchOutcome};
use crate::project::{self, AuditProject};
use crate::report::{self, CoverageReport, OutputFormat, Rule, Violation, ViolationKind};

/// Selection policy for the provided check.
#[derive(Debug, Clone, Default)]
pub struct ProvidedPolicy {
    /// Keep optional dependencies of dependencies.
    pub include_optionals: bool,
    /// Keep the project's own `provided` dependencies.
    pub include_directs: bool,
    pub excludes: Vec<ExclusionPattern>,
    pub max_depth: Option<usize>,
}

impl ProvidedPolicy {
    pub fn from_config(config: &ProvidedConfig, max_depth: Option<usize>) -> miette::Result<Self> {
        Ok(Self {
            include_optionals: config.include_optional_dependencies,
            include_directs: config.include_direct_dependencies,
            excludes: project::parse_excludes(&config.excludes)?,
            max_depth,
        })
    }

    /// scope, then pattern, then optional, then level.
    pub fn selector(&self) -> DependencySelector {
        let mut selectors = vec![
            DependencySelector::scope_exclusion([Scope::Test]),
            DependencySelector::pattern_exclusion(self.excludes.iter().cloned()),
        ];
        if !self.include_optionals {
            selectors.push(DependencySelector::optional_exclusion());
        }
        if !self.include_directs {
            selectors.push(DependencySelector::level_and_scope_exclusion(
                1,
                Scope::Provided,
            ));
        }
        DependencySelector::and(selectors)
    }

    pub fn collect_policy(&self) -> CollectPolicy {
        CollectPolicy::new(self.selector()).with_max_depth(self.max_depth)
    }
}

/// ` via a -> b and c`, with `directly` standing in for direct paths.
/// Empty when every path is direct.
fn via_clause(paths: &[PathRecord]) -> String {
    let mut transitive: Vec<String> = paths
        .iter()
        .filter(|p| !p.is_direct())
        .map(PathRecord::intermediates)
        .collect();
    transitive.dedup();
    if transitive.is_empty() {
        return String::new();
    }
    if paths.iter().any(PathRecord::is_direct) {
        transitive.push("directly".to_string());
    }
    format!(" via {}", transitive.join(" and "))
}

/// Check the collected tree of `root` against `runtime`.
///
/// Each distinct artifact is reported at most once, carrying every path it
/// was reached through.
pub fn check_provided_coverage(
    root: &Artifact,
    policy: &ProvidedPolicy,
    runtime: &RuntimeClasspath,
    source: &dyn DescriptorSource,
    repositories: &[MavenRepository],
) -> miette::Result<CoverageReport> {
    let tree = collector::collect(root, &policy.collect_policy(), source, repositories).map_err(
        |e| DepcovError::Resolution {
            message: e.render(),
        },
    )?;

    let mut occurrences: BTreeMap<Artifact, Vec<NodeIndex>> = BTreeMap::new();
    for idx in tree.preorder() {
        if idx != tree.root() {
            occurrences
                .entry(tree.artifact(idx).clone())
                .or_default()
                .push(idx);
        }
    }

    let mut report = CoverageReport::new(Rule::ProvidedCoverage);
    report.checked = occurrences.len();
    for (artifact, nodes) in occurrences {
        // The shallowest occurrence decides how the artifact is labelled and
        // which version requirement it is checked against.
        let nearest = nodes
            .iter()
            .copied()
            .min_by_key(|&idx| tree.depth(idx))
            .and_then(|idx| tree.edge(idx));
        let label = nearest.map(|edge| edge.label()).unwrap_or_default();
        let required = match nearest.and_then(|edge| edge.version_constraint.as_deref()) {
            Some(range) => artifact.with_version(range),
            None => artifact.clone(),
        };
        let paths: Vec<PathRecord> = nodes
            .iter()
            .map(|&idx| PathRecord::from_tree(&tree, idx))
            .collect();
        let via = via_clause(&paths);

        let (kind, message) = match matching::match_compatible(&required, runtime) {
            MatchOutcome::Compatible(found) => {
                tracing::debug!("{artifact} provided by {found}");
                continue;
            }
            MatchOutcome::Incompatible {
                candidates,
                closest,
            } => {
                for candidate in &candidates {
                    tracing::warn!(
                        "Found provided dependency {artifact} only with potentially incompatible version {} in runtime classpath",
                        candidate.version
                    );
                }
                let message = format!(
                    "Dependency {artifact} {label}{via} not found as runtime dependency! (only found with potentially incompatible version {})",
                    closest.version
                );
                (ViolationKind::IncompatibleVersion { closest }, message)
            }
            MatchOutcome::InvalidVersion(e) => {
                tracing::error!("Invalid version given for artifact {artifact}: {e}");
                let message = format!(
                    "Dependency {artifact} {label}{via} has an invalid version requirement {}: {e}",
                    required.version
                );
                (
                    ViolationKind::InvalidVersion {
                        reason: e.to_string(),
                    },
                    message,
                )
            }
            MatchOutcome::Absent => (
                ViolationKind::Missing,
                format!("Dependency {artifact} {label}{via} not found as runtime dependency!"),
            ),
        };

        tracing::warn!("{message}");
        report
            .violations
            .push(Violation::new(artifact.to_string(), kind, message).with_paths(paths));
    }
    Ok(report)
}

/// Run the provided check for the project in `project_dir`.
pub fn provided(project_dir: &Path, config: &AuditConfig, format: OutputFormat) -> miette::Result<()> {
    let project = AuditProject::load(project_dir, config)?;
    let report = run(&project, config)?;
    if format == OutputFormat::Json {
        println!("{}", report::to_json(&report)?);
    }
    finish(&report)
}

pub(crate) fn run(project: &AuditProject, config: &AuditConfig) -> miette::Result<CoverageReport> {
    let policy = ProvidedPolicy::from_config(&config.provided, config.resolver.max_depth)?;
    depcov_util::progress::status("Checking", &format!("{} provided coverage", project.root));
    let sp = depcov_util::progress::spinner("Collecting dependencies...");
    let result = check_provided_coverage(
        &project.root,
        &policy,
        &project.runtime,
        &project.source,
        &project.repositories,
    );
    sp.finish_and_clear();
    result
}

pub(crate) fn finish(report: &CoverageReport) -> miette::Result<()> {
    match report.summary() {
        Some(summary) => {
            depcov_util::progress::status_warn(
                "Failed",
                &format!("{}: {} violation(s)", report.rule.name(), report.violations.len()),
            );
            Err(report::violation_error(summary))
        }
        None => {
            depcov_util::progress::status(
                "Finished",
                &format!("{} dependencies found on the runtime classpath", report.checked),
            );
            Ok(())
        }
    }
}
