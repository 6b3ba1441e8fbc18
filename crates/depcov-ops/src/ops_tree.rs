//! Operation: display the dependency tree the provided check walks.

use std::path::Path;

use depcov_core::artifact::Artifact;
use depcov_core::config::AuditConfig;
use depcov_core::scope::Scope;
use depcov_resolver::collector;
use depcov_resolver::graph::DependencyTree;
use depcov_util::errors::DepcovError;
use petgraph::graph::NodeIndex;
use serde::Serialize;

use crate::ops_provided::ProvidedPolicy;
use crate::project::AuditProject;
use crate::report::{self, OutputFormat};

/// JSON form of one tree node.
#[derive(Debug, Serialize)]
pub struct TreeNode {
    pub artifact: Artifact,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<Scope>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
    /// Declared range the version was picked from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn from_tree(tree: &DependencyTree, idx: NodeIndex) -> Self {
        let edge = tree.edge(idx);
        Self {
            artifact: tree.artifact(idx).clone(),
            scope: edge.map(|e| e.scope),
            optional: edge.is_some_and(|e| e.optional),
            range: edge.and_then(|e| e.version_constraint.clone()),
            children: tree
                .children(idx)
                .into_iter()
                .map(|child| TreeNode::from_tree(tree, child))
                .collect(),
        }
    }
}

/// Print the filtered tree of the project in `project_dir`.
pub fn tree(project_dir: &Path, config: &AuditConfig, format: OutputFormat) -> miette::Result<()> {
    let project = AuditProject::load(project_dir, config)?;
    let policy = ProvidedPolicy::from_config(&config.provided, config.resolver.max_depth)?;

    let sp = depcov_util::progress::spinner("Collecting dependencies...");
    let collected = collector::collect(
        &project.root,
        &policy.collect_policy(),
        &project.source,
        &project.repositories,
    );
    sp.finish_and_clear();
    let tree = collected.map_err(|e| DepcovError::Resolution {
        message: e.render(),
    })?;

    match format {
        OutputFormat::Text => print!("{}", tree.render_tree()),
        OutputFormat::Json => {
            let root = TreeNode::from_tree(&tree, tree.root());
            println!("{}", report::to_json(&root)?);
        }
    }
    Ok(())
}
