//! Policy-driven dependency collection.
//!
//! Walks descriptors depth-first from the root, derives Maven scopes along
//! each edge, applies the selector pipeline and records every kept
//! dependency occurrence in a [`DependencyTree`].

use std::collections::BTreeMap;

use depcov_core::artifact::{Artifact, IdentityKey};
use depcov_core::scope::Scope;
use depcov_maven::repository::MavenRepository;
use petgraph::graph::NodeIndex;
use thiserror::Error;

use crate::descriptor::{DescriptorError, DescriptorSource};
use crate::graph::{DepEdge, DependencyTree};
use crate::paths::{record_paths, PathRecord};
use crate::selector::DependencySelector;

/// How to prune and bound the collected tree.
#[derive(Debug, Clone)]
pub struct CollectPolicy {
    /// Pipeline in its root state; it is derived once before selecting the
    /// root's direct dependencies.
    pub selector: DependencySelector,
    /// Nodes at this level are recorded but not expanded.
    pub max_depth: Option<usize>,
}

impl CollectPolicy {
    pub fn new(selector: DependencySelector) -> Self {
        Self {
            selector,
            max_depth: None,
        }
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Collection stopped because a descriptor could not be read. Carries the
/// tree built up to that point.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct CollectionError {
    pub tree: DependencyTree,
    pub source: DescriptorError,
}

impl CollectionError {
    /// `{cause}. Partial dependency tree:\n{tree}`
    pub fn render(&self) -> String {
        format!(
            "{}. Partial dependency tree:\n{}",
            self.source,
            self.tree.render_tree()
        )
    }
}

/// One distinct artifact in resolved-map mode.
#[derive(Debug, Clone)]
pub struct ResolvedEntry {
    /// Every root-to-artifact path.
    pub paths: Vec<PathRecord>,
    /// Distinct artifacts below any occurrence of the artifact.
    pub dependencies: Vec<Artifact>,
}

/// Result of resolved-map mode: the full tree plus the filtered map.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub tree: DependencyTree,
    pub artifacts: BTreeMap<Artifact, ResolvedEntry>,
}

struct Collector<'a> {
    source: &'a dyn DescriptorSource,
    repositories: &'a [MavenRepository],
    max_depth: Option<usize>,
}

impl Collector<'_> {
    fn expand(
        &self,
        tree: &mut DependencyTree,
        node: NodeIndex,
        selector: &DependencySelector,
        level: usize,
        stack: &mut Vec<IdentityKey>,
    ) -> Result<(), DescriptorError> {
        let artifact = tree.artifact(node).clone();
        let descriptor = self.source.read(&artifact, self.repositories)?;
        let parent_scope = tree.edge(node).map(|e| e.scope);

        for dependency in descriptor.dependencies {
            if !selector.select(&dependency) {
                tracing::trace!("{} excluded below {}", dependency, artifact);
                continue;
            }
            let edge = DepEdge {
                scope: Scope::derive(parent_scope, dependency.scope),
                declared_scope: dependency.scope,
                optional: dependency.optional,
                exclusions: dependency.exclusions.clone(),
                version_constraint: dependency.version_constraint.clone(),
            };
            let child = tree.add_child(node, dependency.artifact.clone(), edge);

            if self.max_depth.is_some_and(|max| level + 1 >= max) {
                continue;
            }
            let identity = dependency.artifact.identity_key();
            if identity == artifact.identity_key() || stack.contains(&identity) {
                tracing::debug!("Cycle at {}, not expanding", dependency.artifact);
                continue;
            }

            let child_selector = selector.derive_child(Some(&dependency));
            stack.push(identity);
            let expanded = self.expand(tree, child, &child_selector, level + 1, stack);
            stack.pop();
            expanded?;
        }
        Ok(())
    }
}

/// Collect the filtered dependency tree of `root`.
pub fn collect(
    root: &Artifact,
    policy: &CollectPolicy,
    source: &dyn DescriptorSource,
    repositories: &[MavenRepository],
) -> Result<DependencyTree, CollectionError> {
    let mut tree = DependencyTree::new(root.clone());
    if policy.max_depth == Some(0) {
        return Ok(tree);
    }
    let collector = Collector {
        source,
        repositories,
        max_depth: policy.max_depth,
    };
    let selector = policy.selector.derive_child(None);
    let mut stack = vec![root.identity_key()];
    let root_idx = tree.root();
    match collector.expand(&mut tree, root_idx, &selector, 0, &mut stack) {
        Ok(()) => {
            tracing::debug!("dependency tree:\n{}", tree.render_tree());
            Ok(tree)
        }
        Err(source) => Err(CollectionError { tree, source }),
    }
}

/// Collect like [`collect`], then map every distinct artifact whose derived
/// scope is one of `target_scopes` to all of its paths. The root is never
/// part of the map.
pub fn resolve(
    root: &Artifact,
    policy: &CollectPolicy,
    target_scopes: &[Scope],
    source: &dyn DescriptorSource,
    repositories: &[MavenRepository],
) -> Result<Resolution, CollectionError> {
    let tree = collect(root, policy, source, repositories)?;

    let mut accepted: BTreeMap<Artifact, Vec<NodeIndex>> = BTreeMap::new();
    for idx in tree.preorder() {
        let keep = match tree.edge(idx) {
            None => true,
            Some(edge) => target_scopes.contains(&edge.scope),
        };
        if keep {
            accepted
                .entry(tree.artifact(idx).clone())
                .or_default()
                .push(idx);
        }
    }
    accepted.remove(root);

    let artifacts = accepted
        .into_iter()
        .map(|(artifact, nodes)| {
            let mut dependencies: Vec<Artifact> = nodes
                .iter()
                .flat_map(|&n| tree.subtree_artifacts(n))
                .collect();
            dependencies.sort();
            dependencies.dedup();
            let paths = record_paths(&tree, |a| *a == artifact);
            (
                artifact,
                ResolvedEntry {
                    paths,
                    dependencies,
                },
            )
        })
        .collect();

    Ok(Resolution { tree, artifacts })
}
