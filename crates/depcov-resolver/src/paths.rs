//! Root-to-node path records.

use std::fmt;

use depcov_core::artifact::Artifact;
use depcov_core::scope::Scope;
use petgraph::graph::NodeIndex;
use serde::Serialize;

use crate::graph::DependencyTree;

/// One step of a path: an artifact and the scope of the edge leading to it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct PathStep {
    pub artifact: Artifact,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<Scope>,
}

/// Ordered steps from the root (inclusive) to a target (inclusive).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PathRecord {
    pub steps: Vec<PathStep>,
}

impl PathRecord {
    /// Path from the root of `tree` to `idx`.
    pub fn from_tree(tree: &DependencyTree, idx: NodeIndex) -> Self {
        let steps = tree
            .path_to(idx)
            .into_iter()
            .map(|n| PathStep {
                artifact: tree.artifact(n).clone(),
                scope: tree.edge(n).map(|e| e.scope),
            })
            .collect();
        Self { steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Root followed directly by the target.
    pub fn is_direct(&self) -> bool {
        self.steps.len() <= 2
    }

    pub fn target(&self) -> Option<&Artifact> {
        self.steps.last().map(|s| &s.artifact)
    }

    /// Steps joined by ` -> `, optionally without the root and/or target.
    pub fn render(&self, skip_root: bool, skip_target: bool) -> String {
        let start = usize::from(skip_root && !self.steps.is_empty());
        let end = if skip_target {
            self.steps.len().saturating_sub(1)
        } else {
            self.steps.len()
        };
        self.steps
            .get(start..end.max(start))
            .unwrap_or_default()
            .iter()
            .map(|s| s.artifact.to_string())
            .collect::<Vec<_>>()
            .join(" -> ")
    }

    /// Nodes strictly between root and target.
    pub fn intermediates(&self) -> String {
        self.render(true, true)
    }
}

impl fmt::Display for PathRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(false, false))
    }
}

/// Every path ending at a node whose artifact satisfies `predicate`, one per
/// edge. Children of a match are not searched.
pub fn record_paths<F>(tree: &DependencyTree, predicate: F) -> Vec<PathRecord>
where
    F: Fn(&Artifact) -> bool,
{
    let mut found = Vec::new();
    let mut current = Vec::new();
    walk(tree, tree.root(), &predicate, &mut current, &mut found);
    found
}

fn walk<F>(
    tree: &DependencyTree,
    idx: NodeIndex,
    predicate: &F,
    current: &mut Vec<PathStep>,
    found: &mut Vec<PathRecord>,
) where
    F: Fn(&Artifact) -> bool,
{
    current.push(PathStep {
        artifact: tree.artifact(idx).clone(),
        scope: tree.edge(idx).map(|e| e.scope),
    });
    if predicate(tree.artifact(idx)) {
        found.push(PathRecord {
            steps: current.clone(),
        });
    } else {
        for child in tree.children(idx) {
            walk(tree, child, predicate, current, found);
        }
    }
    current.pop();
}

/// Render several paths the way violation messages list them:
/// `direct` when every path is direct, otherwise `via a -> b and c`.
pub fn describe_paths(paths: &[PathRecord]) -> String {
    if paths.iter().all(PathRecord::is_direct) {
        return "direct".to_string();
    }
    let rendered: Vec<String> = paths.iter().map(|p| p.render(false, true)).collect();
    format!("via {}", rendered.join(" and "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DepEdge;

    fn edge(scope: Scope) -> DepEdge {
        DepEdge {
            scope,
            declared_scope: scope,
            optional: false,
            exclusions: Vec::new(),
            version_constraint: None,
        }
    }

    /// root -> x -> t, root -> y -> t, root -> d
    fn diamond() -> DependencyTree {
        let mut tree = DependencyTree::new(Artifact::new("g", "root", "1"));
        let root = tree.root();
        let x = tree.add_child(root, Artifact::new("g", "x", "1"), edge(Scope::Provided));
        let y = tree.add_child(root, Artifact::new("g", "y", "1"), edge(Scope::Provided));
        tree.add_child(x, Artifact::new("g", "t", "1"), edge(Scope::Provided));
        tree.add_child(y, Artifact::new("g", "t", "1"), edge(Scope::Provided));
        tree.add_child(root, Artifact::new("g", "d", "1"), edge(Scope::Provided));
        tree
    }

    #[test]
    fn two_edges_yield_two_paths() {
        let tree = diamond();
        let target = Artifact::new("g", "t", "1");
        let paths = record_paths(&tree, |a| *a == target);
        assert_eq!(paths.len(), 2);
        for path in &paths {
            assert_eq!(path.target(), Some(&target));
            assert_eq!(path.len(), 3);
        }
        assert_eq!(paths[0].to_string(), "g:root:1 -> g:x:1 -> g:t:1");
        assert_eq!(paths[1].to_string(), "g:root:1 -> g:y:1 -> g:t:1");
    }

    #[test]
    fn direct_dependency_yields_single_short_path() {
        let tree = diamond();
        let target = Artifact::new("g", "d", "1");
        let paths = record_paths(&tree, |a| *a == target);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].len(), 2);
        assert!(paths[0].is_direct());
        assert_eq!(describe_paths(&paths), "direct");
    }

    #[test]
    fn children_of_a_match_are_not_searched() {
        let mut tree = DependencyTree::new(Artifact::new("g", "root", "1"));
        let root = tree.root();
        let a = tree.add_child(root, Artifact::new("g", "a", "1"), edge(Scope::Compile));
        tree.add_child(a, Artifact::new("g", "a", "1"), edge(Scope::Compile));
        let paths = record_paths(&tree, |art| art.artifact_id == "a");
        assert_eq!(paths.len(), 1);
    }

    #[test]
    fn render_skips_root_and_target() {
        let tree = diamond();
        let target = Artifact::new("g", "t", "1");
        let path = &record_paths(&tree, |a| *a == target)[0];
        assert_eq!(path.render(true, false), "g:x:1 -> g:t:1");
        assert_eq!(path.render(false, true), "g:root:1 -> g:x:1");
        assert_eq!(path.intermediates(), "g:x:1");
        assert_eq!(path.steps[1].scope, Some(Scope::Provided));
        assert_eq!(path.steps[0].scope, None);
    }

    #[test]
    fn describe_joins_with_and() {
        let tree = diamond();
        let target = Artifact::new("g", "t", "1");
        let paths = record_paths(&tree, |a| *a == target);
        assert_eq!(
            describe_paths(&paths),
            "via g:root:1 -> g:x:1 and g:root:1 -> g:y:1"
        );
    }
}
