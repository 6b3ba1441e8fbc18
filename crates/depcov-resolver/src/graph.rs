//! The collected dependency tree.
//!
//! Every occurrence of an artifact gets its own node, so the graph is a tree
//! rooted at the audited project even when the same artifact is reachable
//! through several edges.

use std::collections::BTreeSet;
use std::fmt;

use depcov_core::artifact::Artifact;
use depcov_core::exclusion::ExclusionPattern;
use depcov_core::scope::Scope;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

/// A dependency as declared in a descriptor, before scope derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub artifact: Artifact,
    pub scope: Scope,
    pub optional: bool,
    pub exclusions: Vec<ExclusionPattern>,
    /// The declared version range when `artifact.version` was picked from
    /// the versions available for it.
    pub version_constraint: Option<String>,
}

impl Dependency {
    pub fn new(artifact: Artifact, scope: Scope) -> Self {
        Self {
            artifact,
            scope,
            optional: false,
            exclusions: Vec::new(),
            version_constraint: None,
        }
    }

    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn with_exclusions(mut self, exclusions: Vec<ExclusionPattern>) -> Self {
        self.exclusions = exclusions;
        self
    }

    pub fn with_version_constraint(mut self, range: impl Into<String>) -> Self {
        self.version_constraint = Some(range.into());
        self
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}{})",
            self.artifact,
            self.scope,
            if self.optional { "?" } else { "" }
        )
    }
}

/// Edge label: how a node was pulled in by its parent.
#[derive(Debug, Clone)]
pub struct DepEdge {
    /// Scope after Maven's derivation from the parent edge.
    pub scope: Scope,
    /// Scope written in the parent's descriptor.
    pub declared_scope: Scope,
    pub optional: bool,
    pub exclusions: Vec<ExclusionPattern>,
    /// Declared range the child's version was resolved from.
    pub version_constraint: Option<String>,
}

impl DepEdge {
    /// Label rendered after the artifact: `(provided)`, `(compile?)`.
    pub fn label(&self) -> String {
        format!("({}{})", self.scope, if self.optional { "?" } else { "" })
    }
}

/// A dependency tree backed by petgraph.
#[derive(Debug, Clone)]
pub struct DependencyTree {
    graph: DiGraph<Artifact, DepEdge>,
    root: NodeIndex,
}

impl DependencyTree {
    pub fn new(root: Artifact) -> Self {
        let mut graph = DiGraph::new();
        let root = graph.add_node(root);
        Self { graph, root }
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// Append a child below `parent`. Children keep insertion order.
    pub fn add_child(&mut self, parent: NodeIndex, artifact: Artifact, edge: DepEdge) -> NodeIndex {
        let child = self.graph.add_node(artifact);
        self.graph.add_edge(parent, child, edge);
        child
    }

    pub fn artifact(&self, idx: NodeIndex) -> &Artifact {
        &self.graph[idx]
    }

    /// The edge that pulled in `idx`; `None` for the root.
    pub fn edge(&self, idx: NodeIndex) -> Option<&DepEdge> {
        self.graph
            .edges_directed(idx, Direction::Incoming)
            .next()
            .map(|e| e.weight())
    }

    pub fn parent(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .edges_directed(idx, Direction::Incoming)
            .next()
            .map(|e| e.source())
    }

    /// Children of `idx` in declaration order.
    pub fn children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        // petgraph yields the most recently added edge first.
        let mut children: Vec<NodeIndex> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| e.target())
            .collect();
        children.reverse();
        children
    }

    /// Root is level 0, its direct dependencies level 1.
    pub fn depth(&self, idx: NodeIndex) -> usize {
        let mut depth = 0;
        let mut current = idx;
        while let Some(parent) = self.parent(current) {
            depth += 1;
            current = parent;
        }
        depth
    }

    /// Nodes from the root down to `idx`, both inclusive.
    pub fn path_to(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut path = vec![idx];
        let mut current = idx;
        while let Some(parent) = self.parent(current) {
            path.push(parent);
            current = parent;
        }
        path.reverse();
        path
    }

    /// All nodes in pre-order (parents before children, declaration order).
    pub fn preorder(&self) -> Vec<NodeIndex> {
        let mut order = Vec::with_capacity(self.graph.node_count());
        let mut stack = vec![self.root];
        while let Some(idx) = stack.pop() {
            order.push(idx);
            let mut children = self.children(idx);
            children.reverse();
            stack.extend(children);
        }
        order
    }

    /// Distinct artifacts below `idx`, excluding `idx` itself.
    pub fn subtree_artifacts(&self, idx: NodeIndex) -> BTreeSet<Artifact> {
        let mut found = BTreeSet::new();
        let mut stack = self.children(idx);
        while let Some(next) = stack.pop() {
            found.insert(self.graph[next].clone());
            stack.extend(self.children(next));
        }
        found
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// True when nothing besides the root was collected.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() <= 1
    }

    /// Indented dump of the whole tree.
    pub fn render_tree(&self) -> String {
        self.render_subtree(self.root)
    }

    /// Indented dump of `idx` and its descendants, four spaces per level,
    /// each line suffixed with its edge label when it has one.
    pub fn render_subtree(&self, idx: NodeIndex) -> String {
        let mut output = String::new();
        self.render_into(&mut output, idx, 0);
        output
    }

    fn render_into(&self, output: &mut String, idx: NodeIndex, level: usize) {
        output.push_str(&"    ".repeat(level));
        output.push_str(&self.graph[idx].to_string());
        if let Some(edge) = self.edge(idx) {
            output.push(' ');
            output.push_str(&edge.label());
        }
        output.push('\n');
        for child in self.children(idx) {
            self.render_into(output, child, level + 1);
        }
    }
}

impl fmt::Display for DependencyTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_tree())
    }
}
