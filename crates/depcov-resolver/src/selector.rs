//! Dependency selectors that prune the graph while it is collected.
//!
//! A selector decides whether a declared dependency is kept and which
//! selector applies to the kept dependency's own children. A rejected
//! dependency is never expanded, so pruning always removes whole subtrees.

use depcov_core::exclusion::ExclusionPattern;
use depcov_core::scope::Scope;

use crate::graph::Dependency;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencySelector {
    /// Rejects dependencies declared with one of these scopes.
    ScopeExclusion(Vec<Scope>),

    /// Rejects optional dependencies below the direct level. `depth` is the
    /// level of the dependencies this state selects from, capped at 2.
    OptionalExclusion { depth: usize },

    /// Rejects dependencies matching any pattern. Exclusions declared on a
    /// traversed edge are added for that edge's subtree.
    PatternExclusion(Vec<ExclusionPattern>),

    /// Rejects dependencies at `target_level` whose declared scope is
    /// `target_scope`. Everything below that level is accepted.
    LevelAndScopeExclusion {
        target_level: usize,
        target_scope: Scope,
        current_level: usize,
    },

    Static(bool),

    /// Keeps a dependency only if every inner selector keeps it.
    And(Vec<DependencySelector>),
}

impl DependencySelector {
    pub fn scope_exclusion(scopes: impl IntoIterator<Item = Scope>) -> Self {
        Self::ScopeExclusion(scopes.into_iter().collect())
    }

    pub fn optional_exclusion() -> Self {
        Self::OptionalExclusion { depth: 0 }
    }

    /// Pattern exclusion that additionally rejects `*:*:pom:*` aggregators.
    pub fn pattern_exclusion(patterns: impl IntoIterator<Item = ExclusionPattern>) -> Self {
        let mut patterns: Vec<ExclusionPattern> = patterns.into_iter().collect();
        let aggregator = ExclusionPattern::pom_aggregator();
        if !patterns.contains(&aggregator) {
            patterns.push(aggregator);
        }
        Self::PatternExclusion(patterns)
    }

    pub fn level_and_scope_exclusion(target_level: usize, target_scope: Scope) -> Self {
        Self::LevelAndScopeExclusion {
            target_level,
            target_scope,
            current_level: 0,
        }
    }

    pub fn and(selectors: Vec<DependencySelector>) -> Self {
        Self::And(selectors)
    }

    /// Whether `dependency` is kept.
    pub fn select(&self, dependency: &Dependency) -> bool {
        match self {
            Self::ScopeExclusion(scopes) => !scopes.contains(&dependency.scope),
            Self::OptionalExclusion { depth } => *depth < 2 || !dependency.optional,
            Self::PatternExclusion(patterns) => {
                !patterns.iter().any(|p| p.matches(&dependency.artifact))
            }
            Self::LevelAndScopeExclusion {
                target_level,
                target_scope,
                current_level,
            } => current_level != target_level || dependency.scope != *target_scope,
            Self::Static(accept) => *accept,
            Self::And(selectors) => selectors.iter().all(|s| s.select(dependency)),
        }
    }

    /// Selector for the children of `parent`, which is `None` when deriving
    /// from the root itself.
    pub fn derive_child(&self, parent: Option<&Dependency>) -> Self {
        match self {
            Self::ScopeExclusion(_) | Self::Static(_) => self.clone(),
            Self::OptionalExclusion { depth } => Self::OptionalExclusion {
                depth: (*depth + 1).min(2),
            },
            Self::PatternExclusion(patterns) => match parent {
                Some(dep) if !dep.exclusions.is_empty() => {
                    let mut merged = patterns.clone();
                    for exclusion in &dep.exclusions {
                        if !merged.contains(exclusion) {
                            merged.push(exclusion.clone());
                        }
                    }
                    Self::PatternExclusion(merged)
                }
                _ => self.clone(),
            },
            Self::LevelAndScopeExclusion {
                target_level,
                target_scope,
                current_level,
            } => {
                if current_level < target_level {
                    Self::LevelAndScopeExclusion {
                        target_level: *target_level,
                        target_scope: *target_scope,
                        current_level: current_level + 1,
                    }
                } else {
                    Self::Static(true)
                }
            }
            Self::And(selectors) => {
                Self::And(selectors.iter().map(|s| s.derive_child(parent)).collect())
            }
        }
    }
}
