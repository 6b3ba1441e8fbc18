//! High-level operations behind the `depcov` commands.
//!
//! The `check_*` functions are the pure rule implementations; the plain
//! `scopes`, `provided`, `transitive`, `check` and `tree` functions load a
//! project from disk, run them and print the outcome.

pub mod matching;
pub mod ops_check;
pub mod ops_provided;
pub mod ops_scopes;
pub mod ops_transitive;
pub mod ops_tree;
pub mod project;
pub mod report;

pub use ops_provided::check_provided_coverage;
pub use ops_scopes::check_explicit_scopes;
pub use ops_transitive::check_transitive_provided_coverage;
