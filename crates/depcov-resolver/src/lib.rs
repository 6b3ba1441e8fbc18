//! Dependency collection: reads artifact descriptors, walks them under a
//! selector pipeline with Maven scope derivation, and records every path to
//! each collected artifact. Also hosts Maven version ordering and the
//! compatibility rule used when matching against a runtime classpath.

pub mod collector;
pub mod descriptor;
pub mod graph;
pub mod paths;
pub mod pom_source;
pub mod selector;
pub mod version;
