//! Core data types for depcov.
//!
//! This crate defines the identity primitives the audit works with:
//! artifact coordinates and their identity keys, dependency scopes,
//! exclusion patterns, the runtime classpath, and the `depcov.toml`
//! configuration.
//!
//! This crate is free of network I/O.

pub mod artifact;
pub mod config;
pub mod exclusion;
pub mod runtime;
pub mod scope;
