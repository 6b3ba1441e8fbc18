//! Shared utilities for depcov.
//!
//! Cross-cutting concerns used by every other depcov crate: the unified
//! error type and the terminal status/spinner helpers.

pub mod errors;
pub mod progress;
