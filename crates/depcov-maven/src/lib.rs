//! Maven repository protocol: POM parsing with source locations, repository
//! layout, blocking POM and metadata download with repository credentials, and
//! the local cache.

pub mod cache;
pub mod download;
pub mod metadata;
pub mod pom;
pub mod repository;
