use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for depcov operations.
#[derive(Debug, Error, Diagnostic)]
pub enum DepcovError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration: malformed exclusion pattern, unreadable
    /// config or project file, bad CLI value.
    #[error("Configuration error: {message}")]
    #[diagnostic(help("Check depcov.toml and the command-line options"))]
    Configuration { message: String },

    /// Dependency metadata could not be collected.
    #[error("Could not retrieve dependency metadata for project: {message}")]
    #[diagnostic(help("Make sure every repository is reachable and every POM can be found"))]
    Resolution { message: String },

    /// POM could not be parsed.
    #[error("POM error: {message}")]
    Pom { message: String },

    /// Network request failed.
    #[error("Network error: {message}")]
    Network { message: String },

    /// One or more audit rules were violated.
    #[error("{message}")]
    #[diagnostic(code(depcov::violation))]
    Violation { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}
