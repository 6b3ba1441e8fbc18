use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Maven-compatible dependency scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Compile,
    Runtime,
    Provided,
    Test,
    System,
    Import,
}

impl Default for Scope {
    fn default() -> Self {
        Self::Compile
    }
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Compile => "compile",
            Scope::Runtime => "runtime",
            Scope::Provided => "provided",
            Scope::Test => "test",
            Scope::System => "system",
            Scope::Import => "import",
        }
    }

    /// Scope a transitive dependency ends up with, given the scope of the
    /// edge that pulled in its parent.
    ///
    /// Follows Maven's scope table: `test` and `system` stick, a `compile`
    /// parent passes the child scope through, `provided` and `system`
    /// parents make everything below them `provided`.
    pub fn derive(parent: Option<Scope>, child: Scope) -> Scope {
        match (parent, child) {
            (_, Scope::Test) | (_, Scope::System) => child,
            (None, _) | (Some(Scope::Compile), _) => child,
            (Some(Scope::Test), _) => Scope::Test,
            (Some(Scope::Runtime), _) => Scope::Runtime,
            (Some(Scope::Provided), _) | (Some(Scope::System), _) => Scope::Provided,
            (Some(Scope::Import), _) => Scope::Runtime,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "compile" => Ok(Scope::Compile),
            "runtime" => Ok(Scope::Runtime),
            "provided" => Ok(Scope::Provided),
            "test" => Ok(Scope::Test),
            "system" => Ok(Scope::System),
            "import" => Ok(Scope::Import),
            other => Err(format!("unknown dependency scope '{other}'")),
        }
    }
}
