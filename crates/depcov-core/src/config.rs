use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// File name looked up in the project directory.
pub const CONFIG_FILE: &str = "depcov.toml";

/// Audit configuration loaded from `depcov.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditConfig {
    #[serde(default)]
    pub project: ProjectConfig,

    #[serde(default)]
    pub provided: ProvidedConfig,

    #[serde(default)]
    pub transitive: TransitiveConfig,

    #[serde(default)]
    pub repositories: BTreeMap<String, RepositoryEntry>,

    #[serde(default)]
    pub resolver: ResolverConfig,
}

/// Where the project description comes from: `[project]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default = "default_pom")]
    pub pom: PathBuf,
    #[serde(default, rename = "runtime-classpath")]
    pub runtime_classpath: Option<PathBuf>,
    /// Inline runtime coordinates, added to the classpath file's entries.
    #[serde(default)]
    pub runtime: Vec<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            pom: default_pom(),
            runtime_classpath: None,
            runtime: Vec::new(),
        }
    }
}

fn default_pom() -> PathBuf {
    PathBuf::from("pom.xml")
}

/// Settings for the provided-dependency check: `[provided]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvidedConfig {
    #[serde(default)]
    pub excludes: Vec<String>,
    #[serde(default, rename = "include-optional-dependencies")]
    pub include_optional_dependencies: bool,
    #[serde(default, rename = "include-direct-dependencies")]
    pub include_direct_dependencies: bool,
}

/// Settings for the fully transitive check: `[transitive]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransitiveConfig {
    #[serde(default)]
    pub excludes: Vec<String>,
}

/// A repository reference, either a URL string or a detailed table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RepositoryEntry {
    Url(String),
    Detailed {
        url: String,
        #[serde(default)]
        username: Option<String>,
        #[serde(default)]
        password: Option<String>,
    },
}

impl RepositoryEntry {
    pub fn url(&self) -> &str {
        match self {
            RepositoryEntry::Url(url) => url,
            RepositoryEntry::Detailed { url, .. } => url,
        }
    }
}

/// Descriptor lookup settings: `[resolver]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    #[serde(default = "default_local_repository", rename = "local-repository")]
    pub local_repository: String,
    #[serde(default)]
    pub offline: bool,
    #[serde(default, rename = "max-depth")]
    pub max_depth: Option<usize>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            local_repository: default_local_repository(),
            offline: false,
            max_depth: None,
        }
    }
}

fn default_local_repository() -> String {
    "~/.m2/repository".to_string()
}

impl ResolverConfig {
    /// The local repository with a leading `~` expanded.
    pub fn local_repository_path(&self) -> PathBuf {
        expand_home(&self.local_repository)
    }
}

impl AuditConfig {
    /// Load `depcov.toml` from `project_dir`, or return defaults if it does
    /// not exist.
    pub fn load(project_dir: &Path) -> miette::Result<Self> {
        let path = project_dir.join(CONFIG_FILE);
        if path.is_file() {
            Self::from_path(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            depcov_util::errors::DepcovError::Configuration {
                message: format!("Failed to read {}: {e}", path.display()),
            }
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> miette::Result<Self> {
        toml::from_str(content).map_err(|e| {
            depcov_util::errors::DepcovError::Configuration {
                message: format!("Failed to parse {CONFIG_FILE}: {e}"),
            }
            .into()
        })
    }
}

/// Expand a leading `~/` using `HOME` (or `USERPROFILE`).
pub fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => {
            let home = std::env::var("HOME")
                .or_else(|_| std::env::var("USERPROFILE"))
                .unwrap_or_else(|_| ".".to_string());
            Path::new(&home).join(rest)
        }
        None => PathBuf::from(path),
    }
}
