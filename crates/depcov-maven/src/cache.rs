//! Local POM cache mirroring Maven repository layout.

use std::fs;
use std::path::{Path, PathBuf};

use reqwest::blocking::Client;

use depcov_util::errors::DepcovError;

use crate::metadata::{self, MavenMetadata};
use crate::pom::{self, Pom};
use crate::repository::MavenRepository;

/// A local repository directory, usually `~/.m2/repository`.
#[derive(Debug, Clone)]
pub struct LocalCache {
    root: PathBuf,
}

impl LocalCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory of this cache.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding every cached version of `group:artifact`.
    pub fn versions_dir(&self, group: &str, artifact: &str) -> PathBuf {
        self.root.join(group.replace('.', "/")).join(artifact)
    }

    /// Path within the cache for a given Maven coordinate.
    pub fn artifact_dir(&self, group: &str, artifact: &str, version: &str) -> PathBuf {
        self.versions_dir(group, artifact).join(version)
    }

    pub fn pom_path(&self, group: &str, artifact: &str, version: &str) -> PathBuf {
        self.artifact_dir(group, artifact, version)
            .join(format!("{artifact}-{version}.pom"))
    }

    /// Check if a POM is cached and parse it.
    ///
    /// A cached file that fails to parse is an error, not a miss.
    pub fn get_pom(&self, group: &str, artifact: &str, version: &str) -> miette::Result<Option<Pom>> {
        let path = self.pom_path(group, artifact, version);
        if !path.is_file() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(DepcovError::Io)?;
        pom::parse_pom(&content).map(Some)
    }

    /// Store a POM file in the cache, creating directories as needed.
    pub fn put_pom(
        &self,
        group: &str,
        artifact: &str,
        version: &str,
        pom_xml: &str,
    ) -> miette::Result<PathBuf> {
        let dir = self.artifact_dir(group, artifact, version);
        fs::create_dir_all(&dir).map_err(DepcovError::Io)?;
        let path = self.pom_path(group, artifact, version);
        fs::write(&path, pom_xml).map_err(DepcovError::Io)?;
        Ok(path)
    }

    /// Fetch a POM from the first repository that has it, using the cache
    /// when available. Downloaded POMs are written back to the cache.
    pub fn fetch_pom(
        &self,
        client: &Client,
        repos: &[MavenRepository],
        group: &str,
        artifact: &str,
        version: &str,
    ) -> miette::Result<Option<Pom>> {
        if let Some(pom) = self.get_pom(group, artifact, version)? {
            return Ok(Some(pom));
        }

        for repo in repos {
            let url = repo.pom_url(group, artifact, version);
            tracing::debug!("Fetching {url}");
            if let Some(content) = crate::download::download_text(client, repo, &url)? {
                let pom = pom::parse_pom(&content)?;
                self.put_pom(group, artifact, version, &content)?;
                return Ok(Some(pom));
            }
        }
        Ok(None)
    }

    /// Versions of `group:artifact` known locally: those listed in any
    /// `maven-metadata*.xml` of the artifact directory plus every version
    /// directory that holds a POM.
    pub fn local_versions(&self, group: &str, artifact: &str) -> miette::Result<MavenMetadata> {
        let dir = self.versions_dir(group, artifact);
        let mut known = MavenMetadata::default();
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(known),
            Err(e) => return Err(DepcovError::Io(e).into()),
        };

        let mut from_dirs = Vec::new();
        for entry in entries {
            let path = entry.map_err(DepcovError::Io)?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if path.is_dir() {
                if self.pom_path(group, artifact, name).is_file() {
                    from_dirs.push(name.to_string());
                }
            } else if name.starts_with("maven-metadata") && name.ends_with(".xml") {
                let content = fs::read_to_string(&path).map_err(DepcovError::Io)?;
                known.merge(metadata::parse_metadata(&content)?);
            }
        }
        from_dirs.sort();
        known.merge(MavenMetadata {
            versions: from_dirs,
            ..Default::default()
        });
        Ok(known)
    }

    /// Store the metadata downloaded from `repo_name` next to the version
    /// directories, as `maven-metadata-<repo>.xml`.
    pub fn put_metadata(
        &self,
        group: &str,
        artifact: &str,
        repo_name: &str,
        xml: &str,
    ) -> miette::Result<PathBuf> {
        let dir = self.versions_dir(group, artifact);
        fs::create_dir_all(&dir).map_err(DepcovError::Io)?;
        let path = dir.join(format!("maven-metadata-{repo_name}.xml"));
        fs::write(&path, xml).map_err(DepcovError::Io)?;
        Ok(path)
    }

    /// Versions of `group:artifact` across the local cache and every
    /// repository. Downloaded metadata is written back to the cache.
    pub fn fetch_versions(
        &self,
        client: &Client,
        repos: &[MavenRepository],
        group: &str,
        artifact: &str,
    ) -> miette::Result<MavenMetadata> {
        let mut known = self.local_versions(group, artifact)?;
        for repo in repos {
            let url = repo.metadata_url(group, artifact);
            tracing::debug!("Fetching {url}");
            if let Some(content) = crate::download::download_text(client, repo, &url)? {
                known.merge(metadata::parse_metadata(&content)?);
                self.put_metadata(group, artifact, &repo.name, &content)?;
            }
        }
        Ok(known)
    }
}
