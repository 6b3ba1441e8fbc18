//! Maven repository abstraction: URL layout and configuration.

use depcov_core::config::RepositoryEntry;
use reqwest::blocking::RequestBuilder;

/// Root of Maven Central, used when no configured repository mirrors it.
pub const MAVEN_CENTRAL_URL: &str = "https://repo.maven.apache.org/maven2";

/// A remote repository POMs are fetched from, in search order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MavenRepository {
    pub name: String,
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl MavenRepository {
    /// An anonymous repository. A trailing `/` on `url` is dropped.
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.trim_end_matches('/').to_string(),
            username: None,
            password: None,
        }
    }

    /// From a `[repositories]` entry of the configuration file.
    pub fn from_entry(name: &str, entry: &RepositoryEntry) -> Self {
        match entry {
            RepositoryEntry::Url(url) => Self::new(name, url),
            RepositoryEntry::Detailed {
                url,
                username,
                password,
            } => Self {
                username: username.clone(),
                password: password.clone(),
                ..Self::new(name, url)
            },
        }
    }

    /// Maven Central under the id `central`.
    pub fn maven_central() -> Self {
        Self::new("central", MAVEN_CENTRAL_URL)
    }

    /// Whether this entry targets Maven Central, either by URL or by the
    /// conventional `central` id.
    pub fn is_central(&self) -> bool {
        self.name == "central" || self.url == MAVEN_CENTRAL_URL
    }

    /// Where `group:artifact:version` lives below a repository root,
    /// e.g. `org/osgi/osgi.core/8.0.0` for `org.osgi:osgi.core:8.0.0`.
    pub fn layout_dir(group: &str, artifact: &str, version: &str) -> String {
        let mut dir = group.replace('.', "/");
        for segment in [artifact, version] {
            dir.push('/');
            dir.push_str(segment);
        }
        dir
    }

    /// Location of the `.pom` for a coordinate in this repository.
    pub fn pom_url(&self, group: &str, artifact: &str, version: &str) -> String {
        format!(
            "{}/{}/{artifact}-{version}.pom",
            self.url,
            Self::layout_dir(group, artifact, version)
        )
    }

    /// Location of the artifact-level `maven-metadata.xml` listing every
    /// published version of `group:artifact`.
    pub fn metadata_url(&self, group: &str, artifact: &str) -> String {
        format!(
            "{}/{}/{artifact}/maven-metadata.xml",
            self.url,
            group.replace('.', "/")
        )
    }

    /// True when requests carry credentials.
    pub fn is_authenticated(&self) -> bool {
        !matches!((&self.username, &self.password), (None, None))
    }

    /// Attach this repository's credentials to `request`. A password
    /// without a username is sent as a bearer token.
    pub fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match (&self.username, &self.password) {
            (Some(user), password) => request.basic_auth(user, password.as_deref()),
            (None, Some(token)) => request.bearer_auth(token),
            (None, None) => request,
        }
    }
}

/// Turn configured repositories into the search list, appending Maven
/// Central unless one of them already targets it.
pub fn build_repositories<'a>(
    entries: impl IntoIterator<Item = (&'a String, &'a RepositoryEntry)>,
) -> Vec<MavenRepository> {
    let mut repos: Vec<MavenRepository> = entries
        .into_iter()
        .map(|(name, entry)| MavenRepository::from_entry(name, entry))
        .collect();
    if !repos.iter().any(MavenRepository::is_central) {
        repos.push(MavenRepository::maven_central());
    }
    repos
}
