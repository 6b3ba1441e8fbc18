//! `maven-metadata.xml` reading, used to list the versions of an artifact
//! when a dependency is declared with a range.

use depcov_util::errors::DepcovError;
use quick_xml::events::Event;
use quick_xml::Reader;

/// Artifact-level metadata: the versions a repository holds for one
/// `groupId:artifactId`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MavenMetadata {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub release: Option<String>,
    pub versions: Vec<String>,
}

impl MavenMetadata {
    /// Add the versions of `other` not yet listed.
    pub fn merge(&mut self, other: MavenMetadata) {
        for version in other.versions {
            if !self.versions.contains(&version) {
                self.versions.push(version);
            }
        }
        if self.release.is_none() {
            self.release = other.release;
        }
    }
}

/// Parse an artifact-level `maven-metadata.xml`.
pub fn parse_metadata(xml: &str) -> miette::Result<MavenMetadata> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut metadata = MavenMetadata::default();
    let mut path: Vec<String> = Vec::new();
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(tag)) => {
                path.push(String::from_utf8_lossy(tag.name().as_ref()).into_owned());
                text.clear();
            }
            Ok(Event::Text(t)) => {
                text = t.unescape().map(|t| t.into_owned()).unwrap_or_default();
            }
            Ok(Event::End(_)) => {
                let value = std::mem::take(&mut text);
                match path.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
                    ["metadata", "groupId"] => metadata.group_id = Some(value),
                    ["metadata", "artifactId"] => metadata.artifact_id = Some(value),
                    ["metadata", "versioning", "release"] => metadata.release = Some(value),
                    ["metadata", "versioning", "versions", "version"] if !value.is_empty() => {
                        metadata.versions.push(value)
                    }
                    _ => {}
                }
                path.pop();
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(DepcovError::Pom {
                    message: format!(
                        "Malformed maven-metadata.xml at byte {}: {e}",
                        reader.error_position()
                    ),
                }
                .into())
            }
        }
    }

    Ok(metadata)
}
