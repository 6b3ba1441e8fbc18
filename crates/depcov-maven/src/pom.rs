//! Reading `pom.xml` files: dependency declarations with their source
//! locations, parent inheritance, `${...}` interpolation and dependency
//! management.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use depcov_core::artifact::{Artifact, DEFAULT_EXTENSION};
use depcov_util::errors::DepcovError;
use quick_xml::events::Event;
use quick_xml::Reader;

/// A parsed POM (Project Object Model) file.
#[derive(Debug, Clone, Default)]
pub struct Pom {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub packaging: Option<String>,

    pub parent: Option<ParentRef>,
    pub properties: BTreeMap<String, String>,
    pub dependencies: Vec<PomDependency>,
    pub dependency_management: Vec<PomDependency>,
}

/// Reference to a parent POM.
#[derive(Debug, Clone)]
pub struct ParentRef {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub relative_path: Option<String>,
}

/// 1-based position of a `<dependency>` start tag in its POM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// A dependency declared in a POM file.
#[derive(Debug, Clone, Default)]
pub struct PomDependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
    pub scope: Option<String>,
    pub optional: bool,
    pub classifier: Option<String>,
    pub type_: Option<String>,
    pub exclusions: Vec<PomExclusion>,
    /// Where the declaration starts. Only set for dependencies parsed from
    /// XML, never for inherited or imported ones.
    pub location: Option<SourceLocation>,
}

/// An exclusion within a dependency declaration.
#[derive(Debug, Clone)]
pub struct PomExclusion {
    pub group_id: String,
    pub artifact_id: Option<String>,
}

impl PomDependency {
    /// Declared `type`, defaulting to `jar`.
    pub fn type_or_default(&self) -> &str {
        self.type_
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or("jar")
    }

    /// Maven's management key: `groupId:artifactId:type[:classifier]`.
    pub fn management_key(&self) -> String {
        let mut key = format!(
            "{}:{}:{}",
            self.group_id,
            self.artifact_id,
            self.type_or_default()
        );
        if let Some(classifier) = self.classifier.as_deref().filter(|c| !c.is_empty()) {
            key.push(':');
            key.push_str(classifier);
        }
        key
    }

    /// File extension and classifier implied by the declared type.
    pub fn extension_and_classifier(&self) -> (String, Option<String>) {
        let declared = self.classifier.clone().filter(|c| !c.is_empty());
        let (extension, implied) = match self.type_or_default() {
            "test-jar" => ("jar", Some("tests")),
            "java-source" => ("jar", Some("sources")),
            "javadoc" => ("jar", Some("javadoc")),
            "bundle" | "maven-plugin" | "ejb" | "ejb-client" => ("jar", None),
            other => (other, None),
        };
        (
            extension.to_string(),
            declared.or_else(|| implied.map(str::to_string)),
        )
    }

    fn same_managed_entry(&self, other: &PomDependency) -> bool {
        self.management_key() == other.management_key()
    }
}

impl Pom {
    /// Read and parse a POM file from disk.
    pub fn from_path(path: &Path) -> miette::Result<Pom> {
        let xml = std::fs::read_to_string(path).map_err(|e| DepcovError::Pom {
            message: format!("Cannot read {}: {e}", path.display()),
        })?;
        parse_pom(&xml)
    }

    /// The declared `groupId`, or the parent's when absent.
    pub fn effective_group_id(&self) -> Option<&str> {
        match (&self.group_id, &self.parent) {
            (Some(own), _) => Some(own.as_str()),
            (None, Some(parent)) => Some(parent.group_id.as_str()),
            (None, None) => None,
        }
    }

    /// The declared `version`, or the parent's when absent.
    pub fn effective_version(&self) -> Option<&str> {
        match (&self.version, &self.parent) {
            (Some(own), _) => Some(own.as_str()),
            (None, Some(parent)) => Some(parent.version.as_str()),
            (None, None) => None,
        }
    }

    /// Packaging, defaulting to `jar`.
    pub fn effective_packaging(&self) -> &str {
        self.packaging.as_deref().unwrap_or("jar")
    }

    /// The project's own coordinates, interpolated. The extension follows
    /// the packaging: `pom` stays `pom`, everything else is a `jar`.
    pub fn artifact(&self) -> miette::Result<Artifact> {
        let missing = |field: &str| DepcovError::Pom {
            message: format!("POM does not declare {field} (directly or via <parent>)"),
        };
        let group_id = self.effective_group_id().ok_or_else(|| missing("<groupId>"))?;
        let artifact_id = self.artifact_id.as_deref().ok_or_else(|| missing("<artifactId>"))?;
        let version = self.effective_version().ok_or_else(|| missing("<version>"))?;
        let extension = match self.effective_packaging() {
            "pom" => "pom",
            _ => DEFAULT_EXTENSION,
        };
        Ok(Artifact::new(
            &self.interpolate(group_id),
            &self.interpolate(artifact_id),
            &self.interpolate(version),
        )
        .with_extension(extension))
    }

    /// Expand `${...}` placeholders from `<properties>` and the built-in
    /// `project.*` / `pom.*` variables. Unknown placeholders stay verbatim.
    pub fn interpolate(&self, input: &str) -> String {
        self.expand(input, 0)
    }

    fn expand(&self, input: &str, nesting: usize) -> String {
        let mut out = String::with_capacity(input.len());
        let mut rest = input;
        while let Some(open) = rest.find("${") {
            let Some(len) = rest[open..].find('}') else {
                break;
            };
            let placeholder = &rest[open..open + len + 1];
            out.push_str(&rest[..open]);
            match self.lookup(&placeholder[2..placeholder.len() - 1]) {
                Some(value) if nesting < MAX_NESTING && value.contains("${") => {
                    out.push_str(&self.expand(&value, nesting + 1))
                }
                Some(value) => out.push_str(&value),
                None => out.push_str(placeholder),
            }
            rest = &rest[open + len + 1..];
        }
        out.push_str(rest);
        out
    }

    fn lookup(&self, key: &str) -> Option<String> {
        let builtin = key
            .strip_prefix("project.")
            .or_else(|| key.strip_prefix("pom."));
        match builtin {
            Some("groupId") => self.effective_group_id().map(str::to_string),
            Some("artifactId") => self.artifact_id.clone(),
            Some("version") => self.effective_version().map(str::to_string),
            Some("packaging") => Some(self.effective_packaging().to_string()),
            Some("parent.groupId") => self.parent.as_ref().map(|p| p.group_id.clone()),
            Some("parent.version") => self.parent.as_ref().map(|p| p.version.clone()),
            _ => self.properties.get(key).cloned(),
        }
    }

    /// Expand placeholders in the coordinates, scope and type of every
    /// declared and managed dependency.
    pub fn resolve_properties(&mut self) {
        let context = self.clone();
        for dep in self
            .dependencies
            .iter_mut()
            .chain(self.dependency_management.iter_mut())
        {
            dep.group_id = context.interpolate(&dep.group_id);
            dep.artifact_id = context.interpolate(&dep.artifact_id);
            for slot in [
                &mut dep.version,
                &mut dep.scope,
                &mut dep.classifier,
                &mut dep.type_,
            ]
            .into_iter()
            .flatten()
            {
                *slot = context.interpolate(slot);
            }
        }
    }

    /// Inherit from `parent`: properties, coordinates, dependency
    /// management and dependencies. Declarations made here take precedence.
    pub fn apply_parent(&mut self, parent: &Pom) {
        for (name, value) in &parent.properties {
            if !self.properties.contains_key(name) {
                self.properties.insert(name.clone(), value.clone());
            }
        }
        self.group_id = self
            .group_id
            .take()
            .or_else(|| parent.effective_group_id().map(str::to_string));
        self.version = self
            .version
            .take()
            .or_else(|| parent.effective_version().map(str::to_string));
        self.merge_management(&parent.dependency_management);

        let inherited: Vec<PomDependency> = parent
            .dependencies
            .iter()
            .filter(|dep| !self.dependencies.iter().any(|own| own.same_managed_entry(dep)))
            .map(|dep| PomDependency {
                location: None,
                ..dep.clone()
            })
            .collect();
        self.dependencies.extend(inherited);
    }

    /// Add dependency-management entries that are not yet managed here,
    /// used for parent inheritance and BOM imports.
    pub fn merge_management(&mut self, entries: &[PomDependency]) {
        for entry in entries {
            if self.managed(entry).is_none() {
                self.dependency_management.push(entry.clone());
            }
        }
    }

    /// The dependency-management entry that governs `dep`, if any.
    pub fn managed(&self, dep: &PomDependency) -> Option<&PomDependency> {
        self.dependency_management
            .iter()
            .find(|d| d.same_managed_entry(dep))
    }

    /// Managed version for `group_id:artifact_id`, ignoring type and
    /// classifier.
    pub fn managed_version(&self, group_id: &str, artifact_id: &str) -> Option<&str> {
        self.dependency_management
            .iter()
            .filter(|d| d.group_id == group_id && d.artifact_id == artifact_id)
            .find_map(|d| d.version.as_deref())
    }

    /// Fill in missing versions, scopes and exclusions of declared
    /// dependencies from dependency management.
    pub fn apply_management(&mut self) {
        let management = std::mem::take(&mut self.dependency_management);
        for dep in &mut self.dependencies {
            let Some(entry) = management.iter().find(|d| d.same_managed_entry(dep)) else {
                continue;
            };
            dep.version = dep.version.take().or_else(|| entry.version.clone());
            dep.scope = dep.scope.take().or_else(|| entry.scope.clone());
            if dep.exclusions.is_empty() {
                dep.exclusions = entry.exclusions.clone();
            }
        }
        self.dependency_management = management;
    }

    /// Managed entries that import a BOM (`<type>pom</type>` with
    /// `<scope>import</scope>`).
    pub fn bom_imports(&self) -> Vec<&PomDependency> {
        self.dependency_management
            .iter()
            .filter(|d| d.scope.as_deref() == Some("import") && d.type_or_default() == "pom")
            .collect()
    }
}

const MAX_NESTING: usize = 20;

/// Parse POM XML. Only the elements the audit needs are read: coordinates,
/// `<parent>`, `<properties>`, `<dependencies>` and
/// `<dependencyManagement>`.
pub fn parse_pom(xml: &str) -> miette::Result<Pom> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut builder = PomBuilder::new(xml);

    loop {
        match reader.read_event() {
            Ok(Event::Start(tag)) => {
                // The event ends just past `>`; `<` and `>` are not part of the tag bytes.
                let start = (reader.buffer_position() as usize).saturating_sub(tag.len() + 2);
                builder.open(String::from_utf8_lossy(tag.name().as_ref()).into_owned(), start);
            }
            Ok(Event::Text(text)) => {
                builder.text = text.unescape().map(|t| t.into_owned()).unwrap_or_default();
            }
            Ok(Event::End(_)) => builder.close(),
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(DepcovError::Pom {
                    message: format!(
                        "Malformed POM XML at byte {}: {e}",
                        reader.error_position()
                    ),
                }
                .into())
            }
        }
    }

    let pom = builder.pom;
    if pom.artifact_id.is_none() {
        return Err(DepcovError::Pom {
            message: "POM does not declare <artifactId>".to_string(),
        }
        .into());
    }
    Ok(pom)
}

#[derive(Debug, Clone, Copy)]
enum Section {
    Dependencies,
    Management,
}

/// Streaming state for [`parse_pom`]: the open element path plus the
/// dependency, exclusion or parent currently being filled in.
struct PomBuilder<'a> {
    pom: Pom,
    path: Vec<String>,
    text: String,
    lines: LineIndex<'a>,
    dependency: Option<(Section, PomDependency)>,
    exclusion: Option<PomExclusion>,
    parent: Option<ParentRef>,
}

impl<'a> PomBuilder<'a> {
    fn new(xml: &'a str) -> Self {
        Self {
            pom: Pom::default(),
            path: Vec::new(),
            text: String::new(),
            lines: LineIndex::new(xml),
            dependency: None,
            exclusion: None,
            parent: None,
        }
    }

    fn open(&mut self, tag: String, offset: usize) {
        self.path.push(tag);
        self.text.clear();
        let path: Vec<&str> = self.path.iter().map(String::as_str).collect();
        let section = match path.as_slice() {
            ["project", "dependencies", "dependency"] => Some(Section::Dependencies),
            ["project", "dependencyManagement", "dependencies", "dependency"] => {
                Some(Section::Management)
            }
            [.., "exclusions", "exclusion"] if self.dependency.is_some() => {
                self.exclusion = Some(PomExclusion {
                    group_id: String::new(),
                    artifact_id: None,
                });
                None
            }
            ["project", "parent"] => {
                self.parent = Some(ParentRef {
                    group_id: String::new(),
                    artifact_id: String::new(),
                    version: String::new(),
                    relative_path: None,
                });
                None
            }
            _ => None,
        };
        if let Some(section) = section {
            let dep = PomDependency {
                location: Some(self.lines.locate(offset)),
                ..PomDependency::default()
            };
            self.dependency = Some((section, dep));
        }
    }

    fn close(&mut self) {
        let value = std::mem::take(&mut self.text);
        let path: Vec<&str> = self.path.iter().map(String::as_str).collect();
        match path.as_slice() {
            ["project", "properties", name] => {
                self.pom.properties.insert(name.to_string(), value);
            }
            ["project", "groupId"] => self.pom.group_id = Some(value),
            ["project", "artifactId"] => self.pom.artifact_id = Some(value),
            ["project", "version"] => self.pom.version = Some(value),
            ["project", "packaging"] => self.pom.packaging = Some(value),
            ["project", "parent", field] => {
                if let Some(parent) = self.parent.as_mut() {
                    match *field {
                        "groupId" => parent.group_id = value,
                        "artifactId" => parent.artifact_id = value,
                        "version" => parent.version = value,
                        "relativePath" => parent.relative_path = Some(value),
                        _ => {}
                    }
                }
            }
            ["project", "parent"] => self.pom.parent = self.parent.take(),
            [.., "exclusion", field] if self.exclusion.is_some() => {
                if let Some(exclusion) = self.exclusion.as_mut() {
                    match *field {
                        "groupId" => exclusion.group_id = value,
                        "artifactId" => exclusion.artifact_id = Some(value),
                        _ => {}
                    }
                }
            }
            [.., "exclusions", "exclusion"] => {
                if let (Some(exclusion), Some((_, dep))) =
                    (self.exclusion.take(), self.dependency.as_mut())
                {
                    dep.exclusions.push(exclusion);
                }
            }
            [.., "dependency", field] if self.exclusion.is_none() => {
                if let Some((_, dep)) = self.dependency.as_mut() {
                    match *field {
                        "groupId" => dep.group_id = value,
                        "artifactId" => dep.artifact_id = value,
                        "version" => dep.version = Some(value),
                        "scope" => dep.scope = Some(value).filter(|s| !s.is_empty()),
                        "optional" => dep.optional = value.trim() == "true",
                        "classifier" => dep.classifier = Some(value),
                        "type" => dep.type_ = Some(value),
                        _ => {}
                    }
                }
            }
            ["project", "dependencies", "dependency"]
            | ["project", "dependencyManagement", "dependencies", "dependency"] => {
                match self.dependency.take() {
                    Some((Section::Dependencies, dep)) => self.pom.dependencies.push(dep),
                    Some((Section::Management, dep)) => self.pom.dependency_management.push(dep),
                    None => {}
                }
            }
            _ => {}
        }
        self.path.pop();
    }
}

/// Maps byte offsets to line/column, scanning forward only.
struct LineIndex<'a> {
    src: &'a str,
    offset: usize,
    line: usize,
    line_start: usize,
}

impl<'a> LineIndex<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            offset: 0,
            line: 1,
            line_start: 0,
        }
    }

    fn locate(&mut self, offset: usize) -> SourceLocation {
        let offset = offset.min(self.src.len());
        if offset >= self.offset {
            for (i, b) in self.src.as_bytes()[self.offset..offset].iter().enumerate() {
                if *b == b'\n' {
                    self.line += 1;
                    self.line_start = self.offset + i + 1;
                }
            }
            self.offset = offset;
        }
        let column = self
            .src
            .get(self.line_start..offset)
            .map(|s| s.chars().count())
            .unwrap_or(0);
        SourceLocation {
            line: self.line,
            column: column + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE_POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
    <modelVersion>4.0.0</modelVersion>
    <groupId>org.example</groupId>
    <artifactId>my-bundle</artifactId>
    <version>1.0.0</version>
    <packaging>bundle</packaging>

    <properties>
        <sling.api.version>2.27.0</sling.api.version>
    </properties>

    <dependencies>
        <dependency>
            <groupId>org.apache.sling</groupId>
            <artifactId>org.apache.sling.api</artifactId>
            <version>${sling.api.version}</version>
        </dependency>
        <dependency>
            <groupId>junit</groupId>
            <artifactId>junit</artifactId>
            <version>4.13.2</version>
            <scope>test</scope>
        </dependency>
    </dependencies>
</project>"#;

    #[test]
    fn reads_coordinates_and_properties() {
        let pom = parse_pom(SIMPLE_POM).unwrap();
        assert_eq!(pom.group_id.as_deref(), Some("org.example"));
        assert_eq!(pom.artifact_id.as_deref(), Some("my-bundle"));
        assert_eq!(pom.version.as_deref(), Some("1.0.0"));
        assert_eq!(pom.effective_packaging(), "bundle");
        assert_eq!(pom.dependencies.len(), 2);
        assert_eq!(pom.properties.get("sling.api.version").unwrap(), "2.27.0");
    }

    #[test]
    fn project_artifact_uses_jar_for_bundles() {
        let pom = parse_pom(SIMPLE_POM).unwrap();
        assert_eq!(
            pom.artifact().unwrap(),
            Artifact::new("org.example", "my-bundle", "1.0.0")
        );
    }

    #[test]
    fn project_artifact_requires_version() {
        let pom = parse_pom("<project><groupId>g</groupId><artifactId>a</artifactId></project>").unwrap();
        assert!(pom.artifact().is_err());
    }

    #[test]
    fn properties_expand_dependency_versions() {
        let mut pom = parse_pom(SIMPLE_POM).unwrap();
        pom.resolve_properties();
        assert_eq!(pom.dependencies[0].version.as_deref(), Some("2.27.0"));
    }

    #[test]
    fn unknown_property_left_in_place() {
        let pom = parse_pom(SIMPLE_POM).unwrap();
        assert_eq!(pom.interpolate("${missing}-${sling.api.version}"), "${missing}-2.27.0");
    }

    #[test]
    fn nested_property_interpolation() {
        let mut pom = Pom::default();
        pom.properties.insert("a".into(), "${b}".into());
        pom.properties.insert("b".into(), "1.0".into());
        assert_eq!(pom.interpolate("v${a}"), "v1.0");
    }

    #[test]
    fn scope_is_nullable() {
        let pom = parse_pom(SIMPLE_POM).unwrap();
        assert_eq!(pom.dependencies[0].scope, None);
        assert_eq!(pom.dependencies[1].scope.as_deref(), Some("test"));
    }

    #[test]
    fn dependency_locations_point_at_start_tag() {
        let pom = parse_pom(SIMPLE_POM).unwrap();
        assert_eq!(
            pom.dependencies[0].location,
            Some(SourceLocation { line: 14, column: 9 })
        );
        assert_eq!(
            pom.dependencies[1].location,
            Some(SourceLocation { line: 19, column: 9 })
        );
        assert_eq!(
            pom.dependencies[1].location.unwrap().to_string(),
            "line 19, column 9"
        );
    }

    #[test]
    fn management_key_includes_type_and_classifier() {
        let dep = PomDependency {
            group_id: "g".into(),
            artifact_id: "a".into(),
            classifier: Some("tests".into()),
            type_: Some("test-jar".into()),
            ..PomDependency::default()
        };
        assert_eq!(dep.management_key(), "g:a:test-jar:tests");
        let plain = PomDependency {
            group_id: "g".into(),
            artifact_id: "a".into(),
            ..PomDependency::default()
        };
        assert_eq!(plain.management_key(), "g:a:jar");
    }

    #[test]
    fn type_maps_to_extension() {
        let mut dep = PomDependency {
            type_: Some("test-jar".into()),
            ..PomDependency::default()
        };
        assert_eq!(dep.extension_and_classifier(), ("jar".into(), Some("tests".into())));
        dep.type_ = Some("bundle".into());
        assert_eq!(dep.extension_and_classifier(), ("jar".into(), None));
        dep.type_ = Some("pom".into());
        assert_eq!(dep.extension_and_classifier(), ("pom".into(), None));
    }

    #[test]
    fn bom_imports_are_listed_separately() {
        let xml = r#"<?xml version="1.0"?>
<project>
    <groupId>org.example</groupId>
    <artifactId>parent</artifactId>
    <version>1.0.0</version>

    <dependencyManagement>
        <dependencies>
            <dependency>
                <groupId>org.apache.sling</groupId>
                <artifactId>adapter-bom</artifactId>
                <version>1.0</version>
                <type>pom</type>
                <scope>import</scope>
            </dependency>
            <dependency>
                <groupId>org.osgi</groupId>
                <artifactId>osgi.core</artifactId>
                <version>8.0.0</version>
                <scope>provided</scope>
            </dependency>
        </dependencies>
    </dependencyManagement>
</project>"#;
        let pom = parse_pom(xml).unwrap();
        assert_eq!(pom.dependency_management.len(), 2);
        let boms = pom.bom_imports();
        assert_eq!(boms.len(), 1);
        assert_eq!(boms[0].artifact_id, "adapter-bom");
        assert_eq!(pom.managed_version("org.osgi", "osgi.core"), Some("8.0.0"));
    }

    #[test]
    fn management_fills_version_and_scope() {
        let xml = r#"<project>
    <groupId>g</groupId>
    <artifactId>app</artifactId>
    <version>1</version>
    <dependencyManagement>
        <dependencies>
            <dependency>
                <groupId>org.osgi</groupId>
                <artifactId>osgi.core</artifactId>
                <version>8.0.0</version>
                <scope>provided</scope>
            </dependency>
        </dependencies>
    </dependencyManagement>
    <dependencies>
        <dependency>
            <groupId>org.osgi</groupId>
            <artifactId>osgi.core</artifactId>
        </dependency>
    </dependencies>
</project>"#;
        let mut pom = parse_pom(xml).unwrap();
        pom.apply_management();
        assert_eq!(pom.dependencies[0].version.as_deref(), Some("8.0.0"));
        assert_eq!(pom.dependencies[0].scope.as_deref(), Some("provided"));
    }

    #[test]
    fn parent_contributes_properties_and_dependencies() {
        let parent = parse_pom(
            r#"<project>
    <groupId>org.example</groupId>
    <artifactId>parent</artifactId>
    <version>2.0.0</version>
    <properties><osgi.version>8.0.0</osgi.version></properties>
    <dependencies>
        <dependency>
            <groupId>org.osgi</groupId>
            <artifactId>osgi.core</artifactId>
            <version>${osgi.version}</version>
            <scope>provided</scope>
        </dependency>
    </dependencies>
</project>"#,
        )
        .unwrap();
        let mut child = parse_pom(
            r#"<project>
    <parent>
        <groupId>org.example</groupId>
        <artifactId>parent</artifactId>
        <version>2.0.0</version>
    </parent>
    <artifactId>child</artifactId>
</project>"#,
        )
        .unwrap();
        assert_eq!(child.effective_group_id(), Some("org.example"));
        child.apply_parent(&parent);
        child.resolve_properties();
        assert_eq!(child.version.as_deref(), Some("2.0.0"));
        assert_eq!(child.dependencies.len(), 1);
        assert_eq!(child.dependencies[0].version.as_deref(), Some("8.0.0"));
        assert!(child.dependencies[0].location.is_none());
    }

    #[test]
    fn exclusions_and_optional_flag_are_read() {
        let xml = r#"<?xml version="1.0"?>
<project>
    <groupId>org.example</groupId>
    <artifactId>app</artifactId>
    <version>1.0</version>
    <dependencies>
        <dependency>
            <groupId>com.example</groupId>
            <artifactId>lib</artifactId>
            <version>1.0</version>
            <optional>true</optional>
            <exclusions>
                <exclusion>
                    <groupId>commons-logging</groupId>
                    <artifactId>commons-logging</artifactId>
                </exclusion>
            </exclusions>
        </dependency>
    </dependencies>
</project>"#;
        let pom = parse_pom(xml).unwrap();
        let dep = &pom.dependencies[0];
        assert!(dep.optional);
        assert_eq!(dep.exclusions.len(), 1);
        assert_eq!(dep.exclusions[0].group_id, "commons-logging");
        assert_eq!(dep.exclusions[0].artifact_id.as_deref(), Some("commons-logging"));
    }

    #[test]
    fn malformed_xml_is_pom_error() {
        let err = parse_pom("<project><artifactId>x</groupId></project>").unwrap_err();
        assert!(err.to_string().starts_with("POM error"), "{err}");
    }

    #[test]
    fn missing_artifact_id_is_rejected() {
        assert!(parse_pom("<project><groupId>g</groupId></project>").is_err());
    }
}
