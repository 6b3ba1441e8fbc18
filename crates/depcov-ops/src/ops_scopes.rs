//! Operation: require an explicit `<scope>` on every dependency the project
//! declares itself.
//!
//! Only the raw declaration is inspected. Dependencies inherited from a
//! parent and scopes supplied by dependency management do not count.

use std::path::Path;

use depcov_core::config::AuditConfig;
use depcov_maven::pom::{Pom, PomDependency};

use crate::report::{self, OutputFormat, ScopeReport, Violation, ViolationKind};

/// Flag every dependency in `dependencies` that has no scope.
pub fn check_explicit_scopes(dependencies: &[PomDependency]) -> ScopeReport {
    let mut report = ScopeReport {
        checked: dependencies.len(),
        violations: Vec::new(),
    };
    for dependency in dependencies {
        let key = dependency.management_key();
        tracing::debug!("Found dependency {key}");
        if dependency.scope.is_some() {
            continue;
        }
        let location = dependency
            .location
            .map(|l| l.to_string())
            .unwrap_or_default();
        let message =
            format!("Dependency {key} @ {location} does not have an explicit scope defined!");
        tracing::warn!("{message}");
        report.violations.push(Violation::new(
            key,
            ViolationKind::MissingScope { location },
            message,
        ));
    }
    report
}

/// Run the explicit-scope check on the project POM.
pub fn scopes(project_dir: &Path, config: &AuditConfig, format: OutputFormat) -> miette::Result<()> {
    let pom_path = project_dir.join(&config.project.pom);
    let pom = Pom::from_path(&pom_path)?;
    depcov_util::progress::status("Checking", &format!("{} for explicit scopes", pom_path.display()));

    let report = check_explicit_scopes(&pom.dependencies);
    if format == OutputFormat::Json {
        println!("{}", report::to_json(&report)?);
    }
    match report.summary() {
        Some(summary) => {
            depcov_util::progress::status_warn(
                "Failed",
                &format!("{} of {} dependencies lack a scope", report.violations.len(), report.checked),
            );
            Err(report::violation_error(summary))
        }
        None => {
            depcov_util::progress::status(
                "Finished",
                &format!("{} dependencies declare a scope", report.checked),
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depcov_maven::pom::parse_pom;

    const POM: &str = r#"<project>
  <groupId>org.example</groupId>
  <artifactId>app</artifactId>
  <version>1.0</version>
  <dependencies>
    <dependency>
      <groupId>org.osgi</groupId>
      <artifactId>osgi.core</artifactId>
      <version>8.0.0</version>
      <scope>provided</scope>
    </dependency>
    <dependency>
      <groupId>org.slf4j</groupId>
      <artifactId>slf4j-api</artifactId>
      <version>2.0.9</version>
    </dependency>
    <dependency>
      <groupId>junit</groupId>
      <artifactId>junit</artifactId>
      <version>4.13.2</version>
      <classifier>sources</classifier>
    </dependency>
  </dependencies>
</project>"#;

    #[test]
    fn one_warning_per_unscoped_dependency() {
        let pom = parse_pom(POM).unwrap();
        let report = check_explicit_scopes(&pom.dependencies);
        assert_eq!(report.checked, 3);
        assert_eq!(report.violations.len(), 2);
        assert_eq!(report.violations[0].subject, "org.slf4j:slf4j-api:jar");
        assert_eq!(report.violations[1].subject, "junit:junit:jar:sources");
        assert_eq!(
            report.violations[0].message,
            "Dependency org.slf4j:slf4j-api:jar @ line 12, column 5 does not have an explicit scope defined!"
        );
    }

    #[test]
    fn missing_location_renders_empty() {
        let dependency = PomDependency {
            group_id: "g".into(),
            artifact_id: "a".into(),
            ..Default::default()
        };
        let report = check_explicit_scopes(&[dependency]);
        assert_eq!(
            report.violations[0].message,
            "Dependency g:a:jar @  does not have an explicit scope defined!"
        );
    }

    #[test]
    fn fully_scoped_pom_is_clean() {
        let pom = parse_pom(
            "<project><artifactId>a</artifactId><dependencies><dependency><groupId>g</groupId><artifactId>b</artifactId><scope>test</scope></dependency></dependencies></project>",
        )
        .unwrap();
        let report = check_explicit_scopes(&pom.dependencies);
        assert!(report.is_clean());
        assert_eq!(report.summary(), None);
    }
}
