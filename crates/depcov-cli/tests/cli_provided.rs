use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[allow(deprecated)]
fn depcov_cmd() -> Command {
    Command::cargo_bin("depcov").unwrap()
}

fn write_repo_pom(m2: &Path, group: &str, artifact: &str, version: &str, deps: &str) {
    let dir = m2.join(group.replace('.', "/")).join(artifact).join(version);
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join(format!("{artifact}-{version}.pom")),
        format!(
            "<project><groupId>{group}</groupId><artifactId>{artifact}</artifactId><version>{version}</version><dependencies>{deps}</dependencies></project>"
        ),
    )
    .unwrap();
}

/// A project with one direct `provided` dependency `g:a:1.0` and a local
/// repository that holds its POM.
fn project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("pom.xml"),
        r#"<project>
  <groupId>org.example</groupId>
  <artifactId>app</artifactId>
  <version>1</version>
  <dependencies>
    <dependency>
      <groupId>g</groupId>
      <artifactId>a</artifactId>
      <version>1.0</version>
      <scope>provided</scope>
    </dependency>
  </dependencies>
</project>
"#,
    )
    .unwrap();
    write_repo_pom(&tmp.path().join("m2"), "g", "a", "1.0", "");
    tmp
}

fn provided_cmd(tmp: &TempDir) -> Command {
    let mut cmd = depcov_cmd();
    cmd.current_dir(tmp.path())
        .args(["provided", "--offline", "--local-repo", "m2"]);
    cmd
}

#[test]
fn test_provided_missing_runtime_dependency_fails() {
    let tmp = project();

    provided_cmd(&tmp)
        .arg("--include-direct")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Dependency g:a:1.0 (provided) not found as runtime dependency!",
        ));
}

#[test]
fn test_provided_higher_minor_on_runtime_passes() {
    let tmp = project();

    provided_cmd(&tmp)
        .args(["--include-direct", "--runtime-artifact", "g:a:1.2"])
        .assert()
        .success()
        .stderr(predicate::str::contains("not found as runtime dependency").not());
}

#[test]
fn test_provided_other_major_on_runtime_fails() {
    let tmp = project();

    provided_cmd(&tmp)
        .args(["--include-direct", "--runtime-artifact", "g:a:2.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Found provided dependency g:a:1.0 only with potentially incompatible version 2.0 in runtime classpath",
        ))
        .stderr(predicate::str::contains(
            "(only found with potentially incompatible version 2.0)",
        ));
}

#[test]
fn test_provided_direct_dependencies_exempt_by_default() {
    let tmp = project();

    provided_cmd(&tmp).assert().success();
}

#[test]
fn test_provided_reads_runtime_file_and_config() {
    let tmp = project();
    fs::write(tmp.path().join("runtime.txt"), "# runtime\ng:a:1.0\n").unwrap();
    fs::write(
        tmp.path().join("depcov.toml"),
        r#"
[project]
runtime-classpath = "runtime.txt"

[provided]
include-direct-dependencies = true

[resolver]
local-repository = "m2"
offline = true
"#,
    )
    .unwrap();

    depcov_cmd()
        .current_dir(tmp.path())
        .args(["provided"])
        .assert()
        .success();
}

#[test]
fn test_provided_json_report() {
    let tmp = project();

    let output = provided_cmd(&tmp)
        .args(["--include-direct", "--format", "json"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["rule"], "provided-coverage");
    assert_eq!(report["checked"], 1);
    assert_eq!(report["violations"][0]["subject"], "g:a:1.0");
    assert_eq!(report["violations"][0]["kind"], "missing");
    assert_eq!(report["violations"][0]["paths"][0][1]["scope"], "provided");
}

#[test]
fn test_provided_missing_pom_reports_partial_tree() {
    let tmp = project();
    fs::remove_dir_all(tmp.path().join("m2")).unwrap();

    provided_cmd(&tmp)
        .arg("--include-direct")
        .assert()
        .failure()
        .stderr(predicate::str::contains("g:a:1.0"));
}

#[test]
fn test_provided_invalid_exclude_is_rejected() {
    let tmp = project();

    provided_cmd(&tmp)
        .args(["--exclude", "a:b:c:d:e"])
        .assert()
        .failure();
}

#[test]
fn test_provided_verbose_logs_each_runtime_artifact() {
    let tmp = project();
    let listing = tmp.path().join("runtime.txt");
    fs::write(&listing, "g:a:1.2
# comment
org.example:extra:3.0
").unwrap();

    provided_cmd(&tmp)
        .env_remove("RUST_LOG")
        .arg("--verbose")
        .arg("--runtime")
        .arg(&listing)
        .args(["--include-direct", "--runtime-artifact", "g:b:1.0"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Runtime artifact g:a:1.2"))
        .stderr(predicate::str::contains("Runtime artifact org.example:extra:3.0"))
        .stderr(predicate::str::contains("Runtime artifact g:b:1.0 (inline)"));
}
