use depcov_core::artifact::Artifact;
use depcov_core::scope::Scope;
use depcov_maven::cache::LocalCache;
use depcov_resolver::collector::{collect, resolve, CollectPolicy};
use depcov_resolver::pom_source::PomDescriptorSource;
use depcov_resolver::selector::DependencySelector;
use std::fs;
use tempfile::TempDir;

fn pom(group: &str, artifact: &str, version: &str, deps: &str) -> String {
    format!(
        "<project><groupId>{group}</groupId><artifactId>{artifact}</artifactId><version>{version}</version><dependencies>{deps}</dependencies></project>"
    )
}

fn dep(group: &str, artifact: &str, version: &str, extra: &str) -> String {
    format!(
        "<dependency><groupId>{group}</groupId><artifactId>{artifact}</artifactId><version>{version}</version>{extra}</dependency>"
    )
}

/// Project `org.example:app:1` in `dir/project`, local repository in
/// `dir/m2` holding `lib`, `api`, `impl` and a `bom` aggregator.
fn setup() -> (TempDir, PomDescriptorSource, Artifact) {
    let tmp = TempDir::new().unwrap();
    let cache = LocalCache::new(tmp.path().join("m2"));
    cache
        .put_pom(
            "g",
            "lib",
            "1.0",
            &pom(
                "g",
                "lib",
                "1.0",
                &[
                    dep("g", "api", "2.0", "<scope>provided</scope>"),
                    dep("g", "impl", "2.0", "<optional>true</optional>"),
                    dep("g", "bom", "1", "<type>pom</type>"),
                    dep("junit", "junit", "4.13.2", "<scope>test</scope>"),
                ]
                .concat(),
            ),
        )
        .unwrap();
    cache.put_pom("g", "api", "2.0", &pom("g", "api", "2.0", "")).unwrap();
    cache.put_pom("g", "impl", "2.0", &pom("g", "impl", "2.0", "")).unwrap();

    let project_dir = tmp.path().join("project");
    fs::create_dir_all(&project_dir).unwrap();
    fs::write(
        project_dir.join("pom.xml"),
        pom(
            "org.example",
            "app",
            "1",
            &dep("g", "lib", "1.0", "<scope>compile</scope>"),
        ),
    )
    .unwrap();

    let mut source = PomDescriptorSource::offline(cache);
    let root = source
        .register_workspace_pom(&project_dir.join("pom.xml"))
        .unwrap();
    (tmp, source, root)
}

fn pipeline() -> DependencySelector {
    DependencySelector::and(vec![
        DependencySelector::scope_exclusion([Scope::Test]),
        DependencySelector::pattern_exclusion([]),
        DependencySelector::optional_exclusion(),
    ])
}

#[test]
fn test_collects_tree_from_local_repository() {
    let (_tmp, source, root) = setup();
    let tree = collect(&root, &CollectPolicy::new(pipeline()), &source, &[]).unwrap();
    assert_eq!(
        tree.render_tree(),
        "org.example:app:1\n    g:lib:1.0 (compile)\n        g:api:2.0 (provided)\n"
    );
}

#[test]
fn test_resolve_keeps_only_provided() {
    let (_tmp, source, root) = setup();
    let resolution = resolve(
        &root,
        &CollectPolicy::new(pipeline()),
        &[Scope::Provided],
        &source,
        &[],
    )
    .unwrap();
    let keys: Vec<String> = resolution.artifacts.keys().map(|a| a.to_string()).collect();
    assert_eq!(keys, vec!["g:api:2.0"]);
    let paths = &resolution.artifacts[&Artifact::new("g", "api", "2.0")].paths;
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].to_string(), "org.example:app:1 -> g:lib:1.0 -> g:api:2.0");
}

#[test]
fn test_missing_pom_reports_partial_tree() {
    let (tmp, source, root) = setup();
    fs::remove_file(
        LocalCache::new(tmp.path().join("m2")).pom_path("g", "api", "2.0"),
    )
    .unwrap();
    let err = collect(&root, &CollectPolicy::new(pipeline()), &source, &[]).unwrap_err();
    let rendered = err.render();
    assert!(rendered.starts_with("Failure to find g:api:2.0"), "got: {rendered}");
    assert!(rendered.contains("    g:lib:1.0 (compile)\n        g:api:2.0 (provided)"));
}

#[test]
fn test_ranged_dependency_resolves_against_local_metadata() {
    let tmp = TempDir::new().unwrap();
    let cache = LocalCache::new(tmp.path().join("m2"));
    cache
        .put_pom(
            "g",
            "lib",
            "1.0",
            &pom(
                "g",
                "lib",
                "1.0",
                &dep("g", "api", "[1.0,2.0)", "<scope>provided</scope>"),
            ),
        )
        .unwrap();
    cache.put_pom("g", "api", "1.5", &pom("g", "api", "1.5", "")).unwrap();
    cache
        .put_metadata(
            "g",
            "api",
            "central",
            "<metadata><groupId>g</groupId><artifactId>api</artifactId><versioning><versions><version>1.0</version><version>1.5</version><version>2.0</version></versions></versioning></metadata>",
        )
        .unwrap();

    let project_dir = tmp.path().join("project");
    fs::create_dir_all(&project_dir).unwrap();
    fs::write(
        project_dir.join("pom.xml"),
        pom("org.example", "app", "1", &dep("g", "lib", "1.0", "")),
    )
    .unwrap();
    let mut source = PomDescriptorSource::offline(cache);
    let root = source
        .register_workspace_pom(&project_dir.join("pom.xml"))
        .unwrap();

    let resolution = resolve(
        &root,
        &CollectPolicy::new(pipeline()),
        &[Scope::Provided],
        &source,
        &[],
    )
    .unwrap();
    assert_eq!(
        resolution.tree.render_tree(),
        "org.example:app:1\n    g:lib:1.0 (compile)\n        g:api:1.5 (provided)\n"
    );
    let api = resolution
        .tree
        .preorder()
        .into_iter()
        .find(|&idx| resolution.tree.artifact(idx).artifact_id == "api")
        .unwrap();
    assert_eq!(
        resolution.tree.edge(api).unwrap().version_constraint.as_deref(),
        Some("[1.0,2.0)")
    );
    assert!(resolution
        .artifacts
        .contains_key(&Artifact::new("g", "api", "1.5")));
}
