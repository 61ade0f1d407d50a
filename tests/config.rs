use std::path::Path;

use stackup::Config;
use stackup::error::DeployError;

#[test]
fn no_path_means_defaults() {
    assert_eq!(Config::load(None).unwrap(), Config::default());
}

#[test]
fn partial_file_keeps_other_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stackup.yml");
    std::fs::write(
        &path,
        "project: mystack\n\
         vendor:\n  branch: main\n\
         searxng:\n  container_filter: search\n\
         endpoints:\n  - name: Grafana\n    url: http://localhost:3001\n",
    )
    .unwrap();

    let config = Config::load(Some(&path)).unwrap();

    assert_eq!(config.project, "mystack");
    assert_eq!(config.vendor.branch, "main");
    assert_eq!(config.vendor.dir, "supabase");
    assert_eq!(config.searxng.container_filter, "search");
    assert_eq!(config.searxng.placeholder, "ultrasecretkey");
    assert_eq!(config.compose.manifest, "docker-compose.yml");
    assert_eq!(config.startup_delay_secs, 15);
    assert_eq!(config.endpoints.len(), 1);
    assert_eq!(config.endpoints[0].name, "Grafana");
}

#[test]
fn missing_file_is_reported() {
    let err = Config::load(Some(Path::new("/definitely/not/here.yml"))).unwrap_err();
    assert!(matches!(err, DeployError::FileNotFound(_)));
}

#[test]
fn unknown_fields_are_rejected() {
    let err = Config::from_yaml("projekt: typo\n").unwrap_err();
    assert!(matches!(err, DeployError::Yaml(_)));
}

#[test]
fn empty_project_is_rejected() {
    let err = Config::from_yaml("project: \"\"\n").unwrap_err();
    assert!(matches!(err, DeployError::Config(ref m) if m.contains("project")));
}

#[test]
fn placeholder_cannot_break_sed_expression() {
    let err = Config::from_yaml("searxng:\n  placeholder: \"a|b\"\n").unwrap_err();
    assert!(matches!(err, DeployError::Config(_)));
}
