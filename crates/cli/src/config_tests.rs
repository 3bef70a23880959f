#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;

fn args(input: &str) -> ValidateArgs {
    ValidateArgs {
        input_file: input.into(),
        ..Default::default()
    }
}

#[test]
fn test_parse_toml() {
    let config: AttestorConfig = toml::from_str(
        r#"
log_level = "debug"
target = "rev5"
non_interactive = true
resources_dir = "out/resources"
compose = false
"#,
    )
    .unwrap();
    assert_eq!(config.log_level.as_deref(), Some("debug"));
    assert_eq!(config.target.as_deref(), Some("rev5"));
    assert!(config.non_interactive);
    assert!(!config.confirm_execution);
    assert_eq!(config.resources_dir, Some(PathBuf::from("out/resources")));
    assert!(!config.compose);
}

#[test]
fn test_empty_file_uses_defaults() {
    let config: AttestorConfig = toml::from_str("").unwrap();
    assert_eq!(config, AttestorConfig::default());
    assert!(config.compose);
}

#[test]
fn test_unknown_field_rejected() {
    let result: Result<AttestorConfig, _> = toml::from_str("confirm = true\n");
    assert!(result.is_err());
}

#[test]
fn test_load_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let json = dir.path().join("attestor.json");
    std::fs::write(&json, r#"{"save_resources": true}"#).unwrap();
    let toml_path = dir.path().join("attestor.toml");
    std::fs::write(&toml_path, "save_resources = true\n").unwrap();

    assert!(AttestorConfig::load(&json).unwrap().save_resources);
    assert!(AttestorConfig::load(&toml_path).unwrap().save_resources);
}

#[test]
fn test_load_reports_path() {
    let err = AttestorConfig::load(Path::new("/nonexistent/attestor.toml")).unwrap_err();
    assert!(err.to_string().contains("/nonexistent/attestor.toml"));
}

#[test]
fn test_discover_explicit_and_local() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(
        AttestorConfig::discover(None, dir.path()).unwrap(),
        AttestorConfig::default()
    );

    std::fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "target = \"local\"\n").unwrap();
    let local = AttestorConfig::discover(None, dir.path()).unwrap();
    assert_eq!(local.target.as_deref(), Some("local"));

    let explicit = dir.path().join("other.toml");
    std::fs::write(&explicit, "target = \"explicit\"\n").unwrap();
    let config = AttestorConfig::discover(Some(&explicit), dir.path()).unwrap();
    assert_eq!(config.target.as_deref(), Some("explicit"));
}

#[test]
fn test_merge_defaults() {
    let settings = AttestorConfig::default().merge_cli(&args("component.yaml"));
    assert_eq!(settings.input_file, PathBuf::from("component.yaml"));
    assert_eq!(settings.output_file, PathBuf::from(DEFAULT_RESULTS_FILE));
    assert_eq!(settings.target, None);
    assert!(!settings.confirm_execution);
    assert!(!settings.non_interactive);
    assert_eq!(settings.save_resources, None);
    assert!(settings.compose);
}

#[test]
fn test_flags_override_file() {
    let config = AttestorConfig {
        target: Some("from-file".to_string()),
        compose: true,
        ..Default::default()
    };
    let mut args = args("component.yaml");
    args.target = Some("from-flag".to_string());
    args.no_compose = true;
    args.confirm_execution = true;

    let settings = config.merge_cli(&args);
    assert_eq!(settings.target.as_deref(), Some("from-flag"));
    assert!(!settings.compose);
    assert!(settings.confirm_execution);
}

#[test]
fn test_file_fills_unset_flags() {
    let config = AttestorConfig {
        target: Some("from-file".to_string()),
        non_interactive: true,
        compose: false,
        ..Default::default()
    };
    let settings = config.merge_cli(&args("component.yaml"));
    assert_eq!(settings.target.as_deref(), Some("from-file"));
    assert!(settings.non_interactive);
    assert!(!settings.compose);
}

#[test]
fn test_resources_dir_defaults_next_to_output() {
    let mut args = args("component.yaml");
    args.save_resources = true;
    args.output_file = Some(PathBuf::from("out/results.yaml"));
    let settings = AttestorConfig::default().merge_cli(&args);
    assert_eq!(settings.save_resources, Some(PathBuf::from("out/resources")));

    args.output_file = None;
    let settings = AttestorConfig::default().merge_cli(&args);
    assert_eq!(settings.save_resources, Some(PathBuf::from("resources")));
}

#[test]
fn test_resources_dir_precedence() {
    let config = AttestorConfig {
        save_resources: true,
        resources_dir: Some(PathBuf::from("file-dir")),
        ..Default::default()
    };
    let mut args = args("component.yaml");
    assert_eq!(
        config.merge_cli(&args).save_resources,
        Some(PathBuf::from("file-dir"))
    );
    args.resources_dir = Some(PathBuf::from("flag-dir"));
    assert_eq!(
        config.merge_cli(&args).save_resources,
        Some(PathBuf::from("flag-dir"))
    );
}
