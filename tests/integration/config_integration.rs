//! Integration tests for the configuration layer.

use stackwright::aws::EngineEndpoint;
use stackwright::cli::{EventFormat, RunContext};
use stackwright::config::{ConfigLoader, WORKSPACE_CONFIG_FILE};
use tempfile::TempDir;

#[test]
fn explicit_file_drives_run_context() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("ops.toml");
    std::fs::write(
        &config_file,
        r#"
[aws]
region = "ca-central-1"
environment = "production"
profile = "ops"
"#,
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&config_file).unwrap();
    assert_eq!(config.aws.region, "ca-central-1");
    assert_eq!(config.aws.endpoint(), EngineEndpoint::Production);

    let ctx = RunContext::from_config(config, EventFormat::Text);
    assert_eq!(ctx.config().aws.profile.as_deref(), Some("ops"));
}

#[test]
fn workspace_file_is_picked_up_from_root() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join(WORKSPACE_CONFIG_FILE),
        "[aws]\nlocal_endpoint = \"http://127.0.0.1:4566\"\n",
    )
    .unwrap();

    let config = ConfigLoader::load_from_sources(
        None,
        &temp_dir.path().join(WORKSPACE_CONFIG_FILE),
        false,
        |_| None,
    )
    .unwrap();
    assert_eq!(
        config.aws.endpoint(),
        EngineEndpoint::Override("http://127.0.0.1:4566".to_string())
    );
}

#[test]
fn malformed_file_is_a_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("broken.toml");
    std::fs::write(&config_file, "[aws\nregion = ").unwrap();
    assert!(ConfigLoader::load_from_file(&config_file).is_err());
}
