//! Settings layering and their effect on retrieval queries

use smconfig::config::SettingsLoader;
use smconfig::error::SettingsError;
use smconfig::jumpstart::{ModelScope, ModelUriQuery};
use std::sync::Mutex;
use tempfile::TempDir;

// Settings loading reads process environment
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn write_workspace_config(root: &std::path::Path, name: &str, contents: &str) {
    let config_dir = root.join("config");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join(name), contents).unwrap();
}

#[test]
fn test_environment_specific_file_overrides_base() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let temp_dir = TempDir::new().unwrap();
    write_workspace_config(
        temp_dir.path(),
        "config.toml",
        "[jumpstart]\nregion = \"us-east-1\"\n\n[debugger]\ns3_output_path = \"s3://base/rules\"\n",
    );
    write_workspace_config(
        temp_dir.path(),
        "staging.toml",
        "[jumpstart]\nregion = \"eu-central-1\"\n",
    );

    std::env::set_var("SMCONFIG_ENV", "staging");
    let result = SettingsLoader::load(temp_dir.path());
    std::env::remove_var("SMCONFIG_ENV");

    let settings = result.unwrap();
    assert_eq!(settings.jumpstart.region, "eu-central-1");
    assert_eq!(settings.debugger.s3_output_path.as_deref(), Some("s3://base/rules"));
}

#[test]
fn test_invalid_output_path_rejected() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let temp_dir = TempDir::new().unwrap();
    write_workspace_config(
        temp_dir.path(),
        "config.toml",
        "[debugger]\ns3_output_path = \"/tmp/rules\"\n",
    );

    let err = SettingsLoader::load(temp_dir.path()).unwrap_err();
    match err {
        SettingsError::Validation(message) => assert!(message.contains("s3_output_path")),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_query_seeded_from_settings() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let temp_dir = TempDir::new().unwrap();
    write_workspace_config(
        temp_dir.path(),
        "config.toml",
        "[jumpstart]\nregion = \"ap-northeast-1\"\ntolerate_deprecated_model = true\n",
    );

    let settings = SettingsLoader::load(temp_dir.path()).unwrap();
    let query = ModelUriQuery::from_settings(&settings.jumpstart).with_scope(ModelScope::Inference);

    assert_eq!(query.region.as_deref(), Some("ap-northeast-1"));
    assert!(query.tolerate_deprecated_model);
    assert!(!query.tolerate_vulnerable_model);
    assert!(query.model_id.is_none());
}

#[test]
fn test_effective_settings_render_as_toml() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let temp_dir = TempDir::new().unwrap();

    let settings = SettingsLoader::load(temp_dir.path()).unwrap();
    let rendered = settings.to_toml_string().unwrap();
    assert!(rendered.contains("[jumpstart]"));
    assert!(rendered.contains("region = \"us-west-2\""));
}
