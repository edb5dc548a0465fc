use llm_form::error::Error;
use llm_form::settings::{Credentials, Settings};
use std::io::Write;
use tempfile::NamedTempFile;

fn json_file(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn reads_token_exactly() {
    let file = json_file(r#"{"HF_TOKEN": "hf_AbC123xyz", "other": 1}"#);
    let credentials = Credentials::load(file.path()).unwrap();
    assert_eq!(credentials.hf_token(), "hf_AbC123xyz");
}

#[test]
fn missing_file_is_a_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Credentials::load(dir.path().join("config.json")).unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
}

#[test]
fn missing_field_is_a_configuration_error() {
    let file = json_file(r#"{"TOKEN": "hf_x"}"#);
    let err = Credentials::load(file.path()).unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
}

#[test]
fn malformed_file_is_a_configuration_error() {
    let file = json_file(r#"{"HF_TOKEN": "#);
    let err = Credentials::load(file.path()).unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
}

#[test]
fn empty_token_is_a_configuration_error() {
    let file = json_file(r#"{"HF_TOKEN": "  "}"#);
    let err = Credentials::load(file.path()).unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
}

#[test]
fn debug_output_hides_token() {
    let credentials = Credentials::new("hf_secret");
    assert!(!format!("{credentials:?}").contains("hf_secret"));
}

#[test]
fn settings_default_when_file_is_absent() {
    let dir = tempfile::tempdir().unwrap();
    let name = dir.path().join("llm");
    let settings = Settings::load(name.to_str().unwrap()).unwrap();
    assert_eq!(settings.credentials_path, "config.json");
    assert_eq!(settings.server.port, 8000);
    assert_eq!(settings.llm.model_id, "meta-llama/Llama-3.2-1B");
    assert_eq!(settings.llm.generation.max_length, 150);
    assert_eq!(settings.llm.generation.top_k, Some(50));
}

#[test]
fn settings_file_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("llm.toml"),
        "[server]\nport = 9000\n\n[llm]\nuse_cpu = true\n\n[llm.generation]\nmax_length = 64\nseed = 42\n",
    )
    .unwrap();
    let settings = Settings::load(dir.path().join("llm").to_str().unwrap()).unwrap();
    assert_eq!(settings.server.port, 9000);
    assert_eq!(settings.server.host, "0.0.0.0");
    assert!(settings.llm.use_cpu);
    assert_eq!(settings.llm.generation.max_length, 64);
    assert_eq!(settings.llm.generation.seed, Some(42));
    assert_eq!(settings.llm.generation.temperature, 0.4);
}

#[test]
fn invalid_generation_settings_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("llm.toml"),
        "[llm.generation]\nmax_length = 0\n",
    )
    .unwrap();
    let err = Settings::load(dir.path().join("llm").to_str().unwrap()).unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
}
