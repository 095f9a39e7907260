//! Tests for configuration loading.

use std::io::Write;

use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

use unillm::accumulator::IndexPolicy;
use unillm::config::UnillmConfig;
use unillm::error::UnillmError;
use unillm::models::{LanguageModelId, ProviderKind};

const SAMPLE: &str = r#"
[pricing."openai:gpt-4o"]
input_text_per_m = 2.5
input_cached_text_per_m = 1.25
output_text_per_m = 10.0

[pricing."gemini:gemini-2.0-flash"]
input_text_per_m = 0.1
input_audio_per_m = 0.7
output_text_per_m = 0.4

[index_policy]
openai-chat = "guess"
"#;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn config_file_loads_pricing_and_policies() {
    let file = write_config(SAMPLE);
    let config = UnillmConfig::from_file(file.path()).unwrap();

    let gpt = config
        .pricing_for(&"openai:gpt-4o".parse::<LanguageModelId>().unwrap())
        .unwrap();
    assert_eq!(gpt.input_cached_text_per_m, Some(1.25));
    assert_eq!(gpt.output_text_per_m, 10.0);

    let flash = config
        .pricing_for(&LanguageModelId::new(ProviderKind::Google, "gemini-2.0-flash"))
        .unwrap();
    assert_eq!(flash.input_audio_per_m, 0.7);

    assert_eq!(config.index_policy_for(ProviderKind::OpenAiChat), IndexPolicy::Guess);
    assert_eq!(config.index_policy_for(ProviderKind::Ollama), IndexPolicy::Guess);
    assert_eq!(config.index_policy_for(ProviderKind::Anthropic), IndexPolicy::Explicit);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = UnillmConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, UnillmError::Io(_)));
}

#[test]
fn unknown_table_is_rejected() {
    let err = UnillmConfig::from_toml_str("[providers]\nopenai = 1\n").unwrap_err();
    assert!(matches!(err, UnillmError::TomlParse(_)));
}

#[test]
fn bad_pricing_key_is_configuration_error() {
    let err = UnillmConfig::from_toml_str("[pricing.\"gpt-4o\"]\ninput_text_per_m = 1.0\n")
        .unwrap_err();
    assert!(matches!(err, UnillmError::Configuration(_)));
    assert!(err.to_string().contains("gpt-4o"));
}

#[test]
fn unknown_provider_in_policy_table_is_configuration_error() {
    let err = UnillmConfig::from_toml_str("[index_policy]\nacme = \"guess\"\n").unwrap_err();
    assert!(matches!(err, UnillmError::Configuration(_)));
}

#[test]
fn clones_share_state() {
    let config = UnillmConfig::new();
    let clone = config.clone();
    clone.set_index_policy(ProviderKind::Google, IndexPolicy::Explicit);
    assert_eq!(config.index_policy_for(ProviderKind::Google), IndexPolicy::Explicit);
}
