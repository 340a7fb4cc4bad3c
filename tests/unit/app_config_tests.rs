/*!
 * Tests for app configuration
 */

use doctran::app_config::{Config, LogLevel, ProviderConfig, ProviderKind};

use crate::common::{create_temp_dir, create_test_file};

#[test]
fn test_config_default_shouldCarryPipelineDefaults() {
    let config = Config::default();
    assert_eq!(config.translation.provider, ProviderKind::OpenAI);
    assert_eq!(config.translation.batch_budget, 2000);
    assert_eq!(config.translation.retry_count, 3);
    assert_eq!(config.translation.retry_backoff_secs, vec![1, 4, 9]);
    assert_eq!(config.translation.available_providers.len(), 3);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

#[test]
fn test_providerKind_fromStr_shouldAcceptSynonyms() {
    assert_eq!("openai".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAI);
    assert_eq!("GPT".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAI);
    assert_eq!("default".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAI);
    assert_eq!("claude".parse::<ProviderKind>().unwrap(), ProviderKind::Anthropic);
    assert_eq!("noop".parse::<ProviderKind>().unwrap(), ProviderKind::Echo);
    assert!("carrier-pigeon".parse::<ProviderKind>().is_err());
}

#[test]
fn test_providerKind_display_shouldBeLowercase() {
    assert_eq!(ProviderKind::OpenAI.to_string(), "openai");
    assert_eq!(ProviderKind::Anthropic.to_string(), "anthropic");
    assert_eq!(ProviderKind::Echo.to_string(), "echo");
}

#[test]
fn test_config_roundTrip_shouldSurviveSaveAndLoad() {
    let temp_dir = create_temp_dir().unwrap();
    let path = temp_dir.path().join("conf.json");

    let mut config = Config::default();
    config.target_language = Some("fr".to_string());
    config.translation.batch_budget = 500;
    config.save(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert_eq!(loaded.target_language.as_deref(), Some("fr"));
    assert_eq!(loaded.translation.batch_budget, 500);
}

#[test]
fn test_config_fromFile_withPartialJson_shouldFillDefaults() {
    let temp_dir = create_temp_dir().unwrap();
    let path = create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{"translation": {"provider": "echo"}}"#,
    )
    .unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.translation.provider, ProviderKind::Echo);
    assert_eq!(config.translation.batch_budget, 2000);
    assert_eq!(config.translation.retry_backoff_secs, vec![1, 4, 9]);
}

#[test]
fn test_config_validate_withUnknownProviderType_shouldFail() {
    let mut config = Config::default();
    config.translation.available_providers.push(ProviderConfig {
        provider_type: "telegraph".to_string(),
        model: String::new(),
        api_key: String::new(),
        endpoint: String::new(),
        timeout_secs: 60,
    });
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validate_withBadEndpoint_shouldFail() {
    let mut config = Config::default();
    config.translation.available_providers[0].endpoint = "not a url".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validate_withEmptyBackoff_shouldFail() {
    let mut config = Config::default();
    config.translation.retry_backoff_secs.clear();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_getModel_shouldFallBackToBuiltinDefault() {
    let config = Config::default();
    assert_eq!(config.get_model(&ProviderKind::OpenAI), "gpt-4o-mini");

    let mut custom = Config::default();
    custom.translation.available_providers[0].model = "gpt-4o".to_string();
    assert_eq!(custom.get_model(&ProviderKind::OpenAI), "gpt-4o");
}

#[test]
fn test_config_getApiKey_shouldPreferConfiguredValue() {
    let mut config = Config::default();
    config.translation.available_providers[0].api_key = "sk-test".to_string();
    assert_eq!(config.get_api_key(&ProviderKind::OpenAI), "sk-test");
}
