#[cfg(test)]
mod tests {
    use crate::config::{Config, DEFAULT_MODEL, LLMConfig, LLMProvider, MODEL_ENV_VAR};
    use std::collections::HashMap;
    use crate::i18n::TargetLanguage;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert!(config.topic.is_none());
        assert_eq!(config.output_path, PathBuf::from("./survey.docs"));
        assert_eq!(config.target_language, TargetLanguage::English);
        assert!(!config.include_raw_tables);
        assert!(config.save_state);
        assert!(config.check_connection);
        assert!(!config.require_credentials);
        assert!(config.run_timeout_seconds.is_none());
        assert!(!config.verbose);
    }

    #[test]
    fn test_llm_provider_default() {
        assert_eq!(LLMProvider::default(), LLMProvider::Gemini);
    }

    #[test]
    fn test_llm_provider_from_str() {
        assert_eq!("gemini".parse::<LLMProvider>().unwrap(), LLMProvider::Gemini);
        assert_eq!("Google".parse::<LLMProvider>().unwrap(), LLMProvider::Gemini);
        assert_eq!("openai".parse::<LLMProvider>().unwrap(), LLMProvider::OpenAI);
        assert_eq!(
            "anthropic".parse::<LLMProvider>().unwrap(),
            LLMProvider::Anthropic
        );
        assert_eq!(
            "deepseek".parse::<LLMProvider>().unwrap(),
            LLMProvider::DeepSeek
        );
        assert_eq!(
            "openrouter".parse::<LLMProvider>().unwrap(),
            LLMProvider::OpenRouter
        );
        assert_eq!("ollama".parse::<LLMProvider>().unwrap(), LLMProvider::Ollama);

        assert!("invalid".parse::<LLMProvider>().is_err());
    }

    #[test]
    fn test_llm_provider_display() {
        assert_eq!(LLMProvider::Gemini.to_string(), "gemini");
        assert_eq!(LLMProvider::OpenAI.to_string(), "openai");
        assert_eq!(LLMProvider::Anthropic.to_string(), "anthropic");
        assert_eq!(LLMProvider::DeepSeek.to_string(), "deepseek");
        assert_eq!(LLMProvider::OpenRouter.to_string(), "openrouter");
        assert_eq!(LLMProvider::Ollama.to_string(), "ollama");
    }

    #[test]
    fn test_provider_capabilities() {
        assert!(LLMProvider::Gemini.supports_search());
        assert!(!LLMProvider::OpenAI.supports_search());
        assert!(LLMProvider::Gemini.requires_api_key());
        assert!(!LLMProvider::Ollama.requires_api_key());
    }

    #[test]
    fn test_llm_config_default() {
        let config = LLMConfig::default();

        assert_eq!(config.provider, LLMProvider::Gemini);
        // model comes from GOOGLE_GENAI_MODEL when set, otherwise the built-in default
        assert!(!config.model.is_empty());
        assert!(config.api_base_url.is_none());
        assert_eq!(config.max_tokens, 16384);
        assert_eq!(config.temperature, 0.2);
        assert!(config.enable_search);
    }

    fn env_of(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_model_from_env() {
        let config = LLMConfig::from_env_lookup(env_of(&[(MODEL_ENV_VAR, "gemini-2.5-pro")]));
        assert_eq!(config.model, "gemini-2.5-pro");

        let config = LLMConfig::from_env_lookup(env_of(&[]));
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.model, "gemini-2.5-flash");

        let config = LLMConfig::from_env_lookup(env_of(&[(MODEL_ENV_VAR, "  ")]));
        assert_eq!(config.model, "gemini-2.5-flash");
    }

    #[test]
    fn test_api_key_from_env() {
        let config = LLMConfig::from_env_lookup(env_of(&[
            ("SURVEY_LLM_API_KEY", "survey-key"),
            ("GOOGLE_API_KEY", "google-key"),
        ]));
        assert_eq!(config.api_key, "survey-key");

        let config = LLMConfig::from_env_lookup(env_of(&[("GOOGLE_API_KEY", "google-key")]));
        assert_eq!(config.api_key, "google-key");

        let config = LLMConfig::from_env_lookup(env_of(&[
            ("SURVEY_LLM_API_KEY", ""),
            ("GOOGLE_API_KEY", "google-key"),
        ]));
        assert_eq!(config.api_key, "google-key");

        let config = LLMConfig::from_env_lookup(env_of(&[]));
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn test_require_topic() {
        let mut config = Config::default();
        assert!(config.require_topic().is_err());

        config.topic = Some("   ".to_string());
        assert!(config.require_topic().is_err());

        config.topic = Some("  bridge vibration monitoring ".to_string());
        assert_eq!(
            config.require_topic().unwrap(),
            "bridge vibration monitoring"
        );
    }

    #[test]
    fn test_check_credentials_non_strict_only_warns() {
        let mut config = Config::default();
        config.llm.api_key = String::new();
        config.require_credentials = false;

        assert!(config.check_credentials().is_ok());
    }

    #[test]
    fn test_check_credentials_strict_fails_without_key() {
        let mut config = Config::default();
        config.llm.api_key = String::new();
        config.require_credentials = true;

        let err = config.check_credentials().unwrap_err();
        assert!(err.to_string().contains("No API key"));
    }

    #[test]
    fn test_check_credentials_ollama_needs_no_key() {
        let mut config = Config::default();
        config.llm.provider = LLMProvider::Ollama;
        config.llm.api_key = String::new();
        config.require_credentials = true;

        assert!(config.check_credentials().is_ok());
    }

    #[test]
    fn test_output_paths() {
        let config = Config {
            output_path: PathBuf::from("/tmp/out"),
            ..Default::default()
        };

        assert_eq!(config.report_path(), PathBuf::from("/tmp/out/report.md"));
        assert_eq!(config.state_path(), PathBuf::from("/tmp/out/state.json"));
    }

    #[test]
    fn test_from_file_partial_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("survey.toml");
        std::fs::write(
            &path,
            r#"
topic = "crack detection in concrete"
include_raw_tables = true
target_language = "zh"

[llm]
provider = "openai"
model = "gpt-4o-mini"
api_key = "test-key"
enable_search = false
"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();

        assert_eq!(config.topic.as_deref(), Some("crack detection in concrete"));
        assert!(config.include_raw_tables);
        assert_eq!(config.target_language, TargetLanguage::Chinese);
        assert_eq!(config.llm.provider, LLMProvider::OpenAI);
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.api_key, "test-key");
        assert!(!config.llm.enable_search);
        // unspecified fields fall back to defaults
        assert_eq!(config.output_path, PathBuf::from("./survey.docs"));
        assert_eq!(config.llm.max_tokens, 16384);
    }

    #[test]
    fn test_from_file_missing() {
        let temp_dir = TempDir::new().unwrap();
        let result = Config::from_file(&temp_dir.path().join("missing.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_from_file_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("survey.toml");
        std::fs::write(&path, "topic = [not valid").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
