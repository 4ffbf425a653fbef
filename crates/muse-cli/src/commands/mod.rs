pub mod brainstorm;
pub mod poem;

use muse_core::Config;
use muse_llm::{LlmProvider, OpenAiProvider};
use std::sync::Arc;

/// Fails before any agent exists when no API key is configured.
pub fn create_provider(config: &Config) -> anyhow::Result<Arc<dyn LlmProvider>> {
    let api_key = config.api_key()?;
    let provider = OpenAiProvider::from_config(api_key, &config.llm)?;
    Ok(Arc::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_is_fatal() {
        let mut config = Config::default();
        config.llm.api_key = None;

        let err = create_provider(&config).err().map(|e| e.to_string()).unwrap_or_default();
        assert!(err.contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_provider_from_config() {
        let mut config = Config::default();
        config.llm.api_key = Some("sk-test".to_string());

        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.name(), "openai");
    }
}
