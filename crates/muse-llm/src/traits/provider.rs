use crate::error::Result;
use crate::types::{CompletionRequest, CompletionResponse};
use async_trait::async_trait;

#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn name(&self) -> &str;

    fn default_model(&self) -> &str;

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use muse_core::Message;
    use std::sync::Arc;

    struct MockProvider;

    #[async_trait]
    impl LlmProvider for MockProvider {
        fn name(&self) -> &str {
            "mock"
        }

        fn default_model(&self) -> &str {
            "mock-model"
        }

        async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
            let echo = request
                .messages
                .last()
                .map(|m| m.text_content())
                .unwrap_or_default();
            Ok(CompletionResponse::new(
                "mock-id",
                request.model,
                Message::assistant(format!("echo: {}", echo)),
            ))
        }
    }

    #[tokio::test]
    async fn test_mock_provider_as_trait_object() {
        let provider: Arc<dyn LlmProvider> = Arc::new(MockProvider);

        assert_eq!(provider.name(), "mock");

        let response = provider
            .complete(CompletionRequest::new(
                provider.default_model(),
                vec![Message::user("Hi")],
            ))
            .await
            .unwrap();

        assert_eq!(response.model, "mock-model");
        assert_eq!(response.text_content(), "echo: Hi");
    }
}
