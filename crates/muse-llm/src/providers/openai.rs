use crate::error::{LlmError, Result};
use crate::traits::LlmProvider;
use crate::types::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
use async_trait::async_trait;
use muse_core::config::LlmConfig;
use muse_core::message::{ContentBlock, ToolUse};
use muse_core::{Message, Role, ToolDefinition};
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

const PROVIDER: &str = "openai";

pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    base_url: String,
    default_model: String,
    timeout: Duration,
    max_retries: u32,
    retry_backoff: Duration,
}

impl OpenAiProvider {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.openai.com/v1";

    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, Self::DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let timeout = Duration::from_secs(300);
        Ok(Self {
            client: build_client(timeout)?,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            default_model: "gpt-4o".to_string(),
            timeout,
            max_retries: 2,
            retry_backoff: Duration::from_millis(500),
        })
    }

    /// Builds a provider from the `[llm]` section; the key is passed
    /// separately because it may come from the command line.
    pub fn from_config(api_key: impl Into<String>, config: &LlmConfig) -> Result<Self> {
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string());

        let mut provider = Self::with_base_url(api_key, base_url)?
            .with_max_retries(config.max_retries)
            .with_timeout(Duration::from_secs(config.timeout_secs))?;

        if let Some(model) = &config.model {
            provider = provider.with_model(model);
        }
        Ok(provider)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = build_client(timeout)?;
        self.timeout = timeout;
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn convert_messages(&self, messages: &[Message], system: Option<&str>) -> Vec<OpenAiMessage> {
        let mut result = Vec::with_capacity(messages.len() + 1);

        if let Some(sys) = system {
            result.push(OpenAiMessage::text("system", sys));
        }

        for msg in messages {
            match msg.role {
                Role::System => continue,
                Role::User => result.push(OpenAiMessage::text("user", msg.text_content())),
                Role::Assistant => {
                    let tool_calls: Vec<_> = msg
                        .tool_uses()
                        .into_iter()
                        .map(|tu| OpenAiToolCall {
                            id: tu.id.clone(),
                            r#type: "function".to_string(),
                            function: OpenAiFunctionCall {
                                name: tu.name.clone(),
                                arguments: tu.input.to_string(),
                            },
                        })
                        .collect();

                    let text = msg.text_content();

                    result.push(OpenAiMessage {
                        role: "assistant".to_string(),
                        content: if text.is_empty() { None } else { Some(text) },
                        tool_calls: if tool_calls.is_empty() {
                            None
                        } else {
                            Some(tool_calls)
                        },
                        tool_call_id: None,
                    });
                }
                Role::Tool => {
                    for tr in msg.content.iter().filter_map(|b| b.as_tool_result()) {
                        result.push(OpenAiMessage {
                            role: "tool".to_string(),
                            content: Some(tr.content.clone()),
                            tool_calls: None,
                            tool_call_id: Some(tr.tool_use_id.clone()),
                        });
                    }
                }
            }
        }

        result
    }

    fn convert_tools(&self, tools: &[ToolDefinition]) -> Result<Vec<OpenAiTool>> {
        tools
            .iter()
            .map(|t| {
                Ok(OpenAiTool {
                    r#type: "function".to_string(),
                    function: OpenAiFunction {
                        name: t.name.clone(),
                        description: Some(t.description.clone()),
                        parameters: serde_json::to_value(&t.parameters)?,
                    },
                })
            })
            .collect()
    }

    fn build_body(&self, request: &CompletionRequest) -> Result<Value> {
        let messages = self.convert_messages(&request.messages, request.system.as_deref());

        let mut body = serde_json::json!({
            "model": request.model,
            "messages": messages,
        });

        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = max_tokens.into();
        }
        if let Some(temp) = request.temperature {
            body["temperature"] = temp.into();
        }
        if let Some(tools) = request.tools.as_deref().filter(|_| request.has_tools()) {
            body["tools"] = serde_json::to_value(self.convert_tools(tools)?)?;
        }

        Ok(body)
    }

    fn parse_response(&self, response: OpenAiResponse) -> Result<CompletionResponse> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::invalid_response("No choices in response"))?;

        let mut content_blocks = Vec::new();

        if let Some(text) = choice.message.content.filter(|t| !t.is_empty()) {
            content_blocks.push(ContentBlock::text(text));
        }

        for tc in choice.message.tool_calls.unwrap_or_default() {
            // Unparseable arguments are handed through as a string so the
            // tool reports the problem back to the model.
            let input = serde_json::from_str(&tc.function.arguments)
                .unwrap_or(Value::String(tc.function.arguments));
            content_blocks.push(ContentBlock::tool_use(ToolUse::new(
                tc.id,
                tc.function.name,
                input,
            )));
        }

        let stop_reason = choice
            .finish_reason
            .as_deref()
            .map(StopReason::from_finish_reason)
            .unwrap_or(StopReason::EndTurn);

        let usage = response
            .usage
            .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        Ok(CompletionResponse::new(
            response.id,
            response.model,
            Message::new(Role::Assistant, content_blocks),
        )
        .with_usage(usage)
        .with_stop_reason(stop_reason))
    }

    async fn send(&self, body: &Value) -> Result<OpenAiResponse> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if status.is_success() {
            return response.json().await.map_err(|e| self.transport_error(e));
        }

        let retry_after_ms = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(|secs| secs * 1000);
        let text = response.text().await.unwrap_or_default();

        Err(match status {
            StatusCode::TOO_MANY_REQUESTS => LlmError::rate_limited(PROVIDER, retry_after_ms),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                LlmError::AuthenticationFailed(format!("{}: {}", status, text))
            }
            s if s.is_server_error() => LlmError::server(PROVIDER, s.as_u16(), text),
            s => LlmError::api(PROVIDER, format!("{}: {}", s, text)),
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            LlmError::Timeout(self.timeout.as_millis() as u64)
        } else if e.is_connect() || e.is_request() {
            LlmError::network(e.to_string())
        } else if e.is_decode() {
            LlmError::invalid_response(e.to_string())
        } else {
            LlmError::Reqwest(e)
        }
    }

    fn backoff(&self, attempt: u32, err: &LlmError) -> Duration {
        err.retry_after_ms()
            .map(Duration::from_millis)
            .unwrap_or(self.retry_backoff * attempt)
    }
}

fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LlmError::Config(format!("Failed to create HTTP client: {}", e)))
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let body = self.build_body(&request)?;
        debug!(
            model = %request.model,
            messages = request.messages.len(),
            tools = request.tools.as_ref().map_or(0, |t| t.len()),
            "Sending chat completion"
        );

        let mut attempt = 0;
        loop {
            match self.send(&body).await {
                Ok(response) => return self.parse_response(response),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay = self.backoff(attempt, &e);
                    warn!(
                        error = %e,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Retrying chat completion"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<OpenAiToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

impl OpenAiMessage {
    fn text(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAiToolCall {
    id: String,
    r#type: String,
    function: OpenAiFunctionCall,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAiFunctionCall {
    name: String,
    arguments: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAiTool {
    r#type: String,
    function: OpenAiFunction,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAiFunction {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    parameters: Value,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    id: String,
    model: String,
    choices: Vec<OpenAiChoice>,
    usage: Option<OpenAiUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
    tool_calls: Option<Vec<OpenAiToolCall>>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use muse_core::message::ToolResult;
    use muse_core::ToolParameter;

    fn provider() -> OpenAiProvider {
        OpenAiProvider::new("test-key").unwrap()
    }

    #[test]
    fn test_provider_creation() {
        let provider = provider().with_model("gpt-4o-mini");

        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.default_model(), "gpt-4o-mini");
        assert_eq!(provider.base_url(), OpenAiProvider::DEFAULT_BASE_URL);
    }

    #[test]
    fn test_from_config() {
        let config = LlmConfig {
            base_url: Some("http://localhost:11434/v1/".into()),
            model: Some("llama3".into()),
            max_retries: 0,
            ..LlmConfig::default()
        };

        let provider = OpenAiProvider::from_config("key", &config).unwrap();
        assert_eq!(provider.base_url(), "http://localhost:11434/v1");
        assert_eq!(provider.default_model(), "llama3");
        assert_eq!(provider.max_retries, 0);
    }

    #[test]
    fn test_message_conversion() {
        let messages = vec![Message::user("Hello"), Message::assistant("Hi there!")];

        let converted = provider().convert_messages(&messages, Some("You are helpful"));

        assert_eq!(converted.len(), 3);
        assert_eq!(converted[0].role, "system");
        assert_eq!(converted[1].role, "user");
        assert_eq!(converted[2].role, "assistant");
        assert_eq!(converted[2].content.as_deref(), Some("Hi there!"));
    }

    #[test]
    fn test_tool_round_conversion() {
        let messages = vec![
            Message::user("Let's talk about gifts"),
            Message::new(
                Role::Assistant,
                vec![ContentBlock::tool_use(ToolUse::new(
                    "call_1",
                    "set_topic",
                    serde_json::json!({"topic": "gifts"}),
                ))],
            ),
            Message::tool(vec![
                ContentBlock::tool_result(ToolResult::success("call_1", "Topic set to: gifts")),
            ]),
        ];

        let converted = provider().convert_messages(&messages, None);

        assert_eq!(converted.len(), 3);
        let assistant = &converted[1];
        assert!(assistant.content.is_none());
        let calls = assistant.tool_calls.as_ref().unwrap();
        assert_eq!(calls[0].function.name, "set_topic");
        assert_eq!(calls[0].function.arguments, r#"{"topic":"gifts"}"#);

        assert_eq!(converted[2].role, "tool");
        assert_eq!(converted[2].tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(converted[2].content.as_deref(), Some("Topic set to: gifts"));
    }

    #[test]
    fn test_build_body_with_tools() {
        let tool = ToolDefinition::new("record_idea", "Save an idea")
            .with_required_param("idea", ToolParameter::string());
        let request = CompletionRequest::new("gpt-4o-mini", vec![Message::user("hi")])
            .with_system("sys")
            .with_temperature(0.5)
            .with_tools(vec![tool]);

        let body = provider().build_body(&request).unwrap();

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["tools"][0]["type"], "function");
        assert_eq!(body["tools"][0]["function"]["name"], "record_idea");
        assert_eq!(body["tools"][0]["function"]["parameters"]["required"][0], "idea");
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn test_build_body_with_empty_tools_omits_them() {
        let request = CompletionRequest::new("gpt-4o", vec![Message::user("hi")]).with_tools(vec![]);

        let body = provider().build_body(&request).unwrap();
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn test_parse_text_response() {
        let raw = serde_json::json!({
            "id": "chatcmpl-1",
            "model": "gpt-4o",
            "choices": [{
                "message": { "role": "assistant", "content": "What kind of gift?" },
                "finish_reason": "stop"
            }],
            "usage": { "prompt_tokens": 12, "completion_tokens": 5, "total_tokens": 17 }
        });

        let response: OpenAiResponse = serde_json::from_value(raw).unwrap();
        let parsed = provider().parse_response(response).unwrap();

        assert_eq!(parsed.text_content(), "What kind of gift?");
        assert_eq!(parsed.stop_reason, Some(StopReason::EndTurn));
        assert_eq!(parsed.usage.total(), 17);
        assert!(!parsed.has_tool_use());
    }

    #[test]
    fn test_parse_tool_call_response() {
        let raw = serde_json::json!({
            "id": "chatcmpl-2",
            "model": "gpt-4o-mini",
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [
                        {
                            "id": "call_a",
                            "type": "function",
                            "function": { "name": "record_idea", "arguments": "{\"idea\":\"a kite\"}" }
                        },
                        {
                            "id": "call_b",
                            "type": "function",
                            "function": { "name": "set_topic", "arguments": "not json" }
                        }
                    ]
                },
                "finish_reason": "tool_calls"
            }]
        });

        let response: OpenAiResponse = serde_json::from_value(raw).unwrap();
        let parsed = provider().parse_response(response).unwrap();

        assert_eq!(parsed.stop_reason, Some(StopReason::ToolUse));
        let uses = parsed.message.tool_uses();
        assert_eq!(uses.len(), 2);
        assert_eq!(uses[0].input["idea"], "a kite");
        assert_eq!(uses[1].input, Value::String("not json".into()));
        assert_eq!(parsed.usage, TokenUsage::default());
    }

    #[test]
    fn test_parse_empty_choices() {
        let response = OpenAiResponse {
            id: "x".into(),
            model: "gpt-4o".into(),
            choices: vec![],
            usage: None,
        };

        let result = provider().parse_response(response);
        assert!(matches!(result, Err(LlmError::InvalidResponse(_))));
    }

    #[test]
    fn test_backoff_prefers_retry_after() {
        let provider = provider().with_retry_backoff(Duration::from_millis(100));

        let rate_limited = LlmError::rate_limited(PROVIDER, Some(3000));
        assert_eq!(provider.backoff(1, &rate_limited), Duration::from_secs(3));

        let network = LlmError::network("reset");
        assert_eq!(provider.backoff(2, &network), Duration::from_millis(200));
    }
}
