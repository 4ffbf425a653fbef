use crate::config::AgentConfig;
use crate::context::RunContext;
use crate::error::{AgentError, Result};
use crate::instructions::Instructions;
use crate::response::{AgentResponse, ToolCallRecord};
use muse_core::message::{ContentBlock, ToolResult, ToolUse};
use muse_core::Message;
use muse_llm::{CompletionRequest, LlmProvider, TokenUsage};
use muse_tools::ToolExecutor;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Drives a single turn. Borrowed from the agent for the turn's duration.
pub(crate) struct Executor<'a, C> {
    config: &'a AgentConfig,
    instructions: &'a Instructions<C>,
    llm: &'a dyn LlmProvider,
    tools: Option<&'a ToolExecutor<C>>,
}

impl<'a, C: RunContext> Executor<'a, C> {
    pub(crate) fn new(
        config: &'a AgentConfig,
        instructions: &'a Instructions<C>,
        llm: &'a dyn LlmProvider,
        tools: Option<&'a ToolExecutor<C>>,
    ) -> Self {
        Self {
            config,
            instructions,
            llm,
            tools,
        }
    }

    pub(crate) async fn execute(&self, ctx: &mut C, user_input: &str) -> Result<AgentResponse> {
        // Tool calls below may change the context; the prompt stays as of turn start.
        let system = self.instructions.render(ctx);
        debug!(agent = %self.config.name, chars = system.len(), "Rendered instructions");

        let mut messages = self.history(ctx);
        messages.push(Message::user(user_input));

        let mut all_tool_calls = Vec::new();
        let mut usage = TokenUsage::default();
        let mut iterations = 0;

        loop {
            iterations += 1;

            if iterations > self.config.max_iterations {
                return Err(AgentError::MaxIterationsReached(self.config.max_iterations));
            }

            info!(agent = %self.config.name, iteration = iterations, "Starting agent loop iteration");

            let request = self.build_request(&system, messages.clone());
            let response = self.llm.complete(request).await?;
            usage += response.usage;

            let tool_uses: Vec<ToolUse> = response
                .message
                .tool_uses()
                .into_iter()
                .cloned()
                .collect();

            if tool_uses.is_empty() {
                let text = response.text_content();
                return Ok(AgentResponse::new(text)
                    .with_tool_calls(all_tool_calls)
                    .with_iterations(iterations)
                    .with_usage(usage));
            }

            messages.push(response.message);

            let mut tool_result_content = Vec::with_capacity(tool_uses.len());
            for tu in &tool_uses {
                let record = self.execute_tool(ctx, tu).await;
                let result = if record.is_error {
                    ToolResult::error(&tu.id, &record.output)
                } else {
                    ToolResult::success(&tu.id, &record.output)
                };
                tool_result_content.push(ContentBlock::tool_result(result));
                all_tool_calls.push(record);
            }

            messages.push(Message::tool(tool_result_content));
        }
    }

    fn history(&self, ctx: &C) -> Vec<Message> {
        let mut history = ctx.history();
        let limit = self.config.max_context_messages;
        if history.len() > limit {
            history.drain(..history.len() - limit);
        }
        history
    }

    fn build_request(&self, system: &str, messages: Vec<Message>) -> CompletionRequest {
        let mut request = CompletionRequest::new(&self.config.model, messages);

        if !system.is_empty() {
            request = request.with_system(system);
        }
        if let Some(temperature) = self.config.temperature {
            request = request.with_temperature(temperature);
        }
        if let Some(max_tokens) = self.config.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }

        if self.config.tools_enabled {
            if let Some(tools) = self.tools {
                let definitions = tools.registry().definitions();
                if !definitions.is_empty() {
                    request = request.with_tools(definitions);
                }
            }
        }

        request
    }

    /// Failures never abort the turn; they go back to the model as error results.
    async fn execute_tool(&self, ctx: &mut C, tu: &ToolUse) -> ToolCallRecord {
        let Some(tools) = self.tools else {
            return ToolCallRecord::error(
                &tu.id,
                &tu.name,
                tu.input.clone(),
                format!("Tool execution not available: {}", tu.name),
                0,
            );
        };

        let start = Instant::now();
        debug!(tool = %tu.name, id = %tu.id, "Executing tool");

        let result = tools.execute(ctx, &tu.name, tu.input.clone()).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(output) => {
                info!(tool = %tu.name, duration_ms, is_error = output.is_error, "Tool completed");
                ToolCallRecord::success(&tu.id, &tu.name, tu.input.clone(), &output, duration_ms)
            }
            Err(e) => {
                warn!(tool = %tu.name, error = %e, "Tool execution failed");
                ToolCallRecord::error(&tu.id, &tu.name, tu.input.clone(), e.to_string(), duration_ms)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use muse_core::{Role, ToolDefinition, ToolParameter};
    use muse_llm::{CompletionResponse, LlmError};
    use muse_tools::{FunctionTool, ToolRegistry};
    use serde::Deserialize;
    use std::sync::{Arc, Mutex};

    struct MockLlm {
        responses: Mutex<Vec<CompletionResponse>>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl MockLlm {
        fn new(responses: Vec<CompletionResponse>) -> Self {
            Self {
                responses: Mutex::new(responses),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmProvider for MockLlm {
        fn name(&self) -> &str {
            "mock"
        }

        fn default_model(&self) -> &str {
            "mock"
        }

        async fn complete(&self, request: CompletionRequest) -> std::result::Result<CompletionResponse, LlmError> {
            self.requests.lock().unwrap().push(request);
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                Ok(CompletionResponse::new("id", "model", Message::assistant("Default response")))
            } else {
                Ok(responses.remove(0))
            }
        }
    }

    #[derive(Default)]
    struct Notes {
        past: Vec<Message>,
        notes: Vec<String>,
    }

    impl RunContext for Notes {
        fn history(&self) -> Vec<Message> {
            self.past.clone()
        }
    }

    #[derive(Deserialize)]
    struct NoteArgs {
        note: String,
    }

    fn note_tools(config: &AgentConfig) -> ToolExecutor<Notes> {
        let registry = ToolRegistry::new()
            .with_tool(FunctionTool::typed(
                ToolDefinition::new("note", "Keep a note")
                    .with_required_param("note", ToolParameter::string()),
                |notes: &mut Notes, args: NoteArgs| {
                    notes.notes.push(args.note.clone());
                    format!("Noted: {}", args.note)
                },
            ))
            .unwrap();
        ToolExecutor::new(Arc::new(registry)).with_timeout(config.tool_timeout())
    }

    fn instructions() -> Instructions<Notes> {
        Instructions::dynamic(|notes: &Notes| format!("{} notes", notes.notes.len()))
    }

    fn tool_call(id: &str, name: &str, input: serde_json::Value) -> CompletionResponse {
        CompletionResponse::new(
            format!("resp-{}", id),
            "mock",
            Message::new(
                Role::Assistant,
                vec![ContentBlock::tool_use(ToolUse::new(id, name, input))],
            ),
        )
    }

    #[tokio::test]
    async fn test_executor_simple_response() {
        let config = AgentConfig::new("mock");
        let instructions: Instructions<()> = "You are helpful.".into();
        let llm = MockLlm::new(vec![CompletionResponse::new(
            "resp-1",
            "mock",
            Message::assistant("Hello!"),
        )]);

        let executor = Executor::new(&config, &instructions, &llm, None);
        let response = executor.execute(&mut (), "Hi").await.unwrap();

        assert_eq!(response.text(), "Hello!");
        assert_eq!(response.iterations, 1);
        assert!(!response.has_tool_calls());

        let requests = llm.requests();
        assert_eq!(requests[0].system.as_deref(), Some("You are helpful."));
        assert_eq!(requests[0].messages.len(), 1);
        assert!(requests[0].tools.is_none());
    }

    #[tokio::test]
    async fn test_executor_dispatches_tools_against_context() {
        let config = AgentConfig::new("mock");
        let tools = note_tools(&config);
        let instructions = instructions();
        let llm = MockLlm::new(vec![
            tool_call("call_1", "note", serde_json::json!({"note": "kites"})),
            CompletionResponse::new("resp-2", "mock", Message::assistant("Noted it.")),
        ]);

        let mut notes = Notes::default();
        let executor = Executor::new(&config, &instructions, &llm, Some(&tools));
        let response = executor.execute(&mut notes, "remember kites").await.unwrap();

        assert_eq!(response.text(), "Noted it.");
        assert_eq!(response.iterations, 2);
        assert_eq!(response.tool_calls[0].output, "Noted: kites");
        assert_eq!(notes.notes, vec!["kites".to_string()]);

        let requests = llm.requests();
        // Rendered once, before the tool ran.
        assert_eq!(requests[1].system.as_deref(), Some("0 notes"));
        assert_eq!(requests[1].messages.len(), 3);
        assert_eq!(requests[1].messages[2].role, Role::Tool);
        assert_eq!(requests[0].tools.as_ref().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn test_executor_tool_errors_go_back_to_model() {
        let config = AgentConfig::new("mock");
        let tools = note_tools(&config);
        let instructions = instructions();
        let llm = MockLlm::new(vec![
            tool_call("call_1", "note", serde_json::json!({})),
            tool_call("call_2", "missing_tool", serde_json::json!({})),
            CompletionResponse::new("resp-3", "mock", Message::assistant("Sorry.")),
        ]);

        let mut notes = Notes::default();
        let executor = Executor::new(&config, &instructions, &llm, Some(&tools));
        let response = executor.execute(&mut notes, "note nothing").await.unwrap();

        assert_eq!(response.text(), "Sorry.");
        assert_eq!(response.failed_tool_calls().count(), 2);
        assert!(notes.notes.is_empty());

        let requests = llm.requests();
        let result = requests[1].messages[2].content[0].as_tool_result().unwrap();
        assert!(result.is_error);
        assert!(result.content.contains("note"));
    }

    #[tokio::test]
    async fn test_executor_replays_bounded_history() {
        let config = AgentConfig::new("mock").with_max_context_messages(2);
        let instructions: Instructions<Notes> = "".into();
        let llm = MockLlm::new(vec![]);

        let mut notes = Notes::default();
        for i in 0..5 {
            notes.past.push(Message::user(format!("Message {}", i)));
        }

        let executor = Executor::new(&config, &instructions, &llm, None);
        executor.execute(&mut notes, "latest").await.unwrap();

        let request = &llm.requests()[0];
        assert!(request.system.is_none());
        let texts: Vec<_> = request.messages.iter().map(|m| m.text_content()).collect();
        assert_eq!(texts, vec!["Message 3", "Message 4", "latest"]);
    }

    #[tokio::test]
    async fn test_executor_max_iterations() {
        let config = AgentConfig::new("mock").with_max_iterations(2);
        let instructions: Instructions<()> = "You are helpful.".into();
        let llm = MockLlm::new(vec![
            tool_call("call_1", "test_tool", serde_json::json!({})),
            tool_call("call_2", "test_tool", serde_json::json!({})),
            tool_call("call_3", "test_tool", serde_json::json!({})),
        ]);

        let executor = Executor::new(&config, &instructions, &llm, None);
        let result = executor.execute(&mut (), "Hi").await;

        assert!(matches!(result, Err(AgentError::MaxIterationsReached(2))));
        assert_eq!(llm.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_executor_unavailable_tools() {
        let config = AgentConfig::new("mock");
        let instructions: Instructions<()> = Instructions::default();
        let llm = MockLlm::new(vec![tool_call("call_1", "anything", serde_json::Value::Null)]);

        let executor = Executor::new(&config, &instructions, &llm, None);
        let response = executor.execute(&mut (), "Hi").await.unwrap();

        assert_eq!(response.text(), "Default response");
        assert!(response.tool_calls[0].output.starts_with("Tool execution not available"));
    }
}
