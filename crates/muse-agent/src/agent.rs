use crate::config::AgentConfig;
use crate::context::RunContext;
use crate::error::{AgentError, Result};
use crate::executor::Executor;
use crate::instructions::Instructions;
use crate::response::AgentResponse;
use muse_core::ToolDefinition;
use muse_llm::LlmProvider;
use muse_tools::{ToolExecutor, ToolRegistry};
use std::sync::Arc;

/// A named model persona with instructions and an optional tool set, run
/// against a caller-owned context `C`.
pub struct Agent<C> {
    config: AgentConfig,
    instructions: Instructions<C>,
    llm: Arc<dyn LlmProvider>,
    tools: Option<Arc<ToolExecutor<C>>>,
}

impl<C: RunContext> Agent<C> {
    pub fn builder() -> AgentBuilder<C> {
        AgentBuilder::new()
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn instructions(&self) -> &Instructions<C> {
        &self.instructions
    }

    pub fn llm(&self) -> &Arc<dyn LlmProvider> {
        &self.llm
    }

    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .as_ref()
            .map(|tools| tools.registry().definitions())
            .unwrap_or_default()
    }

    /// Runs one turn of `input` against `ctx`.
    ///
    /// The exclusive borrow of `ctx` is held for the whole turn, so tool
    /// callbacks never run concurrently with each other or with the caller.
    /// The context's history is read but never appended to; recording the
    /// exchange is up to the caller once the turn succeeds.
    pub async fn run(&self, ctx: &mut C, input: &str) -> Result<AgentResponse> {
        let executor = Executor::new(
            &self.config,
            &self.instructions,
            self.llm.as_ref(),
            self.tools.as_deref(),
        );
        executor.execute(ctx, input).await
    }

    pub async fn chat(&self, ctx: &mut C, input: &str) -> Result<String> {
        let response = self.run(ctx, input).await?;
        Ok(response.text)
    }
}

pub struct AgentBuilder<C> {
    config: Option<AgentConfig>,
    name: Option<String>,
    instructions: Option<Instructions<C>>,
    model: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    max_iterations: Option<usize>,
    tools_enabled: Option<bool>,
    llm: Option<Arc<dyn LlmProvider>>,
    tool_registry: Option<Arc<ToolRegistry<C>>>,
}

impl<C> Default for AgentBuilder<C> {
    fn default() -> Self {
        Self {
            config: None,
            name: None,
            instructions: None,
            model: None,
            temperature: None,
            max_tokens: None,
            max_iterations: None,
            tools_enabled: None,
            llm: None,
            tool_registry: None,
        }
    }
}

impl<C: RunContext> AgentBuilder<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: AgentConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn instructions(mut self, instructions: impl Into<Instructions<C>>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    pub fn dynamic_instructions<F>(mut self, render: F) -> Self
    where
        F: Fn(&C) -> String + Send + Sync + 'static,
    {
        self.instructions = Some(Instructions::dynamic(render));
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    pub fn tools_enabled(mut self, enabled: bool) -> Self {
        self.tools_enabled = Some(enabled);
        self
    }

    pub fn llm(mut self, llm: Arc<dyn LlmProvider>) -> Self {
        self.llm = Some(llm);
        self
    }

    pub fn tool_registry(mut self, registry: Arc<ToolRegistry<C>>) -> Self {
        self.tool_registry = Some(registry);
        self
    }

    pub fn build(self) -> Result<Agent<C>> {
        let llm = self.llm.ok_or_else(|| AgentError::config("LLM provider is required"))?;

        let mut config = match self.config {
            Some(config) => config,
            None => AgentConfig::new(llm.default_model()),
        };

        if let Some(name) = self.name {
            config.name = name;
        }
        if let Some(model) = self.model {
            config.model = model;
        }
        if let Some(temp) = self.temperature {
            config.temperature = Some(temp);
        }
        if let Some(max) = self.max_tokens {
            config.max_tokens = Some(max);
        }
        if let Some(max) = self.max_iterations {
            config.max_iterations = max;
        }
        if let Some(enabled) = self.tools_enabled {
            config.tools_enabled = enabled;
        }

        if config.model.is_empty() {
            return Err(AgentError::config("model name is required"));
        }
        if config.max_iterations == 0 {
            return Err(AgentError::config("max_iterations must be at least 1"));
        }

        let timeout = config.tool_timeout();
        let tools = self
            .tool_registry
            .map(|registry| Arc::new(ToolExecutor::new(registry).with_timeout(timeout)));

        Ok(Agent {
            config,
            instructions: self.instructions.unwrap_or_default(),
            llm,
            tools,
        })
    }
}
