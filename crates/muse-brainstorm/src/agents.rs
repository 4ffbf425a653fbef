use crate::context::SessionContext;
use crate::tools::brainstorm_tools;
use muse_agent::{Agent, AgentConfig, Result, RunContext};
use muse_core::Config;
use muse_llm::LlmProvider;
use std::sync::Arc;

pub const BRAINSTORM_AGENT_NAME: &str = "Brainstorming Assistant";
pub const BRAINSTORM_MODEL: &str = "gpt-4o-mini";

pub const POEM_AGENT_NAME: &str = "Assistant";
pub const POEM_INSTRUCTIONS: &str = "You are a helpful assistant";
pub const POEM_MODEL: &str = "gpt-4o";
pub const POEM_PROMPT: &str = "Write a poem about a cat in the style of Edgar Allan Poe.";

fn agent_config(name: &str, default_model: &str, config: &Config) -> AgentConfig {
    let model = config.llm.model.as_deref().unwrap_or(default_model);
    let mut agent = AgentConfig::from_settings(model, &config.agent).with_name(name);
    if let Some(temperature) = config.llm.temperature {
        agent = agent.with_temperature(temperature);
    }
    if let Some(max_tokens) = config.llm.max_tokens {
        agent = agent.with_max_tokens(max_tokens);
    }
    agent
}

/// The interactive brainstorming agent. Its instructions are re-rendered
/// from the session at the start of every turn.
pub fn brainstorm_agent(llm: Arc<dyn LlmProvider>, config: &Config) -> Result<Agent<SessionContext>> {
    Agent::builder()
        .config(agent_config(BRAINSTORM_AGENT_NAME, BRAINSTORM_MODEL, config))
        .dynamic_instructions(SessionContext::render_instructions)
        .tool_registry(Arc::new(brainstorm_tools()?))
        .llm(llm)
        .build()
}

/// A plain assistant with fixed instructions and no tools.
pub fn poem_agent<C: RunContext>(llm: Arc<dyn LlmProvider>, config: &Config) -> Result<Agent<C>> {
    Agent::builder()
        .config(agent_config(POEM_AGENT_NAME, POEM_MODEL, config))
        .instructions(POEM_INSTRUCTIONS)
        .llm(llm)
        .build()
}
