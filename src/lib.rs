//! Conversational agents built on a small agent runtime.
//!
//! The workspace is split the usual way: `muse-core` for shared types,
//! `muse-llm` for model providers, `muse-tools` for the tool system,
//! `muse-agent` for the turn loop and `muse-brainstorm` for the
//! brainstorming session state and its tools.

pub use muse_agent as agent;
pub use muse_brainstorm as brainstorm;
pub use muse_core as core;
pub use muse_llm as llm;
pub use muse_tools as tools;

pub mod prelude {
    pub use muse_agent::prelude::*;
    pub use muse_brainstorm::{brainstorm_agent, poem_agent, SessionContext};
    pub use muse_core::{Config, Message, Role, ToolDefinition, ToolParameter};
    pub use muse_llm::{LlmProvider, OpenAiProvider};
    pub use muse_tools::{FunctionTool, Tool, ToolOutput, ToolRegistry};
}
