//! The brainstorming assistant: per-session state, the tools the model uses
//! to update it, and the agents built on top.

pub mod agents;
pub mod context;
pub mod instructions;
pub mod techniques;
pub mod tools;

pub use agents::{brainstorm_agent, poem_agent, BRAINSTORM_AGENT_NAME, POEM_PROMPT};
pub use context::{HistoryEntry, SessionContext};
pub use techniques::Technique;
pub use tools::brainstorm_tools;
