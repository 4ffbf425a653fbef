pub mod config;
pub mod error;
pub mod message;
pub mod tool;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use message::{ContentBlock, Message, Role, ToolResult, ToolUse};
pub use tool::{ToolDefinition, ToolParameter};
pub use types::{Id, MessageId, SessionId, Timestamp};

pub mod prelude {
    pub use crate::config::{AgentSettings, Config, GeneralConfig, LlmConfig, LogLevel};
    pub use crate::error::{Error, Result};
    pub use crate::message::{ContentBlock, Message, Role, ToolResult, ToolUse};
    pub use crate::tool::{JsonSchemaType, ToolDefinition, ToolParameter};
    pub use crate::types::{Id, MessageId, SessionId, Timestamp};
}
