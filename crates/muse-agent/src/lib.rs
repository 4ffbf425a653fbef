//! Agent runtime: an [`Agent`] turns one line of user input into a final
//! answer, calling the model and dispatching tool calls against a context
//! the caller owns.

pub mod agent;
pub mod config;
pub mod context;
pub mod error;
mod executor;
pub mod instructions;
pub mod response;

pub use agent::{Agent, AgentBuilder};
pub use config::AgentConfig;
pub use context::RunContext;
pub use error::{AgentError, Result};
pub use instructions::Instructions;
pub use response::{AgentResponse, ToolCallRecord};

pub mod prelude {
    pub use crate::agent::{Agent, AgentBuilder};
    pub use crate::config::AgentConfig;
    pub use crate::context::RunContext;
    pub use crate::error::{AgentError, Result};
    pub use crate::instructions::Instructions;
    pub use crate::response::{AgentResponse, ToolCallRecord};
}
