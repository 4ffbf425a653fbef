mod loader;
mod types;

pub use loader::API_KEY_ENV;
pub use types::{AgentSettings, Config, GeneralConfig, LlmConfig, LogLevel};
