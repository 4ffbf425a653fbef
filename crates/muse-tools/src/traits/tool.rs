use crate::error::{Result, ToolError};
use async_trait::async_trait;
use muse_core::ToolDefinition;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOutput {
    pub content: String,
    #[serde(default)]
    pub is_error: bool,
}

impl ToolOutput {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: message.into(),
            is_error: true,
        }
    }
}

#[async_trait]
pub trait Tool<C: Send>: Send + Sync {
    fn definition(&self) -> &ToolDefinition;

    async fn execute(&self, ctx: &mut C, input: Value) -> Result<ToolOutput>;

    /// Checks the arguments against the declared schema: an object carrying
    /// every required property. A missing argument object counts as `{}`.
    fn validate_input(&self, input: &Value) -> Result<()> {
        let def = self.definition();
        let empty = serde_json::Map::new();
        let args = match input {
            Value::Object(map) => map,
            Value::Null => &empty,
            other => {
                return Err(ToolError::invalid_input(format!(
                    "{} expects a JSON object of arguments, got {}",
                    def.name, other
                )))
            }
        };

        if let Some(required) = &def.parameters.required {
            for name in required {
                if !args.contains_key(name) {
                    return Err(ToolError::invalid_input(format!(
                        "{} is missing required argument '{}'",
                        def.name, name
                    )));
                }
            }
        }

        Ok(())
    }

    fn name(&self) -> &str {
        &self.definition().name
    }
}
