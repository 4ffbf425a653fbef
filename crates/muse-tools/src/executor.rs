use crate::error::{Result, ToolError};
use crate::registry::ToolRegistry;
use crate::traits::ToolOutput;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};

pub struct ToolExecutor<C> {
    registry: Arc<ToolRegistry<C>>,
    default_timeout: Duration,
}

impl<C: Send> ToolExecutor<C> {
    pub fn new(registry: Arc<ToolRegistry<C>>) -> Self {
        Self {
            registry,
            default_timeout: Duration::from_secs(60),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Runs one tool call to completion against `ctx`. Calls never overlap:
    /// the exclusive borrow is held until the tool returns or times out.
    pub async fn execute(&self, ctx: &mut C, name: &str, input: Value) -> Result<ToolOutput> {
        let tool = self
            .registry
            .get(name)
            .ok_or_else(|| ToolError::not_found(name))?;

        tool.validate_input(&input)?;

        info!(tool = name, "Executing tool");

        match timeout(self.default_timeout, tool.execute(ctx, input)).await {
            Ok(Ok(output)) => {
                info!(tool = name, is_error = output.is_error, "Tool execution completed");
                Ok(output)
            }
            Ok(Err(e)) => {
                warn!(tool = name, error = %e, "Tool execution failed");
                Err(e)
            }
            Err(_) => {
                warn!(tool = name, timeout_ms = ?self.default_timeout.as_millis(), "Tool execution timed out");
                Err(ToolError::Timeout(self.default_timeout.as_millis() as u64))
            }
        }
    }

    pub fn registry(&self) -> &ToolRegistry<C> {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::FunctionTool;
    use crate::traits::Tool;
    use async_trait::async_trait;
    use muse_core::{ToolDefinition, ToolParameter};

    struct SlowTool {
        def: ToolDefinition,
    }

    #[async_trait]
    impl Tool<Vec<String>> for SlowTool {
        fn definition(&self) -> &ToolDefinition {
            &self.def
        }

        async fn execute(&self, _ctx: &mut Vec<String>, _input: Value) -> Result<ToolOutput> {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(ToolOutput::text("done"))
        }
    }

    fn executor() -> ToolExecutor<Vec<String>> {
        let push = FunctionTool::new(
            ToolDefinition::new("push", "Push a value")
                .with_required_param("value", ToolParameter::string()),
            |log: &mut Vec<String>, input: Value| {
                let value = input["value"].as_str().unwrap_or_default().to_string();
                log.push(value.clone());
                Ok(ToolOutput::text(format!("pushed {}", value)))
            },
        );
        let slow = SlowTool {
            def: ToolDefinition::new("slow", "A slow tool"),
        };

        let registry = ToolRegistry::new()
            .with_tool(push)
            .and_then(|r| r.with_tool(slow))
            .unwrap();
        ToolExecutor::new(Arc::new(registry))
    }

    #[tokio::test]
    async fn test_executor_execute_sequentially() {
        let executor = executor();
        let mut log = Vec::new();

        executor
            .execute(&mut log, "push", serde_json::json!({"value": "a"}))
            .await
            .unwrap();
        let output = executor
            .execute(&mut log, "push", serde_json::json!({"value": "b"}))
            .await
            .unwrap();

        assert_eq!(output.content, "pushed b");
        assert_eq!(log, vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn test_executor_not_found() {
        let executor = executor();
        let mut log = Vec::new();

        let result = executor.execute(&mut log, "nonexistent", Value::Null).await;
        assert!(matches!(result, Err(ToolError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_executor_validates_before_running() {
        let executor = executor();
        let mut log = Vec::new();

        let result = executor.execute(&mut log, "push", serde_json::json!({})).await;
        assert!(matches!(result, Err(ToolError::InvalidInput(_))));
        assert!(log.is_empty());
    }

    #[tokio::test]
    async fn test_executor_timeout() {
        let executor = executor().with_timeout(Duration::from_millis(50));
        let mut log = Vec::new();

        let result = executor.execute(&mut log, "slow", Value::Null).await;
        assert!(matches!(result, Err(ToolError::Timeout(50))));
    }
}
