use crate::error::{Result, ToolError};
use crate::traits::{Tool, ToolOutput};
use async_trait::async_trait;
use muse_core::ToolDefinition;
use serde::de::DeserializeOwned;
use serde_json::Value;

type Handler<C> = dyn Fn(&mut C, Value) -> Result<ToolOutput> + Send + Sync;

/// A tool assembled from a definition and a plain function over the
/// context. This is the (name, schema, handler) triple the registry holds
/// for callbacks that need no state of their own.
pub struct FunctionTool<C> {
    def: ToolDefinition,
    handler: Box<Handler<C>>,
}

impl<C: 'static> FunctionTool<C> {
    pub fn new<F>(def: ToolDefinition, handler: F) -> Self
    where
        F: Fn(&mut C, Value) -> Result<ToolOutput> + Send + Sync + 'static,
    {
        Self {
            def,
            handler: Box::new(handler),
        }
    }

    /// Wraps a handler taking typed arguments. Arguments that do not
    /// deserialize into `A` surface as [`ToolError::InvalidInput`].
    pub fn typed<A, F>(def: ToolDefinition, handler: F) -> Self
    where
        A: DeserializeOwned + 'static,
        F: Fn(&mut C, A) -> String + Send + Sync + 'static,
    {
        let name = def.name.clone();
        Self::new(def, move |ctx, input| {
            let input = match input {
                Value::Null => Value::Object(Default::default()),
                other => other,
            };
            let args: A = serde_json::from_value(input)
                .map_err(|e| ToolError::invalid_input(format!("{}: {}", name, e)))?;
            Ok(ToolOutput::text(handler(ctx, args)))
        })
    }
}

#[async_trait]
impl<C: Send> Tool<C> for FunctionTool<C> {
    fn definition(&self) -> &ToolDefinition {
        &self.def
    }

    async fn execute(&self, ctx: &mut C, input: Value) -> Result<ToolOutput> {
        (self.handler)(ctx, input)
    }
}
