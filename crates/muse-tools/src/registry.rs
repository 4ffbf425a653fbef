use crate::error::{Result, ToolError};
use crate::traits::Tool;
use muse_core::ToolDefinition;
use std::collections::HashMap;
use std::sync::Arc;

/// Tools in registration order, indexed by name.
pub struct ToolRegistry<C> {
    tools: Vec<Arc<dyn Tool<C>>>,
    index: HashMap<String, usize>,
}

impl<C: Send> ToolRegistry<C> {
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn register(&mut self, tool: Arc<dyn Tool<C>>) -> Result<()> {
        let name = tool.name().to_string();
        if self.index.contains_key(&name) {
            return Err(ToolError::AlreadyRegistered(name));
        }
        self.index.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    pub fn with_tool<T>(mut self, tool: T) -> Result<Self>
    where
        T: Tool<C> + 'static,
    {
        self.register(Arc::new(tool))?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool<C>>> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn list(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl<C: Send> Default for ToolRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}
