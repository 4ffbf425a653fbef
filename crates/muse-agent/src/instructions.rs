use std::fmt;
use std::sync::Arc;

type Render<C> = dyn Fn(&C) -> String + Send + Sync;

/// The system prompt of an agent: fixed text, or a function of the context
/// evaluated at the start of every turn.
pub enum Instructions<C> {
    Static(String),
    Dynamic(Arc<Render<C>>),
}

impl<C> Instructions<C> {
    pub fn dynamic<F>(render: F) -> Self
    where
        F: Fn(&C) -> String + Send + Sync + 'static,
    {
        Self::Dynamic(Arc::new(render))
    }

    pub fn render(&self, ctx: &C) -> String {
        match self {
            Self::Static(text) => text.clone(),
            Self::Dynamic(render) => render(ctx),
        }
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Dynamic(_))
    }
}

impl<C> Clone for Instructions<C> {
    fn clone(&self) -> Self {
        match self {
            Self::Static(text) => Self::Static(text.clone()),
            Self::Dynamic(render) => Self::Dynamic(Arc::clone(render)),
        }
    }
}

impl<C> Default for Instructions<C> {
    fn default() -> Self {
        Self::Static(String::new())
    }
}

impl<C> fmt::Debug for Instructions<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(text) => f.debug_tuple("Static").field(text).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl<C> From<String> for Instructions<C> {
    fn from(text: String) -> Self {
        Self::Static(text)
    }
}

impl<C> From<&str> for Instructions<C> {
    fn from(text: &str) -> Self {
        Self::Static(text.to_string())
    }
}
