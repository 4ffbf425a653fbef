//! Tools the model can call during a turn.
//!
//! Every tool is generic over the caller's context type `C` and receives it
//! by `&mut` reference. The executor runs calls one at a time, so a tool
//! always observes the mutations of the calls before it.

pub mod error;
pub mod executor;
pub mod function;
pub mod registry;
pub mod traits;

pub use error::{Result, ToolError};
pub use executor::ToolExecutor;
pub use function::FunctionTool;
pub use registry::ToolRegistry;
pub use traits::{Tool, ToolOutput};

pub mod prelude {
    pub use crate::error::{Result, ToolError};
    pub use crate::executor::ToolExecutor;
    pub use crate::function::FunctionTool;
    pub use crate::registry::ToolRegistry;
    pub use crate::traits::{Tool, ToolOutput};
}
