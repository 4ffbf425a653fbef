use crate::context::SessionContext;
use muse_core::{ToolDefinition, ToolParameter};
use muse_tools::{FunctionTool, Result, ToolRegistry};
use serde::Deserialize;
use serde_json::Number;

#[derive(Deserialize)]
struct NoArgs {}

#[derive(Deserialize)]
struct TechniqueArgs {
    stuck_level: Number,
}

impl TechniqueArgs {
    /// Numbers that are not an `i64` (fractions, huge integers) take the
    /// same fallback as any other out-of-range level.
    fn level(&self) -> i64 {
        self.stuck_level.as_i64().unwrap_or(FALLBACK_LEVEL)
    }
}

const FALLBACK_LEVEL: i64 = 3;

#[derive(Deserialize)]
struct IdeaArgs {
    idea: String,
}

#[derive(Deserialize)]
struct TopicArgs {
    topic: String,
}

/// The brainstorming agent's tool table, in the order the model sees it.
pub fn brainstorm_tools() -> Result<ToolRegistry<SessionContext>> {
    let summarize = FunctionTool::typed(
        ToolDefinition::new(
            "summarize_ideas",
            "Summarize every idea recorded so far in this brainstorming session.",
        ),
        |ctx: &mut SessionContext, _: NoArgs| ctx.summarize_ideas(),
    );

    let suggest = FunctionTool::typed(
        ToolDefinition::new(
            "suggest_brainstorming_technique",
            "Suggest a brainstorming technique for the current topic based on how stuck the user feels.",
        )
        .with_required_param(
            "stuck_level",
            ToolParameter::integer()
                .with_description("How stuck the user feels, from 1 to 5 where 5 is completely stuck"),
        ),
        |ctx: &mut SessionContext, args: TechniqueArgs| ctx.suggest_technique(args.level()),
    );

    let record = FunctionTool::typed(
        ToolDefinition::new(
            "record_idea",
            "Record an idea the user proposed or accepted during the session.",
        )
        .with_required_param(
            "idea",
            ToolParameter::string().with_description("The idea, in a short sentence"),
        ),
        |ctx: &mut SessionContext, args: IdeaArgs| ctx.record_idea(args.idea),
    );

    let topic = FunctionTool::typed(
        ToolDefinition::new("set_topic", "Set or change the topic being brainstormed.")
            .with_required_param(
                "topic",
                ToolParameter::string().with_description("The topic or problem to brainstorm"),
            ),
        |ctx: &mut SessionContext, args: TopicArgs| ctx.set_topic(args.topic),
    );

    ToolRegistry::new()
        .with_tool(summarize)?
        .with_tool(suggest)?
        .with_tool(record)?
        .with_tool(topic)
}
