use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonSchemaType {
    String,
    Integer,
    Object,
}

/// A JSON Schema fragment describing one tool argument (or the argument
/// object itself).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolParameter {
    #[serde(rename = "type")]
    pub schema_type: JsonSchemaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, ToolParameter>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
}

impl ToolParameter {
    fn of(schema_type: JsonSchemaType) -> Self {
        Self {
            schema_type,
            description: None,
            properties: None,
            required: None,
        }
    }

    pub fn string() -> Self {
        Self::of(JsonSchemaType::String)
    }

    pub fn integer() -> Self {
        Self::of(JsonSchemaType::Integer)
    }

    pub fn object() -> Self {
        Self {
            properties: Some(BTreeMap::new()),
            required: Some(vec![]),
            ..Self::of(JsonSchemaType::Object)
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: ToolParameter,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: ToolParameter::object(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, param: ToolParameter) -> Self {
        if let Some(props) = &mut self.parameters.properties {
            props.insert(name.into(), param);
        }
        self
    }

    pub fn with_required_param(self, name: impl Into<String>, param: ToolParameter) -> Self {
        let name = name.into();
        self.with_param(name.clone(), param).require_param(name)
    }

    pub fn require_param(mut self, name: impl Into<String>) -> Self {
        if let Some(req) = &mut self.parameters.required {
            req.push(name.into());
        }
        self
    }

    pub fn param(&self, name: &str) -> Option<&ToolParameter> {
        self.parameters.properties.as_ref()?.get(name)
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.parameters
            .required
            .as_ref()
            .is_some_and(|req| req.iter().any(|r| r == name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_definition() {
        let tool = ToolDefinition::new("suggest_brainstorming_technique", "Suggest a technique")
            .with_required_param(
                "stuck_level",
                ToolParameter::integer().with_description("How stuck the user feels, 1-5"),
            )
            .with_param("hint", ToolParameter::string());

        assert_eq!(tool.name, "suggest_brainstorming_technique");
        assert_eq!(
            tool.param("stuck_level").map(|p| p.schema_type),
            Some(JsonSchemaType::Integer)
        );
        assert!(tool.is_required("stuck_level"));
        assert!(!tool.is_required("hint"));
    }

    #[test]
    fn test_schema_serialization() {
        let tool = ToolDefinition::new("set_topic", "Set the topic")
            .with_required_param("topic", ToolParameter::string());

        let json = serde_json::to_value(&tool.parameters).unwrap();
        assert_eq!(json["type"], "object");
        assert_eq!(json["properties"]["topic"]["type"], "string");
        assert_eq!(json["required"][0], "topic");
        assert!(json.get("description").is_none());
    }
}
