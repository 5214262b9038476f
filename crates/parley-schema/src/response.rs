//! Output schema construction.
//!
//! Every model response must be a closed object with five required fields.
//! The `Action Input` field is a union with one branch per tool, each branch
//! selectable only by that tool's exact name, plus a trailing null branch
//! for "no action".

use serde_json::{json, Value};

use parley_contracts::{
    response::{Action, ACTION, ACTION_INPUT, FINAL_ANSWER, OBSERVATION, RESPONSE_FIELDS, THOUGHT},
    tool::ToolDefinition,
};

/// Build the full output schema for an agent owning `tools`.
///
/// Pure and deterministic: the same tool sequence always yields the same
/// schema, with branch order following tool order.
pub fn build_response_schema(tools: &[ToolDefinition]) -> Value {
    let mut properties = serde_json::Map::new();

    properties.insert(
        THOUGHT.to_string(),
        json!({ "type": "string", "description": "AI's reasoning before taking action." }),
    );
    properties.insert(
        ACTION.to_string(),
        json!({ "type": "string", "enum": Action::VALUES, "description": "Chosen action." }),
    );
    properties.insert(
        ACTION_INPUT.to_string(),
        json!({ "anyOf": action_input_branches(tools) }),
    );
    properties.insert(
        OBSERVATION.to_string(),
        json!({
            "anyOf": [
                { "type": "string" },
                { "type": "null" },
                { "type": "object", "additionalProperties": false }
            ],
            "description": "Result of the executed action."
        }),
    );
    properties.insert(
        FINAL_ANSWER.to_string(),
        json!({
            "anyOf": [{ "type": "string" }, { "type": "null" }],
            "description": "Final answer to the query. Should be null if an action is executed."
        }),
    );

    json!({
        "type": "object",
        "description": "Schema for AI responses ensuring strict JSON formatting.",
        "properties": properties,
        "additionalProperties": false,
        "required": RESPONSE_FIELDS,
    })
}

/// One `{name, arguments}` branch per tool, followed by `{"type": "null"}`.
pub fn action_input_branches(tools: &[ToolDefinition]) -> Vec<Value> {
    tools
        .iter()
        .map(|tool| {
            json!({
                "type": "object",
                "properties": {
                    "name": { "enum": [tool.name], "description": tool.description },
                    "arguments": tool.parameters
                },
                "required": ["name", "arguments"],
                "additionalProperties": false
            })
        })
        .chain(std::iter::once(json!({ "type": "null" })))
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::json;

    use parley_contracts::tool::ToolDefinition;

    use super::{action_input_branches, build_response_schema};

    fn tool(name: &str) -> ToolDefinition {
        ToolDefinition {
            name: name.to_string(),
            description: format!("does {name}"),
            parameters: json!({
                "type": "object",
                "properties": {},
                "required": [],
                "additionalProperties": false
            }),
            strict: true,
        }
    }

    #[test]
    fn test_top_level_shape() {
        let schema = build_response_schema(&[tool("a")]);

        assert_eq!(schema["type"], "object");
        assert_eq!(schema["additionalProperties"], false);
        assert_eq!(
            schema["required"],
            json!(["Thought", "Action", "Action Input", "Observation", "Final Answer"])
        );
        assert_eq!(schema["properties"]["Action"]["enum"], json!(["CALL_FUNCTION", "NONE"]));
        assert_eq!(
            schema["properties"]["Final Answer"]["anyOf"],
            json!([{ "type": "string" }, { "type": "null" }])
        );
    }

    #[test]
    fn test_one_branch_per_tool_plus_null() {
        let branches = action_input_branches(&[tool("first"), tool("second")]);

        assert_eq!(branches.len(), 3);
        assert_eq!(branches[0]["properties"]["name"]["enum"], json!(["first"]));
        assert_eq!(branches[1]["properties"]["name"]["enum"], json!(["second"]));
        assert_eq!(branches[2], json!({ "type": "null" }));
        assert_eq!(branches[0]["required"], json!(["name", "arguments"]));
    }

    /// Distinct tools never share a selectable name.
    #[test]
    fn test_branch_name_enums_do_not_overlap() {
        let branches = action_input_branches(&[tool("x"), tool("y"), tool("z")]);
        let names: Vec<&serde_json::Value> = branches
            .iter()
            .filter_map(|b| b.pointer("/properties/name/enum"))
            .collect();

        for (i, a) in names.iter().enumerate() {
            for b in names.iter().skip(i + 1) {
                let a = a.as_array().unwrap();
                let b = b.as_array().unwrap();
                assert!(a.iter().all(|v| !b.contains(v)), "overlap between {a:?} and {b:?}");
            }
        }
    }

    #[test]
    fn test_arguments_is_the_tool_parameter_schema() {
        let t = tool("noop");
        let branches = action_input_branches(std::slice::from_ref(&t));
        assert_eq!(branches[0]["properties"]["arguments"], t.parameters);
    }

    #[test]
    fn test_no_tools_leaves_only_null_branch() {
        let schema = build_response_schema(&[]);
        assert_eq!(schema["properties"]["Action Input"]["anyOf"], json!([{ "type": "null" }]));
    }

    #[test]
    fn test_building_twice_is_identical() {
        let tools = vec![tool("a"), tool("b")];
        assert_eq!(build_response_schema(&tools), build_response_schema(&tools));
    }
}
