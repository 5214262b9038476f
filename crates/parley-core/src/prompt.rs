//! System prompt generation.
//!
//! The generated prompt tells the model the response shape, lists the tool
//! definitions, and appends optional worked examples. Callers that supply
//! their own prompt bypass this entirely.

use chrono::NaiveDate;

use parley_contracts::{
    error::{ParleyError, ParleyResult},
    tool::{ToolDefinition, ToolSpec},
};

const RESPONSE_SHAPE: &str = r#"{
    "Thought": "string",
    "Action": "CALL_FUNCTION" or "NONE",
    "Action Input": {
        "name": "string (function name)",
        "arguments": {"any": "object (function arguments)"}
    } or null,
    "Observation": "string or object or null",
    "Final Answer": "string or null"
}"#;

const CLOSING_RULES: &str = "\
When calling a function, leave Final Answer null.
If a function call returns an error, fix the arguments and try again.
Respond with valid JSON only; no text outside the JSON object.
";

/// Optional prompt material supplied by the agent's builder.
#[derive(Debug, Clone, Default)]
pub struct PromptParts<'a> {
    /// Placed before everything else.
    pub additional_instructions: Option<&'a str>,
    /// Worked examples, placed after the tool list.
    pub examples: Option<&'a str>,
}

/// Build the system prompt for an agent owning `tools`.
///
/// `today` is injected so the prompt is reproducible in tests.
pub fn generate_system_prompt(
    tools: &[ToolDefinition],
    parts: &PromptParts<'_>,
    today: NaiveDate,
) -> ParleyResult<String> {
    let specs: Vec<ToolSpec> = tools.iter().cloned().map(ToolSpec::from).collect();
    let tool_schema = serde_json::to_string_pretty(&specs).map_err(|e| ParleyError::SchemaBuild {
        reason: format!("failed to render tool definitions: {e}"),
    })?;

    let mut prompt = String::new();
    if let Some(extra) = parts.additional_instructions.map(str::trim).filter(|s| !s.is_empty()) {
        prompt.push_str(extra);
        prompt.push('\n');
    }

    prompt.push_str(&format!(
        "\nYou reason and act to solve user queries. Today's date is {}.\n\
         Every response must be a single JSON object of this shape:\n\n\
         {}\n\n\
         You can call the functions described below:\n{}\n",
        today.format("%Y-%m-%d"),
        RESPONSE_SHAPE,
        tool_schema
    ));

    if let Some(examples) = parts.examples.filter(|s| !s.trim().is_empty()) {
        prompt.push_str(&format!("\nEXAMPLES:\n{examples}\n"));
    }

    prompt.push('\n');
    prompt.push_str(CLOSING_RULES);
    Ok(prompt)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use parley_contracts::tool::ToolDefinition;

    use super::{generate_system_prompt, PromptParts};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    fn say_hello() -> ToolDefinition {
        ToolDefinition {
            name: "say_hello".to_string(),
            description: "Greets someone.".to_string(),
            parameters: json!({ "type": "object", "properties": {}, "required": [], "additionalProperties": false }),
            strict: true,
        }
    }

    #[test]
    fn test_prompt_mentions_date_shape_and_tools() {
        let prompt = generate_system_prompt(&[say_hello()], &PromptParts::default(), date()).unwrap();

        assert!(prompt.contains("2025-03-14"));
        assert!(prompt.contains("\"Final Answer\""));
        assert!(prompt.contains("\"say_hello\""));
        assert!(prompt.contains("\"type\": \"function\""));
        assert!(!prompt.contains("EXAMPLES"));
        assert!(prompt.ends_with("no text outside the JSON object.\n"));
    }

    #[test]
    fn test_additional_instructions_come_first() {
        let parts = PromptParts {
            additional_instructions: Some("  You are terse.  "),
            examples: None,
        };
        let prompt = generate_system_prompt(&[], &parts, date()).unwrap();
        assert!(prompt.starts_with("You are terse.\n"));
    }

    #[test]
    fn test_examples_follow_tool_list() {
        let parts = PromptParts {
            additional_instructions: None,
            examples: Some("Q: hi\nA: hello"),
        };
        let prompt = generate_system_prompt(&[say_hello()], &parts, date()).unwrap();

        let tools_at = prompt.find("say_hello").unwrap();
        let examples_at = prompt.find("EXAMPLES:").unwrap();
        assert!(examples_at > tools_at);
        assert!(prompt.contains("Q: hi\nA: hello"));
    }
}
