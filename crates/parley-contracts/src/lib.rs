//! # parley-contracts
//!
//! Shared types and contracts for the PARLEY agent harness.
//!
//! All crates in the workspace import from here. No loop or schema logic
//! lives in this crate, only data definitions and the error type.

pub mod error;
pub mod execution;
pub mod message;
pub mod response;
pub mod tool;
pub mod types;
pub mod verify;

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use error::ParleyError;
    use execution::{CallId, CallOutcome, IterationOutcome, RETRIES_EXHAUSTED};
    use message::{Message, Role};
    use response::{Action, ModelResponse};
    use tool::{ToolDefinition, ToolSpec};
    use types::{DescribeType, Primitive, TypeDescriptor};

    // ── Primitive / TypeDescriptor ───────────────────────────────────────────

    #[test]
    fn primitive_tags_parse() {
        assert_eq!("string".parse::<Primitive>().unwrap(), Primitive::String);
        assert_eq!("integer".parse::<Primitive>().unwrap(), Primitive::Integer);
        assert_eq!("number".parse::<Primitive>().unwrap(), Primitive::Number);
        assert_eq!("boolean".parse::<Primitive>().unwrap(), Primitive::Boolean);
    }

    #[test]
    fn unknown_primitive_tag_is_unsupported() {
        match "datetime".parse::<TypeDescriptor>() {
            Err(ParleyError::UnsupportedType { type_name }) => assert_eq!(type_name, "datetime"),
            other => panic!("expected UnsupportedType, got {:?}", other),
        }
    }

    #[test]
    fn rust_types_describe_themselves() {
        assert_eq!(String::describe(), TypeDescriptor::string());
        assert_eq!(<&str>::describe(), TypeDescriptor::string());
        assert_eq!(u32::describe(), TypeDescriptor::integer());
        assert_eq!(f64::describe(), TypeDescriptor::number());
        assert_eq!(bool::describe(), TypeDescriptor::boolean());
        assert_eq!(
            Vec::<i64>::describe(),
            TypeDescriptor::list(TypeDescriptor::integer())
        );
        assert_eq!(
            std::collections::HashMap::<String, f32>::describe(),
            TypeDescriptor::mapping(TypeDescriptor::string(), TypeDescriptor::number())
        );
    }

    // ── Message serde ────────────────────────────────────────────────────────

    #[test]
    fn function_message_carries_name() {
        let msg = Message::function("say_hello", "\"Hello, Alice!\"");
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            value,
            json!({ "role": "function", "name": "say_hello", "content": "\"Hello, Alice!\"" })
        );
    }

    #[test]
    fn plain_messages_omit_name() {
        let value = serde_json::to_value(Message::user("hi")).unwrap();
        assert_eq!(value, json!({ "role": "user", "content": "hi" }));
        assert_eq!(Message::system("x").role, Role::System);
        assert_eq!(Message::assistant("x").role, Role::Assistant);
    }

    // ── ToolSpec envelope ────────────────────────────────────────────────────

    #[test]
    fn tool_spec_uses_function_envelope() {
        let envelope = ToolSpec::from(ToolDefinition {
            name: "noop".to_string(),
            description: tool::DEFAULT_DESCRIPTION.to_string(),
            parameters: json!({ "type": "object" }),
            strict: true,
        });
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["type"], "function");
        assert_eq!(value["function"]["name"], "noop");
        assert_eq!(value["function"]["strict"], true);
    }

    // ── ModelResponse decoding ───────────────────────────────────────────────

    #[test]
    fn model_response_decodes_all_fields() {
        let response = ModelResponse::from_value(json!({
            "Thought": "greet",
            "Action": "CALL_FUNCTION",
            "Action Input": { "name": "say_hello", "arguments": { "name": "Alice" } },
            "Observation": null,
            "Final Answer": null
        }))
        .unwrap();

        assert_eq!(response.thought.as_deref(), Some("greet"));
        assert_eq!(response.action, Some(Action::CallFunction));
        assert!(response.answer().is_none());
        let call = response.action_input.as_ref().unwrap();
        assert_eq!(call.name, "say_hello");
        assert_eq!(call.arguments["name"], "Alice");
    }

    #[test]
    fn empty_final_answer_is_not_an_answer() {
        let response = ModelResponse::from_value(json!({ "Final Answer": "" })).unwrap();
        assert!(response.answer().is_none());
    }

    #[test]
    fn non_object_payload_is_decode_error() {
        let err = ModelResponse::from_value(json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, ParleyError::Decode { .. }));
    }

    #[test]
    fn action_input_without_name_is_absent() {
        let response = ModelResponse::from_value(json!({ "Action Input": { "arguments": {} } }))
            .unwrap();
        assert!(response.action_input.is_none());

        let empty = ModelResponse::from_value(json!({ "Action Input": {} })).unwrap();
        assert!(empty.action_input.is_none());

        let blank = ModelResponse::from_value(json!({ "Action Input": { "name": "" } })).unwrap();
        assert!(blank.action_input.is_none());
    }

    #[test]
    fn ill_shaped_fields_decode_as_absent() {
        let response = ModelResponse::from_value(json!({
            "Thought": 7,
            "Action": "WAIT",
            "Action Input": "say_hello",
            "Observation": null,
            "Final Answer": ["not", "a", "string"]
        }))
        .unwrap();

        assert_eq!(response, ModelResponse::default());
    }

    #[test]
    fn non_object_arguments_read_as_empty() {
        let response = ModelResponse::from_value(json!({
            "Action Input": { "name": "now", "arguments": "soon" }
        }))
        .unwrap();
        let call = response.action_input.as_ref().unwrap();
        assert_eq!(call.name, "now");
        assert!(call.arguments.is_empty());
    }

    // ── Outcomes ─────────────────────────────────────────────────────────────

    #[test]
    fn exhausted_call_renders_sentinel() {
        let outcome = CallOutcome::RetriesExhausted { iterations: 100 };
        assert_eq!(outcome.into_text(), RETRIES_EXHAUSTED);
        assert_eq!(CallOutcome::Answered("42".into()).into_text(), "42");
    }

    #[test]
    fn iteration_outcome_is_tagged() {
        let value = serde_json::to_value(IterationOutcome::Answered { answer: "42".into() }).unwrap();
        assert_eq!(value, json!({ "kind": "answered", "answer": "42" }));
    }

    #[test]
    fn call_ids_are_unique() {
        let unique: std::collections::HashSet<CallId> = (0..100).map(|_| CallId::new()).collect();
        assert_eq!(unique.len(), 100);
    }

    // ── ParleyError display messages ─────────────────────────────────────────

    #[test]
    fn error_unsupported_type_display() {
        let err = ParleyError::UnsupportedType { type_name: "datetime".to_string() };
        assert!(err.to_string().contains("unsupported type"));
        assert!(err.to_string().contains("datetime"));
    }

    #[test]
    fn error_dispatch_display() {
        let err = ParleyError::dispatch("say_hello", "missing argument 'name'");
        let msg = err.to_string();
        assert!(msg.contains("say_hello"));
        assert!(msg.contains("missing argument 'name'"));
    }

    #[test]
    fn error_decode_display() {
        let err = ParleyError::Decode { reason: "expected value at line 1".to_string() };
        assert!(err.to_string().contains("could not decode model response"));
    }

    #[test]
    fn error_config_display() {
        let err = ParleyError::Config { reason: "duplicate recipient 'bob'".to_string() };
        assert!(err.to_string().contains("configuration error"));
        assert!(err.to_string().contains("bob"));
    }
}
