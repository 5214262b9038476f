//! Function schema extraction.
//!
//! Turns declared function signatures into the `ToolDefinition`s the model
//! sees. Every parameter becomes a required property; optional or defaulted
//! parameters are not expressible, because strict mode demands every
//! property be present.

use serde_json::Value;
use tracing::debug;

use parley_contracts::{
    error::ParleyResult,
    tool::{Signature, ToolDefinition, DEFAULT_DESCRIPTION},
    types::TypeDescriptor,
};

use crate::mapper::{closed_object, map_type};

/// Build one tool definition per signature, in the order given.
///
/// Fails with `ParleyError::UnsupportedType` if any parameter type cannot be
/// mapped; no partial result is returned.
pub fn extract_schema<'a, I>(signatures: I) -> ParleyResult<Vec<ToolDefinition>>
where
    I: IntoIterator<Item = &'a Signature>,
{
    signatures.into_iter().map(extract_tool).collect()
}

/// Build the tool definition for a single signature.
pub fn extract_tool(signature: &Signature) -> ParleyResult<ToolDefinition> {
    let mut properties = Vec::with_capacity(signature.params.len());

    for param in &signature.params {
        let ty = param.ty.clone().unwrap_or_else(TypeDescriptor::string);
        let mut schema = map_type(&ty)?;
        if let Value::Object(fields) = &mut schema {
            fields.insert("title".to_string(), Value::String(capitalize(&param.name)));
            fields.insert(
                "description".to_string(),
                Value::String(format!("Parameter for {}", param.name)),
            );
        }
        properties.push((param.name.clone(), schema));
    }

    let description = signature
        .doc
        .as_deref()
        .map(str::trim)
        .filter(|doc| !doc.is_empty())
        .unwrap_or(DEFAULT_DESCRIPTION)
        .to_string();

    debug!(
        function = %signature.name,
        params = signature.params.len(),
        "extracted tool definition"
    );

    Ok(ToolDefinition {
        name: signature.name.clone(),
        description,
        parameters: closed_object(properties),
        strict: true,
    })
}

/// First character upper-cased, the rest lower-cased: `"recipient_Name"` →
/// `"Recipient_name"`.
fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::json;

    use parley_contracts::{
        error::ParleyError,
        tool::{Parameter, Signature, DEFAULT_DESCRIPTION},
        types::TypeDescriptor,
    };

    use super::{capitalize, extract_schema};

    fn signature(name: &str, doc: Option<&str>, params: Vec<(&str, Option<TypeDescriptor>)>) -> Signature {
        Signature {
            name: name.to_string(),
            doc: doc.map(str::to_string),
            params: params
                .into_iter()
                .map(|(name, ty)| Parameter { name: name.to_string(), ty })
                .collect(),
        }
    }

    #[test]
    fn test_say_hello_scenario() {
        let sigs = vec![signature(
            "say_hello",
            Some("Greets someone."),
            vec![("name", Some(TypeDescriptor::string()))],
        )];

        let tools = extract_schema(&sigs).unwrap();

        assert_eq!(tools.len(), 1);
        let tool = &tools[0];
        assert_eq!(tool.name, "say_hello");
        assert_eq!(tool.description, "Greets someone.");
        assert!(tool.strict);
        assert_eq!(
            tool.parameters,
            json!({
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "title": "Name",
                        "description": "Parameter for name"
                    }
                },
                "required": ["name"],
                "additionalProperties": false
            })
        );
    }

    /// A function with no parameters still gets a present, empty object.
    #[test]
    fn test_zero_parameter_function() {
        let sigs = vec![signature("now", None, vec![])];
        let tools = extract_schema(&sigs).unwrap();

        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].parameters["properties"], json!({}));
        assert_eq!(tools[0].parameters["required"], json!([]));
        assert_eq!(tools[0].description, DEFAULT_DESCRIPTION);
    }

    #[test]
    fn test_untyped_parameter_defaults_to_string() {
        let sigs = vec![signature("echo", Some("  Echo it back.  "), vec![("text", None)])];
        let tools = extract_schema(&sigs).unwrap();

        assert_eq!(tools[0].parameters["properties"]["text"]["type"], "string");
        assert_eq!(tools[0].description, "Echo it back.");
    }

    #[test]
    fn test_parameters_keep_declaration_order_in_required() {
        let sigs = vec![signature(
            "book",
            None,
            vec![
                ("where_to", None),
                ("seats", Some(TypeDescriptor::integer())),
                ("aisle", Some(TypeDescriptor::boolean())),
            ],
        )];
        let tools = extract_schema(&sigs).unwrap();
        assert_eq!(tools[0].parameters["required"], json!(["where_to", "seats", "aisle"]));
        assert_eq!(tools[0].parameters["properties"]["where_to"]["title"], "Where_to");
    }

    #[test]
    fn test_tools_follow_signature_order() {
        let sigs = vec![signature("b", None, vec![]), signature("a", None, vec![])];
        let names: Vec<String> = extract_schema(&sigs).unwrap().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_unsupported_parameter_type_fails_extraction() {
        let sigs = vec![signature(
            "schedule",
            None,
            vec![("at", Some(TypeDescriptor::opaque("DateTime")))],
        )];
        assert!(matches!(
            extract_schema(&sigs),
            Err(ParleyError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("recipient_Name"), "Recipient_name");
        assert_eq!(capitalize("x"), "X");
        assert_eq!(capitalize(""), "");
    }
}
