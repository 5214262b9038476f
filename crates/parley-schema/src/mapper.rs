//! Type-to-schema mapping.
//!
//! `map_type` converts one `TypeDescriptor` into a JSON Schema fragment that
//! strict structured-output mode accepts: every object is closed and every
//! property required.
//!
//! Mappings are the one lossy case. The schema family has no way to express
//! "any number of entries keyed by K", so a mapping becomes a closed object
//! with exactly two properties, `property1` (the key) and `property2` (the
//! value). That models a single entry; a parameter that needs an arbitrary
//! number of entries should be declared as a list of structured pairs
//! instead.

use serde_json::{json, Map, Value};

use parley_contracts::{
    error::{ParleyError, ParleyResult},
    types::TypeDescriptor,
};

/// Synthetic property holding a mapping's key schema.
pub const MAPPING_KEY: &str = "property1";
/// Synthetic property holding a mapping's value schema.
pub const MAPPING_VALUE: &str = "property2";

/// Convert `descriptor` into a schema fragment, recursively.
///
/// Fails with `ParleyError::UnsupportedType` if any nested descriptor is
/// `Opaque`.
pub fn map_type(descriptor: &TypeDescriptor) -> ParleyResult<Value> {
    match descriptor {
        TypeDescriptor::Primitive(kind) => Ok(json!({ "type": kind.as_str() })),

        TypeDescriptor::Enumeration(values) => Ok(json!({
            "type": "string",
            "enum": values,
        })),

        TypeDescriptor::Structured(fields) => {
            let properties = fields
                .iter()
                .map(|(name, ty)| map_type(ty).map(|schema| (name.clone(), schema)))
                .collect::<ParleyResult<Vec<_>>>()?;
            Ok(closed_object(properties))
        }

        TypeDescriptor::Union(members) => {
            let branches = members.iter().map(map_type).collect::<ParleyResult<Vec<_>>>()?;
            Ok(json!({ "anyOf": branches }))
        }

        TypeDescriptor::List(element) => Ok(json!({
            "type": "array",
            "items": map_or_string(element.as_deref())?,
        })),

        TypeDescriptor::Mapping { key, value } => Ok(closed_object(vec![
            (MAPPING_KEY.to_string(), map_or_string(key.as_deref())?),
            (MAPPING_VALUE.to_string(), map_or_string(value.as_deref())?),
        ])),

        TypeDescriptor::Opaque(name) => Err(ParleyError::UnsupportedType {
            type_name: name.clone(),
        }),
    }
}

/// Build a closed object schema: every property required, no extras.
///
/// `required` lists the properties in the order given.
pub fn closed_object(properties: Vec<(String, Value)>) -> Value {
    let required: Vec<String> = properties.iter().map(|(name, _)| name.clone()).collect();
    let properties: Map<String, Value> = properties.into_iter().collect();
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    })
}

/// Undeclared element, key, and value types default to string.
fn map_or_string(descriptor: Option<&TypeDescriptor>) -> ParleyResult<Value> {
    match descriptor {
        Some(ty) => map_type(ty),
        None => Ok(json!({ "type": "string" })),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::json;

    use parley_contracts::{
        error::ParleyError,
        types::{Primitive, TypeDescriptor},
    };

    use super::map_type;

    /// The schema `type` of every primitive names the descriptor's kind, so
    /// the kind is recoverable from the schema.
    #[test]
    fn test_primitive_kind_round_trips() {
        for kind in [Primitive::String, Primitive::Integer, Primitive::Number, Primitive::Boolean] {
            let schema = map_type(&TypeDescriptor::Primitive(kind)).unwrap();
            let recovered: Primitive = schema["type"].as_str().unwrap().parse().unwrap();
            assert_eq!(recovered, kind);
        }
    }

    #[test]
    fn test_enumeration_keeps_declaration_order() {
        let schema = map_type(&TypeDescriptor::enumeration(["zeta", "alpha", "mid"])).unwrap();
        assert_eq!(schema, json!({ "type": "string", "enum": ["zeta", "alpha", "mid"] }));
    }

    #[test]
    fn test_structured_is_closed_and_fully_required() {
        let descriptor = TypeDescriptor::structured([
            ("street", TypeDescriptor::string()),
            ("number", TypeDescriptor::integer()),
            ("tags", TypeDescriptor::list(TypeDescriptor::string())),
        ]);
        let schema = map_type(&descriptor).unwrap();

        assert_eq!(schema["type"], "object");
        assert_eq!(schema["additionalProperties"], false);
        assert_eq!(schema["required"], json!(["street", "number", "tags"]));
        for field in ["street", "number", "tags"] {
            assert!(schema["properties"].get(field).is_some(), "missing property {field}");
        }
        assert_eq!(schema["properties"]["number"], json!({ "type": "integer" }));
    }

    #[test]
    fn test_nested_structured_recurses() {
        let descriptor = TypeDescriptor::structured([(
            "address",
            TypeDescriptor::structured([("city", TypeDescriptor::string())]),
        )]);
        let schema = map_type(&descriptor).unwrap();
        let inner = &schema["properties"]["address"];
        assert_eq!(inner["additionalProperties"], false);
        assert_eq!(inner["required"], json!(["city"]));
    }

    #[test]
    fn test_union_keeps_member_order() {
        let descriptor = TypeDescriptor::union([TypeDescriptor::integer(), TypeDescriptor::string()]);
        assert_eq!(
            map_type(&descriptor).unwrap(),
            json!({ "anyOf": [{ "type": "integer" }, { "type": "string" }] })
        );
    }

    #[test]
    fn test_list_with_and_without_element_type() {
        assert_eq!(
            map_type(&TypeDescriptor::list(TypeDescriptor::number())).unwrap(),
            json!({ "type": "array", "items": { "type": "number" } })
        );
        assert_eq!(
            map_type(&TypeDescriptor::List(None)).unwrap(),
            json!({ "type": "array", "items": { "type": "string" } })
        );
    }

    /// A mapping is modelled as exactly one key/value pair.
    #[test]
    fn test_mapping_models_single_entry() {
        let schema =
            map_type(&TypeDescriptor::mapping(TypeDescriptor::string(), TypeDescriptor::integer()))
                .unwrap();
        assert_eq!(
            schema,
            json!({
                "type": "object",
                "properties": {
                    "property1": { "type": "string" },
                    "property2": { "type": "integer" }
                },
                "required": ["property1", "property2"],
                "additionalProperties": false
            })
        );

        let untyped = map_type(&TypeDescriptor::Mapping { key: None, value: None }).unwrap();
        assert_eq!(untyped["properties"]["property2"], json!({ "type": "string" }));
    }

    /// An opaque type anywhere in the tree fails the whole mapping.
    #[test]
    fn test_opaque_type_is_unsupported() {
        let descriptor = TypeDescriptor::list(TypeDescriptor::union([
            TypeDescriptor::string(),
            TypeDescriptor::opaque("Instant"),
        ]));
        match map_type(&descriptor) {
            Err(ParleyError::UnsupportedType { type_name }) => assert_eq!(type_name, "Instant"),
            other => panic!("expected UnsupportedType, got {:?}", other),
        }
    }
}
