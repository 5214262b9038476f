//! Tool definitions: the model-facing description of one callable.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::TypeDescriptor;

/// Description used when a function declares none.
pub const DEFAULT_DESCRIPTION: &str = "No description available.";

/// One declared input of a callable.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    /// `None` when the parameter was declared without a type; the extractor
    /// treats it as a string.
    pub ty: Option<TypeDescriptor>,
}

/// The declared shape of a callable: everything the extractor reads.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    pub name: String,
    /// The callable's own documentation text, if any.
    pub doc: Option<String>,
    /// Parameters in declaration order.
    pub params: Vec<Parameter>,
}

impl Signature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            params: Vec::new(),
        }
    }
}

/// The structured description of one callable function.
///
/// Built once at agent construction by `parley_schema::extract_schema` and
/// never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique within one agent.
    pub name: String,
    /// Never empty; falls back to `DEFAULT_DESCRIPTION`.
    pub description: String,
    /// Closed object schema over the function's declared parameters.
    pub parameters: Value,
    /// Always true: every parameter is required and no extras are allowed.
    pub strict: bool,
}

/// The provider envelope around a tool definition.
///
/// Serializes as `{"type": "function", "function": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolSpec {
    Function { function: ToolDefinition },
}

impl From<ToolDefinition> for ToolSpec {
    fn from(function: ToolDefinition) -> Self {
        ToolSpec::Function { function }
    }
}
