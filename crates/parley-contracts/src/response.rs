//! The decoded form of one structured model response.
//!
//! Field names on the wire are the human-readable keys the output schema
//! declares ("Thought", "Action Input", ...). Decoding an object never
//! fails: a field that is missing or has the wrong shape decodes as absent,
//! and the loop decides what an absent field means.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ParleyError, ParleyResult};

pub const THOUGHT: &str = "Thought";
pub const ACTION: &str = "Action";
pub const ACTION_INPUT: &str = "Action Input";
pub const OBSERVATION: &str = "Observation";
pub const FINAL_ANSWER: &str = "Final Answer";

/// The five top-level fields, in the order the schema requires them.
pub const RESPONSE_FIELDS: [&str; 5] = [THOUGHT, ACTION, ACTION_INPUT, OBSERVATION, FINAL_ANSWER];

/// What the model says it is doing this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    #[serde(rename = "CALL_FUNCTION")]
    CallFunction,
    #[serde(rename = "NONE")]
    None,
}

impl Action {
    /// Wire values, in schema order.
    pub const VALUES: [&'static str; 2] = ["CALL_FUNCTION", "NONE"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::CallFunction => "CALL_FUNCTION",
            Action::None => "NONE",
        }
    }

    /// Parse a wire value. Anything else is `None`.
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "CALL_FUNCTION" => Some(Action::CallFunction),
            "NONE" => Some(Action::None),
            _ => None,
        }
    }
}

/// A function call requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionInput {
    pub name: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl ActionInput {
    /// Read a `{name, arguments}` object.
    ///
    /// Without a non-empty string `name` there is no call to make, so the
    /// result is `None`. Non-object `arguments` read as empty.
    pub fn from_value(value: Value) -> Option<Self> {
        let Value::Object(mut fields) = value else {
            return None;
        };
        let name = match fields.remove("name") {
            Some(Value::String(name)) if !name.is_empty() => name,
            _ => return None,
        };
        let arguments = match fields.remove("arguments") {
            Some(Value::Object(arguments)) => arguments,
            _ => Map::new(),
        };
        Some(Self { name, arguments })
    }
}

/// One decoded model response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelResponse {
    #[serde(rename = "Thought", default)]
    pub thought: Option<String>,

    #[serde(rename = "Action", default)]
    pub action: Option<Action>,

    #[serde(rename = "Action Input", default)]
    pub action_input: Option<ActionInput>,

    #[serde(rename = "Observation", default)]
    pub observation: Option<Value>,

    #[serde(rename = "Final Answer", default)]
    pub final_answer: Option<String>,
}

impl ModelResponse {
    /// Decode an already-parsed JSON payload.
    ///
    /// Returns `ParleyError::Decode` only when the payload is not an object.
    /// Ill-shaped fields (an unknown `Action`, an `Action Input` without a
    /// `name`, a non-string `Thought`) decode as `None`.
    pub fn from_value(value: Value) -> ParleyResult<Self> {
        let mut fields = match value {
            Value::Object(fields) => fields,
            other => {
                return Err(ParleyError::Decode {
                    reason: format!("expected a JSON object, got {other}"),
                })
            }
        };

        Ok(Self {
            thought: take_string(&mut fields, THOUGHT),
            action: fields
                .get(ACTION)
                .and_then(Value::as_str)
                .and_then(Action::from_wire),
            action_input: fields.remove(ACTION_INPUT).and_then(ActionInput::from_value),
            observation: fields.remove(OBSERVATION).filter(|o| !o.is_null()),
            final_answer: take_string(&mut fields, FINAL_ANSWER),
        })
    }

    /// The final answer, if present and non-empty.
    pub fn answer(&self) -> Option<&str> {
        self.final_answer.as_deref().filter(|a| !a.is_empty())
    }
}

fn take_string(fields: &mut Map<String, Value>, key: &str) -> Option<String> {
    match fields.remove(key) {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}
