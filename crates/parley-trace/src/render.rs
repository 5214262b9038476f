//! Human-readable rendering of model responses and trace logs.

use std::fmt::Write;

use serde_json::{json, Value};

use parley_contracts::{
    execution::{IterationOutcome, IterationRecord},
    response::{Action, ModelResponse, ACTION, ACTION_INPUT, FINAL_ANSWER, OBSERVATION, THOUGHT},
};

use crate::memory::TraceLog;

const PLACEHOLDER: &str = "-";
const LABEL_WIDTH: usize = 14;

/// Render the five response fields as a labelled block, one per line.
///
/// Absent values, a `NONE` action, and a null observation render as `-`.
pub fn render_response(response: &ModelResponse) -> String {
    let action = match response.action {
        Some(Action::CallFunction) => Action::CallFunction.as_str(),
        Some(Action::None) | None => PLACEHOLDER,
    };
    let action_input = response
        .action_input
        .as_ref()
        .map(|call| json!({ "name": call.name, "arguments": call.arguments }).to_string());
    let observation = response.observation.as_ref().and_then(display_value);

    let fields = [
        (THOUGHT, response.thought.clone()),
        (ACTION, Some(action.to_string())),
        (ACTION_INPUT, action_input),
        (OBSERVATION, observation),
        (FINAL_ANSWER, response.final_answer.clone().filter(|a| !a.is_empty())),
    ];

    let mut out = String::new();
    for (label, value) in fields {
        let value = value.unwrap_or_else(|| PLACEHOLDER.to_string());
        let _ = writeln!(out, "{:<width$}{}", format!("{label}:"), value, width = LABEL_WIDTH);
    }
    out
}

/// Render one iteration: a header line, the response block, and the outcome.
pub fn render_record(record: &IterationRecord) -> String {
    let mut out = format!(
        "── {} · call {} · iteration {} ──\n",
        record.agent, record.call_id, record.iteration
    );
    out.push_str(&render_response(&record.response));

    let outcome = match &record.outcome {
        IterationOutcome::Answered { answer } => format!("answered: {answer}"),
        IterationOutcome::Dispatched { function, result } => {
            format!("dispatched {function} → {result}")
        }
        IterationOutcome::Corrected { reason } => format!("corrected: {reason}"),
    };
    let _ = writeln!(out, "{:<width$}{}", "Outcome:", outcome, width = LABEL_WIDTH);
    out
}

/// Render every record in the log, separated by blank lines.
pub fn render_log(log: &TraceLog) -> String {
    log.records
        .iter()
        .map(render_record)
        .collect::<Vec<_>>()
        .join("\n")
}

fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
