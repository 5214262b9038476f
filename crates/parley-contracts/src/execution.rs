//! Per-iteration and per-call results, plus the trace record.
//!
//! `IterationOutcome` is what one pass through the loop produced.
//! `CallOutcome` is what a whole `call` produced.
//! `IterationRecord` is what gets written to a trace writer, one per iteration.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::response::ModelResponse;

/// Returned as text by `invoke` when the iteration bound is reached.
pub const RETRIES_EXHAUSTED: &str = "Error: Maximum retries reached.";

/// Identifies one `call` on one agent. Stamped on every trace record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallId(pub uuid::Uuid);

impl CallId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for CallId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// How one loop iteration ended.
///
/// - `Answered` → the call terminates with `answer`
/// - `Dispatched` → a function ran; its result is in the transcript
/// - `Corrected` → the response was unusable; a corrective system message
///   was appended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IterationOutcome {
    Answered {
        answer: String,
    },
    Dispatched {
        function: String,
        /// The function's result, or its `{"error": ...}` payload.
        result: Value,
    },
    Corrected {
        /// The corrective instruction sent to the model.
        reason: String,
    },
}

/// How a whole call ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    /// The model produced a final answer.
    Answered(String),
    /// The iteration bound was reached without a final answer.
    RetriesExhausted { iterations: u32 },
}

impl CallOutcome {
    /// The caller-facing text: the answer, or `RETRIES_EXHAUSTED`.
    pub fn into_text(self) -> String {
        match self {
            CallOutcome::Answered(answer) => answer,
            CallOutcome::RetriesExhausted { .. } => RETRIES_EXHAUSTED.to_string(),
        }
    }
}

/// An immutable record of one loop iteration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IterationRecord {
    pub call_id: CallId,
    /// Name of the agent that ran the iteration.
    pub agent: String,
    /// Zero-based position within the call.
    pub iteration: u32,
    /// The decoded model response.
    pub response: ModelResponse,
    pub outcome: IterationOutcome,
    /// Wall-clock time the record was created (UTC).
    pub timestamp: DateTime<Utc>,
}
