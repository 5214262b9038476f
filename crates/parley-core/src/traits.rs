//! Trait seams of the PARLEY loop.
//!
//! - `CompletionClient`: the model endpoint (external, untrusted output)
//! - `Peer`: another agent reachable through `invoke`
//! - `TraceWriter`: optional sink for per-iteration records
//!
//! Everything runs on one thread: a loop blocks on the client, and a
//! recipient call blocks until the peer's own loop finishes. None of these
//! traits require `Send` or `Sync`.

use serde_json::{json, Value};

use parley_contracts::{
    error::ParleyResult,
    execution::IterationRecord,
    message::Message,
};

/// One structured-output completion request.
///
/// Borrowed from the agent for the duration of a single `complete` call.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    /// Model identifier (e.g. "gpt-4o").
    pub model: &'a str,
    /// The full transcript so far, system message first.
    pub messages: &'a [Message],
    /// Name the schema is registered under in the request.
    pub schema_name: &'a str,
    /// The agent's output schema.
    pub schema: &'a Value,
}

impl CompletionRequest<'_> {
    /// Render the chat-completions request body with a strict JSON-schema
    /// response format.
    pub fn to_body(&self) -> Value {
        json!({
            "model": self.model,
            "messages": self.messages,
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": self.schema_name,
                    "schema": self.schema,
                    "strict": true
                }
            }
        })
    }
}

/// The completion endpoint.
///
/// Implementations perform the network exchange and return the raw textual
/// payload of the first choice. The loop decodes it; a transport failure
/// should be reported as `ParleyError::Completion`.
pub trait CompletionClient {
    fn complete(&self, request: &CompletionRequest<'_>) -> ParleyResult<String>;
}

/// Another agent, seen only through its top-level entry point.
pub trait Peer {
    /// Display name. Its lowercase form is the peer's identity.
    fn name(&self) -> &str;

    /// Run the peer's loop on `message` and return its answer text.
    fn invoke(&self, message: &str) -> ParleyResult<String>;
}

/// A sink for iteration records.
///
/// Tracing is diagnostic: the loop logs and ignores a failed write rather
/// than aborting the call.
pub trait TraceWriter {
    fn write(&self, record: &IterationRecord) -> ParleyResult<()>;
}
