//! An offline completion client that replays queued payloads.
//!
//! Used by tests and the demo. Clones share the same script and request
//! log, so a caller can keep a handle for inspection after moving a clone
//! into an agent.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use serde_json::Value;

use parley_contracts::{
    error::{ParleyError, ParleyResult},
    message::Message,
};

use crate::traits::{CompletionClient, CompletionRequest};

/// A request as the scripted client saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub model: String,
    pub messages: Vec<Message>,
    /// The full rendered request body.
    pub body: Value,
}

#[derive(Debug, Default)]
struct Script {
    replies: VecDeque<String>,
    fallback: Option<String>,
    requests: Vec<RecordedRequest>,
}

/// Replays queued replies in order, then the fallback reply (if any).
#[derive(Debug, Clone, Default)]
pub struct ScriptedClient {
    script: Rc<RefCell<Script>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// A client that will answer with `replies`, in order.
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let client = Self::new();
        for reply in replies {
            client.push_reply(reply);
        }
        client
    }

    /// Queue a raw payload.
    pub fn push_reply(&self, reply: impl Into<String>) {
        self.script.borrow_mut().replies.push_back(reply.into());
    }

    /// Queue a JSON payload.
    pub fn push_json(&self, reply: &Value) {
        self.push_reply(reply.to_string());
    }

    /// Reply with `reply` whenever the queue is empty.
    pub fn repeat(&self, reply: impl Into<String>) {
        self.script.borrow_mut().fallback = Some(reply.into());
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.script.borrow().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.script.borrow().requests.len()
    }

    /// Replies still queued (the fallback is not counted).
    pub fn remaining(&self) -> usize {
        self.script.borrow().replies.len()
    }
}

impl CompletionClient for ScriptedClient {
    fn complete(&self, request: &CompletionRequest<'_>) -> ParleyResult<String> {
        let mut script = self.script.borrow_mut();
        script.requests.push(RecordedRequest {
            model: request.model.to_string(),
            messages: request.messages.to_vec(),
            body: request.to_body(),
        });

        match script.replies.pop_front() {
            Some(reply) => Ok(reply),
            None => script.fallback.clone().ok_or_else(|| ParleyError::Completion {
                reason: "scripted client has no replies left".to_string(),
            }),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
