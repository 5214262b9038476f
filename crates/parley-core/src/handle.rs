//! Shared handles for agents that talk to each other.
//!
//! A delegating agent holds its recipients as `Peer`s. `AgentHandle` is the
//! `Peer` for an `Agent`: it owns the agent behind `Rc<RefCell<_>>` so the
//! caller can keep using the agent directly while peers hold clones.
//!
//! A peer call runs the callee's whole loop before returning. If the callee
//! is already inside a call further up the stack (A → B → A), the handle
//! reports a dispatch error instead of re-entering it.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{info, warn};

use parley_contracts::{
    error::{ParleyError, ParleyResult},
    execution::CallOutcome,
};

use crate::{
    agent::Agent,
    recipients::recipient_function_name,
    traits::Peer,
};

#[derive(Clone)]
pub struct AgentHandle {
    name: String,
    agent: Rc<RefCell<Agent>>,
}

impl AgentHandle {
    pub fn new(agent: Agent) -> Self {
        Self {
            name: agent.name().to_string(),
            agent: Rc::new(RefCell::new(agent)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run one call on the wrapped agent.
    pub fn call(&self, user_input: &str) -> ParleyResult<CallOutcome> {
        let mut agent = self.agent.try_borrow_mut().map_err(|_| self.busy())?;
        agent.call(user_input)
    }

    /// Run one call and return the answer text, or `RETRIES_EXHAUSTED`.
    pub fn invoke(&self, user_input: &str) -> ParleyResult<String> {
        self.call(user_input).map(CallOutcome::into_text)
    }

    /// Borrow the wrapped agent, e.g. to read its transcript.
    pub fn with_agent<R>(&self, f: impl FnOnce(&Agent) -> R) -> ParleyResult<R> {
        let agent = self.agent.try_borrow().map_err(|_| self.busy())?;
        Ok(f(&agent))
    }

    fn busy(&self) -> ParleyError {
        warn!(agent = %self.name, "agent is already running a call");
        ParleyError::dispatch(
            recipient_function_name(&self.name.to_lowercase()),
            format!("agent '{}' is already running a call further up the stack", self.name),
        )
    }
}

impl Peer for AgentHandle {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&self, message: &str) -> ParleyResult<String> {
        info!(agent = %self.name, "peer call received");
        AgentHandle::invoke(self, message)
    }
}

impl std::fmt::Debug for AgentHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentHandle").field("name", &self.name).finish_non_exhaustive()
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
