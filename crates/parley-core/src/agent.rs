//! The reason-and-act loop.
//!
//! Each iteration walks the same states:
//!
//!   AwaitingModel → ParsingResponse → Dispatching | Terminating
//!
//! 1. Send the whole transcript to the completion client, constrained to the
//!    agent's output schema, and append the raw reply as an assistant message
//! 2. Verify the reply against the schema and decode it. A payload that is
//!    not a JSON object ends the call, unless strict validation is on, in
//!    which case it is corrected like any other schema violation
//! 3. A non-empty `Final Answer` terminates the call
//! 4. Otherwise a present `Action Input` is dispatched through the registry
//!    and its JSON result appended as a function message
//! 5. Otherwise a corrective system message is appended
//!
//! Steps 3–5 each count as one iteration against `max_iterations`. Running
//! out of iterations is not an error: the call reports
//! `CallOutcome::RetriesExhausted`.

use std::rc::Rc;

use chrono::Utc;
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

use parley_contracts::{
    error::{ParleyError, ParleyResult},
    execution::{CallId, CallOutcome, IterationOutcome, IterationRecord},
    message::Message,
    response::ModelResponse,
    tool::ToolDefinition,
};
use parley_schema::{build_response_schema, extract_schema, ResponseVerifier};

use crate::{
    config::AgentConfig,
    prompt::{generate_system_prompt, PromptParts},
    recipients::{register_recipients, Recipient},
    registry::{Function, FunctionRegistry},
    traits::{CompletionClient, CompletionRequest, Peer, TraceWriter},
};

/// Appended when a response has neither an action nor an answer.
pub const MISSING_ACTION_AND_ANSWER: &str =
    "Action Input and Final Answer can't be null simultaneously";

/// Prefix of the corrective message sent for schema violations in
/// strict-validation mode.
pub const SCHEMA_VIOLATION: &str = "Your last response did not match the required schema";

/// A single agent: its functions, its schema, and its transcript.
///
/// Construct with [`Agent::builder`]. The registry, tool definitions, and
/// output schema are fixed at construction; only the transcript grows.
pub struct Agent {
    name: String,
    config: AgentConfig,
    registry: FunctionRegistry,
    recipients: Vec<String>,
    tools: Vec<ToolDefinition>,
    system_prompt: String,
    response_schema: Value,
    verifier: ResponseVerifier,
    transcript: Vec<Message>,
    client: Box<dyn CompletionClient>,
    trace: Option<Box<dyn TraceWriter>>,
    call_id: CallId,
    iteration: u32,
}

impl Agent {
    pub fn builder(name: impl Into<String>) -> AgentBuilder {
        AgentBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Tool definitions in registry order.
    pub fn tools(&self) -> &[ToolDefinition] {
        &self.tools
    }

    /// Identities of the registered recipients.
    pub fn recipients(&self) -> &[String] {
        &self.recipients
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn response_schema(&self) -> &Value {
        &self.response_schema
    }

    /// Every message so far, system prompt first.
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// Run one call to completion and return the final answer text, or
    /// `RETRIES_EXHAUSTED` if the iteration bound was reached.
    pub fn invoke(&mut self, user_input: &str) -> ParleyResult<String> {
        self.call(user_input).map(CallOutcome::into_text)
    }

    /// Run one call to completion.
    ///
    /// # Errors
    ///
    /// `Decode` and `Completion` errors end the call immediately. Dispatch
    /// failures and malformed responses never surface here; they are fed
    /// back to the model.
    pub fn call(&mut self, user_input: &str) -> ParleyResult<CallOutcome> {
        self.call_id = CallId::new();
        self.transcript.push(Message::user(user_input));

        info!(agent = %self.name, call_id = %self.call_id, "call started");

        for iteration in 0..self.config.max_iterations {
            self.iteration = iteration;
            if let IterationOutcome::Answered { answer } = self.step()? {
                info!(
                    agent = %self.name,
                    call_id = %self.call_id,
                    iterations = iteration + 1,
                    "call answered"
                );
                return Ok(CallOutcome::Answered(answer));
            }
        }

        warn!(
            agent = %self.name,
            call_id = %self.call_id,
            max_iterations = self.config.max_iterations,
            "iteration bound reached without a final answer"
        );
        Ok(CallOutcome::RetriesExhausted {
            iterations: self.config.max_iterations,
        })
    }

    /// Run exactly one iteration against the current transcript.
    pub fn step(&mut self) -> ParleyResult<IterationOutcome> {
        // ── AwaitingModel ────────────────────────────────────────────────────
        let request = CompletionRequest {
            model: &self.config.model,
            messages: &self.transcript,
            schema_name: &self.config.schema_name,
            schema: &self.response_schema,
        };
        debug!(
            agent = %self.name,
            iteration = self.iteration,
            messages = self.transcript.len(),
            "requesting completion"
        );
        let payload = self.client.complete(&request)?;
        self.transcript.push(Message::assistant(payload.as_str()));

        // ── ParsingResponse ──────────────────────────────────────────────────
        let value: Value = serde_json::from_str(&payload).map_err(|e| {
            warn!(agent = %self.name, iteration = self.iteration, error = %e, "undecodable model payload");
            ParleyError::Decode { reason: e.to_string() }
        })?;
        let report = self.verifier.verify(&value);
        let strict_failure = self.config.strict_validation && !report.passed;
        let response = match ModelResponse::from_value(value) {
            Ok(response) => response,
            Err(_) if strict_failure => ModelResponse::default(),
            Err(e) => return Err(e),
        };
        self.log_response(&response);

        // ── Terminating | Dispatching | correction ───────────────────────────
        let outcome = if strict_failure {
            self.correct(format!("{SCHEMA_VIOLATION}: {}", report.summary()))
        } else if let Some(answer) = response.answer() {
            IterationOutcome::Answered {
                answer: answer.to_string(),
            }
        } else if let Some(call) = &response.action_input {
            let result = self.call_function(&call.name, call.arguments.clone());
            self.transcript
                .push(Message::function(call.name.as_str(), result.to_string()));
            IterationOutcome::Dispatched {
                function: call.name.clone(),
                result,
            }
        } else {
            self.correct(MISSING_ACTION_AND_ANSWER.to_string())
        };

        self.record(response, &outcome);
        Ok(outcome)
    }

    /// Execute a registered function.
    ///
    /// Never fails: an unknown name or a failing function yields an
    /// `{"error": ...}` object the model can read and react to.
    pub fn call_function(&self, name: &str, arguments: Map<String, Value>) -> Value {
        let Some(function) = self.registry.get(name) else {
            warn!(agent = %self.name, function = %name, "model requested an unknown function");
            return json!({ "error": format!("Unknown function '{name}'") });
        };

        debug!(agent = %self.name, function = %name, "dispatching function");
        match function.call(arguments) {
            Ok(result) => result,
            Err(e) => {
                warn!(agent = %self.name, function = %name, error = %e, "function call failed");
                json!({ "error": e.to_string() })
            }
        }
    }

    fn correct(&mut self, reason: String) -> IterationOutcome {
        warn!(agent = %self.name, iteration = self.iteration, %reason, "correcting model response");
        self.transcript.push(Message::system(reason.as_str()));
        IterationOutcome::Corrected { reason }
    }

    fn log_response(&self, response: &ModelResponse) {
        let action_input = response
            .action_input
            .as_ref()
            .map(|call| json!({ "name": call.name, "arguments": call.arguments }).to_string())
            .unwrap_or_else(|| "-".to_string());
        let observation = response
            .observation
            .as_ref()
            .filter(|o| !o.is_null())
            .map(Value::to_string)
            .unwrap_or_else(|| "-".to_string());

        info!(
            agent = %self.name,
            call_id = %self.call_id,
            iteration = self.iteration,
            thought = response.thought.as_deref().unwrap_or("-"),
            action = response.action.map(|a| a.as_str()).unwrap_or("-"),
            action_input = %action_input,
            observation = %observation,
            final_answer = response.final_answer.as_deref().unwrap_or("-"),
            "model response"
        );
    }

    fn record(&self, response: ModelResponse, outcome: &IterationOutcome) {
        let Some(trace) = &self.trace else {
            return;
        };
        let record = IterationRecord {
            call_id: self.call_id,
            agent: self.name.clone(),
            iteration: self.iteration,
            response,
            outcome: outcome.clone(),
            timestamp: Utc::now(),
        };
        if let Err(e) = trace.write(&record) {
            warn!(agent = %self.name, error = %e, "trace write failed");
        }
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("tools", &self.tools.len())
            .field("recipients", &self.recipients)
            .field("transcript", &self.transcript.len())
            .finish_non_exhaustive()
    }
}

/// Collects an agent's parts; `build` derives the schemas.
pub struct AgentBuilder {
    name: String,
    config: AgentConfig,
    functions: Vec<Function>,
    recipients: Vec<Recipient>,
    system_prompt: Option<String>,
    examples: Option<String>,
    additional_instructions: Option<String>,
    trace: Option<Box<dyn TraceWriter>>,
}

impl AgentBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: AgentConfig::default(),
            functions: Vec::new(),
            recipients: Vec::new(),
            system_prompt: None,
            examples: None,
            additional_instructions: None,
            trace: None,
        }
    }

    pub fn config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    pub fn function(mut self, function: Function) -> Self {
        self.functions.push(function);
        self
    }

    /// Register `peer` as a recipient, described to the model as
    /// "Ask <peer>, which <description>."
    pub fn recipient(mut self, peer: impl Peer + 'static, description: impl Into<String>) -> Self {
        self.recipients.push((Rc::new(peer), description.into()));
        self
    }

    /// Use `prompt` verbatim instead of generating one.
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn examples(mut self, examples: impl Into<String>) -> Self {
        self.examples = Some(examples.into());
        self
    }

    pub fn additional_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.additional_instructions = Some(instructions.into());
        self
    }

    pub fn trace(mut self, writer: impl TraceWriter + 'static) -> Self {
        self.trace = Some(Box::new(writer));
        self
    }

    /// Register recipients, extract tool definitions, build the output
    /// schema, and seed the transcript with the system prompt.
    ///
    /// # Errors
    ///
    /// `UnsupportedType` if a parameter type has no schema, `Config` for an
    /// invalid config or colliding recipients.
    pub fn build(self, client: impl CompletionClient + 'static) -> ParleyResult<Agent> {
        self.config.validate()?;

        let mut registry = FunctionRegistry::new();
        for function in self.functions {
            registry.register(function);
        }
        // Recipients must be in the registry before extraction.
        let recipients = register_recipients(&mut registry, self.recipients)?;

        let tools = extract_schema(registry.signatures())?;
        let response_schema = build_response_schema(&tools);
        let verifier = ResponseVerifier::new(&response_schema)?;

        let system_prompt = match self.system_prompt {
            Some(prompt) => prompt,
            None => generate_system_prompt(
                &tools,
                &PromptParts {
                    additional_instructions: self.additional_instructions.as_deref(),
                    examples: self.examples.as_deref(),
                },
                Utc::now().date_naive(),
            )?,
        };

        info!(
            agent = %self.name,
            tools = tools.len(),
            recipients = recipients.len(),
            "agent constructed"
        );

        Ok(Agent {
            name: self.name,
            config: self.config,
            registry,
            recipients,
            tools,
            transcript: vec![Message::system(system_prompt.as_str())],
            system_prompt,
            response_schema,
            verifier,
            client: Box::new(client),
            trace: self.trace,
            call_id: CallId::new(),
            iteration: 0,
        })
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
