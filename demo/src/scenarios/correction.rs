//! Scenario: a model that never settles.
//!
//! The scripted model first calls a function that does not exist, then
//! keeps replying with neither an action nor an answer. Each reply is fed
//! back (an error payload, then corrective messages) until the iteration
//! bound runs out and the caller gets the exhaustion sentinel.

use serde_json::json;

use parley_contracts::error::ParleyResult;
use parley_core::{Agent, AgentConfig, ScriptedClient};
use parley_trace::{render_log, InMemoryTraceWriter};

use super::greeting::say_hello;

/// Iteration bound used when the configured one would make the log long.
pub const SHORT_BOUND: u32 = 4;

fn script() -> ScriptedClient {
    let client = ScriptedClient::new();
    client.push_json(&json!({
        "Thought": "Maybe there is a wave function.",
        "Action": "CALL_FUNCTION",
        "Action Input": { "name": "wave_hello", "arguments": {} },
        "Observation": null,
        "Final Answer": null
    }));
    client.repeat(
        json!({
            "Thought": "I am not sure what to do.",
            "Action": "NONE",
            "Action Input": null,
            "Observation": null,
            "Final Answer": null
        })
        .to_string(),
    );
    client
}

/// Run the scenario and return the caller-facing text.
pub fn run(config: &AgentConfig, trace: &InMemoryTraceWriter) -> ParleyResult<String> {
    let config = AgentConfig {
        max_iterations: config.max_iterations.min(SHORT_BOUND),
        ..config.clone()
    };
    let mut agent = Agent::builder("Wanderer")
        .config(config)
        .function(say_hello())
        .trace(trace.clone())
        .build(script())?;

    agent.invoke("Wave at Bob.")
}

pub fn run_scenario(config: &AgentConfig) -> ParleyResult<()> {
    println!("── Scenario: correction and exhaustion ────────────────────────");
    println!();

    let trace = InMemoryTraceWriter::new();
    let text = run(config, &trace)?;

    println!("{}", render_log(&trace.export()));
    println!("Wanderer → User: {text}");
    println!();
    Ok(())
}
