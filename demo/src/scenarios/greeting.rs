//! Scenario: delegated greeting.
//!
//! Agent1 owns no functions of its own; its only tool is `talk_to_agent2`.
//! Agent2 owns `say_hello`. Asked to greet Alice, Agent1 forwards the
//! request, Agent2 calls `say_hello`, and Agent2's answer comes back to
//! Agent1 as a function result.
//!
//! Both agents run against scripted completions, so the exchange is the same
//! on every run.

use serde_json::{json, Value};
use tracing::info;

use parley_contracts::error::ParleyResult;
use parley_core::{Agent, AgentConfig, AgentHandle, Function, ScriptedClient};
use parley_trace::{render_log, InMemoryTraceWriter};

pub const QUERY: &str = "Please greet Alice via Agent2.";

/// The function Agent2 exposes.
pub fn say_hello() -> Function {
    Function::new("say_hello", |args| {
        let name: String = args.get("name")?;
        Ok(json!(format!("Hello, {name}! This is Agent2.")))
    })
    .doc("Greets someone by name.")
    .param::<String>("name")
}

fn response(thought: &str, action_input: Value, observation: Value, answer: Value) -> Value {
    let action = if action_input.is_null() { "NONE" } else { "CALL_FUNCTION" };
    json!({
        "Thought": thought,
        "Action": action,
        "Action Input": action_input,
        "Observation": observation,
        "Final Answer": answer
    })
}

fn agent2_script() -> ScriptedClient {
    let client = ScriptedClient::new();
    client.push_json(&response(
        "I was asked to greet Alice. I have a function for that.",
        json!({ "name": "say_hello", "arguments": { "name": "Alice" } }),
        Value::Null,
        Value::Null,
    ));
    client.push_json(&response(
        "The greeting is ready.",
        Value::Null,
        json!("Hello, Alice! This is Agent2."),
        json!("Hello, Alice! This is Agent2."),
    ));
    client
}

fn agent1_script() -> ScriptedClient {
    let client = ScriptedClient::new();
    client.push_json(&response(
        "Agent2 can greet people. I will ask it.",
        json!({
            "name": "talk_to_agent2",
            "arguments": { "message": "Please greet Alice.", "recipient_name": "agent2" }
        }),
        Value::Null,
        Value::Null,
    ));
    client.push_json(&response(
        "Agent2 replied with the greeting.",
        Value::Null,
        json!("Hello, Alice! This is Agent2."),
        json!("Agent2 says: Hello, Alice! This is Agent2."),
    ));
    client
}

/// Build both agents with `config`, sharing one trace writer.
pub fn build_agents(config: &AgentConfig, trace: &InMemoryTraceWriter) -> ParleyResult<(AgentHandle, AgentHandle)> {
    let agent2 = Agent::builder("Agent2")
        .config(config.clone())
        .function(say_hello())
        .trace(trace.clone())
        .build(agent2_script())?;
    let agent2 = AgentHandle::new(agent2);

    let agent1 = Agent::builder("Agent1")
        .config(config.clone())
        .recipient(agent2.clone(), "can greet people by name")
        .trace(trace.clone())
        .build(agent1_script())?;

    Ok((AgentHandle::new(agent1), agent2))
}

pub fn run_scenario(config: &AgentConfig) -> ParleyResult<()> {
    println!("── Scenario: delegated greeting ───────────────────────────────");
    println!("User → Agent1: {QUERY}");
    println!();

    let trace = InMemoryTraceWriter::new();
    let (agent1, _agent2) = build_agents(config, &trace)?;

    let answer = agent1.invoke(QUERY)?;
    info!(iterations = trace.len(), "greeting scenario finished");

    println!("{}", render_log(&trace.export()));
    println!("Agent1 → User: {answer}");
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use parley_contracts::execution::IterationOutcome;
    use parley_core::AgentConfig;
    use parley_trace::InMemoryTraceWriter;

    use super::{build_agents, QUERY};

    #[test]
    fn test_greeting_flows_through_agent2() {
        let trace = InMemoryTraceWriter::new();
        let (agent1, _agent2) = build_agents(&AgentConfig::default(), &trace).unwrap();

        let answer = agent1.invoke(QUERY).unwrap();

        assert_eq!(answer, "Agent2 says: Hello, Alice! This is Agent2.");

        // Agent2 finishes both of its iterations inside Agent1's first one.
        let log = trace.export();
        let agents: Vec<&str> = log.records.iter().map(|r| r.agent.as_str()).collect();
        assert_eq!(agents, vec!["Agent2", "Agent2", "Agent1", "Agent1"]);
        match &log.records[2].outcome {
            IterationOutcome::Dispatched { function, .. } => assert_eq!(function, "talk_to_agent2"),
            other => panic!("expected Dispatched, got {:?}", other),
        }
    }
}
