//! # parley-trace
//!
//! Append-only iteration trace for PARLEY agents.
//!
//! ## Overview
//!
//! Every iteration an agent runs produces an `IterationRecord`: the decoded
//! model response plus what the loop did with it. Attaching a writer from
//! this crate keeps those records for later inspection, and the `render`
//! helpers print them as labelled blocks.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use parley_trace::{InMemoryTraceWriter, render_log};
//!
//! let trace = InMemoryTraceWriter::new();
//! let mut agent = Agent::builder("Agent1").trace(trace.clone()).build(client)?;
//! agent.invoke("Greet Alice")?;
//!
//! println!("{}", render_log(&trace.export()));
//! ```

pub mod memory;
pub mod render;

pub use memory::{InMemoryTraceWriter, TraceLog};
pub use render::{render_log, render_record, render_response};

// ── Tests ────────────────────────────────────────────────────────────────────
