//! Offline demo scenarios.
//!
//! Each scenario wires real PARLEY agents to scripted completions and
//! prints the rendered iteration trace.

pub mod correction;
pub mod greeting;
