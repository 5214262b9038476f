//! # parley-core
//!
//! The reason-and-act runtime for PARLEY agents.
//!
//! This crate provides:
//! - The trait seams (`CompletionClient`, `Peer`, `TraceWriter`)
//! - The `FunctionRegistry` and recipient registration (`talk_to_<peer>`)
//! - The `Agent` loop and its builder
//! - `AgentHandle`, the shared `Peer` form of an agent
//! - `ScriptedClient`, an offline completion client
//!
//! ## Usage
//!
//! ```rust,ignore
//! use parley_core::{Agent, AgentHandle, Function, ScriptedClient};
//!
//! let helper = AgentHandle::new(Agent::builder("Helper").function(say_hello).build(client)?);
//! let mut lead = Agent::builder("Lead")
//!     .recipient(helper, "can greet people by name")
//!     .build(other_client)?;
//! let answer = lead.invoke("Greet Alice")?;
//! ```

pub mod agent;
pub mod config;
pub mod handle;
pub mod prompt;
pub mod recipients;
pub mod registry;
pub mod scripted;
pub mod traits;

pub use agent::{Agent, AgentBuilder};
pub use config::AgentConfig;
pub use handle::AgentHandle;
pub use registry::{Arguments, Function, FunctionRegistry};
pub use scripted::ScriptedClient;
