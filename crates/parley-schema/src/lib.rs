//! # parley-schema
//!
//! Schema generation and verification for PARLEY agents.
//!
//! The pipeline runs once per agent, at construction:
//!
//! 1. [`mapper::map_type`] turns a `TypeDescriptor` into a schema fragment.
//! 2. [`extract::extract_schema`] turns function signatures into
//!    `ToolDefinition`s.
//! 3. [`response::build_response_schema`] turns tool definitions into the
//!    output schema every model response must satisfy.
//! 4. [`verify::ResponseVerifier`] compiles that schema for checking
//!    responses inside the loop.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use parley_schema::{extract_schema, build_response_schema, ResponseVerifier};
//!
//! let tools = extract_schema(&signatures)?;
//! let schema = build_response_schema(&tools);
//! let verifier = ResponseVerifier::new(&schema)?;
//! ```

pub mod extract;
pub mod mapper;
pub mod response;
pub mod verify;

pub use extract::extract_schema;
pub use mapper::map_type;
pub use response::build_response_schema;
pub use verify::ResponseVerifier;
