//! Error types for the PARLEY harness.
//!
//! Every fallible operation returns `ParleyResult<T>`. Which variants are
//! fatal depends on where they surface: schema errors abort agent
//! construction, decode and completion errors abort one call, and dispatch
//! errors never leave the loop (they are fed back to the model as data).

use thiserror::Error;

/// The unified error type for the PARLEY crates.
#[derive(Debug, Error)]
pub enum ParleyError {
    /// A type descriptor has no schema mapping.
    #[error("unsupported type: {type_name}")]
    UnsupportedType { type_name: String },

    /// The tool or response schema could not be built or compiled.
    #[error("schema build failed: {reason}")]
    SchemaBuild { reason: String },

    /// A function call requested by the model could not be completed.
    ///
    /// The loop converts this into an `{"error": ...}` payload; it is only
    /// observed directly by code that calls a `Function` by hand.
    #[error("dispatch of '{function}' failed: {reason}")]
    Dispatch { function: String, reason: String },

    /// The completion payload was not a decodable model response.
    #[error("could not decode model response: {reason}")]
    Decode { reason: String },

    /// The completion client failed to produce a payload.
    #[error("completion request failed: {reason}")]
    Completion { reason: String },

    /// A configuration value is missing, invalid, or inconsistent.
    #[error("configuration error: {reason}")]
    Config { reason: String },
}

impl ParleyError {
    /// Shorthand for a dispatch failure attributed to `function`.
    pub fn dispatch(function: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Dispatch {
            function: function.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout the PARLEY crates.
pub type ParleyResult<T> = Result<T, ParleyError>;
