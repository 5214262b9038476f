//! Structural verification of decoded model responses.
//!
//! The provider contract promises schema-conforming payloads when strict mode
//! is honoured, but the loop checks anyway: the report is logged, and in
//! strict-validation mode a failing report is handed back to the model as a
//! correction instead of being acted on.

use serde_json::Value;
use tracing::{debug, warn};

use parley_contracts::{
    error::{ParleyError, ParleyResult},
    verify::{VerificationFailure, VerificationReport},
};

/// A compiled output schema.
pub struct ResponseVerifier {
    validator: jsonschema::Validator,
}

impl ResponseVerifier {
    /// Compile `schema` once.
    ///
    /// An invalid schema document is a `ParleyError::SchemaBuild`; it can
    /// only come from a bug in schema construction, so it surfaces at agent
    /// construction rather than mid-loop.
    pub fn new(schema: &Value) -> ParleyResult<Self> {
        let validator = jsonschema::validator_for(schema).map_err(|e| ParleyError::SchemaBuild {
            reason: format!("invalid output schema: {e}"),
        })?;
        Ok(Self { validator })
    }

    /// Check `payload` and collect every violation.
    pub fn verify(&self, payload: &Value) -> VerificationReport {
        let failures: Vec<VerificationFailure> = self
            .validator
            .iter_errors(payload)
            .map(|error| {
                let failure = VerificationFailure {
                    path: error.instance_path.to_string(),
                    message: error.to_string(),
                };
                warn!(path = %failure.path, message = %failure.message, "response schema violation");
                failure
            })
            .collect();

        let passed = failures.is_empty();
        debug!(passed, failure_count = failures.len(), "response verification complete");

        VerificationReport { passed, failures }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
