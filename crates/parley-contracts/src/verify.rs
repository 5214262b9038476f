//! Response verification report types.
//!
//! The verifier checks every decoded model response against the agent's
//! output schema and returns a report. Whether a failing report blocks the
//! iteration is decided by the loop's configuration.

use serde::{Deserialize, Serialize};

/// The result of checking one response against the output schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// True only if there are no failures.
    pub passed: bool,
    /// Every violation found, in validator order. Empty on pass.
    pub failures: Vec<VerificationFailure>,
}

impl VerificationReport {
    /// All failures joined into one line, for logs and corrective messages.
    pub fn summary(&self) -> String {
        self.failures
            .iter()
            .map(|f| format!("{}: {}", f.path, f.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// A single schema violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationFailure {
    /// JSON pointer to the offending value ("" for the root).
    pub path: String,
    pub message: String,
}
