//! Agent configuration.
//!
//! Every field has a default, so an empty TOML document is a valid config.
//!
//! ```toml
//! model = "gpt-4o"
//! max_iterations = 100
//! strict_validation = false
//! schema_name = "response_schema"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use parley_contracts::error::{ParleyError, ParleyResult};

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;
pub const DEFAULT_SCHEMA_NAME: &str = "response_schema";

/// Tunables for one agent's loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AgentConfig {
    /// Model identifier sent with every completion request.
    pub model: String,

    /// Retry bound: iterations allowed per call before giving up.
    pub max_iterations: u32,

    /// When true, a response that fails output-schema verification is
    /// answered with a corrective message instead of being acted on.
    pub strict_validation: bool,

    /// Name the output schema is registered under in requests.
    pub schema_name: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            strict_validation: false,
            schema_name: DEFAULT_SCHEMA_NAME.to_string(),
        }
    }
}

impl AgentConfig {
    /// Parse `s` as TOML.
    ///
    /// Returns `ParleyError::Config` if the TOML is malformed, names an
    /// unknown field, or fails `validate`.
    pub fn from_toml_str(s: &str) -> ParleyResult<Self> {
        let config: AgentConfig = toml::from_str(s).map_err(|e| ParleyError::Config {
            reason: format!("failed to parse agent config TOML: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read the file at `path` and parse it as TOML.
    pub fn from_file(path: &Path) -> ParleyResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ParleyError::Config {
            reason: format!("failed to read agent config '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Reject values the loop cannot run with.
    pub fn validate(&self) -> ParleyResult<()> {
        if self.max_iterations == 0 {
            return Err(ParleyError::Config {
                reason: "max_iterations must be at least 1".to_string(),
            });
        }
        if self.model.trim().is_empty() {
            return Err(ParleyError::Config {
                reason: "model must not be empty".to_string(),
            });
        }
        if self.schema_name.trim().is_empty() {
            return Err(ParleyError::Config {
                reason: "schema_name must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use parley_contracts::error::ParleyError;

    use super::{AgentConfig, DEFAULT_MAX_ITERATIONS, DEFAULT_MODEL};

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = AgentConfig::from_toml_str("").unwrap();
        assert_eq!(config, AgentConfig::default());
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_iterations, DEFAULT_MAX_ITERATIONS);
        assert!(!config.strict_validation);
    }

    #[test]
    fn test_partial_document_overrides() {
        let config = AgentConfig::from_toml_str(
            r#"
            model = "gpt-4o-mini"
            max_iterations = 5
            strict_validation = true
            "#,
        )
        .unwrap();

        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.max_iterations, 5);
        assert!(config.strict_validation);
        assert_eq!(config.schema_name, "response_schema");
    }

    #[test]
    fn test_zero_iterations_rejected() {
        match AgentConfig::from_toml_str("max_iterations = 0") {
            Err(ParleyError::Config { reason }) => assert!(reason.contains("max_iterations")),
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_field_rejected() {
        match AgentConfig::from_toml_str("max_retries = 3") {
            Err(ParleyError::Config { reason }) => {
                assert!(reason.contains("failed to parse agent config TOML"), "got: {reason}");
            }
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_toml_rejected() {
        assert!(matches!(
            AgentConfig::from_toml_str("this is ][ not toml"),
            Err(ParleyError::Config { .. })
        ));
    }

    #[test]
    fn test_missing_file_rejected() {
        let result = AgentConfig::from_file(std::path::Path::new("/definitely/not/here.toml"));
        match result {
            Err(ParleyError::Config { reason }) => assert!(reason.contains("failed to read")),
            other => panic!("expected Config error, got {:?}", other),
        }
    }
}
