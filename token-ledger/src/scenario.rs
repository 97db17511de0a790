//! Scripted call sequences
//!
//! A scenario is a TOML list of steps, each an [`Operation`] with its caller
//! and optionally the error kind the step is expected to fail with:
//!
//! ```toml
//! [[steps]]
//! caller = "0x0101010101010101010101010101010101010101"
//! operation = { op = "pause" }
//!
//! [[steps]]
//! caller = "0x0101010101010101010101010101010101010101"
//! operation = { op = "transfer", to = "0xa1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1", amount = 100 }
//! expect_error = "enforced_pause"
//! ```

use crate::ops::{Operation, Outcome};
use crate::token::Token;
use crate::types::Address;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Ordered list of steps
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scenario {
    /// Steps in execution order
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// One call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    /// Who makes the call
    pub caller: Address,
    /// What is called
    pub operation: Operation,
    /// Expected `Error::kind()`, if the step should fail
    #[serde(default)]
    pub expect_error: Option<String>,
}

/// What happened to one step
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    /// Position in the scenario
    pub index: usize,
    /// Caller
    pub caller: Address,
    /// Operation name
    pub operation: &'static str,
    /// Outcome on success
    pub outcome: Option<Outcome>,
    /// Error kind on failure
    pub error: Option<&'static str>,
    /// Whether the result matched `expect_error`
    pub as_expected: bool,
}

/// Result of a whole run
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScenarioReport {
    /// Per-step results
    pub steps: Vec<StepReport>,
}

impl ScenarioReport {
    /// Steps whose result did not match the expectation
    pub fn unexpected(&self) -> impl Iterator<Item = &StepReport> {
        self.steps.iter().filter(|step| !step.as_expected)
    }

    /// True if every step behaved as expected
    pub fn all_as_expected(&self) -> bool {
        self.unexpected().next().is_none()
    }
}

impl Scenario {
    /// Parse from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(format!("Failed to parse scenario: {}", e)))
    }

    /// Load from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Run every step against `token`. Failing steps do not stop the run.
    pub fn run(&self, token: &mut Token) -> ScenarioReport {
        let mut report = ScenarioReport::default();

        for (index, step) in self.steps.iter().enumerate() {
            let result = token.execute(step.caller, &step.operation);
            let (outcome, error) = match result {
                Ok(outcome) => (Some(outcome), None),
                Err(e) => (None, Some(e.kind())),
            };

            let as_expected = error == step.expect_error.as_deref();
            if as_expected {
                info!(
                    index,
                    caller = %step.caller,
                    operation = step.operation.name(),
                    error = error.unwrap_or("none"),
                    "Step completed"
                );
            } else {
                warn!(
                    index,
                    caller = %step.caller,
                    operation = step.operation.name(),
                    error = error.unwrap_or("none"),
                    expected = step.expect_error.as_deref().unwrap_or("none"),
                    "Step did not behave as expected"
                );
            }

            report.steps.push(StepReport {
                index,
                caller: step.caller,
                operation: step.operation.name(),
                outcome,
                error,
                as_expected,
            });
        }

        report
    }
}
