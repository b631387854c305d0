//! Process-wide configuration.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classify::MatchPolicy;
use crate::error::{FaultlineError, FaultlineResult};
use crate::ledger::{ContextLedger, DEFAULT_LEDGER_CAPACITY};

/// Configuration for failure classification and rendering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaultlineConfig {
    /// Number of `(context, cause)` pairs the global ledger retains.
    pub ledger_capacity: usize,
    /// Rule order used by tables built from this config.
    pub match_policy: MatchPolicy,
    /// Emit a debug event for every classification decision.
    pub trace_classification: bool,
}

impl Default for FaultlineConfig {
    fn default() -> Self {
        Self {
            ledger_capacity: DEFAULT_LEDGER_CAPACITY,
            match_policy: MatchPolicy::RuleOrder,
            trace_classification: true,
        }
    }
}

impl FaultlineConfig {
    /// Parse and validate a JSON document. Missing keys take their defaults.
    pub fn from_json(json: &str) -> FaultlineResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> FaultlineResult<()> {
        if self.ledger_capacity == 0 {
            return Err(FaultlineError::InvalidConfig(
                "ledger_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Validate, then resize the global ledger.
    pub fn apply(&self) -> FaultlineResult<()> {
        self.validate()?;
        ContextLedger::global().set_capacity(self.ledger_capacity);
        debug!(
            ledger_capacity = self.ledger_capacity,
            match_policy = ?self.match_policy,
            "Applied faultline configuration"
        );
        Ok(())
    }
}
