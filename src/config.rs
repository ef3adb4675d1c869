//! Resolver configuration.
//!
//! Policy knobs for board validation and the claim table.  The defaults are
//! what the built-in profiles are checked with; `boardcheck --config` loads
//! an override from JSON.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// How a questionable-but-legal finding is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    /// Record it, say nothing.
    Allow,
    /// Record it and log a warning.
    Warn,
    /// Fail validation.
    Deny,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Two declared aliases in one namespace naming the same resource.
    pub shared_targets: Policy,
    /// The same alias declared twice with the same target.  `allow` and
    /// `warn` keep one copy.
    pub redefinitions: Policy,
    /// Also audit catalog entries the board never references.
    pub audit_catalog: bool,
    /// Cap on concurrent claims on one line (only independent roles stack).
    pub max_claims_per_line: u8,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            shared_targets: Policy::Warn,
            redefinitions: Policy::Deny,
            audit_catalog: false,
            max_claims_per_line: 4,
        }
    }
}

impl ResolverConfig {
    /// Strictest settings: every finding is an error.
    pub fn strict() -> Self {
        Self {
            shared_targets: Policy::Deny,
            redefinitions: Policy::Deny,
            audit_catalog: true,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.max_claims_per_line == 0 {
            return Err(Error::Config("max_claims_per_line must be at least 1"));
        }
        Ok(())
    }

    /// Parse and validate a JSON document.
    pub fn from_json(text: &str) -> Result<Self, Error> {
        let config: Self =
            serde_json::from_str(text).map_err(|_| Error::Config("malformed resolver config"))?;
        config.validate()?;
        Ok(config)
    }
}
