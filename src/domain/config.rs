// ============================================================================
// Exchange Configuration
// ============================================================================

use super::AccountId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for creating an exchange
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExchangeConfig {
    /// Display name used in logs
    #[cfg_attr(feature = "serde", serde(default = "default_name"))]
    pub name: String,

    /// Privileged account allowed to register tokens
    pub owner: AccountId,

    /// The exchange's own address: recipient of token deposits and sender
    /// of token withdrawals
    pub address: AccountId,
}

#[cfg(feature = "serde")]
fn default_name() -> String {
    "exchange".to_string()
}

impl ExchangeConfig {
    /// Create a new configuration with required parameters
    pub fn new(owner: impl Into<AccountId>, address: impl Into<AccountId>) -> Self {
        Self {
            name: "exchange".to_string(),
            owner: owner.into(),
            address: address.into(),
        }
    }

    /// Builder method: Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.owner.is_empty() {
            return Err("Owner address cannot be empty".to_string());
        }

        if self.address.is_empty() {
            return Err("Exchange address cannot be empty".to_string());
        }

        if self.owner == self.address {
            return Err("Owner and exchange address must differ".to_string());
        }

        Ok(())
    }

    /// Parse and validate a JSON configuration document
    #[cfg(feature = "serde")]
    pub fn from_json_str(json: &str) -> Result<Self, String> {
        let config: Self = serde_json::from_str(json).map_err(|e| e.to_string())?;
        config.validate()?;
        Ok(config)
    }
}
