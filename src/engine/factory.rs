// ============================================================================
// Exchange Factory
// Creates exchanges with proper configuration
// ============================================================================

use crate::domain::ExchangeConfig;
use crate::engine::{Exchange, PriceTimePriority};
use crate::interfaces::{EventHandler, MatchingAlgorithm, NativeCurrency, NoOpEventHandler};
use std::sync::Arc;

// ============================================================================
// Factory Functions
// ============================================================================

/// Creates an exchange from configuration with price/time matching and no
/// event subscriber
///
/// # Example
/// ```
/// use token_exchange::prelude::*;
/// use token_exchange::engine::factory::create_from_config;
/// use std::sync::Arc;
///
/// let config = ExchangeConfig::new("0xowner", "0xexchange");
/// let exchange = create_from_config(config, Arc::new(HostWallet::new())).unwrap();
/// assert!(exchange.symbols().is_empty());
/// ```
pub fn create_from_config(
    config: ExchangeConfig,
    native: Arc<dyn NativeCurrency>,
) -> Result<Exchange, String> {
    ExchangeBuilder::from_config(config).build(native)
}

// ============================================================================
// Builder Pattern
// ============================================================================

/// Builder for creating exchanges with fluent API
///
/// # Example
/// ```
/// use token_exchange::prelude::*;
/// use std::sync::Arc;
///
/// let exchange = ExchangeBuilder::new("0xowner", "0xexchange")
///     .with_name("fixed-market")
///     .with_event_handler(Arc::new(LoggingEventHandler))
///     .build(Arc::new(HostWallet::new()))
///     .unwrap();
///
/// assert_eq!(exchange.config().name, "fixed-market");
/// ```
pub struct ExchangeBuilder {
    config: ExchangeConfig,
    algorithm: Arc<dyn MatchingAlgorithm>,
    event_handler: Arc<dyn EventHandler>,
}

impl ExchangeBuilder {
    /// Create a new builder for an exchange owned by `owner` at `address`
    pub fn new(owner: impl Into<String>, address: impl Into<String>) -> Self {
        Self::from_config(ExchangeConfig::new(owner.into(), address.into()))
    }

    pub fn from_config(config: ExchangeConfig) -> Self {
        Self {
            config,
            algorithm: Arc::new(PriceTimePriority::new()),
            event_handler: Arc::new(NoOpEventHandler),
        }
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.config = self.config.with_name(name);
        self
    }

    /// Use a different matching algorithm for every symbol's book
    pub fn with_algorithm(mut self, algorithm: Arc<dyn MatchingAlgorithm>) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Forward every event to `handler`
    pub fn with_event_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        self.event_handler = handler;
        self
    }

    /// Get the configuration without building (for inspection)
    pub fn get_config(&self) -> &ExchangeConfig {
        &self.config
    }

    /// Validate the configuration and build the exchange
    pub fn build(self, native: Arc<dyn NativeCurrency>) -> Result<Exchange, String> {
        self.config.validate()?;
        Ok(Exchange::new(
            self.config,
            self.algorithm,
            native,
            self.event_handler,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::HostWallet;

    #[test]
    fn test_create_from_config() {
        let config = ExchangeConfig::new("0xowner", "0xexchange");
        let exchange = create_from_config(config, Arc::new(HostWallet::new())).unwrap();
        assert_eq!(exchange.config().owner.as_str(), "0xowner");
        assert_eq!(exchange.address().as_str(), "0xexchange");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = ExchangeBuilder::new("0xsame", "0xsame").build(Arc::new(HostWallet::new()));
        assert!(result.is_err());

        let result = ExchangeBuilder::new("", "0xexchange").build(Arc::new(HostWallet::new()));
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_pattern() {
        let builder = ExchangeBuilder::new("0xowner", "0xexchange")
            .with_name("fixed-market")
            .with_algorithm(Arc::new(PriceTimePriority::new()));
        assert_eq!(builder.get_config().name, "fixed-market");

        let exchange = builder.build(Arc::new(HostWallet::new())).unwrap();
        assert_eq!(exchange.config().name, "fixed-market");
    }
}
