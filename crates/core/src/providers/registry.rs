use std::collections::HashMap;

use super::alphavantage::AlphaVantageProvider;
use super::traits::PriceSeriesProvider;
use super::yahoo_finance::YahooFinanceProvider;

/// Ordered list of price providers.
///
/// Registration order is priority order: `PriceService` asks each provider
/// in turn until one returns data.
pub struct PriceProviderRegistry {
    providers: Vec<Box<dyn PriceSeriesProvider>>,
}

impl PriceProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Create a registry with all default providers pre-configured.
    pub fn new_with_defaults(api_keys: &HashMap<String, String>) -> Self {
        let mut registry = Self::new();

        // Yahoo Finance: primary, no API key needed
        match YahooFinanceProvider::new() {
            Ok(yahoo) => registry.register(Box::new(yahoo)),
            Err(e) => tracing::warn!("Yahoo Finance unavailable: {e}"),
        }

        // Alpha Vantage: fallback, only with a key
        if let Some(key) = api_keys.get("alphavantage") {
            registry.register(Box::new(AlphaVantageProvider::new(key.clone())));
        }

        registry
    }

    /// Register a new price provider.
    pub fn register(&mut self, provider: Box<dyn PriceSeriesProvider>) {
        self.providers.push(provider);
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, provider: Box<dyn PriceSeriesProvider>) -> Self {
        self.register(provider);
        self
    }

    /// All providers in priority order.
    pub fn providers(&self) -> impl Iterator<Item = &dyn PriceSeriesProvider> {
        self.providers.iter().map(|p| p.as_ref())
    }

    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }
}

impl Default for PriceProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
