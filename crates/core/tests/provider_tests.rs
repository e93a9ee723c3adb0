// ═══════════════════════════════════════════════════════════════════
// Provider Tests — Registry, InMemoryProvider, Alpha Vantage decoding
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;

use household_finance_core::errors::CoreError;
use household_finance_core::models::price::PricePoint;
use household_finance_core::providers::alphavantage::{parse_daily_series, AlphaVantageProvider};
use household_finance_core::providers::in_memory::InMemoryProvider;
use household_finance_core::providers::registry::PriceProviderRegistry;
use household_finance_core::providers::traits::PriceSeriesProvider;
use household_finance_core::providers::yahoo_finance::YahooFinanceProvider;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
// Test Helpers — Mock Providers
// ═══════════════════════════════════════════════════════════════════

/// A mock provider identified only by name.
struct NamedProvider {
    name: String,
}

impl NamedProvider {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

#[async_trait]
impl PriceSeriesProvider for NamedProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_closing_prices(
        &self,
        _ticker: &str,
        _from: NaiveDate,
        _to: NaiveDate,
    ) -> Result<Vec<PricePoint>, CoreError> {
        Ok(vec![])
    }
}

// ═══════════════════════════════════════════════════════════════════
// PriceProviderRegistry
// ═══════════════════════════════════════════════════════════════════

mod registry {
    use super::*;

    #[test]
    fn new_is_empty() {
        let registry = PriceProviderRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.provider_names().is_empty());
    }

    #[test]
    fn default_is_empty() {
        assert!(PriceProviderRegistry::default().is_empty());
    }

    #[test]
    fn registration_order_is_priority_order() {
        let mut registry = PriceProviderRegistry::new();
        registry.register(Box::new(NamedProvider::new("primary")));
        registry.register(Box::new(NamedProvider::new("secondary")));
        let registry = registry.with(Box::new(NamedProvider::new("tertiary")));

        assert_eq!(
            registry.provider_names(),
            vec!["primary", "secondary", "tertiary"]
        );
        let first = registry.providers().next().unwrap();
        assert_eq!(first.name(), "primary");
    }
}

mod registry_defaults {
    use super::*;

    #[test]
    fn without_alphavantage_key_only_yahoo() {
        let registry = PriceProviderRegistry::new_with_defaults(&HashMap::new());
        assert_eq!(registry.provider_names(), vec!["Yahoo Finance"]);
    }

    #[test]
    fn with_alphavantage_key_has_fallback() {
        let mut keys = HashMap::new();
        keys.insert("alphavantage".to_string(), "av-key".to_string());
        let registry = PriceProviderRegistry::new_with_defaults(&keys);
        assert_eq!(registry.provider_names(), vec!["Yahoo Finance", "Alpha Vantage"]);
    }

    #[test]
    fn unrelated_keys_are_ignored() {
        let mut keys = HashMap::new();
        keys.insert("metals_dev".to_string(), "k".to_string());
        let registry = PriceProviderRegistry::new_with_defaults(&keys);
        assert_eq!(registry.len(), 1);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Provider names
// ═══════════════════════════════════════════════════════════════════

mod names {
    use super::*;

    #[test]
    fn yahoo() {
        let provider = YahooFinanceProvider::new().unwrap();
        assert_eq!(provider.name(), "Yahoo Finance");
    }

    #[test]
    fn alphavantage() {
        let provider = AlphaVantageProvider::new("k".into());
        assert_eq!(provider.name(), "Alpha Vantage");
    }

    #[test]
    fn in_memory() {
        assert_eq!(InMemoryProvider::new().name(), "In-Memory");
    }
}

// ═══════════════════════════════════════════════════════════════════
// InMemoryProvider
// ═══════════════════════════════════════════════════════════════════

mod in_memory {
    use super::*;

    fn fixture() -> InMemoryProvider {
        InMemoryProvider::new().with_series(
            "aapl",
            vec![
                PricePoint::new(d(2025, 1, 3), 103.0),
                PricePoint::new(d(2025, 1, 1), 101.0),
                PricePoint::new(d(2025, 1, 2), 102.0),
                PricePoint::new(d(2025, 1, 6), 106.0),
            ],
        )
    }

    #[tokio::test]
    async fn filters_to_inclusive_range_in_order() {
        let points = fixture()
            .get_closing_prices("AAPL", d(2025, 1, 2), d(2025, 1, 3))
            .await
            .unwrap();
        let closes: Vec<f64> = points.iter().map(|p| p.close).collect();
        assert_eq!(closes, vec![102.0, 103.0]);
    }

    #[tokio::test]
    async fn ticker_lookup_is_case_insensitive() {
        let points = fixture()
            .get_closing_prices("aApL", d(2025, 1, 1), d(2025, 1, 31))
            .await
            .unwrap();
        assert_eq!(points.len(), 4);
    }

    #[tokio::test]
    async fn unknown_ticker_is_empty() {
        let points = fixture()
            .get_closing_prices("XX", d(2025, 1, 1), d(2025, 1, 31))
            .await
            .unwrap();
        assert!(points.is_empty());
    }

    #[tokio::test]
    async fn range_without_trading_days_is_empty() {
        let points = fixture()
            .get_closing_prices("AAPL", d(2025, 1, 4), d(2025, 1, 5))
            .await
            .unwrap();
        assert!(points.is_empty());
    }

    #[tokio::test]
    async fn loads_from_json() {
        let json = r#"{
            "msft": [
                {"date": "2025-03-04", "close": 390.5},
                {"date": "2025-03-03", "close": 388.0}
            ]
        }"#;
        let provider = InMemoryProvider::from_json(json).unwrap();
        assert_eq!(provider.tickers(), vec!["MSFT"]);

        let points = provider
            .get_closing_prices("MSFT", d(2025, 3, 1), d(2025, 3, 31))
            .await
            .unwrap();
        assert_eq!(points[0].close, 388.0);
        assert_eq!(points[1].close, 390.5);
    }

    #[test]
    fn rejects_malformed_json() {
        let result = InMemoryProvider::from_json(r#"{"MSFT": [{"date": "soon"}]}"#);
        assert!(matches!(result, Err(CoreError::Deserialization(_))));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Alpha Vantage response decoding
// ═══════════════════════════════════════════════════════════════════

mod alphavantage_parsing {
    use super::*;

    const BODY: &str = r#"{
        "Meta Data": {"2. Symbol": "IBM"},
        "Time Series (Daily)": {
            "2025-01-06": {"1. open": "1", "4. close": "221.50"},
            "2025-01-03": {"1. open": "1", "4. close": "220.00"},
            "2025-01-02": {"1. open": "1", "4. close": "219.25"},
            "2024-12-31": {"1. open": "1", "4. close": "218.00"},
            "not-a-date": {"1. open": "1", "4. close": "1.00"},
            "2025-01-07": {"1. open": "1", "4. close": "n/a"}
        }
    }"#;

    #[test]
    fn keeps_range_sorted_and_skips_bad_rows() {
        let points = parse_daily_series("IBM", BODY, d(2025, 1, 1), d(2025, 1, 31)).unwrap();
        let closes: Vec<f64> = points.iter().map(|p| p.close).collect();
        assert_eq!(closes, vec![219.25, 220.0, 221.5]);
        assert_eq!(points[0].date, d(2025, 1, 2));
    }

    #[test]
    fn rate_limit_note_is_api_error() {
        let body = r#"{"Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute."}"#;
        let err = parse_daily_series("IBM", body, d(2025, 1, 1), d(2025, 1, 31)).unwrap_err();
        match err {
            CoreError::Api { provider, message } => {
                assert_eq!(provider, "Alpha Vantage");
                assert!(message.contains("call frequency"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unknown_symbol_is_api_error() {
        let body = r#"{"Error Message": "Invalid API call."}"#;
        let err = parse_daily_series("NOPE", body, d(2025, 1, 1), d(2025, 1, 31)).unwrap_err();
        assert!(err.to_string().contains("Invalid API call."));
    }

    #[test]
    fn invalid_json_is_deserialization_error() {
        let err = parse_daily_series("IBM", "<html>", d(2025, 1, 1), d(2025, 1, 31)).unwrap_err();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }
}
