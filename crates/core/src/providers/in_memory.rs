use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;

use super::traits::PriceSeriesProvider;
use crate::errors::CoreError;
use crate::models::price::PricePoint;

/// Fixture-backed provider: ticker → stored daily closes.
///
/// Used for offline runs and tests. Unknown tickers return an empty Vec.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    series: HashMap<String, Vec<PricePoint>>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a fixture of the form `{"AAPL": [{"date": "2025-01-02", "close": 185.6}, ...]}`.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let raw: HashMap<String, Vec<PricePoint>> = serde_json::from_str(json)?;
        let mut provider = Self::new();
        for (ticker, points) in raw {
            provider.insert(&ticker, points);
        }
        Ok(provider)
    }

    /// Store (or replace) the closes for a ticker.
    pub fn insert(&mut self, ticker: &str, mut points: Vec<PricePoint>) {
        points.sort_by_key(|p| p.date);
        self.series.insert(ticker.to_uppercase(), points);
    }

    pub fn with_series(mut self, ticker: &str, points: Vec<PricePoint>) -> Self {
        self.insert(ticker, points);
        self
    }

    pub fn tickers(&self) -> Vec<&str> {
        self.series.keys().map(String::as_str).collect()
    }
}

#[async_trait]
impl PriceSeriesProvider for InMemoryProvider {
    fn name(&self) -> &str {
        "In-Memory"
    }

    async fn get_closing_prices(
        &self,
        ticker: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PricePoint>, CoreError> {
        Ok(self
            .series
            .get(&ticker.to_uppercase())
            .map(|points| {
                points
                    .iter()
                    .filter(|p| p.date >= from && p.date <= to)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
