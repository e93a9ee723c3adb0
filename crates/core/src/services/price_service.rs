use futures::future::join_all;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::models::price::{DateRange, PriceSeries};
use crate::providers::registry::PriceProviderRegistry;

/// Adapts the provider registry to the "series or absent" contract.
///
/// - Providers are tried in registration order, once each.
/// - Every attempt is bounded by `timeout`.
/// - Errors, timeouts and empty answers all become `None`; nothing here
///   can fail an analysis.
pub struct PriceService {
    registry: PriceProviderRegistry,
    timeout: Duration,
}

impl PriceService {
    pub fn new(registry: PriceProviderRegistry, timeout: Duration) -> Self {
        Self { registry, timeout }
    }

    /// Names of the registered providers, in priority order.
    pub fn provider_names(&self) -> Vec<String> {
        self.registry.provider_names()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch one ticker's closes for `range`, or `None` when no provider has data.
    pub async fn fetch_series(&self, ticker: &str, range: DateRange) -> Option<PriceSeries> {
        for provider in self.registry.providers() {
            let attempt = tokio::time::timeout(
                self.timeout,
                provider.get_closing_prices(ticker, range.start, range.end),
            )
            .await;

            match attempt {
                Ok(Ok(points)) => {
                    let raw_len = points.len();
                    if let Some(series) = PriceSeries::from_points(ticker, points) {
                        debug!(
                            provider = provider.name(),
                            ticker,
                            points = series.len(),
                            "fetched price series"
                        );
                        return Some(series);
                    }
                    debug!(provider = provider.name(), ticker, raw_len, "no usable prices");
                }
                Ok(Err(e)) => {
                    warn!(provider = provider.name(), ticker, "price fetch failed: {e}");
                }
                Err(_) => {
                    let e = CoreError::Timeout {
                        provider: provider.name().to_string(),
                        ticker: ticker.to_string(),
                    };
                    warn!("{e} after {:?}", self.timeout);
                }
            }
        }
        None
    }

    /// Fetch several tickers concurrently.
    ///
    /// Results are keyed by ticker, so the map is the same whatever order the
    /// fetches complete in. Tickers without data are left out.
    pub async fn fetch_many<S>(&self, tickers: &[S], range: DateRange) -> BTreeMap<String, PriceSeries>
    where
        S: AsRef<str>,
    {
        let fetches = tickers.iter().map(|ticker| async move {
            let ticker = ticker.as_ref();
            (ticker.to_uppercase(), self.fetch_series(ticker, range).await)
        });

        join_all(fetches)
            .await
            .into_iter()
            .filter_map(|(ticker, series)| series.map(|s| (ticker, s)))
            .collect()
    }
}
