use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::models::input::Holdings;
use crate::models::price::{DateRange, PriceSeries};
use crate::models::report::CurrentValuation;
use crate::models::trend::TrendModel;
use crate::services::price_service::PriceService;

/// Values holdings at the last known price and at the model's projected price.
///
/// Both valuations look at the same trailing window (30 days by default).
/// Tickers with no data in the window are left out of the sums.
pub struct PortfolioValuer {
    window_days: i64,
}

impl PortfolioValuer {
    pub fn new(window_days: i64) -> Self {
        Self { window_days }
    }

    pub fn window(&self, today: NaiveDate) -> DateRange {
        DateRange::trailing(today, self.window_days)
    }

    /// Fetch the valuation window for every held ticker.
    pub async fn fetch_window(
        &self,
        price_service: &PriceService,
        holdings: &Holdings,
        today: NaiveDate,
    ) -> BTreeMap<String, PriceSeries> {
        price_service
            .fetch_many(&holdings.tickers(), self.window(today))
            .await
    }

    /// Current value of `holdings` and the last price of each ticker with data.
    pub async fn current_value(
        &self,
        price_service: &PriceService,
        holdings: &Holdings,
        today: NaiveDate,
    ) -> CurrentValuation {
        let window = self.fetch_window(price_service, holdings, today).await;
        Self::value_from_series(holdings, &window)
    }

    /// Projected value of `holdings`; equals the current value when `model` is `None`.
    pub async fn projected_value(
        &self,
        price_service: &PriceService,
        model: Option<&TrendModel>,
        holdings: &Holdings,
        today: NaiveDate,
    ) -> f64 {
        let window = self.fetch_window(price_service, holdings, today).await;
        Self::project_from_series(model, holdings, &window)
    }

    /// Sum of `shares × last close` over tickers present in `window`.
    pub fn value_from_series(
        holdings: &Holdings,
        window: &BTreeMap<String, PriceSeries>,
    ) -> CurrentValuation {
        let mut valuation = CurrentValuation::default();
        for (ticker, shares) in holdings.iter() {
            if let Some(series) = window.get(ticker) {
                let last = series.last_close();
                valuation.value += shares * last;
                valuation.last_prices.insert(ticker.to_string(), last);
            }
        }
        valuation
    }

    /// Sum of `shares × predicted close` over tickers present in `window`.
    ///
    /// The model is queried with `(series length, last close)`. Training used
    /// 0-based positions within a year of history, so this time index sits on
    /// a different scale; the mismatch is kept as-is.
    pub fn project_from_series(
        model: Option<&TrendModel>,
        holdings: &Holdings,
        window: &BTreeMap<String, PriceSeries>,
    ) -> f64 {
        let Some(model) = model else {
            return Self::value_from_series(holdings, window).value;
        };

        holdings
            .iter()
            .filter_map(|(ticker, shares)| {
                let series = window.get(ticker)?;
                Some(shares * model.predict(series.len(), series.last_close()))
            })
            .sum()
    }
}
