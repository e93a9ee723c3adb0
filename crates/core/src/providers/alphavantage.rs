use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use super::traits::PriceSeriesProvider;
use crate::errors::CoreError;
use crate::models::price::PricePoint;

const BASE_URL: &str = "https://www.alphavantage.co/query";
const PROVIDER: &str = "Alpha Vantage";

/// The compact series covers roughly the last 100 trading days.
const COMPACT_SPAN_DAYS: i64 = 140;

/// Alpha Vantage provider for daily equity closes.
///
/// - **Free tier**: 25 requests/day (across ALL endpoints).
/// - **Requires**: API key (configured as "alphavantage").
/// - **Coverage**: 100k+ global equity symbols.
///
/// Registered after Yahoo Finance and only used when it returns nothing.
pub struct AlphaVantageProvider {
    client: Client,
    api_key: String,
}

impl AlphaVantageProvider {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client, api_key }
    }
}

// ── Alpha Vantage API response types ────────────────────────────────

#[derive(Deserialize)]
struct TimeSeriesResponse {
    #[serde(rename = "Time Series (Daily)")]
    time_series: Option<HashMap<String, DailyData>>,

    #[serde(rename = "Note")]
    note: Option<String>,

    #[serde(rename = "Error Message")]
    error_message: Option<String>,
}

#[derive(Deserialize)]
struct DailyData {
    #[serde(rename = "4. close")]
    close: String,
}

/// Decode a `TIME_SERIES_DAILY` body into sorted closes within `[from, to]`.
///
/// Rows with unparsable dates or prices are skipped. A body without a time
/// series (rate limit note, unknown symbol) is an API error.
pub fn parse_daily_series(
    ticker: &str,
    body: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<PricePoint>, CoreError> {
    let resp: TimeSeriesResponse = serde_json::from_str(body)?;

    let Some(series) = resp.time_series else {
        let reason = resp
            .error_message
            .or(resp.note)
            .unwrap_or_else(|| "API limit may be exceeded".to_string());
        return Err(CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("No time series data for {ticker}: {reason}"),
        });
    };

    let mut points: Vec<PricePoint> = series
        .iter()
        .filter_map(|(date_str, data)| {
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").ok()?;
            if date < from || date > to {
                return None;
            }
            let close: f64 = data.close.trim().parse().ok()?;
            Some(PricePoint::new(date, close))
        })
        .collect();

    points.sort_by_key(|p| p.date);
    Ok(points)
}

#[async_trait]
impl PriceSeriesProvider for AlphaVantageProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn get_closing_prices(
        &self,
        ticker: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PricePoint>, CoreError> {
        let output_size = if (to - from).num_days() > COMPACT_SPAN_DAYS {
            "full"
        } else {
            "compact"
        };

        let body = self
            .client
            .get(BASE_URL)
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", &ticker.to_uppercase()),
                ("outputsize", output_size),
                ("apikey", &self.api_key),
            ])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_daily_series(ticker, &body, from, to)
    }
}
