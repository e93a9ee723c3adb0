use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// A single closing price on a trading day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Inclusive calendar date range (no time-of-day).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The `days`-long window ending at `end`, e.g. `trailing(today, 30)`.
    pub fn trailing(end: NaiveDate, days: i64) -> Self {
        Self {
            start: end - Duration::days(days),
            end,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Chronological closing prices for one ticker.
///
/// Only constructible through [`PriceSeries::from_points`], which rejects
/// empty input, so a `PriceSeries` always holds at least one price.
/// "No data" is represented by `Option::None` at the call site.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    ticker: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series from raw provider points.
    ///
    /// Points are sorted by date; non-finite and non-positive closes are
    /// dropped. Returns `None` when nothing usable remains.
    pub fn from_points(ticker: &str, mut points: Vec<PricePoint>) -> Option<Self> {
        points.retain(|p| p.close.is_finite() && p.close > 0.0);
        if points.is_empty() {
            return None;
        }
        points.sort_by_key(|p| p.date);
        Some(Self {
            ticker: ticker.to_uppercase(),
            points,
        })
    }

    /// Convenience for tests and fixtures: consecutive calendar days from `start`.
    pub fn from_closes(ticker: &str, start: NaiveDate, closes: &[f64]) -> Option<Self> {
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint::new(start + Duration::days(i as i64), close))
            .collect();
        Self::from_points(ticker, points)
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; kept for API symmetry with collections.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    /// The last known price.
    pub fn last_close(&self) -> f64 {
        self.points[self.points.len() - 1].close
    }

    pub fn first_date(&self) -> NaiveDate {
        self.points[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.points[self.points.len() - 1].date
    }
}
