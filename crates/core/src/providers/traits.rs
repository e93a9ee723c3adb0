use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::price::PricePoint;

/// Source of daily closing prices (Dependency Inversion seam).
///
/// Implementations return whatever the upstream API gave them for the
/// inclusive range `[from, to]`. An unknown ticker may surface as either an
/// error or an empty Vec; `PriceService` treats both as "no data".
#[async_trait]
pub trait PriceSeriesProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Closing prices for trading days in `[from, to]`, sorted by date.
    async fn get_closing_prices(
        &self,
        ticker: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PricePoint>, CoreError>;
}
