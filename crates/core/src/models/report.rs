use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Current portfolio value and the prices it was computed from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentValuation {
    /// Sum of shares × last price over tickers with a known price.
    pub value: f64,

    /// Last known close per ticker. Tickers without data are absent.
    pub last_prices: BTreeMap<String, f64>,
}

/// Result of one analysis, handed to the rendering layer as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub total_expenses: f64,

    /// income − total_expenses
    pub surplus: f64,

    /// savings + portfolio_value
    pub net_worth: f64,

    pub portfolio_value: f64,

    /// Equals `portfolio_value` exactly when no model could be trained.
    pub future_portfolio_value: f64,

    /// Human-readable advice, in rule order.
    pub recommendations: Vec<String>,

    /// Last known close per held ticker that had data.
    #[serde(default)]
    pub last_prices: BTreeMap<String, f64>,

    /// True when the projection fell back to the current value.
    #[serde(default)]
    pub projection_degraded: bool,
}
