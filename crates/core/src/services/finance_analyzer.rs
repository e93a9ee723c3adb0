use chrono::NaiveDate;
use tracing::info;

use crate::config::AnalysisConfig;
use crate::models::input::{AnalysisInput, Goals};
use crate::models::report::AnalysisReport;
use crate::services::portfolio_valuer::PortfolioValuer;
use crate::services::price_service::PriceService;
use crate::services::trend_service::TrendService;

/// Share of a positive surplus suggested for savings; the rest is for investing.
pub const SAVE_SHARE: f64 = 0.6;
pub const INVEST_SHARE: f64 = 0.4;

/// Horizon quoted in the projection recommendation.
pub const PROJECTION_HORIZON_DAYS: u32 = 30;

/// Turns one input record into an [`AnalysisReport`].
///
/// Flow: value holdings at the last known price, train the trend model on
/// a year of history for the same tickers, project the holdings with it,
/// then derive the recommendation strings.
pub struct FinanceAnalyzer {
    trend: TrendService,
    valuer: PortfolioValuer,
}

impl FinanceAnalyzer {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            trend: TrendService::new(config),
            valuer: PortfolioValuer::new(config.valuation_window_days),
        }
    }

    /// Run the full analysis as of `today`. Never fails: missing market data
    /// only shrinks the valuation or disables the projection.
    pub async fn analyze(
        &self,
        price_service: &PriceService,
        input: &AnalysisInput,
        today: NaiveDate,
    ) -> AnalysisReport {
        let total_expenses = input.total_expenses();
        let surplus = input.income - total_expenses;
        let tickers = input.investments.tickers();

        // The valuation window and the training history are independent fetches.
        let (window, model) = futures::join!(
            self.valuer.fetch_window(price_service, &input.investments, today),
            self.trend.train(price_service, &tickers, today),
        );

        let current = PortfolioValuer::value_from_series(&input.investments, &window);
        let portfolio_value = current.value;
        let future_portfolio_value =
            PortfolioValuer::project_from_series(model.as_ref(), &input.investments, &window);

        let recommendations = Self::recommendations(
            surplus,
            input.savings,
            &input.goals,
            portfolio_value,
            future_portfolio_value,
        );

        info!(
            tickers = tickers.len(),
            priced = current.last_prices.len(),
            model = model.is_some(),
            portfolio_value,
            future_portfolio_value,
            "analysis complete"
        );

        AnalysisReport {
            total_expenses,
            surplus,
            net_worth: input.savings + portfolio_value,
            portfolio_value,
            future_portfolio_value,
            recommendations,
            last_prices: current.last_prices,
            projection_degraded: model.is_none(),
        }
    }

    /// Budget advice. Each rule fires independently, always in this order:
    ///
    /// 1. positive surplus → 60/40 save/invest split
    /// 2. savings below the emergency-fund goal → shortfall
    /// 3. non-zero portfolio → current and projected value
    ///
    /// A negative surplus produces no message.
    pub fn recommendations(
        surplus: f64,
        savings: f64,
        goals: &Goals,
        portfolio_value: f64,
        future_portfolio_value: f64,
    ) -> Vec<String> {
        let mut out = Vec::new();

        if surplus > 0.0 {
            out.push(format!(
                "Monthly surplus: ${surplus:.2}. Consider saving ${:.2} and investing ${:.2}.",
                surplus * SAVE_SHARE,
                surplus * INVEST_SHARE,
            ));
        }

        if savings < goals.emergency_fund {
            let shortfall = goals.emergency_fund - savings;
            out.push(format!(
                "Emergency fund shortfall: ${shortfall:.2}. Prioritize savings."
            ));
        }

        if portfolio_value > 0.0 {
            out.push(format!(
                "Current portfolio value: ${portfolio_value:.2}. \
                 Predicted value in {PROJECTION_HORIZON_DAYS} days: ${future_portfolio_value:.2}."
            ));
        }

        out
    }
}
