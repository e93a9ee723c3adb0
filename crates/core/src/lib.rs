pub mod config;
pub mod errors;
pub mod models;
pub mod providers;
pub mod services;

use chrono::NaiveDate;
use std::collections::HashMap;

use config::AnalysisConfig;
use errors::CoreError;
use models::input::AnalysisInput;
use models::report::AnalysisReport;
use providers::registry::PriceProviderRegistry;
use services::finance_analyzer::FinanceAnalyzer;
use services::price_service::PriceService;

/// Main entry point for the household-finance core library.
///
/// Owns the price service and the analyzer. One call to [`analyze`](Self::analyze)
/// is one self-contained computation: prices are fetched fresh and the
/// fitted model is dropped when the call returns.
#[must_use]
pub struct HouseholdFinance {
    config: AnalysisConfig,
    price_service: PriceService,
    analyzer: FinanceAnalyzer,
}

impl std::fmt::Debug for HouseholdFinance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HouseholdFinance")
            .field("config", &self.config)
            .field("providers", &self.price_service.provider_names())
            .finish()
    }
}

impl HouseholdFinance {
    /// Build with the default providers (Yahoo Finance, plus Alpha Vantage
    /// when an `alphavantage` key is configured).
    pub fn with_defaults(config: AnalysisConfig) -> Result<Self, CoreError> {
        let registry = PriceProviderRegistry::new_with_defaults(&config.api_keys);
        Self::with_registry(config, registry)
    }

    /// Build with a caller-supplied provider registry.
    pub fn with_registry(
        config: AnalysisConfig,
        registry: PriceProviderRegistry,
    ) -> Result<Self, CoreError> {
        config.validate()?;
        if registry.is_empty() {
            tracing::warn!("no price providers registered; portfolio values will be zero");
        }
        let price_service = PriceService::new(registry, config.fetch_timeout());
        let analyzer = FinanceAnalyzer::new(&config);
        Ok(Self {
            config,
            price_service,
            analyzer,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn price_service(&self) -> &PriceService {
        &self.price_service
    }

    /// Analyze as of today's UTC date.
    pub async fn analyze(&self, input: &AnalysisInput) -> AnalysisReport {
        let today = chrono::Utc::now().date_naive();
        self.analyze_as_of(input, today).await
    }

    /// Analyze with an explicit "now" (all windows end at `today`).
    pub async fn analyze_as_of(&self, input: &AnalysisInput, today: NaiveDate) -> AnalysisReport {
        self.analyzer
            .analyze(&self.price_service, input, today)
            .await
    }

    /// Normalize raw form fields and analyze them.
    pub async fn analyze_form(&self, fields: &HashMap<String, String>) -> AnalysisReport {
        let input = AnalysisInput::from_form(fields);
        self.analyze(&input).await
    }
}
