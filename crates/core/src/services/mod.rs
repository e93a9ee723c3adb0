pub mod finance_analyzer;
pub mod portfolio_valuer;
pub mod price_service;
pub mod trend_service;
