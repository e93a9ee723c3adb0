pub mod registry;
pub mod traits;

// Provider implementations
pub mod alphavantage;
pub mod in_memory;
pub mod yahoo_finance;
