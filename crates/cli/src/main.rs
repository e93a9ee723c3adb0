mod logging;

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::Parser;
use household_finance_core::config::AnalysisConfig;
use household_finance_core::models::input::AnalysisInput;
use household_finance_core::providers::in_memory::InMemoryProvider;
use household_finance_core::providers::registry::PriceProviderRegistry;
use household_finance_core::HouseholdFinance;
use std::collections::HashMap;
use std::path::PathBuf;

/// Estimate a household's budget position and project its portfolio.
#[derive(Debug, Parser)]
#[command(name = "household-finance", version)]
struct Cli {
    /// JSON analysis input: {income, expenses, savings, investments, goals}
    #[arg(long, conflicts_with = "field")]
    input: Option<PathBuf>,

    /// Form field as key=value (repeatable), e.g. --field income=5000 --field ticker_1=aapl
    #[arg(long = "field", value_name = "KEY=VALUE")]
    field: Vec<String>,

    /// Offline price fixture: {"AAPL": [{"date": "2025-01-02", "close": 185.6}]}
    #[arg(long)]
    prices: Option<PathBuf>,

    /// Date all price windows end at (defaults to today, UTC)
    #[arg(long, value_name = "YYYY-MM-DD")]
    as_of: Option<NaiveDate>,

    /// Pretty-print the report
    #[arg(long)]
    pretty: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(logging::LoggingConfig::from_env().with_verbosity(cli.verbose))?;

    let input = read_input(&cli)?;
    let config = AnalysisConfig::from_env();

    let finance = match &cli.prices {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading price fixture {}", path.display()))?;
            let provider = InMemoryProvider::from_json(&json)?;
            tracing::info!(tickers = provider.tickers().len(), "using offline price fixture");
            let registry = PriceProviderRegistry::new().with(Box::new(provider));
            HouseholdFinance::with_registry(config, registry)?
        }
        None => HouseholdFinance::with_defaults(config)?,
    };
    tracing::debug!(providers = ?finance.price_service().provider_names(), "price providers ready");

    let report = match cli.as_of {
        Some(date) => finance.analyze_as_of(&input, date).await,
        None => finance.analyze(&input).await,
    };

    let out = if cli.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{out}");
    Ok(())
}

fn read_input(cli: &Cli) -> anyhow::Result<AnalysisInput> {
    if let Some(path) = &cli.input {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading input {}", path.display()))?;
        let input: AnalysisInput =
            serde_json::from_str(&json).context("input is not a valid analysis record")?;
        input.validate()?;
        return Ok(input);
    }

    if cli.field.is_empty() {
        bail!("provide --input <FILE> or at least one --field KEY=VALUE");
    }

    let mut fields = HashMap::new();
    for pair in &cli.field {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("field '{pair}' is not KEY=VALUE");
        };
        fields.insert(key.trim().to_string(), value.to_string());
    }
    Ok(AnalysisInput::from_form(&fields))
}
