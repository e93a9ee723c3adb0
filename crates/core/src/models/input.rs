use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::errors::CoreError;

/// Expense categories collected by the budget form.
pub const EXPENSE_CATEGORIES: [&str; 4] = ["rent", "groceries", "entertainment", "utilities"];

/// Share counts per ticker.
///
/// Tickers are stored trimmed and uppercased. Only positive, finite share
/// counts are kept. Deserialization is stricter than `insert`: a blank ticker
/// or a negative or non-finite share count rejects the whole map, while zero
/// share counts are dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct Holdings(BTreeMap<String, f64>);

impl TryFrom<BTreeMap<String, f64>> for Holdings {
    type Error = CoreError;

    fn try_from(raw: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        let mut holdings = Holdings::new();
        for (ticker, shares) in raw {
            if ticker.trim().is_empty() {
                return Err(CoreError::InvalidInput("holding has a blank ticker".into()));
            }
            if !shares.is_finite() || shares < 0.0 {
                return Err(CoreError::InvalidInput(format!(
                    "shares for '{ticker}' must be a non-negative number, got {shares}"
                )));
            }
            holdings.insert(&ticker, shares);
        }
        Ok(holdings)
    }
}

impl From<Holdings> for BTreeMap<String, f64> {
    fn from(holdings: Holdings) -> Self {
        holdings.0
    }
}

impl Holdings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a position. Returns false if the entry was ignored.
    pub fn insert(&mut self, ticker: &str, shares: f64) -> bool {
        let ticker = ticker.trim().to_uppercase();
        if ticker.is_empty() || !shares.is_finite() || shares <= 0.0 {
            return false;
        }
        self.0.insert(ticker, shares);
        true
    }

    pub fn shares(&self, ticker: &str) -> Option<f64> {
        self.0.get(&ticker.to_uppercase()).copied()
    }

    pub fn tickers(&self) -> Vec<String> {
        self.0.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(t, s)| (t.as_str(), *s))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<(S, f64)> for Holdings {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut holdings = Holdings::new();
        for (ticker, shares) in iter {
            holdings.insert(ticker.as_ref(), shares);
        }
        holdings
    }
}

/// Savings targets. `retirement` is collected but not used by any rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Goals {
    #[serde(default)]
    pub emergency_fund: f64,
    #[serde(default)]
    pub retirement: f64,
}

/// One validated analysis request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisInput {
    #[serde(default)]
    pub income: f64,
    #[serde(default)]
    pub expenses: BTreeMap<String, f64>,
    #[serde(default)]
    pub savings: f64,
    #[serde(default)]
    pub investments: Holdings,
    #[serde(default)]
    pub goals: Goals,
}

impl AnalysisInput {
    /// Normalize raw form fields into an input record.
    ///
    /// Missing, blank or unparsable numbers become `0`. Each `ticker_<n>`
    /// field is paired with `shares_<n>`; the pair is kept only when the
    /// ticker is non-blank and shares are `> 0`. Pairs are applied in order
    /// of `n`, so the last row for a repeated ticker wins.
    pub fn from_form(fields: &HashMap<String, String>) -> Self {
        let number = |key: &str| -> f64 {
            fields
                .get(key)
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite())
                .unwrap_or(0.0)
        };

        let expenses = EXPENSE_CATEGORIES
            .iter()
            .map(|c| (c.to_string(), number(c)))
            .collect();

        // Rows apply in numeric order, so a repeated ticker keeps its last row.
        let mut rows: Vec<(&str, &String)> = fields
            .iter()
            .filter_map(|(key, value)| Some((key.strip_prefix("ticker_")?, value)))
            .filter(|(_, value)| !value.trim().is_empty())
            .collect();
        rows.sort_by_key(|&(suffix, _)| (suffix.parse::<u64>().ok(), suffix));

        let mut investments = Holdings::new();
        for (suffix, ticker) in rows {
            investments.insert(ticker, number(&format!("shares_{suffix}")));
        }

        Self {
            income: number("income"),
            expenses,
            savings: number("savings"),
            investments,
            goals: Goals {
                emergency_fund: number("emergency_fund"),
                retirement: number("retirement"),
            },
        }
    }

    /// Reject records the analysis cannot assume valid: every amount must be finite.
    /// Bad share counts never get this far; `Holdings` refuses them when a
    /// record is deserialized.
    pub fn validate(&self) -> Result<(), CoreError> {
        let scalars = [
            ("income", self.income),
            ("savings", self.savings),
            ("goals.emergency_fund", self.goals.emergency_fund),
            ("goals.retirement", self.goals.retirement),
        ];
        for (name, value) in scalars {
            if !value.is_finite() {
                return Err(CoreError::InvalidInput(format!("{name} must be a finite number")));
            }
        }
        for (category, amount) in &self.expenses {
            if !amount.is_finite() {
                return Err(CoreError::InvalidInput(format!(
                    "expense '{category}' must be a finite number"
                )));
            }
        }
        Ok(())
    }

    pub fn total_expenses(&self) -> f64 {
        self.expenses.values().sum()
    }
}
