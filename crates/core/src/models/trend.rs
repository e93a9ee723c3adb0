use serde::{Deserialize, Serialize};

/// Feature pair used by the trend model.
///
/// `time_index` is the 0-based position inside one ticker's own series; it
/// restarts at 0 for every ticker, so pooled observations do not share a
/// calendar origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub time_index: usize,
    pub price: f64,
}

/// An observation labelled with the same ticker's next-day close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingSample {
    pub observation: Observation,
    pub label: f64,
}

/// Pooled samples from every qualifying ticker, in fetch order.
pub type TrainingSet = Vec<TrainingSample>;

/// Seeded partition of a training set.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainTestSplit {
    pub train: Vec<TrainingSample>,
    pub test: Vec<TrainingSample>,
}

/// Fitted linear predictor: `next = intercept + time_coef * t + price_coef * price`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendModel {
    pub time_coef: f64,
    pub price_coef: f64,
    pub intercept: f64,
    /// Number of samples the coefficients were fitted on.
    pub fitted_samples: usize,
}

impl TrendModel {
    /// Predicted next-period price. Pure; finite inputs give finite output.
    pub fn predict(&self, time_index: usize, price: f64) -> f64 {
        self.intercept + self.time_coef * time_index as f64 + self.price_coef * price
    }
}
