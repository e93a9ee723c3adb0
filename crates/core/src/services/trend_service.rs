use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::config::AnalysisConfig;
use crate::models::price::{DateRange, PriceSeries};
use crate::models::trend::{Observation, TrainTestSplit, TrainingSample, TrainingSet, TrendModel};
use crate::services::price_service::PriceService;

/// Relative tolerance below which the feature covariance is treated as singular.
const SINGULAR_TOLERANCE: f64 = 1e-10;

/// Fits the pooled next-day price model.
///
/// Every qualifying ticker contributes `(index, close[index]) → close[index + 1]`
/// samples; ticker identity is dropped once the samples are pooled.
pub struct TrendService {
    lookback_days: i64,
    min_series_points: usize,
    test_fraction: f64,
    split_seed: u64,
}

impl TrendService {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            lookback_days: config.training_lookback_days,
            min_series_points: config.min_series_points,
            test_fraction: config.test_fraction,
            split_seed: config.split_seed,
        }
    }

    /// Fetch a year of history for `tickers` (ending at `today`) and fit a model.
    ///
    /// Returns `None` when no ticker has enough history.
    pub async fn train<S>(
        &self,
        price_service: &PriceService,
        tickers: &[S],
        today: NaiveDate,
    ) -> Option<TrendModel>
    where
        S: AsRef<str>,
    {
        let range = DateRange::trailing(today, self.lookback_days);
        let history = price_service.fetch_many(tickers, range).await;
        self.train_on(history.values())
    }

    /// Fit a model from already-fetched series.
    pub fn train_on<'a, I>(&self, series: I) -> Option<TrendModel>
    where
        I: IntoIterator<Item = &'a PriceSeries>,
    {
        let samples = self.build_training_set(series);
        if samples.is_empty() {
            info!("no ticker has enough history; projection disabled");
            return None;
        }

        let split = split_training_set(samples, self.test_fraction, self.split_seed);
        debug!(
            train = split.train.len(),
            held_out = split.test.len(),
            "split training set"
        );
        fit_least_squares(&split.train)
    }

    /// Pool next-day samples from every series with at least `min_series_points` closes.
    pub fn build_training_set<'a, I>(&self, series: I) -> TrainingSet
    where
        I: IntoIterator<Item = &'a PriceSeries>,
    {
        let mut samples = TrainingSet::new();
        for s in series {
            if s.len() < self.min_series_points {
                debug!(ticker = s.ticker(), points = s.len(), "series too short for training");
                continue;
            }
            let closes = s.closes();
            samples.extend(closes.windows(2).enumerate().map(|(i, pair)| TrainingSample {
                observation: Observation {
                    time_index: i,
                    price: pair[0],
                },
                label: pair[1],
            }));
        }
        samples
    }
}

/// Shuffle with a seeded RNG and hold out `ceil(n * test_fraction)` samples.
///
/// A non-empty set always leaves at least one sample to fit on, so a model
/// is trained whenever any sample exists. The same seed and input order
/// always give the same partition.
pub fn split_training_set(samples: TrainingSet, test_fraction: f64, seed: u64) -> TrainTestSplit {
    let n = samples.len();
    let n_test = ((n as f64 * test_fraction).ceil() as usize).min(n.saturating_sub(1));

    let mut order: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    order.shuffle(&mut rng);

    let test = order[..n_test].iter().map(|&i| samples[i]).collect();
    let train = order[n_test..].iter().map(|&i| samples[i]).collect();
    TrainTestSplit { train, test }
}

/// Ordinary least squares of label on `(time_index, price)` with an intercept.
///
/// Features are centered, so the intercept falls out of the means. When the
/// two features are collinear (or constant) the minimum-norm solution is
/// used; a flat price history therefore yields a flat model instead of an
/// error. Returns `None` for an empty sample set.
pub fn fit_least_squares(samples: &[TrainingSample]) -> Option<TrendModel> {
    if samples.is_empty() {
        return None;
    }

    let n = samples.len() as f64;
    let mean_t = samples.iter().map(|s| s.observation.time_index as f64).sum::<f64>() / n;
    let mean_p = samples.iter().map(|s| s.observation.price).sum::<f64>() / n;
    let mean_y = samples.iter().map(|s| s.label).sum::<f64>() / n;

    let (mut s_tt, mut s_tp, mut s_pp, mut s_ty, mut s_py) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for s in samples {
        let t = s.observation.time_index as f64 - mean_t;
        let p = s.observation.price - mean_p;
        let y = s.label - mean_y;
        s_tt += t * t;
        s_tp += t * p;
        s_pp += p * p;
        s_ty += t * y;
        s_py += p * y;
    }

    let det = s_tt * s_pp - s_tp * s_tp;
    let (time_coef, price_coef) = if s_tt * s_pp > 0.0 && det > SINGULAR_TOLERANCE * s_tt * s_pp {
        (
            (s_ty * s_pp - s_py * s_tp) / det,
            (s_py * s_tt - s_ty * s_tp) / det,
        )
    } else {
        min_norm_rank_one(s_tt, s_tp, s_pp, s_ty, s_py)
    };

    Some(TrendModel {
        time_coef,
        price_coef,
        intercept: mean_y - time_coef * mean_t - price_coef * mean_p,
        fitted_samples: samples.len(),
    })
}

/// Minimum-norm solution of a rank-deficient 2×2 normal system.
///
/// A rank-one PSD matrix is `λ v vᵀ` with `λ` its trace; the solution is the
/// projection of the right-hand side onto `v`, scaled by `1 / λ`.
fn min_norm_rank_one(s_tt: f64, s_tp: f64, s_pp: f64, s_ty: f64, s_py: f64) -> (f64, f64) {
    let trace = s_tt + s_pp;
    if trace <= f64::EPSILON {
        return (0.0, 0.0);
    }
    let (vx, vy) = if s_tt >= s_pp { (s_tt, s_tp) } else { (s_tp, s_pp) };
    let norm = (vx * vx + vy * vy).sqrt();
    let (vx, vy) = (vx / norm, vy / norm);
    let scale = (vx * s_ty + vy * s_py) / trace;
    (scale * vx, scale * vy)
}
