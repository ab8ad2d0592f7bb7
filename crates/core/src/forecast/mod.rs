pub mod model;

use crate::aggregate::{RatioPoint, SentimentSeries};
use crate::domain::Program;
use crate::error::{Result, SentimentError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub use model::{AdditiveModel, ForecastModel, ModelError, ModelPoint};

/// Minimum number of distinct dates a series needs before it can be forecast.
pub const MIN_HISTORY_POINTS: usize = 2;

/// |delta| must exceed this to count as a change in sentiment.
pub const RECOMMENDATION_THRESHOLD: f64 = 0.05;

/// Forecast lengths offered by the Forecast view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Horizon {
    #[default]
    TwoWeeks,
    ThirtyDays,
}

impl Horizon {
    pub const ALL: [Horizon; 2] = [Horizon::TwoWeeks, Horizon::ThirtyDays];

    pub fn days(self) -> u32 {
        match self {
            Horizon::TwoWeeks => 14,
            Horizon::ThirtyDays => 30,
        }
    }
}

impl TryFrom<u32> for Horizon {
    type Error = SentimentError;

    fn try_from(days: u32) -> Result<Self> {
        match days {
            14 => Ok(Horizon::TwoWeeks),
            30 => Ok(Horizon::ThirtyDays),
            other => Err(SentimentError::InvalidHorizon(other)),
        }
    }
}

impl From<Horizon> for u32 {
    fn from(h: Horizon) -> u32 {
        h.days()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Rising,
    Declining,
    Stable,
}

impl Recommendation {
    /// Thresholds are exclusive: a delta of exactly ±0.05 is stable.
    pub fn from_delta(delta: f64) -> Self {
        if delta > RECOMMENDATION_THRESHOLD {
            Recommendation::Rising
        } else if delta < -RECOMMENDATION_THRESHOLD {
            Recommendation::Declining
        } else {
            Recommendation::Stable
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Recommendation::Rising => "rising sentiment, recommend promotion/continuation",
            Recommendation::Declining => "declining sentiment, recommend content reconsideration",
            Recommendation::Stable => "stable sentiment, no action needed",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ForecastResult {
    pub program: Program,
    pub horizon_days: u32,
    pub model: &'static str,
    pub history: Vec<RatioPoint>,
    /// In-sample values the model produced for historical dates.
    pub fitted: Vec<ModelPoint>,
    /// One value per projected future date.
    pub projection: Vec<ModelPoint>,
    /// Mean projected ratio.
    pub trend: f64,
    /// Mean historical ratio.
    pub base: f64,
    pub delta: f64,
    pub recommendation: Recommendation,
}

pub struct Forecaster<M = AdditiveModel> {
    model: M,
}

impl Forecaster<AdditiveModel> {
    pub fn additive() -> Self {
        Self::new(AdditiveModel::default())
    }
}

impl Default for Forecaster<AdditiveModel> {
    fn default() -> Self {
        Self::additive()
    }
}

impl<M: ForecastModel> Forecaster<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    pub fn forecast(&self, series: &SentimentSeries, horizon_days: u32) -> Result<ForecastResult> {
        let distinct: BTreeSet<_> = series.points.iter().map(|p| p.date).collect();
        if distinct.len() < MIN_HISTORY_POINTS {
            return Err(SentimentError::InsufficientHistory {
                required: MIN_HISTORY_POINTS,
                actual: distinct.len(),
            });
        }
        if horizon_days == 0 {
            return Err(SentimentError::ForecastUnavailable(
                "horizon must be at least one day".to_string(),
            ));
        }

        let mut history = series.points.clone();
        history.sort_by_key(|p| p.date);
        let last = history[history.len() - 1].date;

        let predicted = self
            .model
            .fit_predict(&history, horizon_days)
            .map_err(|e| SentimentError::ForecastUnavailable(e.to_string()))?;

        let (projection, fitted): (Vec<ModelPoint>, Vec<ModelPoint>) =
            predicted.into_iter().partition(|p| p.date > last);
        if projection.is_empty() {
            return Err(SentimentError::ForecastUnavailable(format!(
                "{} returned no dates after {last}",
                self.model.name()
            )));
        }

        let trend = projection.iter().map(|p| p.yhat).sum::<f64>() / projection.len() as f64;
        let base = series
            .mean_ratio()
            .ok_or(SentimentError::InsufficientHistory {
                required: MIN_HISTORY_POINTS,
                actual: 0,
            })?;
        let delta = trend - base;
        let recommendation = Recommendation::from_delta(delta);

        tracing::info!(
            program = %series.program,
            horizon_days,
            model = self.model.name(),
            history_len = history.len(),
            trend,
            base,
            delta,
            ?recommendation,
            "forecast computed"
        );

        Ok(ForecastResult {
            program: series.program,
            horizon_days,
            model: self.model.name(),
            history,
            fitted,
            projection,
            trend,
            base,
            delta,
            recommendation,
        })
    }
}
