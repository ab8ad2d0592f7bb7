use crate::aggregate::RatioPoint;
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("model needs at least {required} distinct dates, got {actual}")]
    TooFewObservations { required: usize, actual: usize },

    #[error("model did not converge: {0}")]
    NonConvergence(String),
}

/// z-score of a two-sided 80% interval.
const INTERVAL_Z: f64 = 1.2816;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelPoint {
    pub date: NaiveDate,
    pub yhat: f64,
    pub yhat_lower: f64,
    pub yhat_upper: f64,
}

/// Time-series model seam used by the forecaster.
///
/// Implementations may return in-sample fitted values alongside the projected
/// dates; callers separate them by date, never by position.
pub trait ForecastModel: Send + Sync {
    fn name(&self) -> &'static str;

    fn fit_predict(
        &self,
        history: &[RatioPoint],
        horizon: u32,
    ) -> Result<Vec<ModelPoint>, ModelError>;
}

/// Additive `trend + seasonality` model with one observation per day.
///
/// The trend is an ordinary least squares line over day offsets. The seasonal
/// term is the mean detrended residual per position in a `period`-day cycle,
/// centered to sum to zero, and is only fitted once the history spans
/// `min_cycles` full cycles.
#[derive(Debug, Clone)]
pub struct AdditiveModel {
    pub period: usize,
    pub min_cycles: usize,
}

impl Default for AdditiveModel {
    fn default() -> Self {
        Self {
            period: 7,
            min_cycles: 2,
        }
    }
}

struct Fit {
    origin: NaiveDate,
    intercept: f64,
    slope: f64,
    seasonal: Vec<f64>,
    /// Residual standard deviation over the history.
    sigma: f64,
}

impl Fit {
    fn offset(&self, date: NaiveDate) -> i64 {
        (date - self.origin).num_days()
    }

    fn predict(&self, date: NaiveDate) -> f64 {
        let t = self.offset(date);
        let season = if self.seasonal.is_empty() {
            0.0
        } else {
            self.seasonal[t.rem_euclid(self.seasonal.len() as i64) as usize]
        };
        self.intercept + self.slope * t as f64 + season
    }
}

impl AdditiveModel {
    fn fit(&self, history: &[RatioPoint]) -> Result<Fit, ModelError> {
        let origin = history
            .iter()
            .map(|p| p.date)
            .min()
            .ok_or(ModelError::TooFewObservations {
                required: 2,
                actual: 0,
            })?;

        let n = history.len() as f64;
        let ts: Vec<f64> = history
            .iter()
            .map(|p| (p.date - origin).num_days() as f64)
            .collect();
        let t_mean = ts.iter().sum::<f64>() / n;
        let y_mean = history.iter().map(|p| p.ratio).sum::<f64>() / n;

        let mut sxx = 0.0;
        let mut sxy = 0.0;
        for (t, p) in ts.iter().zip(history) {
            sxx += (t - t_mean) * (t - t_mean);
            sxy += (t - t_mean) * (p.ratio - y_mean);
        }
        if sxx == 0.0 {
            return Err(ModelError::TooFewObservations {
                required: 2,
                actual: 1,
            });
        }

        let slope = sxy / sxx;
        let intercept = y_mean - slope * t_mean;
        let mut fit = Fit {
            origin,
            intercept,
            slope,
            seasonal: Vec::new(),
            sigma: 0.0,
        };

        let span_days = ts.iter().fold(0.0_f64, |a, &b| a.max(b)) as usize + 1;
        if self.period > 1 && span_days >= self.period * self.min_cycles {
            fit.seasonal = self.seasonal_component(&fit, history);
        }

        let sse: f64 = history
            .iter()
            .map(|p| (p.ratio - fit.predict(p.date)).powi(2))
            .sum();
        let dof = history.len().saturating_sub(2).max(1) as f64;
        fit.sigma = (sse / dof).sqrt();

        Ok(fit)
    }

    fn seasonal_component(&self, fit: &Fit, history: &[RatioPoint]) -> Vec<f64> {
        let mut sums = vec![0.0; self.period];
        let mut counts = vec![0usize; self.period];
        for p in history {
            let slot = fit.offset(p.date).rem_euclid(self.period as i64) as usize;
            sums[slot] += p.ratio - (fit.intercept + fit.slope * fit.offset(p.date) as f64);
            counts[slot] += 1;
        }

        let mut seasonal: Vec<f64> = sums
            .iter()
            .zip(&counts)
            .map(|(s, &c)| if c > 0 { s / c as f64 } else { 0.0 })
            .collect();
        let mean = seasonal.iter().sum::<f64>() / self.period as f64;
        for s in &mut seasonal {
            *s -= mean;
        }
        seasonal
    }
}

impl ForecastModel for AdditiveModel {
    fn name(&self) -> &'static str {
        "additive_trend_seasonal"
    }

    fn fit_predict(
        &self,
        history: &[RatioPoint],
        horizon: u32,
    ) -> Result<Vec<ModelPoint>, ModelError> {
        let fit = self.fit(history)?;
        let last = history
            .iter()
            .map(|p| p.date)
            .max()
            .unwrap_or(fit.origin);

        let future = (1..=i64::from(horizon)).map(|k| last + Duration::days(k));
        let half_width = INTERVAL_Z * fit.sigma;
        let out: Vec<ModelPoint> = history
            .iter()
            .map(|p| p.date)
            .chain(future)
            .map(|date| {
                let yhat = fit.predict(date);
                ModelPoint {
                    date,
                    yhat,
                    yhat_lower: yhat - half_width,
                    yhat_upper: yhat + half_width,
                }
            })
            .collect();

        if let Some(bad) = out.iter().find(|p| !p.yhat.is_finite()) {
            return Err(ModelError::NonConvergence(format!(
                "non-finite prediction on {}",
                bad.date
            )));
        }

        Ok(out)
    }
}
