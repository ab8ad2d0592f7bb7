use super::charts::{self, Figure};
use super::{Notice, ViewContext};
use crate::aggregate;
use crate::domain::Program;
use crate::error::{Result, SentimentError};
use crate::forecast::{Horizon, ModelPoint, Recommendation};
use crate::store;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ForecastPanel {
    pub recommendation: Recommendation,
    pub message: &'static str,
    pub trend: f64,
    pub base: f64,
    pub delta: f64,
    pub projection: Vec<ModelPoint>,
    pub plot: Figure,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForecastView {
    pub program: Program,
    pub data_file: String,
    /// Stored rows found for the program; `None` when the file is absent.
    pub rows: Option<usize>,
    pub horizon_options: Vec<u32>,
    pub horizon: u32,
    pub notice: Option<Notice>,
    pub forecast: Option<ForecastPanel>,
}

pub fn render(ctx: &ViewContext<'_>, horizon: Horizon, run: bool) -> Result<ForecastView> {
    let program = ctx.selection.program;
    let mut view = ForecastView {
        program,
        data_file: store::data_file_name(program),
        rows: None,
        horizon_options: Horizon::ALL.iter().map(|h| h.days()).collect(),
        horizon: horizon.days(),
        notice: None,
        forecast: None,
    };

    let records = match store::load_program(ctx.data_dir, program) {
        Ok(records) => records,
        Err(SentimentError::MissingDataFile { path }) => {
            tracing::info!(%program, path = %path.display(), "no stored data; forecast skipped");
            view.notice = Some(Notice::warning(format!(
                "No stored sentiment data for {program} ({}). Run the Dashboard analysis first.",
                view.data_file
            )));
            return Ok(view);
        }
        Err(e) => return Err(e),
    };
    view.rows = Some(records.len());

    if !run {
        return Ok(view);
    }

    let series = aggregate::positive_ratio_series(&records, program);
    match ctx.forecaster.forecast(&series, horizon.days()) {
        Ok(result) => {
            view.forecast = Some(ForecastPanel {
                recommendation: result.recommendation,
                message: result.recommendation.message(),
                trend: result.trend,
                base: result.base,
                delta: result.delta,
                plot: charts::forecast_plot(&result),
                projection: result.projection,
            });
        }
        Err(e) if e.is_recoverable() => {
            tracing::warn!(%program, error = %e, "forecast not rendered");
            view.notice = Some(Notice::warning(format!("Forecast unavailable: {e}")));
        }
        Err(e) => return Err(e),
    }

    Ok(view)
}
