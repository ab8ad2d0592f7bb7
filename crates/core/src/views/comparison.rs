use super::charts::{self, Figure};
use super::{Notice, ViewContext};
use crate::aggregate::{self, ProgramDailyCount};
use crate::domain::{Program, Sentiment};
use crate::error::Result;
use crate::store;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonCharts {
    pub positive: Figure,
    pub negative: Figure,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonView {
    pub programs: Vec<Program>,
    pub notice: Option<Notice>,
    pub positive_trend: Vec<ProgramDailyCount>,
    pub negative_trend: Vec<ProgramDailyCount>,
    pub charts: Option<ComparisonCharts>,
}

pub fn render(ctx: &ViewContext<'_>, programs: &[Program]) -> Result<ComparisonView> {
    let records = store::load_programs(ctx.data_dir, programs)?;

    let mut view = ComparisonView {
        programs: programs.to_vec(),
        notice: None,
        positive_trend: Vec::new(),
        negative_trend: Vec::new(),
        charts: None,
    };

    if records.is_empty() {
        view.notice = Some(Notice::warning("No comparison data available."));
        return Ok(view);
    }

    view.positive_trend = aggregate::daily_counts_by_program(&records, Sentiment::Positive);
    view.negative_trend = aggregate::daily_counts_by_program(&records, Sentiment::Negative);
    view.charts = Some(ComparisonCharts {
        positive: charts::program_trend("Positive comments", &view.positive_trend),
        negative: charts::program_trend("Negative comments", &view.negative_trend),
    });

    Ok(view)
}
