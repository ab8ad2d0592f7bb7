use super::charts::{self, Figure};
use super::{Notice, Selection, ViewContext};
use crate::aggregate;
use crate::domain::{Comment, DateRange, Program, Sentiment};
use crate::error::Result;
use crate::generator::sample_comments;
use crate::store;
use serde::Serialize;

pub const SAMPLE_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentSummary {
    pub total: usize,
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardCharts {
    pub proportion: Figure,
    pub over_time: Figure,
    pub by_weekday: Figure,
    pub histogram: Figure,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub program: Program,
    pub range: DateRange,
    pub notice: Option<Notice>,
    pub summary: SentimentSummary,
    pub charts: Option<DashboardCharts>,
    pub samples: Vec<Comment>,
    pub export_file_name: String,
}

pub fn render(ctx: &ViewContext<'_>) -> Result<DashboardView> {
    let Selection { program, range } = ctx.selection;
    let comments = ctx.generator.comments(program, range)?;

    let mut view = DashboardView {
        program,
        range,
        notice: None,
        summary: SentimentSummary::default(),
        charts: None,
        samples: Vec::new(),
        export_file_name: store::dashboard_export_name(program),
    };

    if comments.is_empty() {
        view.notice = Some(Notice::info(format!(
            "No comments between {} and {}. Pick a valid date range.",
            range.start, range.end
        )));
        return Ok(view);
    }

    let counts = aggregate::counts_by_sentiment(&comments);
    let count = |s: Sentiment| counts.get(&s).copied().unwrap_or(0);
    view.summary = SentimentSummary {
        total: comments.len(),
        positive: count(Sentiment::Positive),
        neutral: count(Sentiment::Neutral),
        negative: count(Sentiment::Negative),
    };

    view.charts = Some(DashboardCharts {
        proportion: charts::proportion_pie(&counts),
        over_time: charts::sentiment_over_time(&aggregate::counts_by_date_and_sentiment(
            &comments,
        )),
        by_weekday: charts::sentiment_by_weekday(&aggregate::counts_by_weekday_and_sentiment(
            &comments,
        )),
        histogram: charts::sentiment_histogram(&comments),
    });
    view.samples = sample_comments(&comments, SAMPLE_SIZE, &mut rand::rng());

    Ok(view)
}

/// The full generated dataset for the current selection, as served for download.
pub fn export_csv(ctx: &ViewContext<'_>) -> Result<(String, Vec<u8>)> {
    let Selection { program, range } = ctx.selection;
    let comments = ctx.generator.comments(program, range)?;
    let file_name = store::dashboard_export_name(program);
    let bytes = store::comments_csv(&comments, &file_name)?;
    Ok((file_name, bytes))
}
