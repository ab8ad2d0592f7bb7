//! The four dashboard screens and the dispatcher that routes a request to
//! exactly one of them.

pub mod charts;
pub mod comparison;
pub mod dashboard;
pub mod forecast;
pub mod report;

use crate::domain::{DateRange, Program};
use crate::error::Result;
use crate::forecast::{Forecaster, Horizon};
use crate::generator::MockDataGenerator;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

pub use comparison::ComparisonView;
pub use dashboard::DashboardView;
pub use forecast::ForecastView;
pub use report::ReportView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    Dashboard,
    Forecast,
    Comparison,
    Report,
}

impl ViewKind {
    pub const ALL: [ViewKind; 4] = [
        ViewKind::Dashboard,
        ViewKind::Forecast,
        ViewKind::Comparison,
        ViewKind::Report,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ViewKind::Dashboard => "Dashboard",
            ViewKind::Forecast => "Forecast",
            ViewKind::Comparison => "Comparison",
            ViewKind::Report => "Report",
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Sidebar selections shared by every view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub program: Program,
    pub range: DateRange,
}

impl Default for Selection {
    fn default() -> Self {
        let start = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap_or_default();
        let end = NaiveDate::from_ymd_opt(2025, 5, 7).unwrap_or_default();
        Self {
            program: Program::MasterChef,
            range: DateRange::new(start, end),
        }
    }
}

/// Per-session state handed to the active view: where the data files live,
/// the memoizing generator, the forecaster and the current selections.
pub struct ViewContext<'a> {
    pub data_dir: &'a Path,
    pub generator: &'a MockDataGenerator,
    pub forecaster: &'a Forecaster,
    pub selection: Selection,
}

/// Typed inputs for each screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewRequest {
    Dashboard,
    /// The model only runs when `run` is set (explicit user trigger).
    Forecast { horizon: Horizon, run: bool },
    Comparison { programs: Vec<Program> },
    Report { programs: Vec<Program> },
}

impl ViewRequest {
    pub fn kind(&self) -> ViewKind {
        match self {
            ViewRequest::Dashboard => ViewKind::Dashboard,
            ViewRequest::Forecast { .. } => ViewKind::Forecast,
            ViewRequest::Comparison { .. } => ViewKind::Comparison,
            ViewRequest::Report { .. } => ViewKind::Report,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum ViewOutcome {
    Dashboard(DashboardView),
    Forecast(ForecastView),
    Comparison(ComparisonView),
    Report(ReportView),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
}

/// User-visible message shown instead of (or next to) a view's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }
}

pub fn render(ctx: &ViewContext<'_>, request: ViewRequest) -> Result<ViewOutcome> {
    let kind = request.kind();
    tracing::debug!(view = %kind, program = %ctx.selection.program, "rendering view");

    let outcome = match request {
        ViewRequest::Dashboard => ViewOutcome::Dashboard(dashboard::render(ctx)?),
        ViewRequest::Forecast { horizon, run } => {
            ViewOutcome::Forecast(forecast::render(ctx, horizon, run)?)
        }
        ViewRequest::Comparison { programs } => {
            ViewOutcome::Comparison(comparison::render(ctx, &programs)?)
        }
        ViewRequest::Report { programs } => ViewOutcome::Report(report::render(ctx, &programs)?),
    };

    Ok(outcome)
}
