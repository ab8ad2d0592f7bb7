use crate::error::ApiError;
use crate::shell;
use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use sentiment_core::domain::{DateRange, Program};
use sentiment_core::forecast::{Forecaster, Horizon};
use sentiment_core::generator::MockDataGenerator;
use sentiment_core::store;
use sentiment_core::views::{self, Selection, ViewContext, ViewKind, ViewOutcome, ViewRequest};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    data_dir: PathBuf,
    generator: MockDataGenerator,
    forecaster: Forecaster,
}

impl AppState {
    pub fn new(data_dir: PathBuf, cache_capacity: u64) -> Self {
        Self {
            inner: Arc::new(Inner {
                data_dir,
                generator: MockDataGenerator::new(cache_capacity),
                forecaster: Forecaster::default(),
            }),
        }
    }

    fn context(&self, selection: Selection) -> ViewContext<'_> {
        ViewContext {
            data_dir: &self.inner.data_dir,
            generator: &self.inner.generator,
            forecaster: &self.inner.forecaster,
            selection,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(shell::index))
        .route("/healthz", get(healthz))
        .route("/api/programs", get(get_programs))
        .route("/api/views/:view", get(get_view))
        .route("/api/export/dashboard.csv", get(export_dashboard))
        .route("/api/export/report.csv", get(export_report))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

/// Raw sidebar/query parameters. Every field is optional; defaults follow
/// [`Selection::default`].
#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    pub program: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub horizon: Option<u32>,
    pub run: Option<bool>,
    /// Comma-separated program names; absent means all programs.
    pub programs: Option<String>,
}

impl ViewQuery {
    fn selection(&self) -> Result<Selection, ApiError> {
        let default = Selection::default();
        let program = match self.program.as_deref() {
            Some(p) => p.parse::<Program>()?,
            None => default.program,
        };
        let start = parse_date("start", self.start.as_deref())?.unwrap_or(default.range.start);
        let end = parse_date("end", self.end.as_deref())?.unwrap_or(default.range.end);

        Ok(Selection {
            program,
            range: DateRange::new(start, end),
        })
    }

    fn programs(&self) -> Result<Vec<Program>, ApiError> {
        let Some(raw) = self.programs.as_deref() else {
            return Ok(Program::ALL.to_vec());
        };

        let mut out = Vec::new();
        for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let program = name.parse::<Program>()?;
            if !out.contains(&program) {
                out.push(program);
            }
        }
        Ok(out)
    }

    fn request(&self, kind: ViewKind) -> Result<ViewRequest, ApiError> {
        Ok(match kind {
            ViewKind::Dashboard => ViewRequest::Dashboard,
            ViewKind::Forecast => ViewRequest::Forecast {
                horizon: match self.horizon {
                    Some(days) => Horizon::try_from(days)?,
                    None => Horizon::default(),
                },
                run: self.run.unwrap_or(false),
            },
            ViewKind::Comparison => ViewRequest::Comparison {
                programs: self.programs()?,
            },
            ViewKind::Report => ViewRequest::Report {
                programs: self.programs()?,
            },
        })
    }
}

fn parse_date(field: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    raw.map(|s| {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map_err(|_| ApiError::BadRequest(format!("invalid {field} date: {s}")))
    })
    .transpose()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProgramsResponse {
    pub programs: Vec<Program>,
    pub views: Vec<ViewKind>,
    pub horizons: Vec<u32>,
    pub default_selection: Selection,
}

async fn get_programs() -> Json<ProgramsResponse> {
    Json(ProgramsResponse {
        programs: Program::ALL.to_vec(),
        views: ViewKind::ALL.to_vec(),
        horizons: Horizon::ALL.iter().map(|h| h.days()).collect(),
        default_selection: Selection::default(),
    })
}

async fn get_view(
    State(state): State<AppState>,
    Path(view): Path<String>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<ViewOutcome>, ApiError> {
    let kind: ViewKind = serde_json::from_value(serde_json::Value::String(view.clone()))
        .map_err(|_| ApiError::NotFound(format!("unknown view: {view}")))?;

    let selection = query.selection()?;
    let request = query.request(kind)?;
    let outcome = blocking(move || views::render(&state.context(selection), request)).await?;

    tracing::info!(view = %kind, program = %selection.program, "view rendered");
    Ok(Json(outcome))
}

async fn export_dashboard(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Result<Response, ApiError> {
    let selection = query.selection()?;
    let (file_name, bytes) =
        blocking(move || views::dashboard::export_csv(&state.context(selection))).await?;
    Ok(csv_download(&file_name, bytes))
}

async fn export_report(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Result<Response, ApiError> {
    let programs = query.programs()?;
    let bytes = views::report::export_csv(&state.inner.data_dir, &programs)?;
    Ok(csv_download(store::REPORT_EXPORT_NAME, bytes))
}

/// Generation, CSV parsing and model fitting are CPU/file bound, so they run
/// off the async workers.
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> sentiment_core::error::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(anyhow::Error::new(e)))?
        .map_err(ApiError::from)
}

fn csv_download(file_name: &str, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}
