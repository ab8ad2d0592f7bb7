use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SentimentError {
    /// Expected per-program CSV file is absent.
    #[error("data file not found: {}", .path.display())]
    MissingDataFile { path: PathBuf },

    #[error("insufficient history: need at least {required} dated points, got {actual}")]
    InsufficientHistory { required: usize, actual: usize },

    #[error("forecast unavailable: {0}")]
    ForecastUnavailable(String),

    #[error("no rows left after filtering")]
    EmptyAggregateResult,

    #[error("unknown program: {0}")]
    UnknownProgram(String),

    #[error("date range spans {days} days, at most {max} are supported")]
    RangeTooLong { days: i64, max: i64 },

    #[error("unsupported forecast horizon: {0} days (expected 14 or 30)")]
    InvalidHorizon(u32),

    #[error("malformed CSV in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SentimentError {
    /// Errors the views turn into a user-visible notice instead of failing the render.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SentimentError::MissingDataFile { .. }
                | SentimentError::InsufficientHistory { .. }
                | SentimentError::ForecastUnavailable(_)
                | SentimentError::EmptyAggregateResult
        )
    }
}

pub type Result<T> = std::result::Result<T, SentimentError>;
