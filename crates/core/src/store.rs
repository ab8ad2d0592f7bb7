//! Flat CSV storage: one `sentiment_data_<program>.csv` per program.

use crate::aggregate::WeeklyReport;
use crate::domain::{Comment, PersistedRecord, Program};
use crate::error::{Result, SentimentError};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

pub const REPORT_EXPORT_NAME: &str = "sentiment_report.csv";

pub fn data_file_name(program: Program) -> String {
    format!("sentiment_data_{}.csv", program.file_stem())
}

pub fn data_file_path(dir: &Path, program: Program) -> PathBuf {
    dir.join(data_file_name(program))
}

/// Export name for the Dashboard's raw dataset download.
pub fn dashboard_export_name(program: Program) -> String {
    format!("{}_sentiment.csv", program.name())
}

/// Loads a program's stored rows, or `MissingDataFile` if the file is absent.
pub fn load_program(dir: &Path, program: Program) -> Result<Vec<PersistedRecord>> {
    let path = data_file_path(dir, program);
    let file = match File::open(&path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(SentimentError::MissingDataFile { path });
        }
        Err(e) => return Err(e.into()),
    };

    let rows = read_comments(file, &path)?;
    tracing::debug!(%program, path = %path.display(), rows_len = rows.len(), "loaded data file");
    Ok(rows)
}

/// Concatenates stored rows for `programs`, silently skipping absent files.
pub fn load_programs(dir: &Path, programs: &[Program]) -> Result<Vec<PersistedRecord>> {
    let mut out = Vec::new();
    for &program in programs {
        match load_program(dir, program) {
            Ok(rows) => out.extend(rows),
            Err(SentimentError::MissingDataFile { path }) => {
                tracing::debug!(%program, path = %path.display(), "data file missing; skipped");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(out)
}

pub fn read_comments<R: io::Read>(reader: R, source: &Path) -> Result<Vec<Comment>> {
    let mut rdr = csv::Reader::from_reader(reader);
    rdr.deserialize::<Comment>()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| csv_error(source, e))
}

pub fn write_comments<W: io::Write>(writer: W, comments: &[Comment], target: &Path) -> Result<W> {
    let mut wtr = csv::Writer::from_writer(writer);
    if comments.is_empty() {
        wtr.write_record(["date", "program", "text", "sentiment"])
            .map_err(|e| csv_error(target, e))?;
    }
    for c in comments {
        wtr.serialize(c).map_err(|e| csv_error(target, e))?;
    }
    wtr.into_inner().map_err(|e| SentimentError::Io(e.into_error()))
}

/// Raw dataset as CSV bytes with header `date,program,text,sentiment`.
pub fn comments_csv(comments: &[Comment], export_name: &str) -> Result<Vec<u8>> {
    write_comments(Vec::new(), comments, Path::new(export_name))
}

/// Weekly pivot as CSV bytes with header `program,week,positive,neutral,negative`.
pub fn report_csv(report: &WeeklyReport) -> Result<Vec<u8>> {
    let target = Path::new(REPORT_EXPORT_NAME);
    let mut wtr = csv::Writer::from_writer(Vec::new());
    if report.is_empty() {
        wtr.write_record(["program", "week", "positive", "neutral", "negative"])
            .map_err(|e| csv_error(target, e))?;
    }
    for row in &report.rows {
        wtr.serialize(row).map_err(|e| csv_error(target, e))?;
    }
    wtr.into_inner().map_err(|e| SentimentError::Io(e.into_error()))
}

/// Writes (or replaces) a program's data file.
pub fn write_program_file(dir: &Path, program: Program, comments: &[Comment]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = data_file_path(dir, program);
    let file = File::create(&path)?;
    let mut file = write_comments(io::BufWriter::new(file), comments, &path)?;
    io::Write::flush(&mut file)?;
    Ok(path)
}

fn csv_error(path: &Path, source: csv::Error) -> SentimentError {
    SentimentError::Csv {
        path: path.to_path_buf(),
        source,
    }
}
