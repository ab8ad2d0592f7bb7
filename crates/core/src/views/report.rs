use super::{Notice, ViewContext};
use crate::aggregate::{self, WeeklyReport};
use crate::domain::Program;
use crate::error::{Result, SentimentError};
use crate::store;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
pub struct ReportView {
    pub programs: Vec<Program>,
    pub notice: Option<Notice>,
    pub report: Option<WeeklyReport>,
    pub export_file_name: &'static str,
}

/// Weekly pivot over every stored program, restricted to `programs`.
/// `EmptyAggregateResult` when nothing is stored or nothing survives the filter.
pub fn build(data_dir: &Path, programs: &[Program]) -> Result<WeeklyReport> {
    let records = store::load_programs(data_dir, &Program::ALL)?;
    if records.is_empty() {
        return Err(SentimentError::EmptyAggregateResult);
    }

    let report = aggregate::weekly_report(&records, programs);
    if report.is_empty() {
        return Err(SentimentError::EmptyAggregateResult);
    }
    Ok(report)
}

pub fn render(ctx: &ViewContext<'_>, programs: &[Program]) -> Result<ReportView> {
    let mut view = ReportView {
        programs: programs.to_vec(),
        notice: None,
        report: None,
        export_file_name: store::REPORT_EXPORT_NAME,
    };

    match build(ctx.data_dir, programs) {
        Ok(report) => view.report = Some(report),
        Err(SentimentError::EmptyAggregateResult) => {
            view.notice = Some(Notice::info(
                "No stored data for the selected programs. Run the Dashboard analysis first.",
            ));
        }
        Err(e) => return Err(e),
    }

    Ok(view)
}

pub fn export_csv(data_dir: &Path, programs: &[Program]) -> Result<Vec<u8>> {
    store::report_csv(&build(data_dir, programs)?)
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::super::{NoticeLevel, Selection};
    use super::*;
    use crate::domain::Sentiment;

    #[test]
    fn two_programs_in_week_18() {
        let fx = Fixture::new();
        let mut chef = rows(Program::MasterChef, d(2025, 4, 28), Sentiment::Positive, 3);
        chef.extend(rows(Program::MasterChef, d(2025, 5, 4), Sentiment::Neutral, 1));
        write(fx.dir.path(), Program::MasterChef, &chef);
        write(
            fx.dir.path(),
            Program::TheVoice,
            &rows(Program::TheVoice, d(2025, 5, 1), Sentiment::Negative, 2),
        );

        let view = render(&fx.ctx(Selection::default()), &Program::ALL).unwrap();
        let report = view.report.unwrap();
        assert_eq!(report.rows.len(), 2);

        let chef = report.row(Program::MasterChef, 18).unwrap();
        assert_eq!((chef.positive, chef.neutral, chef.negative), (3, 1, 0));
        let voice = report.row(Program::TheVoice, 18).unwrap();
        assert_eq!((voice.positive, voice.neutral, voice.negative), (0, 0, 2));
    }

    #[test]
    fn no_stored_data_is_informational() {
        let fx = Fixture::new();
        let view = render(&fx.ctx(Selection::default()), &Program::ALL).unwrap();
        assert!(view.report.is_none());
        assert_eq!(view.notice.unwrap().level, NoticeLevel::Info);
    }

    #[test]
    fn empty_selection_is_informational() {
        let fx = Fixture::new();
        write(
            fx.dir.path(),
            Program::TheVoice,
            &rows(Program::TheVoice, d(2025, 5, 1), Sentiment::Negative, 2),
        );

        let view = render(&fx.ctx(Selection::default()), &[]).unwrap();
        assert!(view.report.is_none());
        assert!(view.notice.is_some());
    }

    #[test]
    fn export_contains_pivot_rows() {
        let fx = Fixture::new();
        write(
            fx.dir.path(),
            Program::TheVoice,
            &rows(Program::TheVoice, d(2025, 5, 1), Sentiment::Positive, 4),
        );

        let csv = String::from_utf8(export_csv(fx.dir.path(), &Program::ALL).unwrap()).unwrap();
        assert_eq!(csv, "program,week,positive,neutral,negative\nThe Voice,18,4,0,0\n");
    }
}
