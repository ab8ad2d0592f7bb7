//! Grouping and counting over comment collections. Every function is pure and
//! returns an empty result for empty input.

use crate::domain::{Comment, Program, Sentiment};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateSentimentCount {
    pub date: NaiveDate,
    pub sentiment: Sentiment,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekdaySentimentCount {
    pub weekday: &'static str,
    pub sentiment: Sentiment,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatioPoint {
    pub date: NaiveDate,
    pub ratio: f64,
}

/// Positive share per day for one program. Days without comments are absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentSeries {
    pub program: Program,
    pub points: Vec<RatioPoint>,
}

impl SentimentSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn mean_ratio(&self) -> Option<f64> {
        if self.points.is_empty() {
            return None;
        }
        Some(self.points.iter().map(|p| p.ratio).sum::<f64>() / self.points.len() as f64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgramDailyCount {
    pub date: NaiveDate,
    pub program: Program,
    pub count: usize,
}

/// One row of the weekly pivot: counts per sentiment for (program, ISO week).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeeklyReportRow {
    pub program: Program,
    pub week: u32,
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl WeeklyReportRow {
    fn empty(program: Program, week: u32) -> Self {
        Self {
            program,
            week,
            positive: 0,
            neutral: 0,
            negative: 0,
        }
    }

    fn bump(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Neutral => self.neutral += 1,
            Sentiment::Negative => self.negative += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WeeklyReport {
    pub rows: Vec<WeeklyReportRow>,
}

impl WeeklyReport {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, program: Program, week: u32) -> Option<&WeeklyReportRow> {
        self.rows.iter().find(|r| r.program == program && r.week == week)
    }
}

/// Only sentiments that occur appear in the result.
pub fn counts_by_sentiment(comments: &[Comment]) -> BTreeMap<Sentiment, usize> {
    let mut out = BTreeMap::new();
    for c in comments {
        *out.entry(c.sentiment).or_insert(0) += 1;
    }
    out
}

/// Ordered by date ascending, then sentiment.
pub fn counts_by_date_and_sentiment(comments: &[Comment]) -> Vec<DateSentimentCount> {
    let mut grouped: BTreeMap<(NaiveDate, Sentiment), usize> = BTreeMap::new();
    for c in comments {
        *grouped.entry((c.date, c.sentiment)).or_insert(0) += 1;
    }

    grouped
        .into_iter()
        .map(|((date, sentiment), count)| DateSentimentCount {
            date,
            sentiment,
            count,
        })
        .collect()
}

/// Ordered Monday first.
pub fn counts_by_weekday_and_sentiment(comments: &[Comment]) -> Vec<WeekdaySentimentCount> {
    let mut grouped: BTreeMap<(u32, Sentiment), usize> = BTreeMap::new();
    for c in comments {
        let wd = c.date.weekday().num_days_from_monday();
        *grouped.entry((wd, c.sentiment)).or_insert(0) += 1;
    }

    grouped
        .into_iter()
        .map(|((wd, sentiment), count)| WeekdaySentimentCount {
            weekday: weekday_name(weekday_from_monday(wd)),
            sentiment,
            count,
        })
        .collect()
}

pub fn positive_ratio_series(comments: &[Comment], program: Program) -> SentimentSeries {
    // (positive, total) per date
    let mut per_day: BTreeMap<NaiveDate, (usize, usize)> = BTreeMap::new();
    for c in comments.iter().filter(|c| c.program == program) {
        let entry = per_day.entry(c.date).or_insert((0, 0));
        if c.sentiment == Sentiment::Positive {
            entry.0 += 1;
        }
        entry.1 += 1;
    }

    let points = per_day
        .into_iter()
        .map(|(date, (positive, total))| RatioPoint {
            date,
            ratio: positive as f64 / total as f64,
        })
        .collect();

    SentimentSeries { program, points }
}

/// Daily counts of one sentiment, grouped by (date, program).
pub fn daily_counts_by_program(
    comments: &[Comment],
    sentiment: Sentiment,
) -> Vec<ProgramDailyCount> {
    let mut grouped: BTreeMap<(NaiveDate, Program), usize> = BTreeMap::new();
    for c in comments.iter().filter(|c| c.sentiment == sentiment) {
        *grouped.entry((c.date, c.program)).or_insert(0) += 1;
    }

    grouped
        .into_iter()
        .map(|((date, program), count)| ProgramDailyCount {
            date,
            program,
            count,
        })
        .collect()
}

/// Pivot keyed by (program, ISO week number), restricted to `programs`.
/// Sentiments without comments in a group count as 0.
pub fn weekly_report(comments: &[Comment], programs: &[Program]) -> WeeklyReport {
    let mut grouped: BTreeMap<(Program, u32), WeeklyReportRow> = BTreeMap::new();
    for c in comments.iter().filter(|c| programs.contains(&c.program)) {
        let week = iso_week(c.date);
        grouped
            .entry((c.program, week))
            .or_insert_with(|| WeeklyReportRow::empty(c.program, week))
            .bump(c.sentiment);
    }

    WeeklyReport {
        rows: grouped.into_values().collect(),
    }
}

pub fn iso_week(date: NaiveDate) -> u32 {
    date.iso_week().week()
}

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn weekday_from_monday(n: u32) -> Weekday {
    match n {
        0 => Weekday::Mon,
        1 => Weekday::Tue,
        2 => Weekday::Wed,
        3 => Weekday::Thu,
        4 => Weekday::Fri,
        5 => Weekday::Sat,
        _ => Weekday::Sun,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DateRange;
    use crate::generator::generate_comments;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn comment(date: NaiveDate, program: Program, sentiment: Sentiment) -> Comment {
        Comment {
            date,
            program,
            text: String::new(),
            sentiment,
        }
    }

    #[test]
    fn empty_input_gives_empty_results() {
        assert!(counts_by_sentiment(&[]).is_empty());
        assert!(counts_by_date_and_sentiment(&[]).is_empty());
        assert!(counts_by_weekday_and_sentiment(&[]).is_empty());
        assert!(positive_ratio_series(&[], Program::MasterChef).is_empty());
        assert!(daily_counts_by_program(&[], Sentiment::Positive).is_empty());
        assert!(weekly_report(&[], &Program::ALL).is_empty());
    }

    #[test]
    fn sentiment_counts_sum_to_collection_size() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let range = DateRange::new(d(2025, 5, 1), d(2025, 5, 10));
            let comments = generate_comments(Program::TheVoice, range, &mut rng);
            let counts = counts_by_sentiment(&comments);
            assert_eq!(counts.values().sum::<usize>(), comments.len());
        }
    }

    #[test]
    fn date_sentiment_counts_are_ordered() {
        let comments = vec![
            comment(d(2025, 5, 2), Program::MasterChef, Sentiment::Negative),
            comment(d(2025, 5, 1), Program::MasterChef, Sentiment::Neutral),
            comment(d(2025, 5, 1), Program::MasterChef, Sentiment::Positive),
            comment(d(2025, 5, 1), Program::MasterChef, Sentiment::Positive),
        ];

        let rows: Vec<_> = counts_by_date_and_sentiment(&comments)
            .into_iter()
            .map(|r| (r.date, r.sentiment, r.count))
            .collect();
        assert_eq!(
            rows,
            vec![
                (d(2025, 5, 1), Sentiment::Positive, 2),
                (d(2025, 5, 1), Sentiment::Neutral, 1),
                (d(2025, 5, 2), Sentiment::Negative, 1),
            ]
        );
    }

    #[test]
    fn weekday_counts_start_on_monday() {
        // 2025-05-04 is a Sunday, 2025-05-05 a Monday.
        let comments = vec![
            comment(d(2025, 5, 4), Program::MasterChef, Sentiment::Positive),
            comment(d(2025, 5, 5), Program::MasterChef, Sentiment::Negative),
            comment(d(2025, 5, 12), Program::MasterChef, Sentiment::Negative),
        ];

        let rows = counts_by_weekday_and_sentiment(&comments);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].weekday, "Monday");
        assert_eq!(rows[0].count, 2);
        assert_eq!(rows[1].weekday, "Sunday");
    }

    #[test]
    fn ratio_series_filters_program_and_skips_empty_days() {
        let comments = vec![
            comment(d(2025, 5, 1), Program::MasterChef, Sentiment::Positive),
            comment(d(2025, 5, 1), Program::MasterChef, Sentiment::Negative),
            comment(d(2025, 5, 1), Program::TheVoice, Sentiment::Positive),
            comment(d(2025, 5, 2), Program::TheVoice, Sentiment::Negative),
            comment(d(2025, 5, 3), Program::MasterChef, Sentiment::Neutral),
        ];

        let series = positive_ratio_series(&comments, Program::MasterChef);
        assert_eq!(
            series.points,
            vec![
                RatioPoint { date: d(2025, 5, 1), ratio: 0.5 },
                RatioPoint { date: d(2025, 5, 3), ratio: 0.0 },
            ]
        );
        assert_eq!(series.mean_ratio(), Some(0.25));
        assert_eq!(positive_ratio_series(&[], Program::TheVoice).mean_ratio(), None);
    }

    #[test]
    fn ratio_series_is_bounded_and_unique_per_date() {
        let mut rng = StdRng::seed_from_u64(11);
        let range = DateRange::new(d(2025, 4, 1), d(2025, 5, 31));
        let comments = generate_comments(Program::MasterChef, range, &mut rng);

        let series = positive_ratio_series(&comments, Program::MasterChef);
        assert_eq!(series.len(), 61);
        assert!(series.points.iter().all(|p| (0.0..=1.0).contains(&p.ratio)));
        assert!(series.points.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn daily_counts_only_include_requested_sentiment() {
        let comments: Vec<_> = (0..5)
            .map(|_| comment(d(2025, 5, 1), Program::TheVoice, Sentiment::Positive))
            .chain([comment(d(2025, 5, 1), Program::TheVoice, Sentiment::Negative)])
            .collect();

        let rows = daily_counts_by_program(&comments, Sentiment::Positive);
        assert_eq!(
            rows,
            vec![ProgramDailyCount { date: d(2025, 5, 1), program: Program::TheVoice, count: 5 }]
        );
    }

    #[test]
    fn weekly_report_fills_missing_sentiments_with_zero() {
        // 2025-04-28..2025-05-04 is ISO week 18.
        let comments = vec![
            comment(d(2025, 4, 29), Program::MasterChef, Sentiment::Positive),
            comment(d(2025, 5, 1), Program::MasterChef, Sentiment::Positive),
            comment(d(2025, 5, 2), Program::TheVoice, Sentiment::Negative),
        ];

        let report = weekly_report(&comments, &Program::ALL);
        assert_eq!(report.rows.len(), 2);
        assert_eq!(
            report.row(Program::MasterChef, 18),
            Some(&WeeklyReportRow {
                program: Program::MasterChef,
                week: 18,
                positive: 2,
                neutral: 0,
                negative: 0,
            })
        );
        let voice = report.row(Program::TheVoice, 18).unwrap();
        assert_eq!((voice.positive, voice.neutral, voice.negative), (0, 0, 1));
    }

    #[test]
    fn weekly_report_respects_program_selection() {
        let comments = vec![
            comment(d(2025, 5, 1), Program::MasterChef, Sentiment::Positive),
            comment(d(2025, 5, 8), Program::TheVoice, Sentiment::Neutral),
        ];

        let report = weekly_report(&comments, &[Program::TheVoice]);
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].week, 19);
        assert_eq!(report.rows[0].total(), 1);
    }
}
