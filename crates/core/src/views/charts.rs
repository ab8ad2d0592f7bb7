//! Plotly figure specs. The browser draws them with plotly.js.

use crate::aggregate::{DateSentimentCount, ProgramDailyCount, WeekdaySentimentCount};
use crate::domain::{Comment, Program, Sentiment};
use crate::forecast::ForecastResult;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Value>,
    pub layout: Value,
}

impl Figure {
    fn new(title: &str, data: Vec<Value>) -> Self {
        Self {
            data,
            layout: json!({
                "title": {"text": title},
                "margin": {"t": 40, "r": 10, "l": 50, "b": 40},
                "paper_bgcolor": "rgba(0,0,0,0)",
                "plot_bgcolor": "rgba(0,0,0,0)",
            }),
        }
    }

    fn with_layout(mut self, key: &str, value: Value) -> Self {
        if let Value::Object(map) = &mut self.layout {
            map.insert(key.to_string(), value);
        }
        self
    }
}

/// Donut chart, one slice per sentiment present.
pub fn proportion_pie(counts: &BTreeMap<Sentiment, usize>) -> Figure {
    let labels: Vec<_> = counts.keys().map(|s| s.as_str()).collect();
    let values: Vec<_> = counts.values().copied().collect();
    let colors: Vec<_> = counts.keys().map(|s| s.color()).collect();

    Figure::new(
        "Distribution",
        vec![json!({
            "type": "pie",
            "labels": labels,
            "values": values,
            "hole": 0.4,
            "marker": {"colors": colors},
            "sort": false,
        })],
    )
}

/// Grouped bars of date x count, one trace per sentiment.
pub fn sentiment_over_time(rows: &[DateSentimentCount]) -> Figure {
    let traces = Sentiment::ALL
        .into_iter()
        .filter_map(|s| {
            let (x, y): (Vec<_>, Vec<_>) = rows
                .iter()
                .filter(|r| r.sentiment == s)
                .map(|r| (r.date.to_string(), r.count))
                .unzip();
            (!x.is_empty()).then(|| bar_trace(s, x, y))
        })
        .collect();

    Figure::new("Sentiment over time", traces).with_layout("barmode", json!("group"))
}

pub fn sentiment_by_weekday(rows: &[WeekdaySentimentCount]) -> Figure {
    let traces = Sentiment::ALL
        .into_iter()
        .filter_map(|s| {
            let (x, y): (Vec<_>, Vec<_>) = rows
                .iter()
                .filter(|r| r.sentiment == s)
                .map(|r| (r.weekday.to_string(), r.count))
                .unzip();
            (!x.is_empty()).then(|| bar_trace(s, x, y))
        })
        .collect();

    Figure::new("Sentiment by weekday", traces).with_layout("barmode", json!("group"))
}

/// Histogram over the raw sentiment labels.
pub fn sentiment_histogram(comments: &[Comment]) -> Figure {
    let traces = Sentiment::ALL
        .into_iter()
        .filter_map(|s| {
            let x: Vec<_> = comments
                .iter()
                .filter(|c| c.sentiment == s)
                .map(|c| c.sentiment.as_str())
                .collect();
            (!x.is_empty()).then(|| {
                json!({
                    "type": "histogram",
                    "name": s.as_str(),
                    "x": x,
                    "marker": {"color": s.color()},
                })
            })
        })
        .collect();

    Figure::new("Distribution of sentiment", traces)
}

/// One line per program.
pub fn program_trend(title: &str, rows: &[ProgramDailyCount]) -> Figure {
    let mut by_program: BTreeMap<Program, (Vec<String>, Vec<usize>)> = BTreeMap::new();
    for r in rows {
        let entry = by_program.entry(r.program).or_default();
        entry.0.push(r.date.to_string());
        entry.1.push(r.count);
    }

    let traces = by_program
        .into_iter()
        .map(|(program, (x, y))| {
            json!({
                "type": "scatter",
                "mode": "lines+markers",
                "name": program.name(),
                "x": x,
                "y": y,
            })
        })
        .collect();

    Figure::new(title, traces)
}

/// History as points, in-sample fit and projection as lines, with the
/// projection's uncertainty band shaded.
pub fn forecast_plot(result: &ForecastResult) -> Figure {
    let history_x: Vec<_> = result.history.iter().map(|p| p.date.to_string()).collect();
    let history_y: Vec<_> = result.history.iter().map(|p| p.ratio).collect();
    let fitted_x: Vec<_> = result.fitted.iter().map(|p| p.date.to_string()).collect();
    let fitted_y: Vec<_> = result.fitted.iter().map(|p| p.yhat).collect();
    let proj_x: Vec<_> = result.projection.iter().map(|p| p.date.to_string()).collect();
    let proj_y: Vec<_> = result.projection.iter().map(|p| p.yhat).collect();
    let upper_y: Vec<_> = result.projection.iter().map(|p| p.yhat_upper).collect();
    let lower_y: Vec<_> = result.projection.iter().map(|p| p.yhat_lower).collect();

    Figure::new(
        &format!("Positive ratio forecast: {}", result.program),
        vec![
            json!({
                "type": "scatter", "mode": "lines", "name": "upper",
                "x": proj_x, "y": upper_y,
                "line": {"width": 0}, "showlegend": false, "hoverinfo": "skip",
            }),
            json!({
                "type": "scatter", "mode": "lines", "name": "uncertainty",
                "x": proj_x, "y": lower_y,
                "line": {"width": 0}, "fill": "tonexty",
                "fillcolor": "rgba(0,114,178,0.2)",
            }),
            json!({
                "type": "scatter", "mode": "markers", "name": "observed",
                "x": history_x, "y": history_y,
                "marker": {"color": "black", "size": 5},
            }),
            json!({
                "type": "scatter", "mode": "lines", "name": "fitted",
                "x": fitted_x, "y": fitted_y,
                "line": {"color": "#0072B2"},
            }),
            json!({
                "type": "scatter", "mode": "lines", "name": "forecast",
                "x": proj_x, "y": proj_y,
                "line": {"color": "#0072B2", "dash": "dash"},
            }),
        ],
    )
    .with_layout("yaxis", json!({"title": {"text": "positive ratio"}}))
}

fn bar_trace(sentiment: Sentiment, x: Vec<String>, y: Vec<usize>) -> Value {
    json!({
        "type": "bar",
        "name": sentiment.as_str(),
        "x": x,
        "y": y,
        "marker": {"color": sentiment.color()},
    })
}
