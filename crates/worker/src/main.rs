use anyhow::Context;
use clap::Parser;
use sentiment_core::domain::{DateRange, Program};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod export;

#[derive(Debug, Parser)]
#[command(name = "sentiment_worker", about = "Write synthetic per-program sentiment history files")]
struct Args {
    /// Program to write (repeatable). Defaults to every known program.
    #[arg(long = "program")]
    programs: Vec<String>,

    /// First day of history (YYYY-MM-DD).
    #[arg(long)]
    start: String,

    /// Last day of history, inclusive (YYYY-MM-DD).
    #[arg(long)]
    end: String,

    /// Target directory. Defaults to SENTIMENT_DATA_DIR.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Generate and log counts without writing files.
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = sentiment_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let range = resolve_range(&args.start, &args.end)?;
    let programs = resolve_programs(&args.programs)?;
    let data_dir = args.data_dir.unwrap_or_else(|| settings.data_dir.clone());

    let result = export::run(&export::ExportPlan {
        programs,
        range,
        data_dir,
        dry_run: args.dry_run,
    });

    if let Err(err) = &result {
        sentry_anyhow::capture_anyhow(err);
        tracing::error!(error = %format!("{err:#}"), "history export failed");
    }
    result.map(|_| ())
}

fn resolve_range(start: &str, end: &str) -> anyhow::Result<DateRange> {
    let start = chrono::NaiveDate::parse_from_str(start, "%Y-%m-%d")
        .with_context(|| format!("invalid --start: {start}"))?;
    let end = chrono::NaiveDate::parse_from_str(end, "%Y-%m-%d")
        .with_context(|| format!("invalid --end: {end}"))?;
    anyhow::ensure!(start <= end, "--start {start} is after --end {end}");
    Ok(DateRange::new(start, end))
}

fn resolve_programs(names: &[String]) -> anyhow::Result<Vec<Program>> {
    if names.is_empty() {
        return Ok(Program::ALL.to_vec());
    }
    let mut out = Vec::with_capacity(names.len());
    for name in names {
        let program: Program = name.parse()?;
        if !out.contains(&program) {
            out.push(program);
        }
    }
    Ok(out)
}

fn init_sentry(settings: &sentiment_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
