use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod error;
mod routes;
mod shell;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = sentiment_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    match settings.data_dir_display() {
        Ok(dir) if settings.data_dir.is_dir() => {
            tracing::info!(data_dir = %dir, "reading sentiment data files")
        }
        Ok(dir) => tracing::warn!(
            data_dir = %dir,
            "data dir missing; stored-data views will report missing files"
        ),
        Err(e) => tracing::warn!(error = %e, "cannot resolve data dir"),
    }

    let state = routes::AppState::new(settings.data_dir.clone(), settings.cache_capacity);
    let app = routes::router(state);

    let addr = settings.bind_addr();
    tracing::info!(%addr, "dashboard listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
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
