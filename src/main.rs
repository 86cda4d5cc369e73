use trade_journal::api::router::create_router;
use trade_journal::config::AppConfig;
use trade_journal::journal::Journal;
use trade_journal::{db, metrics, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let addr = format!("{}:{}", config.host, config.port);

    tracing::info!(
        journal = %config.journal_path.display(),
        screenshots = %config.attachment_dir.display(),
        "Opening journal..."
    );
    let (store, attachments) = db::init_storage(&config)?;

    let metrics_handle = metrics::init_metrics();
    let state = AppState::new(config, Journal::new(store, attachments), metrics_handle);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {addr}");
    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .init();
}
