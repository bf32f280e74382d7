use inventory_report::{
    api,
    config::{Config, DatabaseBackend},
    repository::{InMemoryItemRepository, ItemRepository, SqliteItemRepository},
    seed,
    state::AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    tracing::info!("Starting inventory report service...");

    let config = Config::load()?;
    tracing::info!("Configuration loaded");

    let repository = connect_repository(&config).await?;

    if config.seed.enabled {
        seed::seed_if_empty(repository.as_ref()).await?;
    }

    let app_state = AppState::from_config(repository, config.clone());
    tracing::info!(
        "Report template '{}' ({:?} source, cache {})",
        app_state.reports.template_path(),
        config.report.template_source,
        if config.report.cache_compiled { "on" } else { "off" }
    );

    let app = api::build_router(app_state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Inventory report service listening on {}", addr);
    tracing::info!("Endpoints:");
    tracing::info!("  - GET/POST        /api/items");
    tracing::info!("  - GET/PUT/DELETE  /api/items/:id");
    tracing::info!("  - GET             /api/reports/preview?format=");
    tracing::info!("  - GET/POST        /api/reports/generate?format=");
    tracing::info!("  - GET             /api/reports/sample?format=");
    tracing::info!("  - GET             /health");

    axum::serve(listener, app).await?;

    Ok(())
}

async fn connect_repository(config: &Config) -> anyhow::Result<Arc<dyn ItemRepository>> {
    match config.database.backend {
        DatabaseBackend::Sqlite => {
            let repository =
                SqliteItemRepository::new(&config.database.url, config.database.max_connections)
                    .await?;
            repository.run_migrations().await?;
            repository.health_check().await?;
            tracing::info!("Database connected and migrations complete");
            Ok(Arc::new(repository))
        }
        DatabaseBackend::Memory => {
            tracing::info!("Using in-memory item repository");
            Ok(Arc::new(InMemoryItemRepository::new()))
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,inventory_report=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
