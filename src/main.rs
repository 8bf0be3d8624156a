use assessment_backend::{
    app,
    config::{get_config, init_config},
    database::pool::{create_pool, run_migrations},
    services::{import_service::import_legacy_data, seed_service::seed_default_content},
    AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("assessment_backend=info,tower_http=info"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_config()?;
    let config = get_config();
    init_tracing(config.json_logs);

    if let Some(parent) = config
        .database_url
        .strip_prefix("sqlite://")
        .and_then(|path| std::path::Path::new(path).parent())
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::create_dir_all(config.images_dir()).await?;

    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    let app_state = AppState::new(pool, config.clone());

    app_state
        .user_service
        .ensure_bootstrap_admin(&config.admin)
        .await?;

    if config.seed_default_content {
        seed_default_content(&app_state.content_service).await?;
    }

    if let Some(dir) = &config.legacy_data_dir {
        import_legacy_data(dir, &app_state.user_service, &app_state.content_service).await?;
    }

    info!("Serving uploads from: {}", config.uploads_dir.display());

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app(app_state)).await?;

    Ok(())
}
