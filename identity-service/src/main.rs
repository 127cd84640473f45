use identity_service::{
    build_router,
    config::IdentityConfig,
    db,
    services::{AccessTokenSigner, AuthService, AuthStore, Database, JwtService},
    AppState,
};
use service_core::observability::logging::init_tracing;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration - fail fast if invalid
    let config = IdentityConfig::from_env()?;

    init_tracing(&config.service_name, &config.log_level);

    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        environment = ?config.environment,
        "Starting identity service"
    );

    tracing::info!("Initializing database connections");
    let pool = db::create_pool(&config.database).await?;
    db::run_migrations(&pool).await?;
    tracing::info!("Database initialized successfully");

    let store: Arc<dyn AuthStore> = Arc::new(Database::new(pool));
    let signer: Arc<dyn AccessTokenSigner> = Arc::new(JwtService::new(&config.tokens));

    let auth = AuthService::new(
        store.clone(),
        signer.clone(),
        config.tokens.refresh_token_ttl_days,
    );

    let state = AppState {
        config: config.clone(),
        store,
        signer,
        auth,
    };

    let app = build_router(state);

    let addr = config.common.bind_addr();

    let service_span = tracing::info_span!(
        "service",
        service = %config.service_name,
        version = %config.service_version,
        environment = ?config.environment,
    );
    let _guard = service_span.enter();

    tracing::info!(address = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Service shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
