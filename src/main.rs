use std::sync::Arc;

use products_api::{
    app::{
        create_router,
        products::{AppState, PgProductStore, ProductService},
    },
    infrastructure::{Config, DatabaseManager, Logger},
};
use tokio::{net::TcpListener, signal};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 已存在的环境变量不会被 .env 覆盖
    let dotenv = dotenvy::dotenv();

    Logger::init("info");

    match dotenv {
        Ok(path) => info!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => info!("No .env file found, using process environment"),
        Err(e) => warn!("Failed to load .env file: {}", e),
    }

    let config = Config::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;

    let database = DatabaseManager::new(&config.database);
    let store = PgProductStore::new(database.get_pool().clone());
    let state = AppState::new(ProductService::new(Arc::new(store)));

    let app = create_router(state);

    let listener = TcpListener::bind(config.server.bind_address()).await?;
    let addr = listener.local_addr()?;

    info!("Listening on port {}", addr.port());
    info!("   GET    /api/products      - List products");
    info!("   GET    /api/products/:id  - Get product by id");
    info!("   POST   /api/products      - Create product");
    info!("   GET    /health            - Health check");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    database.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for ctrl+c: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
