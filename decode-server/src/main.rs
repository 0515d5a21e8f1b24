use std::sync::Arc;
use tokio::signal;
use tracing::info;

use decode_core::{CommentJobRunner, ContentApi, GameService, KeyLayout, TokioScheduler};
use decode_persistence::{KeyValueStore, MemoryStore, SqlStore, connection::connect_and_migrate};
use decode_server::{
    config::{Config, StoreBackend},
    content::{DevContentApi, RedditContentClient},
    create_routes,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting photodecode server...");

    let config = Config::new()?;

    let store: Arc<dyn KeyValueStore> = match config.store_backend {
        StoreBackend::Sqlite => {
            let db = match connect_and_migrate(&config.database_url).await {
                Ok(db) => db,
                Err(e) => {
                    tracing::error!("Failed to connect to database and run migrations: {}", e);
                    std::process::exit(1);
                }
            };
            Arc::new(SqlStore::new(db))
        }
        StoreBackend::Memory => {
            info!("Using in-memory store, state is lost on shutdown");
            Arc::new(MemoryStore::new())
        }
    };

    let content: Arc<dyn ContentApi> = match &config.content_api_url {
        Some(url) if !config.content_dev_mode => {
            info!("Using content API at {}", url);
            Arc::new(RedditContentClient::new(
                url.clone(),
                config.content_api_token.clone(),
            ))
        }
        _ => {
            info!("Starting in development content mode - comments are only logged");
            Arc::new(DevContentApi)
        }
    };

    let scheduler = Arc::new(TokioScheduler::new(Arc::new(CommentJobRunner::new(
        content.clone(),
    ))));

    let service = Arc::new(GameService::new(
        store,
        KeyLayout::new(config.key_namespace.clone(), config.scoreboard_tag.clone()),
        scheduler,
        config.service_settings(),
    ));

    let routes = create_routes(service, content);

    info!("Server starting on {}:{}", config.host, config.port);

    let addr = (config.host.parse::<std::net::IpAddr>()?, config.port);

    let (addr, server) = warp::serve(routes).bind_with_graceful_shutdown(addr, async {
        // Wait for SIGINT (Ctrl+C) or SIGTERM
        #[cfg(unix)]
        {
            let (Ok(mut sigint), Ok(mut sigterm)) = (
                signal::unix::signal(signal::unix::SignalKind::interrupt()),
                signal::unix::signal(signal::unix::SignalKind::terminate()),
            ) else {
                tracing::error!("Failed to install signal handlers");
                return std::future::pending().await;
            };

            tokio::select! {
                _ = sigint.recv() => {
                    info!("Received SIGINT, shutting down gracefully...");
                }
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, shutting down gracefully...");
                }
            }
        }

        #[cfg(not(unix))]
        {
            if let Err(e) = signal::ctrl_c().await {
                tracing::error!("Failed to listen for ctrl+c: {}", e);
                return std::future::pending().await;
            }
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    });

    info!(
        "Server started successfully on {}. Press Ctrl+C to stop.",
        addr
    );
    server.await;
    info!("Server shutdown complete.");
    Ok(())
}
