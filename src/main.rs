use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};

use inventory_admin as admin;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = admin::config::load_config().context("loading configuration")?;
    admin::config::init_tracing(cfg.log_level(), cfg.log_json);

    let db_pool = admin::db::establish_connection_from_app_config(&cfg)
        .await
        .context("connecting to the inventory store")?;
    let db_arc = Arc::new(db_pool);

    if !cfg.has_cors_allowed_origins() && !cfg.should_allow_permissive_cors() {
        warn!("No CORS origins configured; cross-origin requests will be refused");
    }

    let addr: SocketAddr = format!("{}:{}", cfg.host, cfg.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", cfg.host, cfg.port))?;

    let app_state = admin::AppState::new(db_arc.clone(), cfg);
    let app = admin::app(app_state);

    info!("inventory-admin listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Ok(pool) = Arc::try_unwrap(db_arc) {
        admin::db::close_pool(pool).await?;
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("failed to install SIGTERM handler: {}", e);
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

    info!("Shutdown signal received, draining connections");
}
