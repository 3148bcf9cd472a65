//! Backup metrics exporter.
//!
//! - Config from `MONGO_BACKUP_STATE` / `BACKUP_METRICS_PORT`
//! - `GET /metrics` renders the backup job's state file on every scrape
//! - Graceful shutdown on SIGINT / SIGTERM

use tracing_subscriber::{fmt, EnvFilter};

use backup_metrics_core::error::{BackupMetricsError, Result};
use backup_metrics_exporter::{app_state::AppState, config::ExporterConfig, router};

#[tokio::main]
async fn main() {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, fatal = e.is_fatal(), "backup-metrics-exporter stopped");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cfg = ExporterConfig::from_env()?;
    let listen = cfg.listen_addr();

    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| BackupMetricsError::Bind(format!("{listen}: {e}")))?;

    tracing::info!(%listen, state = %cfg.state_path.display(), "backup-metrics-exporter starting");

    let app = router::build_router(AppState::new(cfg));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| BackupMetricsError::Serve(e.to_string()))?;

    tracing::info!("backup-metrics-exporter stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
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
}
