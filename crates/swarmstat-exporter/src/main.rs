//! swarmstat exporter
//!
//! - Scrape endpoint: GET /metrics (path configurable)
//! - Ingest API for an external load generator: /v1/outcomes, /v1/run, /v1/stats/reset
//! - Probe loop polling $PING_URL (or probe.target_url) once per interval

use std::sync::Arc;

use tokio::sync::watch;
use tracing_subscriber::{fmt, EnvFilter};

use swarmstat_core::error::{Result, SwarmStatError};
use swarmstat_exporter::{
    app_state::AppState,
    config,
    probe::{HttpProber, ProbeLoop, ProbeTarget},
    router,
};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "swarmstat-exporter failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let path = std::env::var(config::CONFIG_ENV)
        .unwrap_or_else(|_| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::load_or_default(&path)?;
    let listen = cfg.server.listen_addr()?;

    let state = AppState::new(cfg)?;
    let (stop_tx, stop_rx) = watch::channel(false);

    let probe_task = if state.cfg().probe.enabled {
        let probe_cfg = &state.cfg().probe;
        let prober = HttpProber::new(probe_cfg.timeout())?;
        let probe_loop = ProbeLoop::new(
            Arc::new(prober),
            ProbeTarget::from_config(probe_cfg),
            probe_cfg.interval(),
            state.probe_metrics()?,
        );
        Some(probe_loop.spawn(stop_rx))
    } else {
        tracing::info!("probe loop disabled");
        None
    };

    let app = router::build_router(state);

    tracing::info!(%listen, "swarmstat-exporter starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| SwarmStatError::Internal(format!("bind {listen} failed: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(stop_tx))
        .await
        .map_err(|e| SwarmStatError::Internal(format!("server failed: {e}")))?;

    if let Some(task) = probe_task {
        if let Err(e) = task.await {
            tracing::warn!(error = %e, "probe task ended abnormally");
        }
    }
    tracing::info!("swarmstat-exporter stopped");
    Ok(())
}

/// Resolves on SIGINT/SIGTERM and tells the probe loop to stop.
async fn shutdown_signal(stop_tx: watch::Sender<bool>) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable; waiting for ctrl-c only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    tracing::info!("shutdown signal received");
    let _ = stop_tx.send(true);
}
