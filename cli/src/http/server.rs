//! HTTP服务器生命周期管理

use super::{
    middleware::{create_middleware_stack, create_trace_layer, request_logger},
    routes::create_router,
    AppState,
};
use crate::commands::cli::ServeArgs;
use axum::middleware;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use taskboard_core::api::{AppConfig, BoardError, CliError, Column};
use taskboard_plugins::factory::open_store;
use taskboard_plugins::store::SqliteStore;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{info, warn};

/// 处理 serve 命令：CLI 参数优先，配置文件作为默认值
pub async fn handle_serve(args: ServeArgs, cfg: &AppConfig) -> Result<(), CliError> {
    let mut cfg = cfg.clone();
    if let Some(host) = args.host {
        cfg.server.host = host;
    }
    if let Some(port) = args.port {
        cfg.server.port = port;
    }
    if args.no_seed {
        cfg.server.seed = false;
    }

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| {
            CliError::Config(format!(
                "invalid listen address {}:{}: {e}",
                cfg.server.host, cfg.server.port
            ))
        })?;

    let mut store = open_store(&cfg)?;
    prepare_store(&mut store, cfg.server.seed)?;

    let (shutdown_tx, _) = broadcast::channel(1);
    let state = AppState::new(Arc::new(Mutex::new(store)), cfg, shutdown_tx);

    let listener = TcpListener::bind(&addr).await?;
    info!("HTTP server listening on http://{}", addr);
    serve(listener, state).await
}

/// Seed the demo board if asked and close any position gaps left by older writers.
pub fn prepare_store(store: &mut SqliteStore, seed: bool) -> Result<(), CliError> {
    if seed {
        if let Some(summary) = store.seed_demo_board().map_err(BoardError::from)? {
            info!(
                users = summary.users,
                tasks = summary.tasks,
                comments = summary.comments,
                "Seeded empty store with demo board"
            );
        }
    }
    for column in Column::ALL {
        let count = store.normalize_column(column).map_err(BoardError::from)?;
        tracing::debug!(column = %column, count, "column normalized");
    }
    Ok(())
}

/// 在已绑定的listener上运行服务器，直到收到关闭信号
pub async fn serve(listener: TcpListener, state: AppState) -> Result<(), CliError> {
    let timeout = Duration::from_secs(state.config.server.request_timeout_secs);

    let app = create_router(state.clone())
        .layer(middleware::from_fn(request_logger))
        .layer(create_trace_layer())
        .layer(create_middleware_stack(timeout));

    let mut shutdown_rx = state.shutdown_tx.subscribe();

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = signal::ctrl_c() => {
                    info!("Received Ctrl+C signal");
                }
                _ = shutdown_rx.recv() => {
                    info!("Received shutdown signal");
                }
                _ = wait_for_sigterm() => {
                    info!("Received SIGTERM signal");
                }
            }

            info!("Starting graceful shutdown...");
        })
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// 等待 SIGTERM 信号（Unix系统）
#[cfg(unix)]
async fn wait_for_sigterm() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            warn!("Failed to setup SIGTERM handler: {}", e);
            std::future::pending::<()>().await
        }
    }
}

/// Windows 系统不支持 SIGTERM，使用空操作
#[cfg(not(unix))]
async fn wait_for_sigterm() {
    std::future::pending::<()>().await
}
