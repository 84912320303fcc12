mod cli;

use crate::cli::{StorageBackendArg, CLI};
use anyhow::Context;
use clap::Parser;
use relink_gateway::{App, AppState, RedirectTargets, SvgQrRenderer};
use relink_generator::RandomGenerator;
use relink_redirector::RedirectorService;
use relink_shortener::{ShortenerService, ShortenerSettings};
use relink_storage::{DeadlineRepository, InMemoryRepository, Repository, SqliteRepository};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::try_parse()?;

    relink_telemetry::init(config.log_format.into())?;

    info!(
        listen_addr = %config.listen_addr,
        storage_backend = %config.storage,
        public_base_url = config.public_base_url.as_ref().map(|u| u.as_str()),
        "starting relink gateway"
    );

    match config.storage {
        StorageBackendArg::InMemory => run_server(config, InMemoryRepository::new()).await,
        StorageBackendArg::Sqlite => {
            let repository = SqliteRepository::connect(&config.sqlite_url)
                .await
                .with_context(|| format!("failed to open sqlite store {}", config.sqlite_url))?;
            run_server(config, repository).await
        }
    }
}

async fn run_server<R: Repository>(config: CLI, repository: R) -> anyhow::Result<()> {
    let repository = Arc::new(DeadlineRepository::new(
        repository,
        Duration::from_millis(config.store_timeout_ms),
    ));

    let settings = ShortenerSettings::builder()
        .max_attempts(config.max_allocation_attempts)
        .build();
    let shortener =
        ShortenerService::with_settings(Arc::clone(&repository), RandomGenerator::new(), settings);
    let redirector = RedirectorService::new(repository);
    let targets = RedirectTargets::new(config.public_base_url, config.default_label.as_deref())?;

    let state = AppState::new(
        Arc::new(shortener),
        Arc::new(redirector),
        Arc::new(SvgQrRenderer::default()),
        targets,
    );
    let router = App::router(state, config.static_dir.as_deref());

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("relink gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    wait_for_shutdown(tokio::signal::ctrl_c()).await
}

/// Resolves once `signal` fires. A signal that cannot be installed never fires.
async fn wait_for_shutdown(signal: impl Future<Output = std::io::Result<()>>) {
    match signal.await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => {
            warn!(error = %e, "failed to listen for shutdown signal");
            std::future::pending::<()>().await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[tokio::test]
    async fn shutdown_follows_the_signal() {
        tokio::time::timeout(Duration::from_secs(1), wait_for_shutdown(async { Ok(()) }))
            .await
            .expect("shutdown should complete once signalled");
    }

    #[tokio::test]
    async fn failed_signal_install_keeps_serving() {
        let failed = async { Err(io::Error::other("no signal handler")) };

        let result =
            tokio::time::timeout(Duration::from_millis(100), wait_for_shutdown(failed)).await;
        assert!(result.is_err(), "server must not shut down");
    }
}
