//! # RadiusX Users Server
//!
//! Loads configuration, connects PostgreSQL and the cache, and serves the
//! `radiusx.users.v1` gRPC API until Ctrl+C or SIGTERM.

use radiusx_config::{AppConfig, ConfigLoader};
use radiusx_core::{init_logging, RadiusxResult};
use radiusx_grpc::GrpcServer;
use radiusx_repository::{create_pool, DatabasePoolInterface};
use radiusx_server::{di, startup};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match ConfigLoader::from_default_location().load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = init_logging(
        Some(&config.observability.log_level),
        config.observability.log_format,
    ) {
        eprintln!("Failed to initialize logging: {e}");
        std::process::exit(1);
    }

    startup::print_banner();
    info!("Starting {} v{}", config.app.name, config.app.version);

    if let Err(e) = run(config).await {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> RadiusxResult<()> {
    info!("Environment: {}", config.app.environment);

    let db_pool = create_pool(&config.database).await?;
    db_pool.health_check().await?;
    if config.database.run_migrations {
        db_pool.run_migrations().await?;
    }

    let services = di::build_services(&config, &db_pool)?;
    let server = GrpcServer::new(&config.server, services.user_service.clone())?;
    startup::print_startup_info(&config, services.cache.backend());

    let shutdown = CancellationToken::new();
    let token = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        token.cancel();
    });

    let result = server.serve_with_shutdown(shutdown).await;

    services.cache.close().await;
    services.database.close().await;

    info!("Server shutdown complete");
    result
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
