//! Server startup utilities.

use radiusx_config::AppConfig;
use tracing::info;

/// Prints the startup banner.
pub fn print_banner() {
    info!(r#"
    ____            ___           _  __
   / __ \____ _____/ (_)_  _______| |/ /
  / /_/ / __ `/ __  / / / / / ___/|   /
 / _, _/ /_/ / /_/ / / /_/ (__  )/   |
/_/ |_|\__,_/\__,_/_/\__,_/____//_/|_|

                 users service
    "#);
}

/// Prints server startup information.
pub fn print_startup_info(config: &AppConfig, cache_backend: &str) {
    let separator = "=".repeat(60);
    info!("{}", separator);
    info!("gRPC API:     http://{}", config.server.grpc_addr());
    info!("Health:       grpc.health.v1.Health/Check");
    info!("Environment:  {}", config.app.environment);
    info!("Cache:        {}", cache_backend);
    info!("Req timeout:  {}s", config.server.request_timeout_secs);
    info!("{}", separator);
}
