//! gRPC server setup.

use crate::proto::{health, users};
use crate::services::{HealthServiceImpl, UserGrpcService};
use radiusx_config::ServerConfig;
use radiusx_core::{RadiusxError, RadiusxResult};
use radiusx_service::UserService;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tokio_util::sync::CancellationToken;
use tonic::transport::server::Router;
use tonic::transport::Server;
use tracing::{error, info};

/// gRPC server exposing the user service and health checks.
pub struct GrpcServer {
    addr: SocketAddr,
    request_timeout: Duration,
    user_service: Arc<dyn UserService>,
    health: HealthServiceImpl,
}

impl GrpcServer {
    /// Creates a new gRPC server.
    pub fn new(config: &ServerConfig, user_service: Arc<dyn UserService>) -> RadiusxResult<Self> {
        let addr = config
            .grpc_addr()
            .parse()
            .map_err(|e| RadiusxError::Configuration(format!("invalid gRPC address: {e}")))?;

        Ok(Self {
            addr,
            request_timeout: config.request_timeout(),
            user_service,
            health: HealthServiceImpl::new(),
        })
    }

    /// Address the server binds when started with [`GrpcServer::serve_with_shutdown`].
    #[must_use]
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    fn router(&self) -> Router {
        let user_grpc_service = UserGrpcService::new(Arc::clone(&self.user_service))
            .with_request_timeout(self.request_timeout);

        Server::builder()
            .timeout(self.request_timeout)
            .add_service(health::health_server::HealthServer::new(self.health.clone()))
            .add_service(users::user_service_server::UserServiceServer::new(user_grpc_service))
    }

    /// Serves on the configured address until `shutdown` is cancelled, then
    /// drains in-flight calls.
    pub async fn serve_with_shutdown(self, shutdown: CancellationToken) -> RadiusxResult<()> {
        let listener = TcpListener::bind(self.addr).await.map_err(|e| {
            RadiusxError::Configuration(format!("failed to bind gRPC address {}: {e}", self.addr))
        })?;
        self.serve_with_listener(listener, shutdown).await
    }

    /// Serves on an already-bound listener until `shutdown` is cancelled.
    pub async fn serve_with_listener(
        self,
        listener: TcpListener,
        shutdown: CancellationToken,
    ) -> RadiusxResult<()> {
        let local = listener.local_addr().unwrap_or(self.addr);
        info!("Starting gRPC server on {}", local);

        let health = self.health.clone();
        let signal = async move {
            shutdown.cancelled().await;
            health.set_not_serving();
            info!("gRPC server draining");
        };

        self.router()
            .serve_with_incoming_shutdown(TcpListenerStream::new(listener), signal)
            .await
            .map_err(|e| {
                error!("gRPC server error: {}", e);
                RadiusxError::Internal
            })?;

        info!("gRPC server stopped");
        Ok(())
    }
}

impl std::fmt::Debug for GrpcServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrpcServer")
            .field("addr", &self.addr)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}
