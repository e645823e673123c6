//! gRPC health service implementation.

use crate::proto::health::{
    health_check_response::ServingStatus,
    health_server::Health,
    HealthCheckRequest, HealthCheckResponse,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Request, Response, Status};
use tracing::debug;

/// Fully-qualified name of the user service, as health clients address it.
pub const USER_SERVICE_NAME: &str = "radiusx.users.v1.UserService";

/// Health service implementation.
///
/// Clones share the serving flag, so the server can flip it to
/// `NOT_SERVING` while it drains.
#[derive(Debug, Clone)]
pub struct HealthServiceImpl {
    serving: Arc<AtomicBool>,
}

impl Default for HealthServiceImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthServiceImpl {
    /// Creates a new health service reporting `SERVING`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            serving: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Reports `NOT_SERVING` from now on.
    pub fn set_not_serving(&self) {
        self.serving.store(false, Ordering::SeqCst);
    }

    /// Gets the health status for a service.
    fn get_status(&self, service: &str) -> ServingStatus {
        debug!("Health check for service: {}", service);

        match service {
            "" | USER_SERVICE_NAME if self.serving.load(Ordering::SeqCst) => ServingStatus::Serving,
            "" | USER_SERVICE_NAME => ServingStatus::NotServing,
            _ => ServingStatus::ServiceUnknown,
        }
    }
}

#[tonic::async_trait]
impl Health for HealthServiceImpl {
    async fn check(
        &self,
        request: Request<HealthCheckRequest>,
    ) -> Result<Response<HealthCheckResponse>, Status> {
        let req = request.into_inner();
        let status = self.get_status(&req.service);

        Ok(Response::new(HealthCheckResponse {
            status: status.into(),
        }))
    }

    type WatchStream = ReceiverStream<Result<HealthCheckResponse, Status>>;

    async fn watch(
        &self,
        request: Request<HealthCheckRequest>,
    ) -> Result<Response<Self::WatchStream>, Status> {
        let req = request.into_inner();
        let status = self.get_status(&req.service);

        let (tx, rx) = tokio::sync::mpsc::channel(1);

        // Send initial status; a dropped receiver just ends the stream.
        let _ = tx
            .send(Ok(HealthCheckResponse {
                status: status.into(),
            }))
            .await;

        Ok(Response::new(ReceiverStream::new(rx)))
    }
}
