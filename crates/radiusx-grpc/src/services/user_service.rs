//! User gRPC service implementation.

use crate::proto::users;
use chrono::{DateTime, Utc};
use radiusx_core::{
    rules, ListParams, NewUser, RadiusxError, RequestContext, Role, User, UserId, UserUpdate, ValidateExt,
};
use radiusx_service::UserService;
use std::sync::Arc;
use std::time::Duration;
use tonic::metadata::MetadataMap;
use tonic::{Request, Response, Status};
use tracing::debug;
use validator::Validate;

/// Default upper bound on a single RPC.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Register payload as checked at the transport boundary.
#[derive(Validate)]
struct RegisterInput {
    #[validate(length(min = 1, max = 100))]
    name: String,
    #[validate(email)]
    email: String,
    #[validate(length(min = 8, max = 72))]
    password: String,
}

/// Update payload; only fields that are present get checked.
#[derive(Validate)]
struct UpdateInput {
    #[validate(length(min = 1, max = 100))]
    name: Option<String>,
    #[validate(email)]
    email: Option<String>,
    #[validate(length(min = 8, max = 72))]
    password: Option<String>,
}

/// User gRPC service implementation.
pub struct UserGrpcService {
    user_service: Arc<dyn UserService>,
    request_timeout: Duration,
}

impl UserGrpcService {
    /// Creates a new user gRPC service.
    pub fn new(user_service: Arc<dyn UserService>) -> Self {
        Self {
            user_service,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Overrides the server-side request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Context for one call: the server timeout, tightened by the client's
    /// `grpc-timeout` when it sent one.
    fn context(&self, metadata: &MetadataMap) -> RequestContext {
        let ctx = RequestContext::new().with_timeout(self.request_timeout);
        match client_timeout(metadata) {
            Some(timeout) => ctx.with_timeout(timeout),
            None => ctx,
        }
    }
}

impl std::fmt::Debug for UserGrpcService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserGrpcService")
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

#[tonic::async_trait]
impl users::user_service_server::UserService for UserGrpcService {
    async fn register(
        &self,
        request: Request<users::RegisterRequest>,
    ) -> Result<Response<users::RegisterResponse>, Status> {
        let ctx = self.context(request.metadata());
        let req = request.into_inner();
        debug!("gRPC Register: {}", req.email);

        rules::not_blank(&req.name).map_err(|_| Status::invalid_argument("name: not_blank"))?;
        let input = RegisterInput {
            name: req.name.trim().to_string(),
            email: req.email,
            password: req.password,
        };
        input.validate_request().map_err(to_status)?;

        let role = from_proto_role(req.role)?.unwrap_or_default();
        let new_user = NewUser::new(input.name, input.email, input.password).with_role(role);

        let user = self
            .user_service
            .register(&ctx, new_user)
            .await
            .map_err(to_status)?;

        Ok(Response::new(users::RegisterResponse {
            user: Some(to_proto_user(&user)),
        }))
    }

    async fn get_user(
        &self,
        request: Request<users::GetUserRequest>,
    ) -> Result<Response<users::GetUserResponse>, Status> {
        let ctx = self.context(request.metadata());
        let req = request.into_inner();
        debug!("gRPC GetUser: {}", req.id);

        let id = parse_user_id(req.id)?;
        let user = self
            .user_service
            .get_user(&ctx, id)
            .await
            .map_err(to_status)?;

        Ok(Response::new(users::GetUserResponse {
            user: Some(to_proto_user(&user)),
        }))
    }

    async fn list_users(
        &self,
        request: Request<users::ListUsersRequest>,
    ) -> Result<Response<users::ListUsersResponse>, Status> {
        let ctx = self.context(request.metadata());
        let req = request.into_inner();
        debug!("gRPC ListUsers: skip={} limit={}", req.skip, req.limit);

        let params = ListParams::new(req.skip, req.limit).map_err(to_status)?;
        let page = self
            .user_service
            .list_users(&ctx, params)
            .await
            .map_err(to_status)?;

        Ok(Response::new(users::ListUsersResponse {
            users: page.iter().map(to_proto_user).collect(),
        }))
    }

    async fn update_user(
        &self,
        request: Request<users::UpdateUserRequest>,
    ) -> Result<Response<users::UpdateUserResponse>, Status> {
        let ctx = self.context(request.metadata());
        let req = request.into_inner();
        debug!("gRPC UpdateUser: {}", req.id);

        let id = parse_user_id(req.id)?;
        let input = UpdateInput {
            name: non_empty(req.name),
            email: non_empty(req.email),
            password: non_empty(req.password),
        };
        input.validate_request().map_err(to_status)?;

        let update = UserUpdate {
            id,
            name: input.name,
            email: input.email,
            password: input.password,
            role: req.role.map(from_proto_role).transpose()?.flatten(),
        };

        let user = self
            .user_service
            .update_user(&ctx, update)
            .await
            .map_err(to_status)?;

        Ok(Response::new(users::UpdateUserResponse {
            user: Some(to_proto_user(&user)),
        }))
    }

    async fn delete_user(
        &self,
        request: Request<users::DeleteUserRequest>,
    ) -> Result<Response<users::DeleteUserResponse>, Status> {
        let ctx = self.context(request.metadata());
        let req = request.into_inner();
        debug!("gRPC DeleteUser: {}", req.id);

        let id = parse_user_id(req.id)?;
        self.user_service
            .delete_user(&ctx, id)
            .await
            .map_err(to_status)?;

        Ok(Response::new(users::DeleteUserResponse {}))
    }
}

fn parse_user_id(id: u64) -> Result<UserId, Status> {
    if id == 0 {
        return Err(Status::invalid_argument("id: must be greater than zero"));
    }
    Ok(UserId::new(id))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Maps a service error onto a gRPC status.
pub fn to_status(err: RadiusxError) -> Status {
    match err {
        RadiusxError::DataNotFound { .. } => Status::not_found(err.to_string()),
        RadiusxError::ConflictData(_) => Status::already_exists(err.to_string()),
        RadiusxError::Internal => Status::internal(err.to_string()),
        RadiusxError::Validation(msg) => Status::invalid_argument(msg),
        _ => Status::invalid_argument(err.to_string()),
    }
}

/// Parses the `grpc-timeout` header (`<digits><unit>`, unit one of
/// `H M S m u n`).
fn client_timeout(metadata: &MetadataMap) -> Option<Duration> {
    let raw = metadata.get("grpc-timeout")?.to_str().ok()?;
    if raw.len() < 2 || raw.len() > 9 {
        return None;
    }
    let (digits, unit) = raw.split_at(raw.len() - 1);
    let value: u64 = digits.parse().ok()?;

    match unit {
        "H" => Some(Duration::from_secs(value.checked_mul(3600)?)),
        "M" => Some(Duration::from_secs(value.checked_mul(60)?)),
        "S" => Some(Duration::from_secs(value)),
        "m" => Some(Duration::from_millis(value)),
        "u" => Some(Duration::from_micros(value)),
        "n" => Some(Duration::from_nanos(value)),
        _ => None,
    }
}

fn to_proto_user(user: &User) -> users::User {
    users::User {
        id: user.id.into_inner(),
        name: user.name.clone(),
        email: user.email.clone(),
        role: to_proto_role(user.role) as i32,
        created_at: Some(to_timestamp(user.created_at)),
        updated_at: Some(to_timestamp(user.updated_at)),
    }
}

fn to_timestamp(at: DateTime<Utc>) -> prost_types::Timestamp {
    prost_types::Timestamp {
        seconds: at.timestamp(),
        nanos: i32::try_from(at.timestamp_subsec_nanos()).unwrap_or_default(),
    }
}

fn to_proto_role(role: Role) -> users::Role {
    match role {
        Role::Reader => users::Role::Reader,
        Role::Agent => users::Role::Agent,
        Role::Admin => users::Role::Admin,
    }
}

/// `ROLE_UNSPECIFIED` maps to `None`; unknown values are rejected.
fn from_proto_role(value: i32) -> Result<Option<Role>, Status> {
    match users::Role::try_from(value) {
        Ok(users::Role::Unspecified) => Ok(None),
        Ok(users::Role::Reader) => Ok(Some(Role::Reader)),
        Ok(users::Role::Agent) => Ok(Some(Role::Agent)),
        Ok(users::Role::Admin) => Ok(Some(Role::Admin)),
        Err(_) => Err(Status::invalid_argument(format!("role: unknown value {value}"))),
    }
}
