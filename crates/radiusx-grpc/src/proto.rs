//! Generated protobuf types.

/// `radiusx.users.v1`
pub mod users {
    tonic::include_proto!("radiusx.users.v1");
}

/// `grpc.health.v1`
pub mod health {
    tonic::include_proto!("grpc.health.v1");
}
